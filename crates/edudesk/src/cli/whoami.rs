use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;
use edudesk_access::capabilities;

use super::Context;

#[derive(Debug, Args)]
pub struct WhoamiArg {}

impl WhoamiArg {
    pub async fn run(self, ctx: &Context) -> Result<ExitCode> {
        ctx.require_token()?;
        let actor = ctx
            .api
            .current_actor()
            .await
            .context("Failed to fetch the current account")?;

        println!("{} <{}>", actor.name, actor.email);
        println!("role: {}", actor.role);
        if let Some(team) = &actor.team {
            println!("team: {}", team.name);
        }
        let granted: Vec<_> = capabilities(&actor).iter().map(|c| c.as_str()).collect();
        println!("capabilities: {}", granted.join(", "));
        Ok(ExitCode::SUCCESS)
    }
}
