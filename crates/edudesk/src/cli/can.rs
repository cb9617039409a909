use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;
use edudesk_access::{Actor, Capability, Role};

use super::Context;

#[derive(Debug, Args)]
pub struct CanArg {
    /// e.g. `export-leads` or `canExportLeads`.
    pub capability: Capability,
    /// Check the role's defaults instead of the signed-in account.
    #[arg(long)]
    pub role: Option<Role>,
}

impl CanArg {
    pub async fn run(self, ctx: &Context) -> Result<ExitCode> {
        let actor = match self.role {
            Some(role) => Actor::new("local", role),
            None => {
                ctx.require_token()?;
                ctx.api
                    .current_actor()
                    .await
                    .context("Failed to fetch the current account")?
            }
        };

        let allowed = actor.can(self.capability);
        tracing::debug!(role = %actor.role, capability = %self.capability.as_str(), allowed, "evaluated capability");
        println!("{}", if allowed { "allowed" } else { "denied" });
        Ok(if allowed {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }
}
