use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;
use indicatif::HumanBytes;

use super::Context;

#[derive(Debug, Args)]
pub struct StatusArg {
    pub chapter: String,
    /// Only show the local session; skip the backend.
    #[arg(long)]
    pub offline: bool,
}

impl StatusArg {
    pub async fn run(self, ctx: &Context) -> Result<ExitCode> {
        match ctx.sessions()?.get_existing_session(&self.chapter) {
            Some(session) if session.transfer_complete => println!(
                "local:  {} ({}) transferred, waiting to be attached",
                session.file_name,
                HumanBytes(session.file_size)
            ),
            Some(session) => println!(
                "local:  {} ({}) upload in progress",
                session.file_name,
                HumanBytes(session.file_size)
            ),
            None => println!("local:  no pending upload"),
        }

        if self.offline {
            return Ok(ExitCode::SUCCESS);
        }
        ctx.require_token()?;
        let chapter = ctx
            .api
            .chapter(&self.chapter)
            .await
            .with_context(|| format!("Failed to fetch chapter {}", self.chapter))?;
        println!(
            "remote: {} (video {})",
            chapter.video_status,
            chapter.video_url.as_deref().unwrap_or("-")
        );
        Ok(ExitCode::SUCCESS)
    }
}
