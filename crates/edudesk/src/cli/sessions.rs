use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use super::Context;
use crate::ui::{FormatConfig, SessionRow, render};

#[derive(Debug, Args)]
pub struct SessionsArg {
    /// Drop sessions older than `stale_after_days` first.
    #[arg(long)]
    pub prune: bool,
}

impl SessionsArg {
    pub fn run(self, ctx: &Context) -> Result<ExitCode> {
        let sessions = ctx.sessions()?;
        if self.prune {
            let removed = sessions.prune_stale(ctx.config.stale_after())?;
            println!("Pruned {removed} stale session(s)");
        }

        let mut pending = sessions.list_sessions()?;
        if pending.is_empty() {
            println!("No pending uploads");
            return Ok(ExitCode::SUCCESS);
        }
        pending.sort_by_key(|s| s.created_at);

        let rows: Vec<SessionRow> = pending.iter().map(SessionRow::from).collect();
        let footer = format!("{} pending upload(s)", rows.len());
        let table = render(
            rows,
            FormatConfig {
                footer: Some(footer),
            },
        );
        println!("{table}");
        Ok(ExitCode::SUCCESS)
    }
}
