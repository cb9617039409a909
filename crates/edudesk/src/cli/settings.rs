use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;

#[derive(Debug, Args)]
pub struct ConfigArg {
    /// Include the token instead of masking it.
    #[arg(long)]
    pub show_token: bool,
}

impl ConfigArg {
    pub fn run(self, ctx: &Context) -> Result<ExitCode> {
        let mut config = ctx.config.clone();
        if !self.show_token {
            config.token = config.token.map(|_| "********".to_string());
        }
        let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
        print!("{rendered}");
        Ok(ExitCode::SUCCESS)
    }
}
