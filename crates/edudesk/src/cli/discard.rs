use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use edudesk_transfer::ReqwestTransport;
use edudesk_upload::Uploader;

use super::Context;

#[derive(Debug, Args)]
pub struct DiscardArg {
    pub chapter: String,
}

impl DiscardArg {
    pub fn run(self, ctx: &Context) -> Result<ExitCode> {
        let transport = ReqwestTransport::new(ctx.api.http().clone());
        let uploader = Uploader::new(ctx.sessions()?, ctx.api.clone(), transport);
        match uploader.discard(&self.chapter)? {
            Some(session) => println!(
                "Discarded upload of {} for chapter {}",
                session.file_name, session.target_id
            ),
            None => println!("No pending upload for chapter {}", self.chapter),
        }
        Ok(ExitCode::SUCCESS)
    }
}
