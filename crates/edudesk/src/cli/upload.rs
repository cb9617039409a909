use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use edudesk_transfer::ReqwestTransport;
use edudesk_upload::{UploadControl, UploadOutcome, UploadRequest, Uploader};
use indicatif::HumanBytes;

use super::Context;
use crate::ui::UploadTracker;

#[derive(Debug, Args)]
pub struct UploadArg {
    /// Chapter the video belongs to.
    pub chapter: String,
    /// MP4, MOV or AVI file, at most 500 MB.
    pub file: PathBuf,
    /// Video length in seconds, stored on the chapter.
    #[arg(long, short)]
    pub duration: Option<u64>,
    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,
}

impl UploadArg {
    pub async fn run(self, ctx: &Context) -> Result<ExitCode> {
        ctx.require_token()?;
        let tracker = if self.quiet {
            UploadTracker::hidden()
        } else {
            UploadTracker::new()
        };

        let transport = ReqwestTransport::new(ctx.api.http().clone());
        let uploader = Uploader::new(ctx.sessions()?, ctx.api.clone(), transport)
            .with_options(tracker.attach(ctx.config.transfer_options()));

        let control = UploadControl::new();
        let interrupt = {
            let control = control.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    control.abort();
                }
            })
        };

        let mut request = UploadRequest::new(self.chapter.clone(), self.file.clone());
        if let Some(duration) = self.duration {
            request = request.duration_secs(duration);
        }
        let result = uploader.upload(&request, &control).await;
        interrupt.abort();

        match result {
            Ok(UploadOutcome::Finalized { session, resumed }) => {
                tracker.finish("done");
                println!(
                    "{} {} to chapter {} (asset {})",
                    if resumed { "Resumed and uploaded" } else { "Uploaded" },
                    session.file_name,
                    session.target_id,
                    session.remote_asset_id
                );
                Ok(ExitCode::SUCCESS)
            }
            Ok(UploadOutcome::Aborted { bytes_sent, .. }) => {
                tracker.abandon("aborted");
                println!(
                    "Aborted after {}. Run the same command again to resume.",
                    HumanBytes(bytes_sent)
                );
                Ok(ExitCode::from(130))
            }
            Err(e) => {
                tracker.abandon("failed");
                if e.is_resumable() {
                    eprintln!("The upload session was kept. Run the same command again to resume.");
                }
                Err(e.into())
            }
        }
    }
}
