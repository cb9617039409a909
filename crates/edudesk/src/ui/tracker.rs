use std::sync::Arc;

use edudesk_transfer::{Progress, TransferOptions, TransferPhase};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_chars(TICK)
        .progress_chars(PB_CHARS)
});

/// Byte progress bar driven by transfer callbacks.
#[derive(Clone)]
pub struct UploadTracker {
    pb: ProgressBar,
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadTracker {
    /// The length is taken from the first progress report.
    pub fn new() -> Self {
        let pb = ProgressBar::no_length();
        pb.set_style(PB_TEMPLATE.clone());
        Self { pb }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, progress: &Progress) {
        self.pb.set_length(progress.bytes_total);
        self.pb.set_position(progress.bytes_sent);
        match progress.phase {
            TransferPhase::Negotiating if progress.bytes_sent > 0 => {
                self.pb.set_message("resuming");
                self.pb.reset_eta();
            }
            TransferPhase::Retrying => {
                self.pb.set_message(format!("retry {}", progress.retry_count));
            }
            _ => self.pb.set_message(""),
        }
    }

    /// Wires the bar into `options`.
    pub fn attach(&self, options: TransferOptions) -> TransferOptions {
        let (on_progress, on_success) = (self.clone(), self.clone());
        options
            .on_progress(Arc::new(move |p| on_progress.update(p)))
            .on_success(Arc::new(move |p| {
                on_success.pb.set_position(p.bytes_total);
                on_success.pb.set_message("transferred");
            }))
    }

    pub fn finish(&self, msg: impl Into<String>) {
        self.pb.finish_with_message(msg.into());
    }

    pub fn abandon(&self, msg: impl Into<String>) {
        self.pb.abandon_with_message(msg.into());
    }
}
