use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;
use crate::core::DEFAULT_RETRY_DELAYS;
use crate::error::TransferError;

/// Default chunk size: 50 MiB.
///
/// Large enough to keep per-request overhead low on multi-gigabyte videos,
/// small enough that a failed chunk costs little to resend. A multiple of
/// [`crate::core::CHUNK_ALIGNMENT`].
pub const DEFAULT_CHUNK_SIZE: usize = 50 * 1024 * 1024;

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&TransferError) + Send + Sync>;

/// Configuration for a chunked transfer.
///
/// # Examples
///
/// ```
/// use edudesk_transfer::TransferOptions;
/// use std::time::Duration;
///
/// let options = TransferOptions::default()
///     .chunk_size(8 * 1024 * 1024)
///     .retry_delays(vec![Duration::ZERO, Duration::from_secs(1)])
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Clone)]
pub struct TransferOptions {
    /// Bytes per `PATCH` request. The last chunk may be shorter.
    ///
    /// Default: [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,

    /// Waits before each retry of a transient failure. The transfer fails
    /// once every delay has been used without an acknowledged chunk.
    ///
    /// Default: `[0s, 3s, 5s, 10s, 20s]`
    pub retry_delays: Arc<[Duration]>,

    /// Extra headers sent with every request.
    pub headers: Arc<[(String, String)]>,

    /// Invoked after offset negotiation and after every acknowledged chunk.
    /// Never invoked after the terminal report or after an abort.
    pub on_progress: Option<ProgressCallback>,

    /// Invoked once when the server has acknowledged every byte.
    pub on_success: Option<ProgressCallback>,

    /// Invoked once on terminal failure. Not invoked on abort.
    pub on_error: Option<ErrorCallback>,
}

impl fmt::Debug for TransferOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferOptions")
            .field("chunk_size", &self.chunk_size)
            .field("retry_delays", &self.retry_delays)
            .field("headers", &self.headers.len())
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .field("on_success", &self.on_success.as_ref().map(|_| "{ ... }"))
            .field("on_error", &self.on_error.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry_delays: Arc::from(DEFAULT_RETRY_DELAYS.as_slice()),
            headers: Arc::new([]),
            on_progress: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl TransferOptions {
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn retry_delays(mut self, retry_delays: Vec<Duration>) -> Self {
        self.retry_delays = Arc::from(retry_delays);
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    #[must_use]
    pub fn on_success(mut self, on_success: ProgressCallback) -> Self {
        self.on_success = Some(on_success);
        self
    }

    #[must_use]
    pub fn on_error(mut self, on_error: ErrorCallback) -> Self {
        self.on_error = Some(on_error);
        self
    }
}
