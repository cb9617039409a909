use std::sync::Arc;

use tokio::sync::watch;

/// Abort switch for an upload, shareable with signal handlers and UI code.
///
/// Aborting keeps the session, so a later run resumes the transfer.
#[derive(Debug, Clone)]
pub struct UploadControl {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for UploadControl {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadControl {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`abort`](Self::abort) has been called.
    pub async fn aborted(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|aborted| *aborted).await;
    }
}
