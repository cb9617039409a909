use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("failed to read source: {0}")]
    Source(#[source] io::Error),

    #[error("upload endpoint no longer exists (HTTP {status})")]
    EndpointGone { status: u16 },

    #[error("upload rejected by server (HTTP {status})")]
    Rejected { status: u16 },

    #[error("server expects {remote} bytes but the file has {local}")]
    LengthMismatch { local: u64, remote: u64 },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("giving up after {attempts} retries: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl TransferError {
    /// The endpoint is unusable and a fresh upload slot is needed.
    pub fn needs_new_endpoint(&self) -> bool {
        matches!(
            self,
            TransferError::EndpointGone { .. } | TransferError::LengthMismatch { .. }
        )
    }
}
