use std::io;
use std::path::PathBuf;

use edudesk_session::SessionError;
use edudesk_transfer::TransferError;
use thiserror::Error;

use crate::validate::FileRejection;

pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} rejected: {reason}")]
    Rejected {
        path: PathBuf,
        #[source]
        reason: FileRejection,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("transfer for {target_id} failed: {source}")]
    Transfer {
        target_id: String,
        #[source]
        source: TransferError,
    },

    #[error("uploaded {target_id} but could not finalize it: {source}")]
    Finalize {
        target_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl UploadError {
    /// The session was kept and running the upload again will resume it.
    pub fn is_resumable(&self) -> bool {
        match self {
            UploadError::Transfer { source, .. } => !source.needs_new_endpoint(),
            UploadError::Finalize { .. } => true,
            _ => false,
        }
    }
}
