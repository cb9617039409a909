use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The local file an upload is for, as far as the session cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Body of the backend's "start transfer" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransferRequest {
    pub file_name: String,
    pub file_size: u64,
    pub target_id: String,
}

/// Upload slot allocated by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTarget {
    pub transfer_endpoint: String,
    pub remote_asset_id: String,
}

/// Backend collaborator that allocates a remote upload slot.
///
/// Not idempotent: every call allocates a new slot, so callers must not issue
/// it twice for a target whose session is still unresolved.
pub trait TransferStarter: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn start_transfer(
        &self,
        request: &StartTransferRequest,
    ) -> impl Future<Output = Result<TransferTarget, Self::Error>> + Send;
}

/// Locally persisted pointer to an in-progress upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSession {
    pub target_id: String,
    pub transfer_endpoint: String,
    pub remote_asset_id: String,
    pub file_name: String,
    pub file_size: u64,
    /// Unix seconds.
    pub created_at: i64,
    /// All bytes were acknowledged; only the finalize step is outstanding.
    pub transfer_complete: bool,
}

impl UploadSession {
    pub fn new(target_id: impl Into<String>, file: &FileInfo, target: TransferTarget) -> Self {
        Self {
            target_id: target_id.into(),
            transfer_endpoint: target.transfer_endpoint,
            remote_asset_id: target.remote_asset_id,
            file_name: file.name.clone(),
            file_size: file.size,
            created_at: Utc::now().timestamp(),
            transfer_complete: false,
        }
    }

    /// Whether `file` looks like the file this session was started with.
    pub fn matches(&self, file: &FileInfo) -> bool {
        self.file_name == file.name && self.file_size == file.size
    }

    pub fn age(&self) -> Duration {
        let secs = Utc::now().timestamp().saturating_sub(self.created_at);
        Duration::from_secs(secs.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TransferTarget {
        TransferTarget {
            transfer_endpoint: "https://upload.example.com/tus/abc".to_string(),
            remote_asset_id: "asset-1".to_string(),
        }
    }

    #[test]
    fn new_session_is_not_transferred() {
        let session = UploadSession::new("chapter-1", &FileInfo::new("intro.mp4", 42), target());
        assert_eq!(session.target_id, "chapter-1");
        assert_eq!(session.remote_asset_id, "asset-1");
        assert!(!session.transfer_complete);
        assert!(session.age() < Duration::from_secs(5));
    }

    #[test]
    fn matches_requires_same_name_and_size() {
        let session = UploadSession::new("chapter-1", &FileInfo::new("intro.mp4", 42), target());
        assert!(session.matches(&FileInfo::new("intro.mp4", 42)));
        assert!(!session.matches(&FileInfo::new("intro.mp4", 43)));
        assert!(!session.matches(&FileInfo::new("outro.mp4", 42)));
    }

    #[test]
    fn age_saturates_for_future_timestamps() {
        let mut session = UploadSession::new("c", &FileInfo::new("a.mp4", 1), target());
        session.created_at = i64::MAX;
        assert_eq!(session.age(), Duration::ZERO);
    }
}
