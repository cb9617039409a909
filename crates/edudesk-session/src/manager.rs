use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{Result, SessionError};
use crate::session::{FileInfo, StartTransferRequest, TransferStarter, UploadSession};
use crate::store::KvStore;

pub struct SessionKeys;

impl SessionKeys {
    pub const PREFIX: &'static str = "upload:session:";

    pub fn session_key(target_id: &str) -> Vec<u8> {
        format!("{}{}", Self::PREFIX, hex::encode(target_id)).into_bytes()
    }
}

/// Lifecycle of persisted upload sessions, one per target.
pub struct SessionManager<S, B> {
    store: S,
    starter: B,
    starting: Mutex<HashSet<String>>,
}

/// Marks a target as having a start in flight until dropped.
struct StartGuard<'a> {
    starting: &'a Mutex<HashSet<String>>,
    target_id: String,
}

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut starting) = self.starting.lock() {
            starting.remove(&self.target_id);
        }
    }
}

impl<S: KvStore, B: TransferStarter> SessionManager<S, B> {
    pub fn new(store: S, starter: B) -> Self {
        Self {
            store,
            starter,
            starting: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn starter(&self) -> &B {
        &self.starter
    }

    /// Pure lookup. Missing, unreadable and undecodable records all read as `None`.
    pub fn get_existing_session(&self, target_id: &str) -> Option<UploadSession> {
        let bytes = match self.store.get(&SessionKeys::session_key(target_id)) {
            Ok(bytes) => bytes?,
            Err(e) => {
                tracing::warn!(target_id, error = %e, "session store unreadable");
                return None;
            }
        };

        match postcard::from_bytes::<UploadSession>(&bytes) {
            Ok(session) if session.target_id == target_id => Some(session),
            Ok(session) => {
                tracing::warn!(target_id, stored = %session.target_id, "session key does not match record");
                None
            }
            Err(e) => {
                tracing::warn!(target_id, error = %e, "discarding corrupt session record");
                None
            }
        }
    }

    /// Returns the stored session for `target_id`, or allocates a new upload
    /// slot through the backend and persists it.
    ///
    /// Fails with [`SessionError::StartInFlight`] while another call for the
    /// same target has not resolved yet.
    pub async fn begin_session(&self, target_id: &str, file: &FileInfo) -> Result<UploadSession> {
        let _guard = self.guard_start(target_id)?;

        if let Some(existing) = self.get_existing_session(target_id) {
            if !existing.matches(file) {
                return Err(SessionError::FileMismatch {
                    target_id: target_id.to_string(),
                    expected: format!("{} ({} bytes)", existing.file_name, existing.file_size),
                    actual: format!("{} ({} bytes)", file.name, file.size),
                });
            }
            tracing::info!(
                target_id,
                endpoint = %existing.transfer_endpoint,
                transfer_complete = existing.transfer_complete,
                "resuming upload session"
            );
            return Ok(existing);
        }

        let request = StartTransferRequest {
            file_name: file.name.clone(),
            file_size: file.size,
            target_id: target_id.to_string(),
        };
        let target = self
            .starter
            .start_transfer(&request)
            .await
            .map_err(|e| SessionError::Start {
                target_id: target_id.to_string(),
                source: Box::new(e),
            })?;

        let session = UploadSession::new(target_id, file, target);
        self.save(&session)?;

        tracing::info!(
            target_id,
            asset = %session.remote_asset_id,
            file_name = %file.name,
            file_size = file.size,
            "created upload session"
        );
        Ok(session)
    }

    /// Removes the session. Calling it when none exists is a no-op.
    pub fn end_session(&self, target_id: &str) -> Result<()> {
        self.store.delete(&SessionKeys::session_key(target_id))?;
        tracing::debug!(target_id, "ended upload session");
        Ok(())
    }

    /// Records that every byte was acknowledged, leaving only finalize.
    pub fn mark_transferred(&self, target_id: &str) -> Result<Option<UploadSession>> {
        let Some(mut session) = self.get_existing_session(target_id) else {
            return Ok(None);
        };
        if !session.transfer_complete {
            session.transfer_complete = true;
            self.save(&session)?;
        }
        Ok(Some(session))
    }

    /// All readable sessions; corrupt records are skipped.
    pub fn list_sessions(&self) -> Result<Vec<UploadSession>> {
        let entries = self.store.scan_prefix(SessionKeys::PREFIX.as_bytes())?;
        Ok(entries
            .into_iter()
            .filter_map(|(key, value)| match postcard::from_bytes(&value) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(key = %String::from_utf8_lossy(&key), error = %e, "skipping corrupt session");
                    None
                }
            })
            .collect())
    }

    /// Drops sessions older than `max_age`, and corrupt records. Returns how many were removed.
    pub fn prune_stale(&self, max_age: Duration) -> Result<usize> {
        let mut removed = 0;
        for (key, value) in self.store.scan_prefix(SessionKeys::PREFIX.as_bytes())? {
            let stale = match postcard::from_bytes::<UploadSession>(&value) {
                Ok(session) => session.age() > max_age,
                Err(_) => true,
            };
            if stale {
                self.store.delete(&key)?;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, "pruned stale upload sessions");
        }
        Ok(removed)
    }

    fn save(&self, session: &UploadSession) -> Result<()> {
        let bytes = postcard::to_allocvec(session)?;
        self.store.set(&SessionKeys::session_key(&session.target_id), &bytes)?;
        Ok(())
    }

    fn guard_start(&self, target_id: &str) -> Result<StartGuard<'_>> {
        let mut starting = self
            .starting
            .lock()
            .map_err(|_| SessionError::Store(crate::error::StoreError::Poisoned))?;
        if !starting.insert(target_id.to_string()) {
            return Err(SessionError::StartInFlight(target_id.to_string()));
        }
        Ok(StartGuard {
            starting: &self.starting,
            target_id: target_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::session::TransferTarget;
    use crate::store::MemoryStore;

    #[derive(Debug, thiserror::Error)]
    #[error("backend unavailable")]
    struct Unavailable;

    #[derive(Default)]
    struct CountingStarter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TransferStarter for CountingStarter {
        type Error = Unavailable;

        async fn start_transfer(
            &self,
            request: &StartTransferRequest,
        ) -> std::result::Result<TransferTarget, Self::Error> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Unavailable);
            }
            Ok(TransferTarget {
                transfer_endpoint: format!("https://upload.example.com/{}/{n}", request.target_id),
                remote_asset_id: format!("asset-{n}"),
            })
        }
    }

    fn manager() -> SessionManager<MemoryStore, CountingStarter> {
        SessionManager::new(MemoryStore::new(), CountingStarter::default())
    }

    fn video() -> FileInfo {
        FileInfo::new("lesson.mp4", 1024)
    }

    #[tokio::test]
    async fn begin_twice_resumes_same_slot() {
        let manager = manager();
        let first = manager.begin_session("chapter-1", &video()).await.unwrap();
        let second = manager.begin_session("chapter-1", &video()).await.unwrap();

        assert_eq!(first.transfer_endpoint, second.transfer_endpoint);
        assert_eq!(first.remote_asset_id, second.remote_asset_id);
        assert_eq!(manager.starter().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn end_session_clears_and_is_idempotent() {
        let manager = manager();
        manager.begin_session("chapter-1", &video()).await.unwrap();

        manager.end_session("chapter-1").unwrap();
        assert!(manager.get_existing_session("chapter-1").is_none());
        manager.end_session("chapter-1").unwrap();
    }

    #[tokio::test]
    async fn failed_start_persists_nothing() {
        let manager = SessionManager::new(
            MemoryStore::new(),
            CountingStarter {
                fail: true,
                ..Default::default()
            },
        );

        let err = manager.begin_session("chapter-1", &video()).await.unwrap_err();
        assert!(matches!(err, SessionError::Start { .. }));
        assert!(manager.get_existing_session("chapter-1").is_none());
        assert!(manager.store().is_empty());

        // The guard is released, so a retry reaches the backend again.
        let _ = manager.begin_session("chapter-1", &video()).await;
        assert_eq!(manager.starter().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_file_is_rejected() {
        let manager = manager();
        manager.begin_session("chapter-1", &video()).await.unwrap();

        let err = manager
            .begin_session("chapter-1", &FileInfo::new("other.mp4", 1024))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::FileMismatch { .. }));
    }

    #[tokio::test]
    async fn targets_are_independent() {
        let manager = manager();
        let a = manager.begin_session("chapter-1", &video()).await.unwrap();
        let b = manager.begin_session("chapter-2", &video()).await.unwrap();
        assert_ne!(a.transfer_endpoint, b.transfer_endpoint);

        manager.end_session("chapter-1").unwrap();
        assert!(manager.get_existing_session("chapter-2").is_some());
    }

    #[test]
    fn corrupt_record_reads_as_none() {
        let manager = manager();
        manager
            .store()
            .set(&SessionKeys::session_key("chapter-1"), b"\xff\xff\xff")
            .unwrap();

        assert!(manager.get_existing_session("chapter-1").is_none());
        assert!(manager.list_sessions().unwrap().is_empty());
        // Lookup has no side effects.
        assert_eq!(manager.store().len(), 1);
    }

    #[test]
    fn concurrent_start_for_same_target_is_rejected() {
        let manager = manager();
        let _held = manager.guard_start("chapter-1").unwrap();
        assert!(matches!(
            manager.guard_start("chapter-1"),
            Err(SessionError::StartInFlight(_))
        ));
        assert!(manager.guard_start("chapter-2").is_ok());
    }

    #[tokio::test]
    async fn mark_transferred_persists_flag() {
        let manager = manager();
        manager.begin_session("chapter-1", &video()).await.unwrap();

        let marked = manager.mark_transferred("chapter-1").unwrap().unwrap();
        assert!(marked.transfer_complete);
        assert!(manager.get_existing_session("chapter-1").unwrap().transfer_complete);
        assert!(manager.mark_transferred("missing").unwrap().is_none());
    }

    #[tokio::test]
    async fn prune_removes_old_and_corrupt_sessions() {
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(store.clone(), CountingStarter::default());
        manager.begin_session("fresh", &video()).await.unwrap();

        let mut old = manager.begin_session("old", &video()).await.unwrap();
        old.created_at -= 3 * 24 * 60 * 60;
        manager.save(&old).unwrap();
        store.set(&SessionKeys::session_key("junk"), b"\x00").unwrap();

        let removed = manager.prune_stale(Duration::from_secs(24 * 60 * 60)).unwrap();
        assert_eq!(removed, 2);
        let left: Vec<_> = manager.list_sessions().unwrap().into_iter().map(|s| s.target_id).collect();
        assert_eq!(left, vec!["fresh".to_string()]);
    }
}
