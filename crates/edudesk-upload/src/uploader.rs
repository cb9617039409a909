use std::path::PathBuf;

use edudesk_session::{FileInfo, KvStore, SessionManager, TransferStarter, UploadSession};
use edudesk_transfer::{
    ChunkSource, ChunkedTransfer, FileSource, TransferError, TransferOptions, TransferOutcome,
    TusTransport,
};

use crate::control::UploadControl;
use crate::error::{Result, UploadError};
use crate::finalize::{AssetFinalizer, FinalizeRequest};
use crate::validate::validate_video;

/// One video for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub target_id: String,
    pub path: PathBuf,
    pub duration_secs: Option<u64>,
}

impl UploadRequest {
    pub fn new(target_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            target_id: target_id.into(),
            path: path.into(),
            duration_secs: None,
        }
    }

    #[must_use]
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Attached to the target; the session is gone.
    Finalized {
        session: UploadSession,
        /// A stored session was picked up instead of starting a new one.
        resumed: bool,
    },
    /// Stopped through [`UploadControl::abort`]; the session is kept.
    Aborted {
        session: UploadSession,
        bytes_sent: u64,
    },
}

/// Runs uploads end to end on top of a [`SessionManager`].
pub struct Uploader<S, B, F, T> {
    sessions: SessionManager<S, B>,
    finalizer: F,
    transport: T,
    options: TransferOptions,
}

impl<S, B, F, T> Uploader<S, B, F, T>
where
    S: KvStore,
    B: TransferStarter,
    F: AssetFinalizer,
    T: TusTransport + Clone,
{
    pub fn new(sessions: SessionManager<S, B>, finalizer: F, transport: T) -> Self {
        Self {
            sessions,
            finalizer,
            transport,
            options: TransferOptions::default(),
        }
    }

    /// Options for every transfer this uploader starts, callbacks included.
    #[must_use]
    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sessions(&self) -> &SessionManager<S, B> {
        &self.sessions
    }

    pub fn finalizer(&self) -> &F {
        &self.finalizer
    }

    /// Uploads `request.path` and attaches it to `request.target_id`.
    ///
    /// Resumes a stored session for the target when there is one. If the
    /// stored upload slot turns out to be gone, the session is replaced once
    /// and the transfer starts over. On any error other than a rejected file
    /// the session is left in place for the next run.
    pub async fn upload(&self, request: &UploadRequest, control: &UploadControl) -> Result<UploadOutcome> {
        let target_id = request.target_id.as_str();
        let source = FileSource::open(&request.path)
            .await
            .map_err(|source| UploadError::Io {
                path: request.path.clone(),
                source,
            })?;
        let kind = validate_video(&request.path, source.len()).map_err(|reason| UploadError::Rejected {
            path: request.path.clone(),
            reason,
        })?;

        let name = request
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = FileInfo::new(name, source.len());
        tracing::debug!(target_id, file = %file.name, size = file.size, %kind, "validated upload");

        let resumed = self.sessions.get_existing_session(target_id).is_some();
        let mut session = self.sessions.begin_session(target_id, &file).await?;
        let mut renewed = false;

        while !session.transfer_complete {
            match self.transfer(&session, source.clone(), control).await {
                Ok(TransferOutcome::Completed { .. }) => {
                    match self.sessions.mark_transferred(target_id)? {
                        Some(marked) => session = marked,
                        None => session.transfer_complete = true,
                    }
                }
                Ok(TransferOutcome::Cancelled { bytes_sent }) => {
                    tracing::info!(target_id, bytes_sent, "upload aborted, session kept");
                    return Ok(UploadOutcome::Aborted { session, bytes_sent });
                }
                Err(e) if e.needs_new_endpoint() && !renewed => {
                    tracing::warn!(target_id, error = %e, "upload slot unusable, requesting a new one");
                    self.sessions.end_session(target_id)?;
                    session = self.sessions.begin_session(target_id, &file).await?;
                    renewed = true;
                }
                Err(source) => {
                    return Err(UploadError::Transfer {
                        target_id: target_id.to_string(),
                        source,
                    });
                }
            }
        }

        self.finalize(&session, request.duration_secs).await?;
        self.sessions.end_session(target_id)?;
        tracing::info!(target_id, asset = %session.remote_asset_id, resumed, "upload finalized");
        Ok(UploadOutcome::Finalized { session, resumed })
    }

    /// Drops the stored session for `target_id` without touching the backend.
    pub fn discard(&self, target_id: &str) -> Result<Option<UploadSession>> {
        let existing = self.sessions.get_existing_session(target_id);
        self.sessions.end_session(target_id)?;
        Ok(existing)
    }

    async fn transfer(
        &self,
        session: &UploadSession,
        source: FileSource,
        control: &UploadControl,
    ) -> std::result::Result<TransferOutcome, TransferError> {
        let transfer = ChunkedTransfer::new(
            self.transport.clone(),
            source,
            &session.transfer_endpoint,
            self.options.clone(),
        )?;
        let handle = transfer.handle();
        let mut run = std::pin::pin!(transfer.run());
        let mut forwarded = control.is_aborted();
        if forwarded {
            handle.abort();
        }

        loop {
            tokio::select! {
                biased;
                outcome = &mut run => return outcome,
                _ = control.aborted(), if !forwarded => {
                    handle.abort();
                    forwarded = true;
                }
            }
        }
    }

    async fn finalize(&self, session: &UploadSession, duration_secs: Option<u64>) -> Result<()> {
        let request = FinalizeRequest {
            remote_asset_id: session.remote_asset_id.clone(),
            duration_secs,
        };
        self.finalizer
            .finalize(&session.target_id, &request)
            .await
            .map_err(|e| {
                tracing::warn!(target_id = %session.target_id, error = %e, "finalize failed, session kept");
                UploadError::Finalize {
                    target_id: session.target_id.clone(),
                    source: Box::new(e),
                }
            })
    }
}
