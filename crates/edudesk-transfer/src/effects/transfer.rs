use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::source::ChunkSource;
use super::transport::{TusResponse, TusTransport};
use crate::core::{
    HEADER_UPLOAD_LENGTH, HEADER_UPLOAD_OFFSET, StatusClass, chunk_len, classify_status,
    head_headers, parse_u64_header, patch_headers, retry_delay,
};
use crate::data::{Progress, TransferOptions, TransferPhase};
use crate::error::TransferError;

/// Lifecycle of one transfer attempt.
///
/// `Idle → Transferring → {Completed | Failed | Cancelled}`. Retries happen
/// inside `Transferring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Transferring,
    Completed,
    Failed,
    Cancelled,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::Failed | TransferState::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every byte was acknowledged by the server.
    Completed { bytes_total: u64 },
    /// Stopped by [`TransferHandle::abort`]; the remote slot keeps what it has.
    Cancelled { bytes_sent: u64 },
}

/// Cheap, cloneable control over a running transfer.
#[derive(Debug, Clone)]
pub struct TransferHandle {
    abort: Arc<watch::Sender<bool>>,
    state: watch::Receiver<TransferState>,
}

impl TransferHandle {
    /// Stops the transfer at the next suspension point. In-flight requests are dropped.
    pub fn abort(&self) {
        self.abort.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.abort.borrow()
    }

    pub fn state(&self) -> TransferState {
        *self.state.borrow()
    }

    /// Resolves once the transfer reaches a terminal state.
    pub async fn finished(&mut self) -> TransferState {
        let waited = self.state.wait_for(TransferState::is_terminal).await.map(|s| *s);
        match waited {
            Ok(state) => state,
            Err(_) => *self.state.borrow(),
        }
    }
}

/// A transient failure and what caused it.
struct Transient(String);

enum Failure {
    Transient(Transient),
    Fatal(TransferError),
}

/// Streams a [`ChunkSource`] to a tus endpoint, one `PATCH` per chunk.
///
/// A transfer runs once; start a new one to try again. The server's offset is
/// negotiated up front and after every failure, so re-running against the same
/// endpoint resumes instead of resending acknowledged bytes.
pub struct ChunkedTransfer<T, S> {
    transport: T,
    source: S,
    endpoint: String,
    options: TransferOptions,
    abort_tx: Arc<watch::Sender<bool>>,
    abort_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<TransferState>,
}

impl<T: TusTransport, S: ChunkSource> ChunkedTransfer<T, S> {
    pub fn new(
        transport: T,
        source: S,
        endpoint: impl Into<String>,
        options: TransferOptions,
    ) -> Result<Self, TransferError> {
        if options.chunk_size == 0 {
            return Err(TransferError::InvalidChunkSize);
        }
        let (abort_tx, abort_rx) = watch::channel(false);
        let (state_tx, _) = watch::channel(TransferState::Idle);
        Ok(Self {
            transport,
            source,
            endpoint: endpoint.into(),
            options,
            abort_tx: Arc::new(abort_tx),
            abort_rx,
            state_tx,
        })
    }

    pub fn handle(&self) -> TransferHandle {
        TransferHandle {
            abort: self.abort_tx.clone(),
            state: self.state_tx.subscribe(),
        }
    }

    pub fn state(&self) -> TransferState {
        *self.state_tx.borrow()
    }

    /// Runs the transfer to a terminal state.
    ///
    /// `Ok(Completed)` after the server acknowledged the full length,
    /// `Ok(Cancelled)` after an abort, `Err` on a fatal error or once retries
    /// are exhausted.
    pub async fn run(self) -> Result<TransferOutcome, TransferError> {
        self.state_tx.send_replace(TransferState::Transferring);
        let total = self.source.len();
        tracing::info!(endpoint = %self.endpoint, bytes_total = total, "starting transfer");

        let outcome = match self.transfer(total).await {
            // An abort raised from the final progress callback still wins.
            Ok(TransferOutcome::Completed { bytes_total }) if self.is_aborted() => {
                Ok(TransferOutcome::Cancelled { bytes_sent: bytes_total })
            }
            other => other,
        };

        match outcome {
            Ok(TransferOutcome::Completed { bytes_total }) => {
                self.state_tx.send_replace(TransferState::Completed);
                let progress = Progress::new(TransferPhase::Completed, bytes_total, total);
                if let Some(callback) = &self.options.on_success {
                    callback(&progress);
                }
                tracing::info!(endpoint = %self.endpoint, bytes_total, "transfer completed");
                Ok(TransferOutcome::Completed { bytes_total })
            }
            Ok(TransferOutcome::Cancelled { bytes_sent }) => {
                self.state_tx.send_replace(TransferState::Cancelled);
                tracing::info!(endpoint = %self.endpoint, bytes_sent, "transfer aborted");
                Ok(TransferOutcome::Cancelled { bytes_sent })
            }
            Err(e) => {
                self.state_tx.send_replace(TransferState::Failed);
                if let Some(callback) = &self.options.on_error {
                    callback(&e);
                }
                tracing::warn!(endpoint = %self.endpoint, error = %e, "transfer failed");
                Err(e)
            }
        }
    }

    async fn transfer(&self, total: u64) -> Result<TransferOutcome, TransferError> {
        let mut retries = 0u32;
        let mut offset = 0u64;
        let mut negotiated = false;

        loop {
            if self.is_aborted() {
                return Ok(TransferOutcome::Cancelled { bytes_sent: offset });
            }

            let step = if negotiated {
                self.send_chunk(offset, total).await
            } else {
                self.negotiate(total).await
            };

            let step = match step {
                None => return Ok(TransferOutcome::Cancelled { bytes_sent: offset }),
                Some(step) => step,
            };

            match step {
                Ok(new_offset) => {
                    let phase = if negotiated {
                        retries = 0;
                        TransferPhase::Transferring
                    } else {
                        negotiated = true;
                        TransferPhase::Negotiating
                    };
                    offset = new_offset;
                    self.emit(Progress {
                        phase,
                        bytes_sent: offset,
                        bytes_total: total,
                        retry_count: retries,
                    });
                    if offset >= total {
                        return Ok(TransferOutcome::Completed { bytes_total: total });
                    }
                }
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Transient(Transient(reason))) => {
                    let Some(delay) = retry_delay(&self.options.retry_delays, retries) else {
                        return Err(TransferError::RetriesExhausted {
                            attempts: retries,
                            last: reason,
                        });
                    };
                    retries += 1;
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        offset,
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "transient transfer failure, retrying"
                    );
                    self.emit(Progress {
                        phase: TransferPhase::Retrying,
                        bytes_sent: offset,
                        bytes_total: total,
                        retry_count: retries,
                    });
                    if self.or_abort(tokio::time::sleep(delay)).await.is_none() {
                        return Ok(TransferOutcome::Cancelled { bytes_sent: offset });
                    }
                    // The server may hold more or fewer bytes than we think.
                    negotiated = false;
                }
            }
        }
    }

    /// `HEAD` the endpoint for the offset the server already holds.
    async fn negotiate(&self, total: u64) -> Option<Result<u64, Failure>> {
        let headers = head_headers(&self.options.headers);
        let response = self.or_abort(self.transport.head(&self.endpoint, &headers)).await?;

        Some(self.check(response).and_then(|response| {
            if let Some(remote) = header(&response, HEADER_UPLOAD_LENGTH)?
                && remote != total
            {
                return Err(Failure::Fatal(TransferError::LengthMismatch {
                    local: total,
                    remote,
                }));
            }
            let offset = require_offset(&response)?;
            if offset > total {
                return Err(protocol(format!("server offset {offset} exceeds length {total}")));
            }
            tracing::debug!(endpoint = %self.endpoint, offset, "negotiated offset");
            Ok(offset)
        }))
    }

    /// `PATCH` the chunk starting at `offset`; returns the acknowledged offset.
    async fn send_chunk(&self, offset: u64, total: u64) -> Option<Result<u64, Failure>> {
        let len = chunk_len(offset, total, self.options.chunk_size);
        let body = match self.or_abort(self.source.read_chunk(offset, len)).await? {
            Ok(body) => body,
            Err(e) => return Some(Err(Failure::Fatal(TransferError::Source(e)))),
        };

        let headers = patch_headers(offset, &self.options.headers);
        let response = self
            .or_abort(self.transport.patch(&self.endpoint, &headers, body))
            .await?;

        Some(self.check(response).and_then(|response| {
            let acknowledged = require_offset(&response)?;
            if acknowledged <= offset || acknowledged > offset + len as u64 {
                return Err(protocol(format!(
                    "server acknowledged offset {acknowledged} for chunk {offset}+{len}"
                )));
            }
            Ok(acknowledged)
        }))
    }

    fn check<E: std::error::Error>(&self, response: Result<TusResponse, E>) -> Result<TusResponse, Failure> {
        let response = response.map_err(|e| Failure::Transient(Transient(e.to_string())))?;
        match classify_status(response.status) {
            StatusClass::Success => Ok(response),
            StatusClass::Transient => Err(Failure::Transient(Transient(format!(
                "HTTP {}",
                response.status
            )))),
            StatusClass::Gone => Err(Failure::Fatal(TransferError::EndpointGone {
                status: response.status,
            })),
            StatusClass::Fatal => Err(Failure::Fatal(TransferError::Rejected {
                status: response.status,
            })),
        }
    }

    /// Drives `fut` unless an abort arrives first.
    async fn or_abort<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut abort = self.abort_rx.clone();
        tokio::select! {
            biased;
            _ = abort.wait_for(|aborted| *aborted) => None,
            out = fut => Some(out),
        }
    }

    fn is_aborted(&self) -> bool {
        *self.abort_rx.borrow()
    }

    fn emit(&self, progress: Progress) {
        if self.is_aborted() {
            return;
        }
        if let Some(callback) = &self.options.on_progress {
            callback(&progress);
        }
    }
}

fn header(response: &TusResponse, name: &str) -> Result<Option<u64>, Failure> {
    parse_u64_header(&response.headers, name).map_err(protocol)
}

fn require_offset(response: &TusResponse) -> Result<u64, Failure> {
    header(response, HEADER_UPLOAD_OFFSET)?
        .ok_or_else(|| protocol(format!("response without {HEADER_UPLOAD_OFFSET}")))
}

fn protocol(reason: String) -> Failure {
    Failure::Fatal(TransferError::Protocol(reason))
}
