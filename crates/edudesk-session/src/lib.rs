//! Persisted upload sessions for resumable content uploads.
//!
//! An [`UploadSession`] records the remote upload slot handed out by the
//! backend for one target resource. It is written before any byte is sent and
//! removed only once the upload is finalized or explicitly discarded, so an
//! interrupted transfer can be picked up after a restart.
//!
//! # Architecture
//!
//! - [`store`] - byte-level key-value persistence ([`MemoryStore`], [`SledStore`])
//! - [`SessionManager`] - session lifecycle on top of any [`KvStore`]
//! - [`TransferStarter`] - the backend collaborator that allocates upload slots

mod error;
mod manager;
mod session;
pub mod store;

pub use error::{Result, SessionError, StoreError};
pub use manager::{SessionKeys, SessionManager};
pub use session::{FileInfo, StartTransferRequest, TransferStarter, TransferTarget, UploadSession};
pub use store::{KvStore, MemoryStore, SledStore};
