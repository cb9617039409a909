//! Chunked, resumable uploads over the tus 1.0.0 protocol.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Configuration and progress types
//! - [`core`] - Pure protocol rules: headers, offsets, retry classification
//! - [`effects`] - I/O behind trait abstractions ([`TusTransport`], [`ChunkSource`])
//!
//! # Key Features
//!
//! - **Resumable**: the starting offset is always negotiated with the server
//! - **Fixed chunking**: one `PATCH` per chunk, progress on every acknowledgement
//! - **Bounded retries**: a short escalating delay sequence, then a terminal failure
//! - **Cooperative cancellation**: [`TransferHandle::abort`] stops in-flight I/O

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{Progress, TransferOptions, TransferPhase};
pub use effects::{
    ChunkSource, ChunkedTransfer, FileSource, TransferHandle, TransferOutcome, TransferState,
    TusResponse, TusTransport,
};
pub use error::TransferError;

#[cfg(feature = "reqwest")]
pub use effects::ReqwestTransport;
