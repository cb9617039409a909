//! I/O for chunked transfers: the HTTP transport, byte sources and the
//! transfer loop itself.

mod source;
mod transfer;
mod transport;

pub use source::{ChunkSource, FileSource};
pub use transfer::{ChunkedTransfer, TransferHandle, TransferOutcome, TransferState};
pub use transport::{TusResponse, TusTransport};

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
