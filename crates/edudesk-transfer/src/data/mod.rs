//! Configuration and progress types.

mod options;
mod progress;

pub use options::{DEFAULT_CHUNK_SIZE, ErrorCallback, ProgressCallback, TransferOptions};
pub use progress::{Progress, TransferPhase};
