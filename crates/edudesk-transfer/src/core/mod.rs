//! Pure protocol rules for tus uploads.
//!
//! Nothing in here performs I/O; the transfer loop in
//! [`effects`](crate::effects) composes these pieces.

mod protocol;
mod retry;

pub use protocol::{
    CHUNK_ALIGNMENT, HEADER_UPLOAD_LENGTH, HEADER_UPLOAD_OFFSET, OFFSET_CONTENT_TYPE, TUS_VERSION,
    align_chunk_size, chunk_len, head_headers, parse_u64_header, patch_headers,
};
pub use retry::{DEFAULT_RETRY_DELAYS, StatusClass, classify_status, retry_delay};
