//! The chapter video upload workflow.
//!
//! [`Uploader::upload`] ties the pieces together:
//!
//! 1. validate the file locally (type and size) before any network call
//! 2. begin or resume the persisted session for the target
//! 3. stream the bytes with the resumable transfer client
//! 4. attach the finished asset to the target through an [`AssetFinalizer`]
//! 5. end the session
//!
//! A failed or aborted run leaves the session in place, so running the same
//! upload again picks up where the last one stopped.

mod control;
mod error;
mod finalize;
mod uploader;
pub mod validate;

pub use control::UploadControl;
pub use error::{Result, UploadError};
pub use finalize::{AssetFinalizer, FinalizeRequest};
pub use uploader::{UploadOutcome, UploadRequest, Uploader};
pub use validate::{FileRejection, MAX_VIDEO_SIZE, VideoKind, validate_video};
