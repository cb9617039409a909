//! Client for the edudesk backend HTTP contract.
//!
//! Every response is wrapped in the backend envelope
//! `{ "status": "success" | "error", "message"?: string, "data"?: T }`.
//! [`ApiClient`] unwraps it, turns error statuses into [`ApiError`] using the
//! envelope's `message`, and implements the collaborator traits the upload
//! workflow needs:
//!
//! - [`TransferStarter`](edudesk_session::TransferStarter): `POST /upload/start`
//! - [`AssetFinalizer`](edudesk_upload::AssetFinalizer): `PATCH /admin/chapters/{id}`

mod chapter;
mod client;
mod envelope;
mod error;

pub use chapter::{AssetStatus, Chapter, ChapterVideoUpdate};
pub use client::{ApiClient, DEFAULT_API_URL};
pub use envelope::Envelope;
pub use error::{ApiError, Result};
