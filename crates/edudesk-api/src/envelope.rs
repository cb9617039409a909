use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// The backend's response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Only the `message` of an error body, if there is one.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Unwraps a response body received with `status`.
pub(crate) fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Option<T>> {
    if !(200..300).contains(&status) {
        let message = error_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        return Err(match status {
            401 => ApiError::Unauthorized(message),
            _ => ApiError::Status { status, message },
        });
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    if envelope.is_error() {
        return Err(ApiError::Backend(
            envelope.message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        ));
    }
    Ok(envelope.data)
}

pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
