use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// `401`; the client drops its token when it sees one.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("backend reported an error: {0}")]
    Backend(String),

    #[error("response has no data")]
    MissingData,

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
