use thiserror::Error;

pub type Result<T> = std::result::Result<T, AccessError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown capability: {0}")]
    UnknownCapability(String),
}
