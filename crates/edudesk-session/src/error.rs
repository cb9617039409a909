use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode session: {0}")]
    Encode(#[from] postcard::Error),

    #[error("failed to start transfer for {target_id}: {source}")]
    Start {
        target_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("a transfer start is already pending for {0}")]
    StartInFlight(String),

    #[error("session for {target_id} belongs to {expected}, not {actual}")]
    FileMismatch {
        target_id: String,
        expected: String,
        actual: String,
    },
}
