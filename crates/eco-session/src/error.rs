use eco_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Persisted slot exists but does not hold a complete session.
    /// Only produced while rehydrating and recovered to "logged out".
    #[error("Stored session could not be decoded: {0}")]
    SessionDecodeFailed(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
