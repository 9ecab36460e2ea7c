use crate::CacheState;
use eco_api_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Mutations need a loaded collection; nothing was sent.
    #[error("Cache is not ready (state: {0:?})")]
    NotReady(CacheState),

    /// The call's token was cancelled before its response could be applied.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type CacheResult<T> = Result<T, CacheError>;
