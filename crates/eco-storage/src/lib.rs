//! Durable local storage for the EcoDelicias client.
//!
//! The [`LocalStorage`] trait is the persistence port the session store is
//! built on. Two implementations ship with the crate:
//! - [`FileStorage`]: one file per key under `~/.ecodelicias/storage`
//! - [`MemoryStorage`]: in-process map, for tests and ephemeral runs

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::LocalStorage;

use eco_config_and_utils::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that cannot be mapped to a slot
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored bytes are not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage under the given paths.
pub fn create_storage(paths: &Paths) -> StorageResult<Box<dyn LocalStorage>> {
    let storage = FileStorage::new(paths.storage_dir())?;
    Ok(Box::new(storage))
}
