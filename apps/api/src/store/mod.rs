//! Typed stores over the key/value capability.

pub mod accounts;
pub mod resumes;
pub mod session;

pub use accounts::{AccountStore, AuthError};
pub use resumes::ResumeStore;
pub use session::SessionStore;

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The value under `key` is not in the expected shape. Nothing was
    /// overwritten; the caller decides whether to recover.
    #[error("Stored data under '{key}' is unreadable")]
    Corrupt { key: String },

    /// No identifier above the largest stored one is representable.
    #[error("No free resume id left in '{key}'")]
    IdsExhausted { key: String },
}

pub(crate) fn lock(write_lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>, StoreError> {
    write_lock
        .lock()
        .map_err(|_| StoreError::Storage(StorageError::Poisoned))
}
