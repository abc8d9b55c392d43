//! Key/value storage capability.
//!
//! Values are opaque strings (JSON in practice). The resume, account and
//! session stores are written against [`KeyValueStore`] so tests can swap in
//! [`MemoryStore`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage key names.
pub mod keys {
    pub const USERS: &str = "users";
    pub const SESSION: &str = "session";

    pub fn quarantined_users(millis: i64) -> String {
        format!("users:corrupt:{millis}")
    }

    pub fn resumes(email: &str) -> String {
        format!("resumes:{email}")
    }

    pub fn quarantined_resumes(email: &str, millis: i64) -> String {
        format!("resumes:{email}:corrupt:{millis}")
    }
}
