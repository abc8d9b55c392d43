use std::sync::Arc;

use tracing::{info, warn};

use super::StoreError;
use crate::storage::{keys, KeyValueStore};

/// The single signed-in identity for this device.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        SessionStore { storage }
    }

    /// The signed-in email. An unreadable session value is dropped and
    /// reads as signed out.
    pub fn current(&self) -> Result<Option<String>, StoreError> {
        let Some(raw) = self.storage.read(keys::SESSION)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(email) => Ok(Some(email)),
            Err(_) => {
                warn!("Discarding unreadable session value");
                self.storage.remove(keys::SESSION)?;
                Ok(None)
            }
        }
    }

    pub fn set(&self, email: &str) -> Result<(), StoreError> {
        let body = serde_json::to_string(email).map_err(|_| StoreError::Corrupt {
            key: keys::SESSION.to_string(),
        })?;
        self.storage.write(keys::SESSION, &body)?;
        info!("Session started for {email}");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(keys::SESSION)?;
        Ok(())
    }
}
