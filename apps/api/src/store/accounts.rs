use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::{lock, StoreError};
use crate::auth::CredentialHasher;
use crate::models::user::{normalize_email, UserAccount};
use crate::models::ValidationError;
use crate::storage::{keys, KeyValueStore};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Account already exists. Please sign in.")]
    AccountExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Local accounts, stored as one map under the `users` key.
pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
    hasher: Arc<dyn CredentialHasher>,
    write_lock: Mutex<()>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        AccountStore {
            storage,
            hasher,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, UserAccount>, StoreError> {
        let Some(raw) = self.storage.read(keys::USERS)? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(&raw).map_err(|_| StoreError::Corrupt {
            key: keys::USERS.to_string(),
        })
    }

    pub fn find(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.load()?.remove(&normalize_email(email)))
    }

    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            }
            .into());
        }

        let _guard = lock(&self.write_lock)?;
        let mut users = self.load()?;
        if users.contains_key(&email) {
            return Err(AuthError::AccountExists);
        }

        let account = UserAccount {
            name: name.to_string(),
            email: email.clone(),
            credential: self.hasher.hash(password),
        };
        users.insert(email.clone(), account.clone());

        let body = serde_json::to_string(&users).map_err(|_| StoreError::Corrupt {
            key: keys::USERS.to_string(),
        })?;
        self.storage.write(keys::USERS, &body).map_err(StoreError::from)?;
        info!("Created account {email}");
        Ok(account)
    }

    /// Moves an unreadable account map aside so signup and login work again.
    /// Returns the key the old payload was moved to, or `None` if the map
    /// was readable.
    pub fn recover(&self) -> Result<Option<String>, StoreError> {
        self.recover_at(Utc::now().timestamp_millis())
    }

    pub fn recover_at(&self, now_millis: i64) -> Result<Option<String>, StoreError> {
        let _guard = lock(&self.write_lock)?;
        let Some(raw) = self.storage.read(keys::USERS)? else {
            return Ok(None);
        };
        if serde_json::from_str::<BTreeMap<String, UserAccount>>(&raw).is_ok() {
            return Ok(None);
        }

        let quarantine = keys::quarantined_users(now_millis);
        self.storage.write(&quarantine, &raw)?;
        self.storage.remove(keys::USERS)?;
        warn!("Moved unreadable account map to {quarantine}");
        Ok(Some(quarantine))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }

        match self.find(&email)? {
            Some(account) if self.hasher.verify(password, &account.credential) => {
                info!("Login for {email}");
                Ok(account)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
