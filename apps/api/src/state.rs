use std::sync::Arc;

use crate::auth::CredentialHasher;
use crate::handoff::PreviewSlot;
use crate::storage::KeyValueStore;
use crate::store::{AccountStore, ResumeStore, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountStore>,
    pub session: Arc<SessionStore>,
    pub resumes: Arc<ResumeStore>,
    /// Builder-to-preview handoff. Lives only as long as the process.
    pub preview: Arc<PreviewSlot>,
}

impl AppState {
    pub fn new(storage: Arc<dyn KeyValueStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        AppState {
            accounts: Arc::new(AccountStore::new(storage.clone(), hasher)),
            session: Arc::new(SessionStore::new(storage.clone())),
            resumes: Arc::new(ResumeStore::new(storage)),
            preview: Arc::new(PreviewSlot::default()),
        }
    }
}
