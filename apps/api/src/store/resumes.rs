use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use super::{lock, StoreError};
use crate::models::resume::ResumeRecord;
use crate::storage::{keys, KeyValueStore};

/// Per-user resume collections, stored most-recent-first.
pub struct ResumeStore {
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl ResumeStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        ResumeStore {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self, user: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        let key = keys::resumes(user);
        let Some(raw) = self.storage.read(&key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            warn!("Resume collection {key} is unreadable: {e}");
            StoreError::Corrupt { key }
        })
    }

    fn persist(&self, user: &str, resumes: &[ResumeRecord]) -> Result<(), StoreError> {
        let body = serde_json::to_string(resumes).map_err(|_| StoreError::Corrupt {
            key: keys::resumes(user),
        })?;
        self.storage.write(&keys::resumes(user), &body)?;
        Ok(())
    }

    pub fn list(&self, user: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        self.load(user)
    }

    pub fn get(&self, user: &str, id: i64) -> Result<Option<ResumeRecord>, StoreError> {
        Ok(self
            .load(user)?
            .into_iter()
            .find(|r| r.id == Some(id)))
    }

    /// Replaces the record with the same id in place, or prepends it as new.
    pub fn upsert(&self, user: &str, record: ResumeRecord) -> Result<ResumeRecord, StoreError> {
        self.upsert_at(user, record, Utc::now().timestamp_millis())
    }

    /// [`upsert`](Self::upsert) with an explicit clock reading in milliseconds.
    ///
    /// A fresh id is `now_millis`, bumped above the largest id already stored.
    pub fn upsert_at(
        &self,
        user: &str,
        mut record: ResumeRecord,
        now_millis: i64,
    ) -> Result<ResumeRecord, StoreError> {
        let _guard = lock(&self.write_lock)?;
        let mut resumes = self.load(user)?;

        if let Some(id) = record.id {
            if let Some(existing) = resumes.iter_mut().find(|r| r.id == Some(id)) {
                *existing = record.clone();
                self.persist(user, &resumes)?;
                info!("Updated resume {id} for {user}");
                return Ok(record);
            }
        }

        let id = match record.id {
            Some(id) => id,
            None => match resumes.iter().filter_map(|r| r.id).max() {
                None => now_millis,
                Some(max) => max
                    .checked_add(1)
                    .map(|next| next.max(now_millis))
                    .ok_or_else(|| StoreError::IdsExhausted {
                        key: keys::resumes(user),
                    })?,
            },
        };
        record.id = Some(id);
        resumes.insert(0, record.clone());
        self.persist(user, &resumes)?;
        info!("Created resume {id} for {user} ({} total)", resumes.len());
        Ok(record)
    }

    /// Removes the record with `id`. Returns `false` when nothing matched.
    pub fn delete(&self, user: &str, id: i64) -> Result<bool, StoreError> {
        let _guard = lock(&self.write_lock)?;
        let mut resumes = self.load(user)?;
        let Some(pos) = resumes.iter().position(|r| r.id == Some(id)) else {
            return Ok(false);
        };
        resumes.remove(pos);
        self.persist(user, &resumes)?;
        info!("Deleted resume {id} for {user}");
        Ok(true)
    }

    /// Moves an unreadable collection aside and starts the user over with an
    /// empty one. Returns the key the old payload was moved to, or `None` if
    /// the collection was readable.
    pub fn recover(&self, user: &str) -> Result<Option<String>, StoreError> {
        self.recover_at(user, Utc::now().timestamp_millis())
    }

    pub fn recover_at(&self, user: &str, now_millis: i64) -> Result<Option<String>, StoreError> {
        let _guard = lock(&self.write_lock)?;
        let key = keys::resumes(user);
        let Some(raw) = self.storage.read(&key)? else {
            return Ok(None);
        };
        if serde_json::from_str::<Vec<ResumeRecord>>(&raw).is_ok() {
            return Ok(None);
        }

        let quarantine = keys::quarantined_resumes(user, now_millis);
        self.storage.write(&quarantine, &raw)?;
        self.storage.remove(&key)?;
        warn!("Moved unreadable resume collection {key} to {quarantine}");
        Ok(Some(quarantine))
    }
}
