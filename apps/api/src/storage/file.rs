use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

const STORAGE_FILE: &str = "storage.json";

/// All keys in a single JSON object file inside a data directory.
///
/// Every mutation rewrites the whole file through a temp file and an atomic
/// rename, so a crash never leaves a half-written file behind.
///
/// A file that is not a JSON object of strings is renamed to
/// `storage.json.corrupt.{millis}` and the store continues empty. Nothing in
/// the old file is deleted.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let store = FileStore {
            path: data_dir.join(STORAGE_FILE),
            lock: Mutex::new(()),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let quarantine = self.quarantine_path(Utc::now().timestamp_millis());
                fs::rename(&self.path, &quarantine)?;
                warn!(
                    "Storage file {} is unreadable ({e}); moved to {} and starting empty",
                    self.path.display(),
                    quarantine.display()
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn quarantine_path(&self, millis: i64) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt.{millis}"));
        PathBuf::from(name)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        debug!("Persisted {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
