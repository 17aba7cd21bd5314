//! Persistent local storage for the compatibility bearer token and user id

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{Error, Result};

/// Key/value store standing in for browser local storage
pub trait TokenStorage: Send + Sync {
    /// Read a stored value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Missing keys are ignored.
    fn remove_item(&self, key: &str);
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
    }
}

/// Storage persisted as a flat JSON object on disk
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(Error::storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    fn flush(&self, items: &HashMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        std::fs::write(&self.path, bytes).map_err(|err| {
            Error::storage(format!("failed to write {}: {}", self.path.display(), err))
        })
    }
}

impl TokenStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        if items.remove(key).is_some() {
            if let Err(err) = self.flush(&items) {
                log::warn!("Failed to persist removal of '{}': {}", key, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("token"), None);

        storage.set_item("token", "abc").unwrap();
        assert_eq!(storage.get_item("token").as_deref(), Some("abc"));

        storage.remove_item("token");
        storage.remove_item("token");
        assert_eq!(storage.get_item("token"), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("token", "oauth2-session").unwrap();
        storage.set_item("userId", "7").unwrap();
        storage.remove_item("token");
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token"), None);
        assert_eq!(reopened.get_item("userId").as_deref(), Some("7"));
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        assert!(matches!(FileStorage::open(&path), Err(Error::Json(_))));
    }
}
