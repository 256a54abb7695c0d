//! File-backed store for native front ends.
//!
//! All slots live in one small JSON object at `<data_dir>/state.json`.
//! Every write goes to a sibling temp file that is renamed over the state
//! file, so a crash leaves either the old or the new contents. The file
//! holds the bearer token and is created owner-only on unix.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, StoreError};

const STATE_FILE: &str = "state.json";
const TEMP_FILE: &str = "state.json.tmp";

/// JSON state file store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileStore {
    /// Store rooted in `data_dir`; the directory is created on first write
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STATE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(slots)?;
        let temp_path = self.path.with_file_name(TEMP_FILE);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // A stale temp file would keep its old permissions
        match std::fs::remove_file(&temp_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn modify(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut slots = match self.read_all() {
            Ok(slots) => slots,
            Err(StoreError::Serialize(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Discarding corrupt state file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut slots);
        self.write_all(&slots)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut slots) => slots.remove(key),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read state file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|slots| {
            slots.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("token"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_slots_persist_across_instances() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("macrofacts");

        let store = FileStore::new(&nested);
        store.set("token", "abc").unwrap();
        store.set("theme", "dark").unwrap();

        let reopened = FileStore::new(&nested);
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));

        reopened.remove("token").unwrap();
        assert_eq!(store.get("token"), None);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_truncated_file_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(store.path(), "{\"token\": \"ab").unwrap();

        assert_eq!(store.get("token"), None);
        store.set("token", "abc").unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_leftover_temp_file_does_not_leak_into_state() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("theme", "dark").unwrap();
        std::fs::write(dir.path().join(TEMP_FILE), "{\"theme\": \"li").unwrap();

        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        store.set("token", "abc").unwrap();

        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get("token").as_deref(), Some("abc"));
        assert!(!dir.path().join(TEMP_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_state_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("token", "abc").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
