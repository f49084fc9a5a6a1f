//! Keyed byte records that survive a restart.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const KEY_SETTINGS: &str = "settings";
pub const KEY_STOPWATCH: &str = "stopwatch";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write record '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads never fail: a missing or unreadable record is `None`.
pub trait RecordStore {
    fn load(&self, key: &str) -> Option<Vec<u8>>;
    fn save(&mut self, key: &str, data: &[u8]) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    records: HashMap<String, Vec<u8>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes all fail, for exercising degraded paths.
    pub fn read_only() -> Self {
        Self {
            records: HashMap::new(),
            read_only: true,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.records.get(key).cloned()
    }

    fn save(&mut self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable(String::from("read-only")));
        }
        self.records.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

/// One file per record under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl RecordStore for FileStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path(key)).ok()
    }

    fn save(&mut self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        // Write then rename so a torn write never replaces a good record
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, data).map_err(write_err)?;
        fs::rename(&tmp, self.path(key)).map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(KEY_SETTINGS), None);
        store.save(KEY_SETTINGS, &[1, 2]).unwrap();
        assert_eq!(store.load(KEY_SETTINGS), Some(vec![1, 2]));
        assert!(!store.contains(KEY_STOPWATCH));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("watchface"));
        assert_eq!(store.load(KEY_STOPWATCH), None);

        store.save(KEY_STOPWATCH, &[1, 2, 3]).unwrap();
        store.save(KEY_STOPWATCH, &[4]).unwrap();
        assert_eq!(store.load(KEY_STOPWATCH), Some(vec![4]));

        // A second handle on the same directory sees the record
        let reopened = FileStore::new(dir.path().join("watchface"));
        assert_eq!(reopened.load(KEY_STOPWATCH), Some(vec![4]));
        assert_eq!(reopened.load(KEY_SETTINGS), None);
    }

    #[test]
    fn test_file_store_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let mut store = FileStore::new(&blocker);
        let err = store.save(KEY_SETTINGS, &[1, 0]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.load(KEY_SETTINGS), None);
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let mut store = MemoryStore::read_only();
        let err = store.save(KEY_STOPWATCH, &[0]).unwrap_err();
        assert_eq!(err.to_string(), "record store unavailable: read-only");
        assert_eq!(store.load(KEY_STOPWATCH), None);
    }
}
