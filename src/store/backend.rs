use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{SimError, SimResult};

/// Key/value document storage shared by every persisted collection.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> SimResult<Option<String>>;
    /// Replaces the whole document stored under `key`.
    fn write(&self, key: &str, payload: &str) -> SimResult<()>;
    fn remove(&self, key: &str) -> SimResult<()>;
}

/// One `<key>.json` document per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> SimResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| SimError::storage(format!("failed to read {}: {}", key, err)))
    }

    fn write(&self, key: &str, payload: &str) -> SimResult<()> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, payload)
            .map_err(|err| SimError::storage(format!("failed to write {}: {}", key, err)))?;
        std::fs::rename(&tmp_path, &path)
            .map_err(|err| SimError::storage(format!("failed to finalize {}: {}", key, err)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> SimResult<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path)
            .map_err(|err| SimError::storage(format!("failed to remove {}: {}", key, err)))
    }
}

fn ensure_dir(path: &Path) -> SimResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path)
        .map_err(|err| SimError::storage(format!("failed to create data dir: {}", err)))
}

/// Process-local storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> SimResult<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| SimError::storage("memory storage lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> SimResult<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| SimError::storage("memory storage lock poisoned"))?;
        guard.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SimResult<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| SimError::storage("memory storage lock poisoned"))?;
        guard.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));
        assert_eq!(backend.read("ss_test").unwrap(), None);

        backend.write("ss_test", "[1]").unwrap();
        backend.write("ss_test", "[2,1]").unwrap();
        assert_eq!(backend.read("ss_test").unwrap().as_deref(), Some("[2,1]"));
        assert!(!dir.path().join("nested/ss_test.json.tmp").exists());

        backend.remove("ss_test").unwrap();
        assert_eq!(backend.read("ss_test").unwrap(), None);
        backend.remove("ss_test").unwrap();
    }

    #[test]
    fn memory_backend_round_trips() {
        let backend = MemoryBackend::new();
        backend.write("k", "v").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));
        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }
}
