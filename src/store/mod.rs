pub mod backend;
pub mod collections;
pub mod scenarios;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{SimError, SimResult};

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use collections::{ContactLog, ContactSubmission, FavoriteIdeas, LastRunCache};
pub use scenarios::{Scenario, ScenarioInput, ScenarioStore};

/// Every persisted collection, all sharing one backend.
pub struct Workspace {
    pub scenarios: ScenarioStore,
    pub favorites: FavoriteIdeas,
    pub last_run: LastRunCache,
    pub contacts: ContactLog,
}

impl Workspace {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            scenarios: ScenarioStore::new(backend.clone()),
            favorites: FavoriteIdeas::new(backend.clone()),
            last_run: LastRunCache::new(backend.clone()),
            contacts: ContactLog::new(backend),
        }
    }

    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(data_dir)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }
}

pub(crate) fn read_document<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> SimResult<Option<T>> {
    let Some(data) = backend.read(key)? else {
        return Ok(None);
    };
    if data.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|err| SimError::storage(format!("failed to parse {}: {}", key, err)))
}

pub(crate) fn write_document<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> SimResult<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| SimError::storage(format!("failed to serialize {}: {}", key, err)))?;
    backend.write(key, &payload)
}

pub(crate) fn read_collection<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> SimResult<Vec<T>> {
    Ok(read_document(backend, key)?.unwrap_or_default())
}
