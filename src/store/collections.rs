use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{SimError, SimResult};
use crate::store::{read_collection, read_document, write_document, StorageBackend};
use crate::SimulationResult;

pub const FAVORITES_KEY: &str = "ss_favs";
pub const LAST_RUN_KEY: &str = "ss_last_sim";
pub const CONTACTS_KEY: &str = "ss_contacts";

/// Titles of ideas the user starred, in the order they were added.
pub struct FavoriteIdeas {
    backend: Arc<dyn StorageBackend>,
}

impl FavoriteIdeas {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Returns `false` when the title was already a favourite.
    pub fn add(&self, title: &str) -> SimResult<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SimError::invalid("favourite title is empty"));
        }
        let mut favorites = self.list()?;
        if favorites.iter().any(|existing| existing == title) {
            return Ok(false);
        }
        favorites.push(title.to_string());
        write_document(self.backend.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    pub fn list(&self) -> SimResult<Vec<String>> {
        read_collection(self.backend.as_ref(), FAVORITES_KEY)
    }
}

pub struct LastRunCache {
    backend: Arc<dyn StorageBackend>,
}

impl LastRunCache {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn store(&self, result: &SimulationResult) -> SimResult<()> {
        write_document(self.backend.as_ref(), LAST_RUN_KEY, result)
    }

    pub fn load(&self) -> SimResult<Option<SimulationResult>> {
        read_document(self.backend.as_ref(), LAST_RUN_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub msg: String,
    pub date: DateTime<Utc>,
}

/// Messages left through the contact form, newest first. Nothing is ever
/// removed or deduplicated.
pub struct ContactLog {
    backend: Arc<dyn StorageBackend>,
}

impl ContactLog {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn submit(&self, name: &str, email: &str, msg: &str) -> SimResult<ContactSubmission> {
        let (name, email, msg) = (name.trim(), email.trim(), msg.trim());
        if name.is_empty() || email.is_empty() || msg.is_empty() {
            return Err(SimError::invalid("please fill all fields"));
        }

        let submission = ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            msg: msg.to_string(),
            date: Utc::now(),
        };
        let mut contacts = self.list()?;
        contacts.insert(0, submission.clone());
        write_document(self.backend.as_ref(), CONTACTS_KEY, &contacts)?;
        info!(total = contacts.len(), "stored contact submission");
        Ok(submission)
    }

    pub fn list(&self) -> SimResult<Vec<ContactSubmission>> {
        read_collection(self.backend.as_ref(), CONTACTS_KEY)
    }
}
