mod loro_store;

pub use loro_store::LoroStore;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::entity::Project;
use crate::error::Result;

/// Key under which the project collection is kept.
pub const DEFAULT_STORAGE_KEY: &str = "dpcc_projects";

/// Durable string key-value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` and make it durable before returning.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Volatile store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the project collection stored under `key`.
///
/// A missing key, a failed read or content that does not parse all yield an
/// empty collection; startup never fails on bad data.
pub fn load_projects<K: KeyValueStore>(kv: &K, key: &str) -> Vec<Project> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored projects, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored projects, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Project>>(&raw) {
        Ok(projects) => {
            tracing::debug!(key, count = projects.len(), "loaded projects");
            projects
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "stored projects are unreadable, starting empty");
            Vec::new()
        }
    }
}

/// Persist the full project collection under `key`.
pub fn save_projects<K: KeyValueStore>(kv: &K, key: &str, projects: &[Project]) -> Result<()> {
    let json = serde_json::to_string(projects)?;
    kv.set(key, &json)?;
    tracing::debug!(key, count = projects.len(), "saved projects");
    Ok(())
}
