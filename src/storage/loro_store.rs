use std::fs;
use std::path::{Path, PathBuf};

use loro::{LoroDoc, LoroValue, ValueOrContainer};

use super::KeyValueStore;
use crate::error::{DpccError, Result};

pub const DPCC_DIR: &str = ".dpcc";
const LORO_DB: &str = "loro.db";
const STORAGE_MAP: &str = "storage";

/// Key-value storage kept in a Loro document on disk.
///
/// Values live in a single `storage` map; every `set` commits and exports a
/// full snapshot to `.dpcc/loro.db`.
pub struct LoroStore {
    doc: LoroDoc,
    dir: PathBuf,
    path: PathBuf,
}

impl LoroStore {
    /// Initialize a new dpcc project under `root`
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(DPCC_DIR);

        if dir.exists() {
            return Err(DpccError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;

        let doc = LoroDoc::new();
        let path = dir.join(LORO_DB);

        let store = Self { doc, dir, path };
        store.save()?;
        tracing::info!(path = %store.path.display(), "initialized store");

        Ok(store)
    }

    /// Open an existing dpcc project
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(DPCC_DIR);
        let path = dir.join(LORO_DB);

        if !path.exists() {
            return Err(DpccError::NotInitialized);
        }

        let bytes = fs::read(&path)?;
        let doc = LoroDoc::new();
        doc.import(&bytes)?;

        Ok(Self { doc, dir, path })
    }

    /// Write the document snapshot to disk
    pub fn save(&self) -> Result<()> {
        let bytes = self.doc.export(loro::ExportMode::Snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// The `.dpcc/` directory this store lives in
    pub fn dpcc_dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for LoroStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.doc.get_map(STORAGE_MAP);
        match map.get(key) {
            None => Ok(None),
            Some(ValueOrContainer::Value(LoroValue::String(s))) => Ok(Some(s.to_string())),
            Some(_) => Err(DpccError::Storage(format!(
                "value under '{}' is not a string",
                key
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let map = self.doc.get_map(STORAGE_MAP);
        map.insert(key, value)?;
        self.doc.commit();
        self.save()
    }
}
