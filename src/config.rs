use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::{SortBy, Tab};
use crate::storage::DEFAULT_STORAGE_KEY;

const CONFIG_FILE: &str = "config.yaml";

/// Per-project settings, read from `.dpcc/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key the project collection is stored under.
    pub storage_key: String,
    /// Tab shown by `dpcc list` when none is given.
    pub default_tab: Tab,
    /// Sort order used by `dpcc list` when none is given.
    pub default_sort: SortBy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_tab: Tab::default(),
            default_sort: SortBy::default(),
        }
    }
}

impl Config {
    /// Load the config from `dpcc_dir`. A missing file yields the defaults;
    /// a malformed one is an error.
    pub fn load(dpcc_dir: &Path) -> Result<Self> {
        let path = dpcc_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Write the config to `dpcc_dir`.
    pub fn save(&self, dpcc_dir: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(dpcc_dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}
