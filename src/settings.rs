//! Key/value settings collaborator
//!
//! The catalog persists per-set sort keys and reads its configured paths
//! through [`SettingsStore`]. Keys are slash separated paths such as
//! `sets/LEA/sortkey` or `paths/pics`.

use crate::{CatalogError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory containing card images
pub const PICS_PATH_KEY: &str = "paths/pics";
/// XML card database file
pub const DATABASE_PATH_KEY: &str = "paths/carddatabase";
/// File extension of card images (without the dot)
pub const PICS_EXTENSION_KEY: &str = "paths/picsext";

pub const DEFAULT_PICS_EXTENSION: &str = "jpg";

/// Settings path holding the sort key of a set
pub fn sort_key_path(short_name: &str) -> String {
    format!("sets/{short_name}/sortkey")
}

/// Storage for persisted preferences
pub trait SettingsStore {
    fn value(&self, key: &str) -> Option<String>;

    /// Store a value. Implementations write through, nothing is buffered.
    fn set_value(&mut self, key: &str, value: String) -> Result<()>;

    fn get_or(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or_else(|| default.to_string())
    }

    /// Read an unsigned value, falling back to `default` when absent or malformed
    fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.value(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Settings kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for seeding paths
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

impl SettingsStore for MemorySettings {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings persisted as a flat TOML table
///
/// ```toml
/// "paths/pics" = "/home/me/pics"
/// "sets/LEA/sortkey" = "3"
/// ```
#[derive(Debug, Clone)]
pub struct TomlSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlSettings {
    /// Open a settings file. A missing file yields empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| {
                CatalogError::Settings(format!("Failed to parse '{}': {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(TomlSettings { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let content = toml::to_string(&self.values)
            .map_err(|e| CatalogError::Settings(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for TomlSettings {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}
