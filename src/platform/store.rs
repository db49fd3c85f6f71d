//! Per-user key-value settings storage.
//!
//! Settings live in a flat JSON object in the user's config directory and
//! are rewritten on every change.

use super::preferences::PreferencesError;
use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SETTINGS_FILE: &str = "settings.json";

/// Flat key-value store backing the user preferences.
pub trait SettingsStore {
    /// Read a value, or None if the key was never written.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value and persist it immediately.
    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferencesError>;

    /// Delete a key and persist immediately.
    fn remove(&mut self, key: &str) -> Result<(), PreferencesError>;
}

/// JSON file store in the platform config directory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at the default per-user location.
    pub fn open_default() -> Result<Self, PreferencesError> {
        let dirs = ProjectDirs::from("com", "AudioToggle", "AudioToggle")
            .ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::open(dirs.config_dir().join(SETTINGS_FILE)))
    }

    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!("Settings file {} is not an object, ignoring", path.display());
                    Map::new()
                }
                Err(e) => {
                    warn!("Settings file {} is corrupt, ignoring: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                warn!("Failed to read settings file {}: {}", path.display(), e);
                Map::new()
            }
        };

        debug!("Loaded {} settings from {}", values.len(), path.display());
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(&self.values)?;

        {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(&json)?;
            f.write_all(b"\n")?;
            f.sync_all()?;
        }

        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferencesError> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), PreferencesError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// In-process store, used when no config directory is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PreferencesError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PreferencesError> {
        self.values.remove(key);
        Ok(())
    }
}
