//! User preferences management.
//!
//! Holds the set of device UIDs that take part in cycling, the onboarding
//! flag and the cycle shortcut. Every write goes straight to the settings
//! store.

use super::hotkey::parse_shortcut;
use super::store::SettingsStore;
use crate::audio::OutputDevice;
use global_hotkey::hotkey::HotKey;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// Preferences service error types.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No per-user config directory available")]
    NoConfigDir,
}

/// Persisted user preferences.
pub struct Preferences {
    store: Box<dyn SettingsStore>,
    selected_uids: HashSet<String>,
    has_completed_onboarding: bool,
    shortcut: Option<HotKey>,
}

impl Preferences {
    const SELECTED_DEVICE_UIDS: &'static str = "selectedDeviceUIDs";
    const HAS_COMPLETED_ONBOARDING: &'static str = "hasCompletedOnboarding";
    const CYCLE_SHORTCUT: &'static str = "cycleAudioDeviceShortcut";

    /// Load preferences from `store`. Malformed values fall back to defaults.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let selected_uids = Self::load_selected(&*store);
        let has_completed_onboarding = match store.get(Self::HAS_COMPLETED_ONBOARDING) {
            None => false,
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                warn!("Ignoring malformed {}: {}", Self::HAS_COMPLETED_ONBOARDING, other);
                false
            }
        };
        let shortcut = Self::load_shortcut(&*store);

        Self {
            store,
            selected_uids,
            has_completed_onboarding,
            shortcut,
        }
    }

    fn load_selected(store: &dyn SettingsStore) -> HashSet<String> {
        match store.get(Self::SELECTED_DEVICE_UIDS) {
            None => HashSet::new(),
            Some(Value::Array(items)) => {
                let uids: Option<HashSet<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                // One bad entry makes the whole list malformed
                uids.unwrap_or_else(|| {
                    warn!(
                        "Ignoring malformed {}: {}",
                        Self::SELECTED_DEVICE_UIDS,
                        serde_json::Value::Array(items)
                    );
                    HashSet::new()
                })
            }
            Some(other) => {
                warn!("Ignoring malformed {}: {}", Self::SELECTED_DEVICE_UIDS, other);
                HashSet::new()
            }
        }
    }

    fn load_shortcut(store: &dyn SettingsStore) -> Option<HotKey> {
        match store.get(Self::CYCLE_SHORTCUT)? {
            Value::String(text) => match parse_shortcut(&text) {
                Ok(shortcut) => Some(shortcut),
                Err(e) => {
                    warn!("Ignoring stored shortcut {:?}: {}", text, e);
                    None
                }
            },
            other => {
                warn!("Ignoring malformed {}: {}", Self::CYCLE_SHORTCUT, other);
                None
            }
        }
    }

    /// UIDs of devices selected for cycling.
    pub fn selected_uids(&self) -> &HashSet<String> {
        &self.selected_uids
    }

    pub fn selected_count(&self) -> usize {
        self.selected_uids.len()
    }

    /// Check if a device is selected for cycling.
    pub fn is_selected(&self, device: &OutputDevice) -> bool {
        self.selected_uids.contains(&device.uid)
    }

    /// Toggle selection state for a device.
    pub fn toggle_selection(&mut self, device: &OutputDevice) {
        if !self.selected_uids.remove(&device.uid) {
            self.selected_uids.insert(device.uid.clone());
        }
        self.save_selected();
    }

    /// The selected devices among `available`, keeping `available`'s order.
    pub fn selected_devices(&self, available: &[OutputDevice]) -> Vec<OutputDevice> {
        available
            .iter()
            .filter(|device| self.is_selected(device))
            .cloned()
            .collect()
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding
    }

    pub fn set_completed_onboarding(&mut self, completed: bool) {
        self.has_completed_onboarding = completed;
        self.write(Self::HAS_COMPLETED_ONBOARDING, Value::Bool(completed));
    }

    /// Recorded cycle shortcut, if any.
    pub fn shortcut(&self) -> Option<&HotKey> {
        self.shortcut.as_ref()
    }

    pub fn set_shortcut(&mut self, shortcut: Option<HotKey>) {
        match &shortcut {
            Some(s) => self.write(Self::CYCLE_SHORTCUT, Value::String(s.into_string())),
            None => {
                if let Err(e) = self.store.remove(Self::CYCLE_SHORTCUT) {
                    warn!("Failed to clear {}: {}", Self::CYCLE_SHORTCUT, e);
                }
            }
        }
        self.shortcut = shortcut;
    }

    /// Clear the selection and onboarding flag.
    pub fn reset(&mut self) {
        self.selected_uids.clear();
        self.save_selected();
        self.set_completed_onboarding(false);
    }

    fn save_selected(&mut self) {
        let mut uids: Vec<&String> = self.selected_uids.iter().collect();
        uids.sort();
        let value = Value::Array(uids.into_iter().cloned().map(Value::String).collect());
        self.write(Self::SELECTED_DEVICE_UIDS, value);
    }

    fn write(&mut self, key: &str, value: Value) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to save {}: {}", key, e);
        }
    }
}
