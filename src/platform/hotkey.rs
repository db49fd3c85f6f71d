//! Global hotkey binding for the cycle action.
//!
//! The shortcut is a `global_hotkey` `HotKey`, persisted in its text form.
//! `CycleHotkey` binds it once per process through a `HotkeyBackend`; on
//! macOS the backend is the `global-hotkey` manager.

use global_hotkey::hotkey::{HotKey, Modifiers};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the one global shortcut this app binds.
pub const CYCLE_HOTKEY_NAME: &str = "cycleAudioDevice";

/// Hotkey error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),

    #[error("Failed to register hotkey: {0}")]
    RegisterFailed(String),

    #[error("Failed to unregister hotkey: {0}")]
    UnregisterFailed(String),

    #[error("Hotkey has not been bound yet")]
    NotBound,
}

/// Reject shortcuts that would swallow a plain key press.
pub fn validate_shortcut(hotkey: &HotKey) -> Result<(), HotkeyError> {
    if hotkey.mods.is_empty() {
        return Err(HotkeyError::InvalidShortcut(format!(
            "{} needs at least one modifier",
            hotkey.key
        )));
    }
    Ok(())
}

/// Parse a stored shortcut such as `super+alt+KeyA`.
pub fn parse_shortcut(text: &str) -> Result<HotKey, HotkeyError> {
    let hotkey =
        HotKey::from_str(text).map_err(|e| HotkeyError::InvalidShortcut(e.to_string()))?;
    validate_shortcut(&hotkey)?;
    Ok(hotkey)
}

/// Symbolic label in macOS menu order, e.g. "⌥⌘A".
pub fn shortcut_label(hotkey: &HotKey) -> String {
    let mut label = String::new();
    if hotkey.mods.contains(Modifiers::CONTROL) {
        label.push('⌃');
    }
    if hotkey.mods.contains(Modifiers::ALT) {
        label.push('⌥');
    }
    if hotkey.mods.contains(Modifiers::SHIFT) {
        label.push('⇧');
    }
    if hotkey.mods.intersects(Modifiers::SUPER | Modifiers::META) {
        label.push('⌘');
    }

    let key = hotkey.key.to_string();
    let key = key
        .strip_prefix("Key")
        .or_else(|| key.strip_prefix("Digit"))
        .unwrap_or(&key);
    label.push_str(key);
    label
}

/// OS service that delivers global key presses.
pub trait HotkeyBackend {
    /// Register a shortcut and return the id its presses will carry.
    fn register(&mut self, hotkey: &HotKey) -> Result<u32, HotkeyError>;

    /// Remove a previously registered shortcut.
    fn unregister(&mut self, id: u32) -> Result<(), HotkeyError>;
}

/// Backend used when the OS hotkey service could not be started. Every
/// registration fails, so the app keeps running without a shortcut.
#[derive(Debug, Clone)]
pub struct UnavailableHotkeyBackend {
    reason: String,
}

impl UnavailableHotkeyBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl HotkeyBackend for UnavailableHotkeyBackend {
    fn register(&mut self, _hotkey: &HotKey) -> Result<u32, HotkeyError> {
        Err(HotkeyError::RegisterFailed(self.reason.clone()))
    }

    fn unregister(&mut self, _id: u32) -> Result<(), HotkeyError> {
        Ok(())
    }
}

/// The single "cycle audio device" binding.
pub struct CycleHotkey {
    backend: Box<dyn HotkeyBackend>,
    bound: bool,
    shortcut: Option<HotKey>,
    active_id: Option<u32>,
}

impl CycleHotkey {
    pub fn new(backend: Box<dyn HotkeyBackend>) -> Self {
        Self {
            backend,
            bound: false,
            shortcut: None,
            active_id: None,
        }
    }

    /// Bind the cycle action at launch. Only the first call registers
    /// anything; returns false when already bound.
    pub fn bind(&mut self, shortcut: Option<HotKey>) -> bool {
        if self.bound {
            return false;
        }
        self.bound = true;

        match shortcut {
            Some(shortcut) => self.activate(shortcut),
            None => info!("No shortcut recorded for {}", CYCLE_HOTKEY_NAME),
        }
        true
    }

    /// Swap the key combination of the bound action.
    pub fn rebind(&mut self, shortcut: Option<HotKey>) -> Result<(), HotkeyError> {
        if !self.bound {
            return Err(HotkeyError::NotBound);
        }
        if let Some(shortcut) = &shortcut {
            validate_shortcut(shortcut)?;
        }

        if let Some(id) = self.active_id.take() {
            if let Err(e) = self.backend.unregister(id) {
                warn!("Failed to unregister previous shortcut: {}", e);
            }
        }
        self.shortcut = None;

        if let Some(shortcut) = shortcut {
            let id = self.backend.register(&shortcut)?;
            info!("Bound {} to {}", CYCLE_HOTKEY_NAME, shortcut.into_string());
            self.active_id = Some(id);
            self.shortcut = Some(shortcut);
        }
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// The key combination currently registered.
    pub fn shortcut(&self) -> Option<&HotKey> {
        self.shortcut.as_ref()
    }

    /// True if a press with this id belongs to the cycle binding.
    pub fn matches(&self, id: u32) -> bool {
        self.active_id == Some(id)
    }

    fn activate(&mut self, shortcut: HotKey) {
        if let Err(e) = validate_shortcut(&shortcut) {
            warn!("Not binding {}: {}", shortcut.into_string(), e);
            return;
        }
        match self.backend.register(&shortcut) {
            Ok(id) => {
                info!("Bound {} to {}", CYCLE_HOTKEY_NAME, shortcut.into_string());
                self.active_id = Some(id);
                self.shortcut = Some(shortcut);
            }
            Err(e) => warn!("Failed to register {}: {}", shortcut.into_string(), e),
        }
    }
}

#[cfg(target_os = "macos")]
pub use self::macos::GlobalHotkeyBackend;

#[cfg(target_os = "macos")]
mod macos {
    use super::{HotkeyBackend, HotkeyError};
    use global_hotkey::hotkey::HotKey;
    use global_hotkey::GlobalHotKeyManager;
    use std::collections::HashMap;

    /// Global shortcuts through the `global-hotkey` manager. Must be created
    /// on the main thread.
    pub struct GlobalHotkeyBackend {
        manager: GlobalHotKeyManager,
        registered: HashMap<u32, HotKey>,
    }

    impl GlobalHotkeyBackend {
        pub fn new() -> Result<Self, HotkeyError> {
            let manager = GlobalHotKeyManager::new()
                .map_err(|e| HotkeyError::RegisterFailed(e.to_string()))?;
            Ok(Self {
                manager,
                registered: HashMap::new(),
            })
        }
    }

    impl HotkeyBackend for GlobalHotkeyBackend {
        fn register(&mut self, hotkey: &HotKey) -> Result<u32, HotkeyError> {
            self.manager
                .register(*hotkey)
                .map_err(|e| HotkeyError::RegisterFailed(e.to_string()))?;

            let id = hotkey.id();
            self.registered.insert(id, *hotkey);
            Ok(id)
        }

        fn unregister(&mut self, id: u32) -> Result<(), HotkeyError> {
            if let Some(hotkey) = self.registered.remove(&id) {
                self.manager
                    .unregister(hotkey)
                    .map_err(|e| HotkeyError::UnregisterFailed(e.to_string()))?;
            }
            Ok(())
        }
    }
}
