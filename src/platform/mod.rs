//! Platform services: settings storage, preferences, notifications, global
//! hotkeys and icon generation.

pub mod hotkey;
pub mod icons;
pub mod notifier;
pub mod preferences;
pub mod store;

pub use hotkey::{
    parse_shortcut, shortcut_label, validate_shortcut, CycleHotkey, HotkeyBackend, HotkeyError,
    UnavailableHotkeyBackend, CYCLE_HOTKEY_NAME,
};
pub use notifier::{NotifyError, UserNotifier};
pub use preferences::{Preferences, PreferencesError};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};

#[cfg(target_os = "macos")]
pub use hotkey::GlobalHotkeyBackend;
#[cfg(target_os = "macos")]
pub use notifier::MacNotifier;
