//! AudioToggle - Library
//!
//! A macOS menu bar utility that cycles the default audio output device
//! through a user-chosen subset of devices.
//!
//! ## Features
//!
//! - Pick which output devices take part in the cycle
//! - Cycle with a global keyboard shortcut or from the menu bar
//! - Switch to any device directly from the popover
//! - Notification on every switch
//! - Automatic refresh when devices are plugged in or removed

pub mod app;
pub mod audio;
pub mod platform;
pub mod ui;

#[cfg(test)]
mod testing;

pub use app::AppState;
pub use audio::{AudioError, AudioEvent, AudioService, AudioSystem, DeviceEvent, OutputDevice};
pub use platform::{CycleHotkey, JsonFileStore, MemoryStore, Preferences};
pub use ui::{PopoverAction, TrayEvent, TrayState};

#[cfg(target_os = "macos")]
pub use ui::{PopoverWindow, TrayManager};
