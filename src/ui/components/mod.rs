//! Reusable UI components for the popover window.

pub mod device_row;
pub mod shortcut_recorder;

pub use device_row::{DeviceRow, DeviceRowAction};
pub use shortcut_recorder::{RecorderAction, ShortcutRecorder};
