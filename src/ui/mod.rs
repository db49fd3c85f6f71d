//! UI module for the menu bar icon and popover window.
//!
//! `model` and the tray event types are platform-neutral; the widgets and
//! the tray manager are built only on macOS.

pub mod model;
pub mod tray;

#[cfg(target_os = "macos")]
pub mod components;
#[cfg(target_os = "macos")]
pub mod popover;
#[cfg(target_os = "macos")]
pub mod theme;

pub use model::{
    current_device_label, cycle_summary, popover_position, PopoverAction, POPOVER_WIDTH,
};
pub use tray::{MenuItemId, Position, Rect, TrayError, TrayEvent, TrayState};

#[cfg(target_os = "macos")]
pub use popover::PopoverWindow;
#[cfg(target_os = "macos")]
pub use theme::Theme;
#[cfg(target_os = "macos")]
pub use tray::TrayManager;
