//! Platform-neutral pieces of the popover: the actions it emits and the
//! text and placement it derives from application state.

use crate::audio::OutputDevice;
use crate::ui::Rect;
use global_hotkey::hotkey::HotKey;

/// Popover width in points.
pub const POPOVER_WIDTH: f32 = 280.0;

/// Gap between the menu bar icon and the popover.
const POPOVER_GAP: f64 = 4.0;

/// Actions that can be triggered from the popover UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopoverAction {
    /// Re-read the device list from the OS
    Refresh,
    /// Add or remove a device from the cycle
    ToggleSelection(OutputDevice),
    /// Make a device the default output right away
    SelectDevice(OutputDevice),
    /// Record a new cycle shortcut
    SetShortcut(HotKey),
    /// Remove the cycle shortcut
    ClearShortcut,
    /// Hide the popover
    Close,
    /// Exit the application
    Quit,
}

/// One-line summary under the shortcut recorder.
pub fn cycle_summary(selected_count: usize) -> String {
    match selected_count {
        0 => "Select devices above to cycle".to_string(),
        1 => "1 device in cycle".to_string(),
        n => format!("{} devices in cycle", n),
    }
}

/// Label for the current device indicator.
pub fn current_device_label(current: Option<&OutputDevice>) -> String {
    current
        .map(OutputDevice::display_name)
        .unwrap_or_else(|| "No output device".to_string())
}

/// Top-left corner of the popover in logical points, centered under the
/// menu bar icon. `icon_rect` is in physical pixels.
pub fn popover_position(icon_rect: &Rect, window_width: f32, scale_factor: f32) -> (f32, f32) {
    let scale = f64::from(scale_factor.max(0.1));
    let center_x = icon_rect.center().x / scale;
    let bottom = icon_rect.bottom / scale;

    let x = center_x - f64::from(window_width) / 2.0;
    let y = bottom + POPOVER_GAP;

    (x.max(0.0) as f32, y.max(0.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::device;

    #[test]
    fn test_cycle_summary() {
        assert_eq!(cycle_summary(0), "Select devices above to cycle");
        assert_eq!(cycle_summary(1), "1 device in cycle");
        assert_eq!(cycle_summary(3), "3 devices in cycle");
    }

    #[test]
    fn test_current_device_label() {
        let speakers = device(1, "spk", "MacBook Pro Speakers");
        assert_eq!(current_device_label(Some(&speakers)), "MacBook Pro");
        assert_eq!(current_device_label(None), "No output device");
    }

    #[test]
    fn test_popover_centered_below_icon() {
        let icon = Rect {
            left: 1000.0,
            top: 0.0,
            right: 1040.0,
            bottom: 48.0,
        };

        let (x, y) = popover_position(&icon, POPOVER_WIDTH, 2.0);
        assert_eq!(x, 510.0 - 140.0);
        assert_eq!(y, 28.0);
    }

    #[test]
    fn test_popover_clamped_to_screen() {
        let icon = Rect {
            left: 10.0,
            top: 0.0,
            right: 30.0,
            bottom: 24.0,
        };

        let (x, _) = popover_position(&icon, POPOVER_WIDTH, 1.0);
        assert_eq!(x, 0.0);
    }
}
