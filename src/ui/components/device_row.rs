//! Device row UI component.
//!
//! Renders one output device: a checkbox for cycle membership, the device
//! name (click to switch to it) and a check mark on the current device.

use crate::audio::OutputDevice;
use eframe::egui;

/// Actions that can be triggered from a device row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRowAction {
    /// Add or remove the device from the cycle
    ToggleSelection,
    /// Switch output to this device
    Select,
}

/// Device row component.
pub struct DeviceRow;

impl DeviceRow {
    /// Render a device row and return any action triggered.
    pub fn show(
        ui: &mut egui::Ui,
        device: &OutputDevice,
        selected: bool,
        is_current: bool,
        accent: egui::Color32,
    ) -> Option<DeviceRowAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let mut checked = selected;
            if ui
                .checkbox(&mut checked, "")
                .on_hover_text("Include in cycle")
                .changed()
            {
                action = Some(DeviceRowAction::ToggleSelection);
            }

            let name = egui::RichText::new(device.display_name());
            if ui
                .add(egui::Label::new(name).sense(egui::Sense::click()))
                .on_hover_text(&device.name)
                .clicked()
            {
                action = Some(DeviceRowAction::Select);
            }

            if is_current {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(accent, "✔");
                });
            }
        });

        action
    }
}
