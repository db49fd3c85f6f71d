//! Popover window implementation using eframe/egui.
//!
//! Shows the current output device, the device list with cycle checkboxes,
//! the shortcut recorder and a cycle summary.

use crate::app::AppState;
use crate::ui::components::{DeviceRow, DeviceRowAction, RecorderAction, ShortcutRecorder};
use crate::ui::model::{cycle_summary, current_device_label, PopoverAction};
use crate::ui::Theme;
use eframe::egui;

/// Popover window state.
pub struct PopoverWindow {
    /// Pending actions from the UI
    pub actions: Vec<PopoverAction>,
    recorder: ShortcutRecorder,
    theme: Theme,
}

impl PopoverWindow {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            recorder: ShortcutRecorder::new(),
            theme: Theme::default(),
        }
    }

    /// Match the palette to the system appearance.
    pub fn apply_theme(&mut self, ctx: &egui::Context) {
        self.theme = Theme::for_system(ctx);
        self.theme.apply(ctx);
    }

    /// Render the popover content.
    pub fn show(&mut self, ctx: &egui::Context, app_state: &AppState) {
        self.actions.clear();
        let was_recording = self.recorder.is_recording();

        egui::CentralPanel::default().show(ctx, |ui| {
            // Header with title and refresh button
            ui.horizontal(|ui| {
                ui.heading("Audio Output");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⟳").on_hover_text("Refresh devices").clicked() {
                        self.actions.push(PopoverAction::Refresh);
                    }
                });
            });

            // Current device
            ui.horizontal(|ui| {
                let current = app_state.audio().current_device();
                let color = if current.is_some() {
                    self.theme.accent
                } else {
                    self.theme.text_secondary
                };
                ui.colored_label(color, "🔊");
                ui.label(current_device_label(current));
            });

            ui.separator();

            ui.colored_label(self.theme.text_secondary, "Cycle between:");

            let devices = app_state.audio().devices();
            if devices.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.colored_label(self.theme.text_secondary, "No devices found");
                    ui.add_space(12.0);
                });
            } else {
                let current = app_state.audio().current_device();
                for device in devices {
                    let selected = app_state.preferences().is_selected(device);
                    let is_current = current == Some(device);

                    match DeviceRow::show(ui, device, selected, is_current, self.theme.accent) {
                        Some(DeviceRowAction::ToggleSelection) => self
                            .actions
                            .push(PopoverAction::ToggleSelection(device.clone())),
                        Some(DeviceRowAction::Select) => {
                            self.actions.push(PopoverAction::SelectDevice(device.clone()))
                        }
                        None => {}
                    }
                }
            }

            ui.separator();

            // Shortcut
            ui.horizontal(|ui| {
                ui.label("Shortcut:");
                match self.recorder.show(ui, app_state.hotkey().shortcut()) {
                    Some(RecorderAction::Record(shortcut)) => {
                        self.actions.push(PopoverAction::SetShortcut(shortcut))
                    }
                    Some(RecorderAction::Clear) => self.actions.push(PopoverAction::ClearShortcut),
                    None => {}
                }
            });

            ui.colored_label(
                self.theme.text_secondary,
                cycle_summary(app_state.preferences().selected_count()),
            );

            if !app_state.preferences().has_completed_onboarding() {
                ui.add_space(4.0);
                ui.colored_label(
                    self.theme.text_secondary,
                    "Tick the devices to cycle through, then record a shortcut.",
                );
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Quit").clicked() {
                    self.actions.push(PopoverAction::Quit);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(
                        self.theme.text_secondary,
                        format!("v{}", env!("CARGO_PKG_VERSION")),
                    );
                });
            });
        });

        // Escape while recording only cancels the recording
        if !was_recording && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.actions.push(PopoverAction::Close);
        }
    }

    /// Take all pending actions.
    pub fn take_actions(&mut self) -> Vec<PopoverAction> {
        std::mem::take(&mut self.actions)
    }
}

impl Default for PopoverWindow {
    fn default() -> Self {
        Self::new()
    }
}
