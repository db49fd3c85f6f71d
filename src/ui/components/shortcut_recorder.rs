//! Shortcut recorder UI component.
//!
//! A button that shows the current shortcut. Clicking it starts recording;
//! the next key pressed with a modifier becomes the new shortcut. Escape
//! cancels.

use crate::platform::shortcut_label;
use eframe::egui;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};

/// Actions that can be triggered from the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderAction {
    Record(HotKey),
    Clear,
}

/// Shortcut recorder state.
#[derive(Debug, Default)]
pub struct ShortcutRecorder {
    recording: bool,
}

impl ShortcutRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Render the recorder and return any action triggered.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        current: Option<&HotKey>,
    ) -> Option<RecorderAction> {
        let mut action = None;

        if self.recording {
            if let Some(result) = Self::capture(ui.ctx()) {
                self.recording = false;
                action = result.map(RecorderAction::Record);
            }
        }

        ui.horizontal(|ui| {
            let label = if self.recording {
                "Type shortcut…".to_string()
            } else {
                current
                    .map(shortcut_label)
                    .unwrap_or_else(|| "Record Shortcut".to_string())
            };

            let button = egui::Button::new(label).selected(self.recording);
            if ui.add(button).clicked() {
                self.recording = !self.recording;
            }

            if current.is_some()
                && !self.recording
                && ui.small_button("✖").on_hover_text("Clear").clicked()
            {
                action = Some(RecorderAction::Clear);
            }
        });

        action
    }

    /// Look for a finishing key press. `Some(None)` means recording was
    /// cancelled.
    fn capture(ctx: &egui::Context) -> Option<Option<HotKey>> {
        ctx.input(|input| {
            input.events.iter().find_map(|event| match event {
                egui::Event::Key {
                    key: egui::Key::Escape,
                    pressed: true,
                    ..
                } => Some(None),
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => shortcut_from_key(*key, *modifiers).map(Some),
                _ => None,
            })
        })
    }
}

/// Convert an egui key press into a shortcut. Presses without a modifier
/// and unsupported keys yield `None`.
pub fn shortcut_from_key(key: egui::Key, modifiers: egui::Modifiers) -> Option<HotKey> {
    let mut mods = Modifiers::empty();
    if modifiers.mac_cmd {
        mods |= Modifiers::SUPER;
    }
    if modifiers.ctrl {
        mods |= Modifiers::CONTROL;
    }
    if modifiers.alt {
        mods |= Modifiers::ALT;
    }
    if modifiers.shift {
        mods |= Modifiers::SHIFT;
    }
    if mods.is_empty() {
        return None;
    }

    Some(HotKey::new(Some(mods), key_code(key)?))
}

fn key_code(key: egui::Key) -> Option<Code> {
    use egui::Key;

    let code = match key {
        Key::A => Code::KeyA,
        Key::B => Code::KeyB,
        Key::C => Code::KeyC,
        Key::D => Code::KeyD,
        Key::E => Code::KeyE,
        Key::F => Code::KeyF,
        Key::G => Code::KeyG,
        Key::H => Code::KeyH,
        Key::I => Code::KeyI,
        Key::J => Code::KeyJ,
        Key::K => Code::KeyK,
        Key::L => Code::KeyL,
        Key::M => Code::KeyM,
        Key::N => Code::KeyN,
        Key::O => Code::KeyO,
        Key::P => Code::KeyP,
        Key::Q => Code::KeyQ,
        Key::R => Code::KeyR,
        Key::S => Code::KeyS,
        Key::T => Code::KeyT,
        Key::U => Code::KeyU,
        Key::V => Code::KeyV,
        Key::W => Code::KeyW,
        Key::X => Code::KeyX,
        Key::Y => Code::KeyY,
        Key::Z => Code::KeyZ,
        Key::Num0 => Code::Digit0,
        Key::Num1 => Code::Digit1,
        Key::Num2 => Code::Digit2,
        Key::Num3 => Code::Digit3,
        Key::Num4 => Code::Digit4,
        Key::Num5 => Code::Digit5,
        Key::Num6 => Code::Digit6,
        Key::Num7 => Code::Digit7,
        Key::Num8 => Code::Digit8,
        Key::Num9 => Code::Digit9,
        Key::F1 => Code::F1,
        Key::F2 => Code::F2,
        Key::F3 => Code::F3,
        Key::F4 => Code::F4,
        Key::F5 => Code::F5,
        Key::F6 => Code::F6,
        Key::F7 => Code::F7,
        Key::F8 => Code::F8,
        Key::F9 => Code::F9,
        Key::F10 => Code::F10,
        Key::F11 => Code::F11,
        Key::F12 => Code::F12,
        Key::F13 => Code::F13,
        Key::F14 => Code::F14,
        Key::F15 => Code::F15,
        Key::F16 => Code::F16,
        Key::F17 => Code::F17,
        Key::F18 => Code::F18,
        Key::F19 => Code::F19,
        Key::F20 => Code::F20,
        Key::Space => Code::Space,
        Key::Tab => Code::Tab,
        Key::Enter => Code::Enter,
        Key::Backspace => Code::Backspace,
        Key::Delete => Code::Delete,
        Key::ArrowUp => Code::ArrowUp,
        Key::ArrowDown => Code::ArrowDown,
        Key::ArrowLeft => Code::ArrowLeft,
        Key::ArrowRight => Code::ArrowRight,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::Minus => Code::Minus,
        Key::Equals => Code::Equal,
        Key::Comma => Code::Comma,
        Key::Period => Code::Period,
        Key::Slash => Code::Slash,
        Key::Semicolon => Code::Semicolon,
        Key::Backslash => Code::Backslash,
        Key::OpenBracket => Code::BracketLeft,
        Key::CloseBracket => Code::BracketRight,
        Key::Backtick => Code::Backquote,
        _ => return None,
    };
    Some(code)
}
