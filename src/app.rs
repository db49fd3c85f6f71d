//! Application state and lifecycle management.
//!
//! `AppState` owns the audio service, the preferences and the cycle hotkey,
//! and turns popover actions, tray events, hotkey presses and device
//! notifications into calls on them.

use crate::audio::{AudioService, Debouncer, DeviceEvent, OutputDevice};
use crate::platform::{CycleHotkey, Preferences};
use crate::ui::{MenuItemId, PopoverAction, TrayEvent};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Main application state.
pub struct AppState {
    audio: AudioService,
    preferences: Preferences,
    hotkey: CycleHotkey,
    debouncer: Debouncer,

    /// Whether the popover window is visible
    pub popover_visible: bool,

    /// Whether the application should exit
    pub should_exit: bool,
}

impl AppState {
    pub fn new(audio: AudioService, preferences: Preferences, hotkey: CycleHotkey) -> Self {
        Self {
            audio,
            preferences,
            hotkey,
            debouncer: Debouncer::default(),
            popover_visible: false,
            should_exit: false,
        }
    }

    /// Launch-time setup: notification permission, the stored shortcut and
    /// the first-run popover.
    pub fn initialize(&mut self) {
        self.audio.request_notification_permission();
        self.hotkey.bind(self.preferences.shortcut().copied());

        if !self.preferences.has_completed_onboarding() {
            info!("Onboarding not completed, showing popover");
            self.show_popover();
        }
    }

    pub fn audio(&self) -> &AudioService {
        &self.audio
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn hotkey(&self) -> &CycleHotkey {
        &self.hotkey
    }

    /// Switch to the next selected device.
    pub fn cycle(&mut self) -> Option<OutputDevice> {
        let candidates = self.preferences.selected_devices(self.audio.devices());
        self.audio.cycle_next(&candidates)
    }

    /// Apply an action emitted by the popover.
    pub fn handle_action(&mut self, action: PopoverAction) {
        match action {
            PopoverAction::Refresh => self.audio.refresh(),
            PopoverAction::ToggleSelection(device) => {
                self.preferences.toggle_selection(&device);
                if !self.preferences.has_completed_onboarding() {
                    self.preferences.set_completed_onboarding(true);
                }
            }
            PopoverAction::SelectDevice(device) => {
                // Failure is logged by the service
                let _ = self.audio.set_output_device(&device);
            }
            PopoverAction::SetShortcut(shortcut) => {
                let previous = self.hotkey.shortcut().copied();
                match self.hotkey.rebind(Some(shortcut)) {
                    Ok(()) => self.preferences.set_shortcut(Some(shortcut)),
                    Err(e) => {
                        warn!("Failed to bind {}: {}", shortcut.into_string(), e);
                        if let Err(e) = self.hotkey.rebind(previous) {
                            warn!("Failed to restore previous shortcut: {}", e);
                        }
                    }
                }
            }
            PopoverAction::ClearShortcut => {
                if let Err(e) = self.hotkey.rebind(None) {
                    warn!("Failed to clear shortcut: {}", e);
                }
                self.preferences.set_shortcut(None);
            }
            PopoverAction::Close => self.hide_popover(),
            PopoverAction::Quit => self.should_exit = true,
        }
    }

    /// Handle a tray event.
    pub fn handle_tray_event(&mut self, event: TrayEvent) {
        match event {
            TrayEvent::LeftClick { .. } => self.toggle_popover(),
            TrayEvent::MenuItemClicked { id } => match id {
                MenuItemId::CycleOutput => {
                    self.cycle();
                }
                MenuItemId::Quit => self.should_exit = true,
            },
        }
    }

    /// Handle a global hotkey press. Returns true if it was the cycle key.
    pub fn handle_hotkey_pressed(&mut self, id: u32) -> bool {
        if !self.hotkey.matches(id) {
            return false;
        }
        self.cycle();
        true
    }

    /// Queue a device notification for the next debounced refresh.
    pub fn on_device_event(&mut self, event: DeviceEvent, now: Instant) {
        debug!(?event, "Device notification");
        self.debouncer.record(now);
    }

    /// Refresh once a burst of device notifications has settled. Returns
    /// true if a refresh ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debouncer.flush_due(now) {
            return false;
        }
        self.audio.refresh();
        true
    }

    /// How long until `tick` has work to do, if anything is pending.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Get the tooltip text for the menu bar icon.
    pub fn tooltip(&self) -> String {
        match self.audio.current_device() {
            Some(device) => device.display_name(),
            None => "No output device".to_string(),
        }
    }

    /// Toggle the popover visibility.
    pub fn toggle_popover(&mut self) {
        self.popover_visible = !self.popover_visible;
    }

    /// Show the popover.
    pub fn show_popover(&mut self) {
        self.popover_visible = true;
    }

    /// Hide the popover.
    pub fn hide_popover(&mut self) {
        self.popover_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DEVICE_EVENT_DEBOUNCE;
    use crate::platform::MemoryStore;
    use crate::testing::{device, FakeAudioSystem, FakeHotkeyBackend, RecordingNotifier};
    use crate::ui::{Position, Rect};
    use global_hotkey::hotkey::{Code, HotKey, Modifiers};

    struct Harness {
        app: AppState,
        system: FakeAudioSystem,
        notifier: RecordingNotifier,
        hotkeys: FakeHotkeyBackend,
    }

    fn harness(devices: Vec<OutputDevice>, default_uid: Option<&str>) -> Harness {
        let system = FakeAudioSystem::new(devices, default_uid);
        let notifier = RecordingNotifier::default();
        let hotkeys = FakeHotkeyBackend::default();

        let audio = AudioService::new(Box::new(system.clone()), Box::new(notifier.clone()));
        let preferences = Preferences::load(Box::new(MemoryStore::new()));
        let hotkey = CycleHotkey::new(Box::new(hotkeys.clone()));

        Harness {
            app: AppState::new(audio, preferences, hotkey),
            system,
            notifier,
            hotkeys,
        }
    }

    fn abc() -> Vec<OutputDevice> {
        vec![device(1, "a", "A"), device(2, "b", "B"), device(3, "c", "C")]
    }

    fn select(app: &mut AppState, uids: &[&str]) {
        let devices = app.audio().devices().to_vec();
        for d in devices.iter().filter(|d| uids.contains(&d.uid.as_str())) {
            app.handle_action(PopoverAction::ToggleSelection(d.clone()));
        }
    }

    fn cmd(key: Code) -> HotKey {
        HotKey::new(Some(Modifiers::SUPER), key)
    }

    #[test]
    fn test_cycle_advances_to_next_selected() {
        let mut h = harness(abc(), Some("b"));
        select(&mut h.app, &["a", "b", "c"]);

        let switched = h.app.cycle().unwrap();
        assert_eq!(switched.uid, "c");
        assert_eq!(h.system.default_uid().as_deref(), Some("c"));
        assert_eq!(h.notifier.bodies(), vec!["Switched to C".to_string()]);
    }

    #[test]
    fn test_cycle_from_unselected_current_goes_to_first() {
        let mut h = harness(vec![device(1, "a", "A"), device(2, "b", "B")], Some("b"));
        select(&mut h.app, &["a"]);

        assert_eq!(h.app.cycle().map(|d| d.uid), Some("a".to_string()));
    }

    #[test]
    fn test_cycle_without_selection_is_noop() {
        let mut h = harness(abc(), Some("a"));

        assert!(h.app.cycle().is_none());
        assert!(h.system.set_calls().is_empty());
        assert!(h.notifier.bodies().is_empty());
    }

    #[test]
    fn test_first_toggle_completes_onboarding() {
        let mut h = harness(abc(), Some("a"));
        assert!(!h.app.preferences().has_completed_onboarding());

        select(&mut h.app, &["a"]);
        assert!(h.app.preferences().has_completed_onboarding());
        assert_eq!(h.app.preferences().selected_count(), 1);
    }

    #[test]
    fn test_initialize_shows_popover_until_onboarded() {
        let mut h = harness(abc(), Some("a"));
        h.app.initialize();
        assert!(h.app.popover_visible);
        assert_eq!(h.notifier.permission_requests(), 1);
        assert!(h.app.hotkey().is_bound());

        let mut h = harness(abc(), Some("a"));
        select(&mut h.app, &["a"]);
        h.app.initialize();
        assert!(!h.app.popover_visible);
    }

    #[test]
    fn test_select_device_switches_immediately() {
        let mut h = harness(abc(), Some("a"));
        h.app
            .handle_action(PopoverAction::SelectDevice(device(3, "c", "C")));

        assert_eq!(h.app.audio().current_device().map(|d| d.uid.as_str()), Some("c"));
        assert_eq!(h.app.tooltip(), "C");
    }

    #[test]
    fn test_set_shortcut_rebinds_and_persists() {
        let mut h = harness(abc(), Some("a"));
        h.app.initialize();

        h.app.handle_action(PopoverAction::SetShortcut(cmd(Code::KeyA)));
        assert_eq!(h.hotkeys.registered(), vec![cmd(Code::KeyA)]);
        assert_eq!(h.app.preferences().shortcut(), Some(&cmd(Code::KeyA)));

        h.app.handle_action(PopoverAction::SetShortcut(cmd(Code::KeyB)));
        assert_eq!(h.hotkeys.registered(), vec![cmd(Code::KeyB)]);

        h.app.handle_action(PopoverAction::ClearShortcut);
        assert!(h.hotkeys.registered().is_empty());
        assert!(h.app.preferences().shortcut().is_none());
    }

    #[test]
    fn test_failed_shortcut_keeps_previous_preference() {
        let mut h = harness(abc(), Some("a"));
        h.app.initialize();
        h.app.handle_action(PopoverAction::SetShortcut(cmd(Code::KeyA)));

        h.hotkeys.fail_registration(true);
        h.app.handle_action(PopoverAction::SetShortcut(cmd(Code::KeyB)));

        assert_eq!(h.app.preferences().shortcut(), Some(&cmd(Code::KeyA)));
    }

    #[test]
    fn test_hotkey_press_cycles() {
        let mut h = harness(abc(), Some("a"));
        h.app.initialize();
        select(&mut h.app, &["a", "b"]);
        h.app.handle_action(PopoverAction::SetShortcut(cmd(Code::KeyA)));

        let id = cmd(Code::KeyA).id();
        assert!(!h.app.handle_hotkey_pressed(id + 100));
        assert!(h.app.handle_hotkey_pressed(id));
        assert_eq!(h.system.default_uid().as_deref(), Some("b"));
    }

    #[test]
    fn test_tray_events() {
        let mut h = harness(abc(), Some("a"));
        select(&mut h.app, &["a", "c"]);

        h.app.handle_tray_event(TrayEvent::LeftClick {
            rect: Rect::default(),
            position: Position::default(),
        });
        assert!(h.app.popover_visible);

        h.app.handle_tray_event(TrayEvent::MenuItemClicked {
            id: MenuItemId::CycleOutput,
        });
        assert_eq!(h.system.default_uid().as_deref(), Some("c"));

        h.app.handle_tray_event(TrayEvent::MenuItemClicked {
            id: MenuItemId::Quit,
        });
        assert!(h.app.should_exit);
    }

    #[test]
    fn test_device_events_refresh_once_after_quiet_period() {
        let mut h = harness(vec![device(1, "a", "A")], Some("a"));
        h.system
            .set_devices(vec![device(1, "a", "A"), device(2, "b", "B")]);

        let start = Instant::now();
        h.app.on_device_event(DeviceEvent::DeviceListChanged, start);
        h.app.on_device_event(
            DeviceEvent::DefaultOutputChanged,
            start + Duration::from_millis(20),
        );

        assert!(!h.app.tick(start + Duration::from_millis(50)));
        assert_eq!(h.app.audio().devices().len(), 1);

        let settled = start + Duration::from_millis(20) + DEVICE_EVENT_DEBOUNCE;
        assert!(h.app.tick(settled));
        assert_eq!(h.app.audio().devices().len(), 2);
        assert!(!h.app.tick(settled + DEVICE_EVENT_DEBOUNCE));
        assert_eq!(h.app.next_tick_in(settled), None);
    }

    #[test]
    fn test_external_default_change_applies_after_debounce() {
        let mut h = harness(abc(), Some("a"));
        h.system.set_default_uid(Some("c"));

        let start = Instant::now();
        h.app.on_device_event(DeviceEvent::DefaultOutputChanged, start);

        assert!(!h.app.tick(start + Duration::from_millis(50)));
        assert_eq!(h.app.audio().current_device().map(|d| d.uid.as_str()), Some("a"));

        assert!(h.app.tick(start + DEVICE_EVENT_DEBOUNCE));
        assert_eq!(h.app.audio().current_device().map(|d| d.uid.as_str()), Some("c"));
        assert_eq!(h.app.tooltip(), "C");
        assert!(h.system.set_calls().is_empty());
    }

    #[test]
    fn test_tooltip_without_device() {
        let h = harness(Vec::new(), None);
        assert_eq!(h.app.tooltip(), "No output device");
    }

    #[test]
    fn test_close_and_quit_actions() {
        let mut h = harness(abc(), Some("a"));
        h.app.show_popover();
        h.app.handle_action(PopoverAction::Close);
        assert!(!h.app.popover_visible);

        h.app.handle_action(PopoverAction::Quit);
        assert!(h.app.should_exit);
    }
}
