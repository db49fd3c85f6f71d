//! AudioToggle
//!
//! Menu bar utility that cycles the default audio output device.

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

#[cfg(target_os = "macos")]
fn main() -> anyhow::Result<()> {
    use audio_toggle::ui::POPOVER_WIDTH;
    use eframe::egui;

    init_tracing();
    tracing::info!("Starting AudioToggle {}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AudioToggle")
            .with_inner_size([POPOVER_WIDTH, 420.0])
            .with_decorations(false)
            .with_resizable(false)
            .with_always_on_top()
            .with_taskbar(false)
            .with_visible(false),
        ..Default::default()
    };

    eframe::run_native(
        "AudioToggle",
        options,
        Box::new(|cc| Ok(Box::new(menu_bar::MenuBarApp::new(cc)?))),
    )
    .map_err(|e| anyhow::anyhow!("Event loop failed: {}", e))
}

#[cfg(not(target_os = "macos"))]
fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::error!("AudioToggle only runs on macOS");
    anyhow::bail!("unsupported platform")
}

#[cfg(target_os = "macos")]
mod menu_bar {
    use anyhow::Context as _;
    use audio_toggle::audio::{create_backend, AudioService, DeviceEvent, DeviceListener};
    use audio_toggle::platform::{
        CycleHotkey, GlobalHotkeyBackend, HotkeyBackend, JsonFileStore, MacNotifier, MemoryStore,
        Preferences, SettingsStore, UnavailableHotkeyBackend,
    };
    use audio_toggle::ui::{
        popover_position, PopoverWindow, TrayManager, TrayState, POPOVER_WIDTH,
    };
    use audio_toggle::{AppState, TrayEvent};
    use eframe::egui;
    use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::mpsc::{channel, Receiver};
    use std::time::{Duration, Instant};
    use tracing::{debug, info, warn};

    /// Upper bound between frames while idle.
    const IDLE_REPAINT: Duration = Duration::from_millis(250);

    pub struct MenuBarApp {
        state: AppState,
        popover: PopoverWindow,
        tray: TrayManager,
        device_events: Receiver<DeviceEvent>,
        hotkey_events: Receiver<GlobalHotKeyEvent>,
        _listener: Option<DeviceListener>,
        tray_dirty: Rc<Cell<bool>>,
        viewport_visible: bool,
        had_focus: bool,
    }

    impl MenuBarApp {
        pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
            let ctx = cc.egui_ctx.clone();

            let store: Box<dyn SettingsStore> = match JsonFileStore::open_default() {
                Ok(store) => {
                    info!("Settings file: {}", store.path().display());
                    Box::new(store)
                }
                Err(e) => {
                    warn!("Falling back to in-memory settings: {}", e);
                    Box::new(MemoryStore::new())
                }
            };
            let preferences = Preferences::load(store);

            let system = create_backend().context("CoreAudio is not available")?;
            let mut audio = AudioService::new(system, Box::new(MacNotifier::new()));

            let tray_dirty = Rc::new(Cell::new(true));
            {
                let dirty = Rc::clone(&tray_dirty);
                let ctx = ctx.clone();
                audio.subscribe(move |event| {
                    debug!(?event, "Audio state changed");
                    dirty.set(true);
                    ctx.request_repaint();
                });
            }

            let backend: Box<dyn HotkeyBackend> = match GlobalHotkeyBackend::new() {
                Ok(backend) => Box::new(backend),
                Err(e) => {
                    warn!("Global hotkeys unavailable, cycle from the menu bar: {}", e);
                    Box::new(UnavailableHotkeyBackend::new(e.to_string()))
                }
            };
            let hotkey = CycleHotkey::new(backend);

            let mut state = AppState::new(audio, preferences, hotkey);
            state.initialize();

            let (sender, device_events) = channel();
            let wake = ctx.clone();
            let listener = DeviceListener::register(sender, move || wake.request_repaint());
            let listener = match listener {
                Ok(listener) => Some(listener),
                Err(e) => {
                    warn!("Device change notifications unavailable: {}", e);
                    None
                }
            };

            let (sender, hotkey_events) = channel();
            let wake = ctx.clone();
            GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
                let _ = sender.send(event);
                wake.request_repaint();
            }));

            let mut tray = TrayManager::new();
            let wake = ctx.clone();
            tray.create(
                TrayState {
                    tooltip: state.tooltip(),
                },
                move || wake.request_repaint(),
            )
            .context("Failed to create menu bar icon")?;

            let mut popover = PopoverWindow::new();
            popover.apply_theme(&ctx);

            Ok(Self {
                state,
                popover,
                tray,
                device_events,
                hotkey_events,
                _listener: listener,
                tray_dirty,
                viewport_visible: false,
                had_focus: false,
            })
        }

        fn drain_events(&mut self, ctx: &egui::Context) {
            let now = Instant::now();

            while let Ok(event) = self.device_events.try_recv() {
                self.state.on_device_event(event, now);
            }
            self.state.tick(now);

            while let Ok(event) = self.tray.events().try_recv() {
                if let TrayEvent::LeftClick { rect, .. } = &event {
                    let scale = ctx.native_pixels_per_point().unwrap_or(1.0);
                    let (x, y) = popover_position(rect, POPOVER_WIDTH, scale);
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                        x, y,
                    )));
                }
                self.state.handle_tray_event(event);
            }

            // Only drained when a frame runs. Keep the IDLE_REPAINT request in
            // `update`, see "Known risks" in DESIGN.md.
            while let Ok(event) = self.hotkey_events.try_recv() {
                // Cycle on key-up
                if event.state == HotKeyState::Released {
                    self.state.handle_hotkey_pressed(event.id);
                }
            }
        }

        fn sync_viewport(&mut self, ctx: &egui::Context) {
            if self.state.popover_visible != self.viewport_visible {
                self.viewport_visible = self.state.popover_visible;
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(self.viewport_visible));
                if self.viewport_visible {
                    self.had_focus = false;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                    ctx.request_repaint();
                }
            }

            if self.tray_dirty.replace(false) {
                if let Err(e) = self.tray.set_tooltip(&self.state.tooltip()) {
                    warn!("Failed to update tooltip: {}", e);
                }
            }
        }
    }

    impl eframe::App for MenuBarApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            self.drain_events(ctx);

            if self.viewport_visible {
                self.popover.show(ctx, &self.state);
                for action in self.popover.take_actions() {
                    self.state.handle_action(action);
                }

                // Clicking elsewhere dismisses the popover
                match ctx.input(|i| i.viewport().focused) {
                    Some(true) => self.had_focus = true,
                    Some(false) if self.had_focus => {
                        self.had_focus = false;
                        self.state.hide_popover();
                    }
                    _ => {}
                }
            }

            if self.state.should_exit {
                info!("Quitting");
                self.tray.destroy();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }

            self.sync_viewport(ctx);

            let next = self
                .state
                .next_tick_in(Instant::now())
                .map_or(IDLE_REPAINT, |due| due.min(IDLE_REPAINT));
            ctx.request_repaint_after(next);
        }
    }
}
