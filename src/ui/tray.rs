//! Menu bar icon management.
//!
//! Manages the menu bar icon, tooltip, and dropdown menu.

use thiserror::Error;

/// Initial state for the menu bar icon.
#[derive(Debug, Clone)]
pub struct TrayState {
    /// Tooltip text (current output device)
    pub tooltip: String,
}

impl Default for TrayState {
    fn default() -> Self {
        Self {
            tooltip: "AudioToggle".to_string(),
        }
    }
}

/// Events from the menu bar icon.
#[derive(Debug, Clone)]
pub enum TrayEvent {
    /// Left-click on the icon
    LeftClick {
        /// Icon bounding rectangle (for popover positioning)
        rect: Rect,
        /// Mouse position
        position: Position,
    },

    /// Menu item selected
    MenuItemClicked { id: MenuItemId },
}

/// Menu item identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    CycleOutput,
    Quit,
}

/// Rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn center(&self) -> Position {
        Position {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }
}

/// Position in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to load icon resource: {0}")]
    IconLoadFailed(String),

    #[error("Tray icon not initialized")]
    NotInitialized,

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),
}

#[cfg(target_os = "macos")]
pub use self::macos::TrayManager;

#[cfg(target_os = "macos")]
mod macos {
    use super::{MenuItemId, Position, Rect, TrayError, TrayEvent, TrayState};
    use crate::platform::icons;
    use std::sync::mpsc::{channel, Receiver, Sender};
    use std::sync::Arc;
    use tray_icon::{
        menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
        MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
    };

    impl From<tray_icon::Rect> for Rect {
        fn from(r: tray_icon::Rect) -> Self {
            Self {
                left: r.position.x,
                top: r.position.y,
                right: r.position.x + r.size.width as f64,
                bottom: r.position.y + r.size.height as f64,
            }
        }
    }

    impl From<tray_icon::dpi::PhysicalPosition<f64>> for Position {
        fn from(p: tray_icon::dpi::PhysicalPosition<f64>) -> Self {
            Self { x: p.x, y: p.y }
        }
    }

    /// Menu bar icon manager. Must live on the main thread.
    pub struct TrayManager {
        tray_icon: Option<TrayIcon>,
        event_sender: Sender<TrayEvent>,
        event_receiver: Receiver<TrayEvent>,
    }

    impl TrayManager {
        pub fn new() -> Self {
            let (sender, receiver) = channel();
            Self {
                tray_icon: None,
                event_sender: sender,
                event_receiver: receiver,
            }
        }

        /// Create and show the menu bar icon. `wake` is called from the
        /// event handlers after an event has been queued.
        pub fn create(
            &mut self,
            initial_state: TrayState,
            wake: impl Fn() + Send + Sync + 'static,
        ) -> Result<(), TrayError> {
            let icon = icons::create_tray_icon().map_err(TrayError::IconLoadFailed)?;

            let menu = Menu::new();

            let cycle_item = MenuItem::new("Cycle Output", true, None);
            menu.append(&cycle_item)
                .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

            menu.append(&PredefinedMenuItem::separator())
                .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

            let quit_item = MenuItem::new("Quit", true, None);
            menu.append(&quit_item)
                .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

            // Left click opens the popover, the menu stays on right click
            let tray_icon = TrayIconBuilder::new()
                .with_icon(icon)
                .with_icon_as_template(true)
                .with_menu_on_left_click(false)
                .with_tooltip(&initial_state.tooltip)
                .with_menu(Box::new(menu))
                .build()
                .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

            self.tray_icon = Some(tray_icon);
            self.install_handlers(cycle_item.id().clone(), quit_item.id().clone(), wake);

            Ok(())
        }

        fn install_handlers(
            &self,
            cycle_id: MenuId,
            quit_id: MenuId,
            wake: impl Fn() + Send + Sync + 'static,
        ) {
            let wake = Arc::new(wake);

            let sender = self.event_sender.clone();
            let wake_click = Arc::clone(&wake);
            TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
                if let TrayIconEvent::Click {
                    button: MouseButton::Left,
                    button_state: MouseButtonState::Up,
                    rect,
                    position,
                    ..
                } = event
                {
                    let _ = sender.send(TrayEvent::LeftClick {
                        rect: rect.into(),
                        position: position.into(),
                    });
                    wake_click();
                }
            }));

            let sender = self.event_sender.clone();
            MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
                let id = if event.id == cycle_id {
                    MenuItemId::CycleOutput
                } else if event.id == quit_id {
                    MenuItemId::Quit
                } else {
                    return;
                };
                let _ = sender.send(TrayEvent::MenuItemClicked { id });
                wake();
            }));
        }

        /// Get the event receiver for tray events.
        pub fn events(&self) -> &Receiver<TrayEvent> {
            &self.event_receiver
        }

        /// Update the tooltip text.
        pub fn set_tooltip(&mut self, text: &str) -> Result<(), TrayError> {
            let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
            tray.set_tooltip(Some(text))
                .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
            Ok(())
        }

        /// Remove the icon from the menu bar and drop the event handlers.
        pub fn destroy(&mut self) {
            TrayIconEvent::set_event_handler(None::<fn(TrayIconEvent)>);
            MenuEvent::set_event_handler(None::<fn(MenuEvent)>);
            self.tray_icon = None;
        }
    }

    impl Default for TrayManager {
        fn default() -> Self {
            Self::new()
        }
    }
}
