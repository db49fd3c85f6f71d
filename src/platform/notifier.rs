//! Transient user notifications ("Switched to X").
//!
//! Delivery is fire-and-forget: results are only logged.

use thiserror::Error;

/// Notification error types.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification permission not granted: {0}")]
    PermissionDenied(String),

    #[error("Failed to deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Channel for short user-facing messages.
pub trait UserNotifier {
    /// One-time permission request at launch.
    fn request_permission(&mut self) -> Result<(), NotifyError>;

    /// Post a notification without waiting for it to be shown.
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

#[cfg(target_os = "macos")]
pub use self::macos::MacNotifier;

#[cfg(target_os = "macos")]
mod macos {
    use super::{NotifyError, UserNotifier};
    use tracing::{debug, warn};

    const APP_NAME: &str = "AudioToggle";

    /// Notification Center delivery through `mac-notification-sys`.
    #[derive(Debug, Default)]
    pub struct MacNotifier {
        authorized: bool,
    }

    impl MacNotifier {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl UserNotifier for MacNotifier {
        fn request_permission(&mut self) -> Result<(), NotifyError> {
            let bundle = mac_notification_sys::get_bundle_identifier_or_default(APP_NAME);
            match mac_notification_sys::set_application(&bundle) {
                Ok(()) => {
                    debug!("Notifications registered for {}", bundle);
                    self.authorized = true;
                    Ok(())
                }
                Err(e) => Err(NotifyError::PermissionDenied(e.to_string())),
            }
        }

        fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            if !self.authorized {
                return Err(NotifyError::PermissionDenied(
                    "notifications were not registered".to_string(),
                ));
            }

            let title = title.to_string();
            let body = body.to_string();
            std::thread::spawn(move || {
                if let Err(e) = mac_notification_sys::send_notification(&title, None, &body, None) {
                    warn!("{}", NotifyError::DeliveryFailed(e.to_string()));
                }
            });
            Ok(())
        }
    }
}
