//! Audio device data models.
//!
//! Defines the output device record, the events raised by the OS audio
//! layer and the audio error type.

use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Suffixes trimmed from device names before display.
const DISPLAY_SUFFIXES: [&str; 4] = [" - Front", " - Rear", " Audio", " Speakers"];

/// An audio output device as reported by the OS.
///
/// Equality and hashing use the UID only, so a device that reconnects with a
/// new object ID still compares equal to its previous record.
#[derive(Debug, Clone)]
pub struct OutputDevice {
    /// Stable hardware UID (survives reconnects)
    pub uid: String,

    /// Device name as reported by CoreAudio
    pub name: String,

    /// Transient CoreAudio AudioObjectID
    pub object_id: u32,
}

impl OutputDevice {
    /// Create a new OutputDevice.
    pub fn new(object_id: u32, uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            object_id,
        }
    }

    /// Name with common clutter suffixes removed, for UI and notifications.
    pub fn display_name(&self) -> String {
        let mut cleaned = self.name.as_str();

        for suffix in DISPLAY_SUFFIXES {
            if cleaned.ends_with(suffix)
                && cleaned.chars().count() > suffix.chars().count() + 3
            {
                cleaned = &cleaned[..cleaned.len() - suffix.len()];
            }
        }

        cleaned.to_string()
    }
}

impl PartialEq for OutputDevice {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for OutputDevice {}

impl Hash for OutputDevice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

/// Change notifications from the OS audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device was connected or disconnected
    DeviceListChanged,

    /// The default output device changed
    DefaultOutputChanged,
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Device not found: {uid}")]
    DeviceNotFound { uid: String },

    #[error("Default output is {actual:?} after switching to {requested}")]
    SwitchVerificationFailed {
        requested: String,
        actual: Option<String>,
    },

    #[error("Failed to enumerate devices (OSStatus {0})")]
    Enumeration(i32),

    #[error("Failed to set default device (OSStatus {0})")]
    SetDefaultFailed(i32),

    #[error("Failed to register device listener (OSStatus {0})")]
    ListenerFailed(i32),

    #[error("Audio device control is not supported on this platform")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_uses_uid_only() {
        let a = OutputDevice::new(41, "BuiltInSpeakerDevice", "MacBook Pro Speakers");
        let b = OutputDevice::new(97, "BuiltInSpeakerDevice", "MACBOOK PRO SPEAKERS");
        let c = OutputDevice::new(41, "AirPods-UID", "MacBook Pro Speakers");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_name_strips_suffixes() {
        let device = OutputDevice::new(1, "uid", "MacBook Pro Speakers");
        assert_eq!(device.display_name(), "MacBook Pro");

        let device = OutputDevice::new(1, "uid", "Realtek Audio - Front");
        assert_eq!(device.display_name(), "Realtek");

        let device = OutputDevice::new(1, "uid", "External Headphones");
        assert_eq!(device.display_name(), "External Headphones");
    }

    #[test]
    fn test_display_name_keeps_short_names() {
        // Too short to strip without leaving a stub
        let device = OutputDevice::new(1, "uid", "HD Audio");
        assert_eq!(device.display_name(), "HD Audio");
    }
}
