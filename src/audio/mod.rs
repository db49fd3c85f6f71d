//! Audio module for CoreAudio output device interactions.
//!
//! This module provides output device enumeration, default device switching,
//! cycling, and debounced device change notifications.

pub mod debounce;
pub mod device;
pub mod service;
pub mod system;

#[cfg(target_os = "macos")]
pub mod enumerator;
#[cfg(target_os = "macos")]
pub mod notifications;

pub use debounce::{Debouncer, DEVICE_EVENT_DEBOUNCE};
pub use device::{AudioError, DeviceEvent, OutputDevice};
pub use service::{next_in_cycle, AudioEvent, AudioService};
pub use system::{create_backend, AudioSystem};

#[cfg(target_os = "macos")]
pub use enumerator::CoreAudioSystem;
#[cfg(target_os = "macos")]
pub use notifications::DeviceListener;
