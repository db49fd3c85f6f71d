//! Abstraction over the OS audio subsystem.
//!
//! The audio service only talks to this trait, so the CoreAudio backend can be
//! swapped for an in-memory one in tests.

use super::device::{AudioError, OutputDevice};

/// Source of truth for output devices and the default output device.
pub trait AudioSystem {
    /// Enumerate all output devices, in OS order.
    fn output_devices(&self) -> Result<Vec<OutputDevice>, AudioError>;

    /// UID of the current default output device, if any.
    fn default_output_device_uid(&self) -> Result<Option<String>, AudioError>;

    /// Ask the OS to make the given device the default output.
    fn set_default_output_device(&self, object_id: u32) -> Result<(), AudioError>;
}

/// Create the audio backend for the current platform.
pub fn create_backend() -> Result<Box<dyn AudioSystem>, AudioError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(super::enumerator::CoreAudioSystem::new()))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(AudioError::Unsupported)
    }
}
