//! Device change notifications using CoreAudio property listeners.
//!
//! Listens on the system object for device list and default output changes
//! and forwards them to a channel. Callbacks arrive on a CoreAudio thread, so
//! nothing here touches application state.

use super::device::{AudioError, DeviceEvent};
use super::enumerator::{DEFAULT_OUTPUT_DEVICE_ADDRESS, DEVICES_ADDRESS};
use coreaudio_sys::{
    kAudioHardwarePropertyDevices, kAudioObjectSystemObject, AudioObjectAddPropertyListener,
    AudioObjectID, AudioObjectPropertyAddress, AudioObjectRemovePropertyListener, OSStatus,
};
use std::ffi::c_void;
use std::sync::mpsc::Sender;
use tracing::warn;

const LISTENED_ADDRESSES: [AudioObjectPropertyAddress; 2] =
    [DEVICES_ADDRESS, DEFAULT_OUTPUT_DEVICE_ADDRESS];

type Waker = Box<dyn Fn() + Send + Sync>;

struct ListenerContext {
    sender: Sender<DeviceEvent>,
    wake: Waker,
}

/// Registered CoreAudio listeners. Unregisters on drop.
pub struct DeviceListener {
    context: *mut ListenerContext,
    registered: Vec<AudioObjectPropertyAddress>,
}

impl DeviceListener {
    /// Register listeners that send events to `sender` and then call `wake`
    /// so the UI loop picks them up.
    pub fn register(
        sender: Sender<DeviceEvent>,
        wake: impl Fn() + Send + Sync + 'static,
    ) -> Result<Self, AudioError> {
        let context = Box::into_raw(Box::new(ListenerContext {
            sender,
            wake: Box::new(wake),
        }));
        let mut listener = Self {
            context,
            registered: Vec::new(),
        };

        for address in LISTENED_ADDRESSES {
            let status = unsafe {
                AudioObjectAddPropertyListener(
                    kAudioObjectSystemObject as AudioObjectID,
                    &address,
                    Some(on_property_changed),
                    context as *mut c_void,
                )
            };
            if status != 0 {
                // Drop removes whatever was already registered
                return Err(AudioError::ListenerFailed(status));
            }
            listener.registered.push(address);
        }

        Ok(listener)
    }
}

impl Drop for DeviceListener {
    fn drop(&mut self) {
        for address in &self.registered {
            let status = unsafe {
                AudioObjectRemovePropertyListener(
                    kAudioObjectSystemObject as AudioObjectID,
                    address,
                    Some(on_property_changed),
                    self.context as *mut c_void,
                )
            };
            if status != 0 {
                warn!("Failed to remove device listener (OSStatus {})", status);
            }
        }

        unsafe {
            drop(Box::from_raw(self.context));
        }
    }
}

unsafe extern "C" fn on_property_changed(
    _object_id: AudioObjectID,
    address_count: u32,
    addresses: *const AudioObjectPropertyAddress,
    client_data: *mut c_void,
) -> OSStatus {
    if client_data.is_null() || addresses.is_null() {
        return 0;
    }

    let context = &*(client_data as *const ListenerContext);
    let addresses = std::slice::from_raw_parts(addresses, address_count as usize);

    for address in addresses {
        let event = if address.mSelector == kAudioHardwarePropertyDevices {
            DeviceEvent::DeviceListChanged
        } else {
            DeviceEvent::DefaultOutputChanged
        };
        let _ = context.sender.send(event);
    }

    (context.wake)();
    0
}
