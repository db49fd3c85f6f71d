//! Device enumeration using the CoreAudio HAL.
//!
//! Reads the output device list and default output device from the system
//! audio object and sets the default output device.

use super::device::{AudioError, OutputDevice};
use super::system::AudioSystem;
use core_foundation::base::TCFType;
use core_foundation::string::{CFString, CFStringRef};
use coreaudio_sys::{
    kAudioDevicePropertyDeviceUID, kAudioDevicePropertyScopeOutput, kAudioDevicePropertyStreams,
    kAudioHardwarePropertyDefaultOutputDevice, kAudioHardwarePropertyDevices,
    kAudioObjectPropertyElementMaster, kAudioObjectPropertyName, kAudioObjectPropertyScopeGlobal,
    kAudioObjectSystemObject, AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize,
    AudioObjectID, AudioObjectPropertyAddress, AudioObjectSetPropertyData, OSStatus,
};
use std::ffi::c_void;
use std::mem;
use std::ptr;
use tracing::debug;

/// AudioObjectID reported when there is no device.
const UNKNOWN_OBJECT: AudioObjectID = 0;

pub(crate) const DEVICES_ADDRESS: AudioObjectPropertyAddress = AudioObjectPropertyAddress {
    mSelector: kAudioHardwarePropertyDevices,
    mScope: kAudioObjectPropertyScopeGlobal,
    mElement: kAudioObjectPropertyElementMaster,
};

pub(crate) const DEFAULT_OUTPUT_DEVICE_ADDRESS: AudioObjectPropertyAddress =
    AudioObjectPropertyAddress {
        mSelector: kAudioHardwarePropertyDefaultOutputDevice,
        mScope: kAudioObjectPropertyScopeGlobal,
        mElement: kAudioObjectPropertyElementMaster,
    };

const DEVICE_UID_ADDRESS: AudioObjectPropertyAddress = AudioObjectPropertyAddress {
    mSelector: kAudioDevicePropertyDeviceUID,
    mScope: kAudioObjectPropertyScopeGlobal,
    mElement: kAudioObjectPropertyElementMaster,
};

const NAME_ADDRESS: AudioObjectPropertyAddress = AudioObjectPropertyAddress {
    mSelector: kAudioObjectPropertyName,
    mScope: kAudioObjectPropertyScopeGlobal,
    mElement: kAudioObjectPropertyElementMaster,
};

const OUTPUT_STREAMS_ADDRESS: AudioObjectPropertyAddress = AudioObjectPropertyAddress {
    mSelector: kAudioDevicePropertyStreams,
    mScope: kAudioDevicePropertyScopeOutput,
    mElement: kAudioObjectPropertyElementMaster,
};

/// Output device access through the CoreAudio system object.
#[derive(Debug, Default)]
pub struct CoreAudioSystem;

impl CoreAudioSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert a device object into an OutputDevice. Devices without a UID
    /// cannot be persisted and are skipped.
    fn device_to_output(&self, object_id: AudioObjectID) -> Option<OutputDevice> {
        let uid = device_uid(object_id)?;
        let name = string_property(object_id, &NAME_ADDRESS)
            .unwrap_or_else(|| "Unknown".to_string());

        Some(OutputDevice::new(object_id, uid, name))
    }
}

impl AudioSystem for CoreAudioSystem {
    fn output_devices(&self) -> Result<Vec<OutputDevice>, AudioError> {
        let system = kAudioObjectSystemObject as AudioObjectID;

        let ids = unsafe {
            let size = property_size(system, &DEVICES_ADDRESS).map_err(AudioError::Enumeration)?;
            let count = size as usize / mem::size_of::<AudioObjectID>();
            let mut ids = vec![UNKNOWN_OBJECT; count];
            let mut size = (count * mem::size_of::<AudioObjectID>()) as u32;

            let status = AudioObjectGetPropertyData(
                system,
                &DEVICES_ADDRESS,
                0,
                ptr::null(),
                &mut size,
                ids.as_mut_ptr() as *mut c_void,
            );
            if status != 0 {
                return Err(AudioError::Enumeration(status));
            }

            ids.truncate(size as usize / mem::size_of::<AudioObjectID>());
            ids
        };

        let devices = ids
            .into_iter()
            .filter(|&id| has_output_streams(id))
            .filter_map(|id| self.device_to_output(id))
            .collect::<Vec<_>>();

        debug!("Enumerated {} output devices", devices.len());
        Ok(devices)
    }

    fn default_output_device_uid(&self) -> Result<Option<String>, AudioError> {
        let system = kAudioObjectSystemObject as AudioObjectID;
        let device: AudioObjectID = unsafe {
            get_property(system, &DEFAULT_OUTPUT_DEVICE_ADDRESS).map_err(AudioError::Enumeration)?
        };

        if device == UNKNOWN_OBJECT {
            return Ok(None);
        }

        Ok(device_uid(device))
    }

    fn set_default_output_device(&self, object_id: u32) -> Result<(), AudioError> {
        let system = kAudioObjectSystemObject as AudioObjectID;
        let status = unsafe {
            AudioObjectSetPropertyData(
                system,
                &DEFAULT_OUTPUT_DEVICE_ADDRESS,
                0,
                ptr::null(),
                mem::size_of::<AudioObjectID>() as u32,
                &object_id as *const AudioObjectID as *const c_void,
            )
        };

        if status != 0 {
            return Err(AudioError::SetDefaultFailed(status));
        }
        Ok(())
    }
}

fn device_uid(object_id: AudioObjectID) -> Option<String> {
    string_property(object_id, &DEVICE_UID_ADDRESS).filter(|uid| !uid.is_empty())
}

fn has_output_streams(object_id: AudioObjectID) -> bool {
    unsafe { property_size(object_id, &OUTPUT_STREAMS_ADDRESS) }
        .map(|size| size > 0)
        .unwrap_or(false)
}

/// Read a CFString property, taking ownership of the returned reference.
fn string_property(
    object_id: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Option<String> {
    unsafe {
        let value: coreaudio_sys::CFStringRef = get_property(object_id, address).ok()?;
        if value.is_null() {
            return None;
        }
        let value = CFString::wrap_under_create_rule(value as CFStringRef);
        Some(value.to_string())
    }
}

/// # Safety
/// `address` must describe a property on `object_id`.
unsafe fn property_size(
    object_id: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<u32, OSStatus> {
    let mut size = 0u32;
    let status = AudioObjectGetPropertyDataSize(object_id, address, 0, ptr::null(), &mut size);
    if status == 0 {
        Ok(size)
    } else {
        Err(status)
    }
}

/// # Safety
/// `T` must match the property's data layout and be valid when zeroed.
unsafe fn get_property<T>(
    object_id: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<T, OSStatus> {
    let mut value: T = mem::zeroed();
    let mut size = mem::size_of::<T>() as u32;
    let status = AudioObjectGetPropertyData(
        object_id,
        address,
        0,
        ptr::null(),
        &mut size,
        &mut value as *mut T as *mut c_void,
    );
    if status == 0 {
        Ok(value)
    } else {
        Err(status)
    }
}
