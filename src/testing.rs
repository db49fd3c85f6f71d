//! In-memory stand-ins for the OS services, shared by unit tests.

use crate::audio::{AudioError, AudioSystem, OutputDevice};
use crate::platform::{HotkeyBackend, HotkeyError, NotifyError, UserNotifier};
use global_hotkey::hotkey::HotKey;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub fn device(object_id: u32, uid: &str, name: &str) -> OutputDevice {
    OutputDevice::new(object_id, uid, name)
}

#[derive(Default)]
struct FakeAudioState {
    devices: RefCell<Vec<OutputDevice>>,
    default_uid: RefCell<Option<String>>,
    set_calls: RefCell<Vec<u32>>,
    ignore_switches: Cell<bool>,
    fail_enumeration: Cell<bool>,
}

/// Audio system whose default device follows `set_default_output_device`.
#[derive(Clone, Default)]
pub struct FakeAudioSystem {
    state: Rc<FakeAudioState>,
}

impl FakeAudioSystem {
    pub fn new(devices: Vec<OutputDevice>, default_uid: Option<&str>) -> Self {
        let system = Self::default();
        system.set_devices(devices);
        *system.state.default_uid.borrow_mut() = default_uid.map(str::to_string);
        system
    }

    pub fn set_devices(&self, devices: Vec<OutputDevice>) {
        *self.state.devices.borrow_mut() = devices;
    }

    pub fn set_default_uid(&self, uid: Option<&str>) {
        *self.state.default_uid.borrow_mut() = uid.map(str::to_string);
    }

    pub fn default_uid(&self) -> Option<String> {
        self.state.default_uid.borrow().clone()
    }

    pub fn set_calls(&self) -> Vec<u32> {
        self.state.set_calls.borrow().clone()
    }

    /// Accept set calls without changing the default device.
    pub fn ignore_switches(&self, ignore: bool) {
        self.state.ignore_switches.set(ignore);
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.state.fail_enumeration.set(fail);
    }
}

impl AudioSystem for FakeAudioSystem {
    fn output_devices(&self) -> Result<Vec<OutputDevice>, AudioError> {
        if self.state.fail_enumeration.get() {
            return Err(AudioError::Enumeration(-1));
        }
        Ok(self.state.devices.borrow().clone())
    }

    fn default_output_device_uid(&self) -> Result<Option<String>, AudioError> {
        Ok(self.default_uid())
    }

    fn set_default_output_device(&self, object_id: u32) -> Result<(), AudioError> {
        self.state.set_calls.borrow_mut().push(object_id);
        if self.state.ignore_switches.get() {
            return Ok(());
        }

        let uid = self
            .state
            .devices
            .borrow()
            .iter()
            .find(|d| d.object_id == object_id)
            .map(|d| d.uid.clone());
        *self.state.default_uid.borrow_mut() = uid;
        Ok(())
    }
}

/// Notifier that records message bodies.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    bodies: Rc<RefCell<Vec<String>>>,
    permission_requests: Rc<Cell<usize>>,
}

impl RecordingNotifier {
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.borrow().clone()
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.get()
    }
}

impl UserNotifier for RecordingNotifier {
    fn request_permission(&mut self) -> Result<(), NotifyError> {
        self.permission_requests.set(self.permission_requests.get() + 1);
        Ok(())
    }

    fn notify(&self, _title: &str, body: &str) -> Result<(), NotifyError> {
        self.bodies.borrow_mut().push(body.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeHotkeyState {
    registered: RefCell<Vec<HotKey>>,
    fail_registration: Cell<bool>,
}

/// Hotkey backend that records what is currently registered.
#[derive(Clone, Default)]
pub struct FakeHotkeyBackend {
    state: Rc<FakeHotkeyState>,
}

impl FakeHotkeyBackend {
    pub fn registered(&self) -> Vec<HotKey> {
        self.state.registered.borrow().clone()
    }

    pub fn fail_registration(&self, fail: bool) {
        self.state.fail_registration.set(fail);
    }
}

impl HotkeyBackend for FakeHotkeyBackend {
    fn register(&mut self, hotkey: &HotKey) -> Result<u32, HotkeyError> {
        if self.state.fail_registration.get() {
            return Err(HotkeyError::RegisterFailed("already taken".to_string()));
        }
        self.state.registered.borrow_mut().push(*hotkey);
        Ok(hotkey.id())
    }

    fn unregister(&mut self, id: u32) -> Result<(), HotkeyError> {
        self.state.registered.borrow_mut().retain(|h| h.id() != id);
        Ok(())
    }
}
