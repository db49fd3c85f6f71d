//! Output device state holder.
//!
//! Mirrors the OS device list and default output device, switches the
//! default output and cycles through a caller-supplied list of devices.

use super::device::{AudioError, OutputDevice};
use super::system::AudioSystem;
use crate::platform::UserNotifier;
use tracing::{debug, info, warn};

/// Title used for "switched to" notifications.
const NOTIFICATION_TITLE: &str = "Audio Output";

/// State changes published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The device list and current device were re-read from the OS
    DevicesRefreshed,

    /// The default output device was switched and verified
    DeviceSwitched(OutputDevice),
}

type Subscriber = Box<dyn FnMut(&AudioEvent)>;

/// Holds the output device list and the current default device.
pub struct AudioService {
    system: Box<dyn AudioSystem>,
    notifier: Box<dyn UserNotifier>,
    devices: Vec<OutputDevice>,
    current: Option<OutputDevice>,
    subscribers: Vec<Subscriber>,
}

impl AudioService {
    /// Create the service and load the initial device list.
    pub fn new(system: Box<dyn AudioSystem>, notifier: Box<dyn UserNotifier>) -> Self {
        let mut service = Self {
            system,
            notifier,
            devices: Vec::new(),
            current: None,
            subscribers: Vec::new(),
        };
        service.refresh();
        service
    }

    /// All output devices from the last refresh, in OS order.
    pub fn devices(&self) -> &[OutputDevice] {
        &self.devices
    }

    /// The current default output device, if it is in the device list.
    pub fn current_device(&self) -> Option<&OutputDevice> {
        self.current.as_ref()
    }

    /// Register a callback invoked after every state change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&AudioEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Ask the notifier for permission to post switch notifications.
    pub fn request_notification_permission(&mut self) {
        if let Err(e) = self.notifier.request_permission() {
            warn!("Notification permission not granted: {}", e);
        }
    }

    /// Re-enumerate output devices and recompute the current device.
    pub fn refresh(&mut self) {
        let devices = match self.system.output_devices() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Device refresh failed: {}", e);
                return;
            }
        };

        let default_uid = self.system.default_output_device_uid().unwrap_or_else(|e| {
            warn!("Failed to read default output device: {}", e);
            None
        });

        self.current = default_uid
            .and_then(|uid| devices.iter().find(|d| d.uid == uid).cloned());
        self.devices = devices;

        debug!(
            devices = self.devices.len(),
            current = ?self.current.as_ref().map(|d| d.uid.as_str()),
            "Refreshed output devices"
        );
        self.emit(AudioEvent::DevicesRefreshed);
    }

    /// Make `device` the default output. Failures are logged and leave the
    /// current device unchanged.
    pub fn set_output_device(&mut self, device: &OutputDevice) -> Result<(), AudioError> {
        match self.switch_to(device) {
            Ok(target) => {
                info!("Switched output to {}", target.name);
                self.current = Some(target.clone());
                self.post_switch_notification(&target);
                self.emit(AudioEvent::DeviceSwitched(target));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to set output device {}: {}", device.name, e);
                Err(e)
            }
        }
    }

    /// Switch to the device after the current one in `candidates`.
    ///
    /// Returns the device switched to, or None if nothing changed.
    pub fn cycle_next(&mut self, candidates: &[OutputDevice]) -> Option<OutputDevice> {
        let target = match next_in_cycle(candidates, self.current.as_ref()) {
            Some(target) => target.clone(),
            None => {
                info!("No devices selected for cycling");
                return None;
            }
        };

        if candidates.len() == 1 && self.current.as_ref() == Some(&target) {
            debug!("Only selected device is already current");
            return None;
        }

        self.set_output_device(&target).ok()?;
        Some(target)
    }

    fn switch_to(&self, device: &OutputDevice) -> Result<OutputDevice, AudioError> {
        // Resolve against a fresh enumeration, the object ID may have changed
        let target = self
            .system
            .output_devices()?
            .into_iter()
            .find(|d| d.uid == device.uid)
            .ok_or_else(|| AudioError::DeviceNotFound {
                uid: device.uid.clone(),
            })?;

        self.system.set_default_output_device(target.object_id)?;

        let actual = self.system.default_output_device_uid()?;
        if actual.as_deref() != Some(target.uid.as_str()) {
            return Err(AudioError::SwitchVerificationFailed {
                requested: target.uid,
                actual,
            });
        }

        Ok(target)
    }

    fn post_switch_notification(&self, device: &OutputDevice) {
        let body = format!("Switched to {}", device.display_name());
        if let Err(e) = self.notifier.notify(NOTIFICATION_TITLE, &body) {
            warn!("Failed to show notification: {}", e);
        }
    }

    fn emit(&mut self, event: AudioEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

/// Pick the device that follows `current` in `candidates`.
///
/// Wraps to the first candidate when `current` is missing from the list or
/// undefined. Returns None only for an empty list.
pub fn next_in_cycle<'a>(
    candidates: &'a [OutputDevice],
    current: Option<&OutputDevice>,
) -> Option<&'a OutputDevice> {
    let position = current.and_then(|current| candidates.iter().position(|d| d == current));

    match position {
        Some(index) => candidates.get((index + 1) % candidates.len()),
        None => candidates.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{device, FakeAudioSystem, RecordingNotifier};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn abc() -> Vec<OutputDevice> {
        vec![device(1, "a", "A"), device(2, "b", "B"), device(3, "c", "C")]
    }

    fn service_with(
        devices: Vec<OutputDevice>,
        default: Option<&str>,
    ) -> (AudioService, FakeAudioSystem, RecordingNotifier) {
        let system = FakeAudioSystem::new(devices, default);
        let notifier = RecordingNotifier::default();
        let service = AudioService::new(Box::new(system.clone()), Box::new(notifier.clone()));
        (service, system, notifier)
    }

    #[test]
    fn test_next_in_cycle_advances_modulo_length() {
        let list = abc();
        for (i, current) in list.iter().enumerate() {
            let next = next_in_cycle(&list, Some(current)).unwrap();
            assert_eq!(next, &list[(i + 1) % list.len()]);
        }
    }

    #[test]
    fn test_next_in_cycle_wraps_to_first_when_current_absent() {
        let list = abc();
        let stranger = device(9, "z", "Z");
        assert_eq!(next_in_cycle(&list, Some(&stranger)), list.first());
        assert_eq!(next_in_cycle(&list, None), list.first());
        assert_eq!(next_in_cycle(&[], None), None);
    }

    #[test]
    fn test_refresh_resolves_current_by_uid() {
        let (service, _, _) = service_with(abc(), Some("b"));
        assert_eq!(service.devices().len(), 3);
        assert_eq!(service.current_device().map(|d| d.uid.as_str()), Some("b"));
    }

    #[test]
    fn test_refresh_with_unknown_default_has_no_current() {
        let (service, _, _) = service_with(abc(), Some("gone"));
        assert!(service.current_device().is_none());
    }

    #[test]
    fn test_cycle_from_middle_goes_to_next() {
        let (mut service, system, notifier) = service_with(abc(), Some("b"));
        let candidates = service.devices().to_vec();

        let target = service.cycle_next(&candidates);

        assert_eq!(target.map(|d| d.uid), Some("c".to_string()));
        assert_eq!(system.default_uid().as_deref(), Some("c"));
        assert_eq!(service.current_device().map(|d| d.uid.as_str()), Some("c"));
        assert_eq!(notifier.bodies(), vec!["Switched to C".to_string()]);
    }

    #[test]
    fn test_cycle_with_current_not_selected_goes_to_first() {
        let (mut service, system, _) =
            service_with(vec![device(1, "a", "A"), device(2, "b", "B")], Some("b"));
        let candidates = vec![device(1, "a", "A")];

        let target = service.cycle_next(&candidates);

        assert_eq!(target.map(|d| d.uid), Some("a".to_string()));
        assert_eq!(system.default_uid().as_deref(), Some("a"));
    }

    #[test]
    fn test_cycle_empty_is_noop() {
        let (mut service, system, notifier) = service_with(abc(), Some("a"));

        assert!(service.cycle_next(&[]).is_none());
        assert!(system.set_calls().is_empty());
        assert!(notifier.bodies().is_empty());
    }

    #[test]
    fn test_cycle_single_entry_already_current_is_noop() {
        let (mut service, system, notifier) = service_with(abc(), Some("a"));

        assert!(service.cycle_next(&[device(1, "a", "A")]).is_none());
        assert!(system.set_calls().is_empty());
        assert!(notifier.bodies().is_empty());
    }

    #[test]
    fn test_cycle_wraps_from_last() {
        let (mut service, _, _) = service_with(abc(), Some("c"));
        let candidates = service.devices().to_vec();
        assert_eq!(service.cycle_next(&candidates).map(|d| d.uid), Some("a".to_string()));
    }

    #[test]
    fn test_set_device_uses_fresh_object_id() {
        let (mut service, system, _) = service_with(abc(), Some("a"));
        // Device reconnected with a new object ID
        system.set_devices(vec![device(1, "a", "A"), device(42, "b", "B")]);

        service.set_output_device(&device(2, "b", "B")).unwrap();

        assert_eq!(system.set_calls(), vec![42]);
        assert_eq!(service.current_device().map(|d| d.object_id), Some(42));
    }

    #[test]
    fn test_set_missing_device_is_not_found() {
        let (mut service, system, notifier) = service_with(abc(), Some("a"));

        let result = service.set_output_device(&device(7, "gone", "Gone"));

        assert!(matches!(result, Err(AudioError::DeviceNotFound { .. })));
        assert!(system.set_calls().is_empty());
        assert!(notifier.bodies().is_empty());
    }

    #[test]
    fn test_failed_verification_leaves_state_unchanged() {
        let (mut service, system, notifier) = service_with(abc(), Some("a"));
        system.ignore_switches(true);

        let result = service.set_output_device(&device(3, "c", "C"));

        assert!(matches!(
            result,
            Err(AudioError::SwitchVerificationFailed { .. })
        ));
        assert_eq!(service.current_device().map(|d| d.uid.as_str()), Some("a"));
        assert!(notifier.bodies().is_empty());
    }

    #[test]
    fn test_subscribers_see_refresh_and_switch() {
        let (mut service, _, _) = service_with(abc(), Some("a"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        service.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        service.refresh();
        service.set_output_device(&device(2, "b", "B")).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                AudioEvent::DevicesRefreshed,
                AudioEvent::DeviceSwitched(device(2, "b", "B")),
            ]
        );
    }

    #[test]
    fn test_enumeration_failure_keeps_previous_list() {
        let (mut service, system, _) = service_with(abc(), Some("a"));
        system.fail_enumeration(true);

        service.refresh();

        assert_eq!(service.devices().len(), 3);
    }

    #[test]
    fn test_notification_uses_display_name() {
        let (mut service, _, notifier) = service_with(
            vec![device(1, "a", "A"), device(2, "spk", "MacBook Pro Speakers")],
            Some("a"),
        );

        service.set_output_device(&device(2, "spk", "")).unwrap();

        assert_eq!(notifier.bodies(), vec!["Switched to MacBook Pro".to_string()]);
    }
}
