//! Coalescing of bursty device notifications.

use std::time::{Duration, Instant};

/// Window used for CoreAudio device notifications.
pub const DEVICE_EVENT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Accumulates events and reports a single flush once the stream goes quiet.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_event: Option<Instant>,
    pending: usize,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
            pending: 0,
        }
    }

    /// Record an event observed at `now`, restarting the window.
    pub fn record(&mut self, now: Instant) {
        self.last_event = Some(now);
        self.pending += 1;
    }

    /// Number of events waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// True once per burst, when no event arrived within the window.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.window => {
                self.last_event = None;
                self.pending = 0;
                true
            }
            _ => false,
        }
    }

    /// Time left until a pending burst is due, for scheduling repaints.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.last_event
            .map(|last| self.window.saturating_sub(now.saturating_duration_since(last)))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEVICE_EVENT_DEBOUNCE)
    }
}
