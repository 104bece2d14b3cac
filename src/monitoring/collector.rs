/*!
 * Event Collector
 * Bounded in-memory ring buffer for scheduling events
 */

use super::events::{Event, Severity};
use parking_lot::Mutex;
use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 1024;

/// Collects events emitted by the policy core.
///
/// Oldest events are dropped once the buffer is full; the scheduler never
/// blocks on observability.
pub struct Collector {
    buffer: Mutex<VecDeque<Event>>,
    capacity: usize,
    min_severity: Severity,
}

impl Collector {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity: capacity.max(1),
            min_severity: Severity::Debug,
        }
    }

    /// Drop events below this severity at emission time
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Record an event (primary API)
    #[inline]
    pub fn emit(&self, event: Event) {
        if event.severity < self.min_severity {
            return;
        }
        let mut buffer = self.buffer.lock();
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Most recent `n` events, oldest first
    pub fn recent(&self, n: usize) -> Vec<Event> {
        let buffer = self.buffer.lock();
        let skip = buffer.len().saturating_sub(n);
        buffer.iter().skip(skip).cloned().collect()
    }

    /// Take every buffered event, clearing the buffer
    pub fn drain(&self) -> Vec<Event> {
        self.buffer.lock().drain(..).collect()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
