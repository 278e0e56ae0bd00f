use std::time::{Duration, Instant};

/// Last-write-wins buffer for high-frequency updates.
///
/// Only the most recent pushed value is kept; it is handed out when the flush
/// interval has elapsed since the previous flush, or when the owner flushes
/// explicitly (for example on pointer release).
#[derive(Debug)]
pub struct UpdateCoalescer<T> {
    interval: Duration,
    pending: Option<T>,
    last_flush: Option<Instant>,
    superseded: u64,
}

impl<T> UpdateCoalescer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            last_flush: None,
            superseded: 0,
        }
    }

    /// Queue `update`, replacing any pending value. Returns the value to emit
    /// now if the interval has elapsed.
    pub fn push(&mut self, update: T, now: Instant) -> Option<T> {
        if self.pending.replace(update).is_some() {
            self.superseded += 1;
        }
        self.poll(now)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        let due = self
            .last_flush
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due { self.flush(now) } else { None }
    }

    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let pending = self.pending.take()?;
        self.last_flush = Some(now);
        Some(pending)
    }

    /// Drop any pending value and forget the flush clock.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_flush = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Count of queued values that were replaced before being emitted.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
