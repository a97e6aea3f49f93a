//! Debounce
//!
//! Trailing-edge debounce for rapid input events. A new `schedule` cancels
//! the pending payload and restarts the wait (cancel-and-reschedule, not
//! throttling), so only the latest payload is ever delivered. Deadlines are
//! driven by explicit timestamps; callers and tests control the clock.

use jiff::{SignedDuration, Timestamp};

/// Default wait applied to search input.
pub const DEFAULT_WAIT: SignedDuration = SignedDuration::from_millis(250);

#[derive(Debug, Clone)]
struct Pending<T> {
    payload: T,
    deadline: Timestamp,
}

/// Cancellable trailing-edge timer carrying one pending payload.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: SignedDuration,
    pending: Option<Pending<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT)
    }
}

impl<T> Debouncer<T> {
    /// A debouncer with the given wait.
    #[must_use]
    pub fn new(wait: SignedDuration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Replace any pending payload and restart the wait from `now`.
    pub fn schedule(&mut self, payload: T, now: Timestamp) {
        self.pending = Some(Pending {
            payload,
            // `saturating_add` only errors for `Span`s with calendar units,
            // which a `SignedDuration` can never carry.
            deadline: now.saturating_add(self.wait).unwrap_or(Timestamp::MAX),
        });
    }

    /// Drop the pending payload without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a payload is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deliver the pending payload once its deadline has passed.
    pub fn fire(&mut self, now: Timestamp) -> Option<T> {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.deadline <= now)
        {
            self.pending.take().map(|pending| pending.payload)
        } else {
            None
        }
    }
}
