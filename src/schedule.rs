//! Cancellable last-write-wins debounce for codec invocations
//!
//! Models the "decode in Δt, cancelling any previously scheduled decode" timer
//! explicitly: a [`Debounce`] holds at most one pending value plus its
//! deadline. Scheduling replaces any pending value outright, so only the last
//! scheduled input ever fires. The host's event loop drives it by calling
//! [`Debounce::poll`]; no threads or timers are spawned here.

use instant::Instant;
use std::time::Duration;

/// Suggested delay before decoding raw input changes
pub const DECODE_DELAY: Duration = Duration::from_millis(300);

/// Suggested delay before re-encoding edited paths
pub const ENCODE_DELAY: Duration = Duration::from_millis(500);

/// At most one pending value with a deadline
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `input` to fire after the configured delay
    ///
    /// Replaces any pending input: last write wins.
    pub fn schedule(&mut self, input: T) {
        self.pending = Some((input, Instant::now() + self.delay));
    }

    /// Drop the pending input, if any
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending input if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now);
        if due {
            self.pending.take().map(|(input, _)| input)
        } else {
            None
        }
    }
}
