// SPDX-License-Identifier: MIT OR Apache-2.0
//! Leading/trailing throttle driven by an injected clock.

use std::time::{Duration, Instant};

/// Publishes at most one value per window.
///
/// The first value of a burst goes out immediately. Later values inside the
/// window replace each other; the latest one goes out when [`Throttle::poll`]
/// is called after the window has elapsed.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    last_fire: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
            pending: None,
        }
    }

    /// Minimum time between two published values
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Offer a value; returns it if it may be published now
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        let open = self
            .last_fire
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window);

        if open {
            self.pending = None;
            self.last_fire = Some(now);
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the trailing value once its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_fire = Some(now);
        self.pending.take()
    }

    /// When the trailing value is due, if one is waiting
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_fire) {
            (Some(_), Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    /// Whether a trailing value is waiting
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any waiting value and reopen the window
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_fire = None;
    }
}
