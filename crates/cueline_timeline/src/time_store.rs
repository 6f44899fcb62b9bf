// SPDX-License-Identifier: MIT OR Apache-2.0
//! Current time and duration of one editing surface.
//!
//! The two values are linked: the current time never exceeds the duration,
//! and the current-time domain's `max` always equals the duration.

use crate::config::{self, TimelineConfig};
use crate::domain::{validate, NumericDomain};
use crate::number_field::ValueBinding;

/// Linked current-time and duration domains
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDomainStore {
    current_time: f64,
    current_time_domain: NumericDomain,
    duration_time: f64,
    duration_time_domain: NumericDomain,
}

impl TimeDomainStore {
    /// Build a store from a duration domain and a current-time domain.
    ///
    /// The current-time domain's `max` is replaced by the initial duration.
    /// Initial values default to the duration max and the current-time min.
    pub fn new(
        duration_time_domain: NumericDomain,
        current_time_domain: NumericDomain,
        initial_duration_time: Option<f64>,
        initial_current_time: Option<f64>,
    ) -> Self {
        let duration_time = validate(
            initial_duration_time.unwrap_or(duration_time_domain.max()),
            &duration_time_domain,
        )
        .result;
        let current_time_domain = current_time_domain.with_max(duration_time);
        let current_time = validate(
            initial_current_time.unwrap_or(current_time_domain.min()),
            &current_time_domain,
        )
        .result;

        Self {
            current_time,
            current_time_domain,
            duration_time,
            duration_time_domain,
        }
    }

    /// Build a store from timeline settings
    pub fn from_config(config: &TimelineConfig) -> config::Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.duration,
            config.current_time_domain()?,
            config.initial_duration_time,
            config.initial_current_time,
        ))
    }

    /// Current time
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Domain of the current time (`max` tracks the duration)
    pub fn current_time_domain(&self) -> NumericDomain {
        self.current_time_domain
    }

    /// Duration
    pub fn duration_time(&self) -> f64 {
        self.duration_time
    }

    /// Domain of the duration
    pub fn duration_time_domain(&self) -> NumericDomain {
        self.duration_time_domain
    }

    /// Set the current time, validated against the current-time domain
    pub fn set_current_time(&mut self, value: f64) {
        let value = validate(value, &self.current_time_domain).result;
        if value != self.current_time {
            tracing::trace!(value, "Current time changed");
            self.current_time = value;
        }
    }

    /// Set the duration, then re-clamp the current time and its domain
    pub fn set_duration_time(&mut self, value: f64) {
        let value = validate(value, &self.duration_time_domain).result;
        self.duration_time = value;
        self.current_time_domain = self.current_time_domain.with_max(value);
        self.current_time = self.current_time.min(value);
        tracing::debug!(
            duration = value,
            current = self.current_time,
            "Duration changed"
        );
    }

    /// Binding for a field editing the current time
    pub fn current_time_binding(&mut self) -> CurrentTimeBinding<'_> {
        CurrentTimeBinding { store: self }
    }

    /// Binding for a field editing the duration
    pub fn duration_binding(&mut self) -> DurationBinding<'_> {
        DurationBinding { store: self }
    }
}

/// [`ValueBinding`] over the store's current time
pub struct CurrentTimeBinding<'a> {
    store: &'a mut TimeDomainStore,
}

impl ValueBinding for CurrentTimeBinding<'_> {
    fn value(&self) -> f64 {
        self.store.current_time
    }

    fn domain(&self) -> NumericDomain {
        self.store.current_time_domain
    }

    fn commit(&mut self, value: f64) {
        self.store.set_current_time(value);
    }
}

/// [`ValueBinding`] over the store's duration
pub struct DurationBinding<'a> {
    store: &'a mut TimeDomainStore,
}

impl ValueBinding for DurationBinding<'_> {
    fn value(&self) -> f64 {
        self.store.duration_time
    }

    fn domain(&self) -> NumericDomain {
        self.store.duration_time_domain
    }

    fn commit(&mut self, value: f64) {
        self.store.set_duration_time(value);
    }
}
