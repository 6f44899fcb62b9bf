// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline scrubber controls for Cueline.
//!
//! This crate provides the interaction layer of a timeline surface:
//! - Numeric domains and value validation
//! - Editable number fields with deferred commit
//! - Throttled drag tracking for ruler scrubbing
//! - Scroll offset mirroring between panels
//! - Linked current-time/duration store
//!
//! ## Architecture
//!
//! Everything except [`ui`] is plain state driven by explicit events, so it
//! can be tested without a window. [`ui`] renders that state with egui.

pub mod config;
pub mod domain;
pub mod drag;
pub mod field_adapter;
pub mod number_field;
pub mod scroll_sync;
pub mod throttle;
pub mod time_store;
pub mod ui;

pub use config::{ConfigError, LayoutConfig, TimelineConfig, CONFIG_FILE_NAME};
pub use domain::{format_number, parse_number, validate, DomainError, NumericDomain, ValidationResult};
pub use drag::{scrub_time, DragFps, DragTracker, DragUpdate};
pub use field_adapter::{FieldEventAdapter, FieldKey, SurfaceEvent};
pub use number_field::{
    BlurKey, CommitReason, EditSession, EditableNumberField, FieldResponse, FieldState,
    ValueBinding,
};
pub use scroll_sync::{
    ScrollChange, ScrollOffset, ScrollSurface, ScrollSyncGroup, SurfaceId, SurfaceRegistry,
    SurfaceResolver,
};
pub use throttle::Throttle;
pub use time_store::{CurrentTimeBinding, DurationBinding, TimeDomainStore};
pub use ui::{NumberInput, NumberInputState, TimelinePanel};
