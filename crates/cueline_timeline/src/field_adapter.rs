// SPDX-License-Identifier: MIT OR Apache-2.0
//! Display-surface adapter for [`EditableNumberField`].
//!
//! Some surfaces cannot report "the stepper was clicked", only that a value
//! change followed a press. This adapter recognises the chain
//! `[pointer-or-arrow-down, value-change]` and turns it into a stepped
//! change. Surfaces that know better send [`SurfaceEvent::SteppedChange`]
//! directly and skip the heuristic.

use crate::domain::parse_number;
use crate::number_field::{CommitReason, EditableNumberField, FieldResponse, ValueBinding};

/// Keys the field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    /// Confirm
    Enter,
    /// Cancel
    Escape,
    /// Step up
    ArrowUp,
    /// Step down
    ArrowDown,
    /// Any other key
    Other,
}

/// Raw event from the display surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Field gained focus
    Focus,
    /// Field text changed
    TextChanged(String),
    /// Key pressed
    KeyDown(FieldKey),
    /// Key released
    KeyUp(FieldKey),
    /// Primary pointer pressed on the field
    PointerDown,
    /// Primary pointer released
    PointerUp,
    /// Field lost focus
    Blur,
    /// Surface-reported stepper/arrow change
    SteppedChange(f64),
}

/// Routes [`SurfaceEvent`]s into an [`EditableNumberField`]
#[derive(Debug, Clone, Default)]
pub struct FieldEventAdapter {
    pointer_armed: bool,
    arrow_armed: bool,
}

impl FieldEventAdapter {
    /// Create an adapter with no gesture in progress
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next text change will be treated as a stepped change
    pub fn is_armed(&self) -> bool {
        self.pointer_armed || self.arrow_armed
    }

    /// Apply one surface event to the field
    pub fn handle(
        &mut self,
        field: &mut EditableNumberField,
        binding: &mut impl ValueBinding,
        event: SurfaceEvent,
    ) -> FieldResponse {
        match event {
            SurfaceEvent::Focus => field.on_focus_gained(&*binding),
            SurfaceEvent::TextChanged(text) => {
                if self.is_armed() {
                    field.on_spinner_or_arrow_step(binding, parse_number(&text))
                } else {
                    field.on_text_edited(&*binding, &text)
                }
            }
            SurfaceEvent::KeyDown(key) => {
                // Any key breaks a pointer chain
                self.pointer_armed = false;
                match key {
                    FieldKey::Enter => field.on_commit_requested(binding, CommitReason::Enter),
                    FieldKey::Escape => field.on_cancel_requested(),
                    FieldKey::ArrowUp | FieldKey::ArrowDown => {
                        self.arrow_armed = true;
                        FieldResponse::default()
                    }
                    FieldKey::Other => FieldResponse::default(),
                }
            }
            SurfaceEvent::KeyUp(_) => {
                self.arrow_armed = false;
                field.on_step_released();
                FieldResponse::default()
            }
            SurfaceEvent::PointerDown => {
                self.pointer_armed = true;
                FieldResponse::default()
            }
            SurfaceEvent::PointerUp => {
                self.pointer_armed = false;
                field.on_step_released();
                FieldResponse::default()
            }
            SurfaceEvent::Blur => {
                self.pointer_armed = false;
                self.arrow_armed = false;
                field.on_blur(binding)
            }
            SurfaceEvent::SteppedChange(value) => field.on_spinner_or_arrow_step(binding, value),
        }
    }
}
