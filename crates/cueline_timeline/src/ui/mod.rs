// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui rendering of the timeline controls.

mod number_input;
mod timeline;

pub use number_input::{NumberInput, NumberInputState};
pub use timeline::TimelinePanel;
