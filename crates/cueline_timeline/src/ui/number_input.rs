// SPDX-License-Identifier: MIT OR Apache-2.0
//! Numeric text input widget.

use crate::field_adapter::{FieldEventAdapter, FieldKey, SurfaceEvent};
use crate::number_field::{EditableNumberField, FieldResponse, ValueBinding};
use egui::text::{CCursor, CCursorRange};
use egui::{Key, Modifiers, Response, TextEdit, Ui, Widget};
use std::hash::Hash;

const DEFAULT_WIDTH: f32 = 64.0;

/// Persistent state of one [`NumberInput`]
#[derive(Debug, Clone, Default)]
pub struct NumberInputState {
    field: EditableNumberField,
    adapter: FieldEventAdapter,
}

impl NumberInputState {
    /// Create an idle input
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying field
    pub fn field(&self) -> &EditableNumberField {
        &self.field
    }

    /// Route one event and fold its effects into `effects`
    fn dispatch(
        &mut self,
        binding: &mut impl ValueBinding,
        event: SurfaceEvent,
        effects: &mut FieldResponse,
    ) {
        let response = self.adapter.handle(&mut self.field, binding, event);
        effects.committed = response.committed.or(effects.committed);
        effects.select_all |= response.select_all;
        effects.request_blur |= response.request_blur;
    }

    /// One stepper or arrow gesture: step from the text shown
    fn step(
        &mut self,
        binding: &mut impl ValueBinding,
        direction: f64,
        release: SurfaceEvent,
        effects: &mut FieldResponse,
    ) {
        let base = self.field.step_base(binding.value());
        let value = base + direction * binding.domain().step();
        self.dispatch(binding, SurfaceEvent::SteppedChange(value), effects);
        self.dispatch(binding, release, effects);
    }
}

/// Text input over a [`ValueBinding`] with stepper buttons.
///
/// Typing is provisional; the value is committed on Enter or when focus
/// leaves. Steppers and Up/Down arrows commit immediately.
pub struct NumberInput<'a, B> {
    state: &'a mut NumberInputState,
    binding: &'a mut B,
    id_salt: egui::Id,
    desired_width: f32,
}

impl<'a, B: ValueBinding> NumberInput<'a, B> {
    /// Create an input editing `binding`
    pub fn new(state: &'a mut NumberInputState, binding: &'a mut B) -> Self {
        Self {
            state,
            binding,
            id_salt: egui::Id::new("number_input"),
            desired_width: DEFAULT_WIDTH,
        }
    }

    /// Distinguish inputs sharing a parent
    pub fn id_salt(mut self, id_salt: impl Hash) -> Self {
        self.id_salt = egui::Id::new(id_salt);
        self
    }

    /// Width of the text area
    pub fn desired_width(mut self, desired_width: f32) -> Self {
        self.desired_width = desired_width;
        self
    }
}

impl<B: ValueBinding> Widget for NumberInput<'_, B> {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            state,
            binding,
            id_salt,
            desired_width,
        } = self;
        let id = ui.make_persistent_id(id_salt);
        let mut effects = FieldResponse::default();

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;

            // Arrows step instead of moving the cursor
            if ui.memory(|mem| mem.has_focus(id)) {
                let (up, down) = ui.input_mut(|input| {
                    (
                        input.consume_key(Modifiers::NONE, Key::ArrowUp),
                        input.consume_key(Modifiers::NONE, Key::ArrowDown),
                    )
                });
                if up {
                    let release = SurfaceEvent::KeyUp(FieldKey::ArrowUp);
                    state.step(&mut *binding, 1.0, release, &mut effects);
                }
                if down {
                    let release = SurfaceEvent::KeyUp(FieldKey::ArrowDown);
                    state.step(&mut *binding, -1.0, release, &mut effects);
                }
            }

            let mut text = state.field.display_text(binding.value());
            let text_color = state
                .field
                .is_invalid()
                .then(|| ui.visuals().error_fg_color);
            let output = TextEdit::singleline(&mut text)
                .id(id)
                .desired_width(desired_width)
                .text_color_opt(text_color)
                .show(ui);
            let response = output.response;
            let mut edit_state = output.state;

            if response.gained_focus() {
                state.dispatch(&mut *binding, SurfaceEvent::Focus, &mut effects);
            }
            if response.changed() {
                state.dispatch(&mut *binding, SurfaceEvent::TextChanged(text), &mut effects);
            }
            if response.lost_focus() {
                let key = ui.input(|input| {
                    if input.key_pressed(Key::Enter) {
                        Some(FieldKey::Enter)
                    } else if input.key_pressed(Key::Escape) {
                        Some(FieldKey::Escape)
                    } else {
                        None
                    }
                });
                if let Some(key) = key {
                    state.dispatch(&mut *binding, SurfaceEvent::KeyDown(key), &mut effects);
                }
                state.dispatch(&mut *binding, SurfaceEvent::Blur, &mut effects);
            }

            ui.vertical(|ui| {
                ui.spacing_mut().item_spacing.y = 0.0;
                for (label, direction) in [("⏶", 1.0), ("⏷", -1.0)] {
                    if ui.small_button(label).clicked() {
                        state.dispatch(&mut *binding, SurfaceEvent::PointerDown, &mut effects);
                        state.step(&mut *binding, direction, SurfaceEvent::PointerUp, &mut effects);
                        ui.memory_mut(|mem| mem.request_focus(id));
                    }
                }
            });

            if effects.select_all {
                let len = state.field.display_text(binding.value()).chars().count();
                edit_state
                    .cursor
                    .set_char_range(Some(CCursorRange::two(CCursor::new(0), CCursor::new(len))));
                edit_state.store(ui.ctx(), id);
            }
            if effects.request_blur {
                response.surrender_focus();
            }

            let domain = binding.domain();
            response.on_hover_text(format!(
                "min {}, max {}, step {}",
                domain.min(),
                domain.max(),
                domain.step()
            ))
        })
        .inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumericDomain;

    struct Owner {
        value: f64,
        domain: NumericDomain,
    }

    impl ValueBinding for Owner {
        fn value(&self) -> f64 {
            self.value
        }

        fn domain(&self) -> NumericDomain {
            self.domain
        }

        fn commit(&mut self, value: f64) {
            self.value = value;
        }
    }

    fn owner() -> Owner {
        Owner {
            value: 100.0,
            domain: NumericDomain::new(10.0, 0.0, 1000.0).unwrap(),
        }
    }

    #[test]
    fn test_step_commits_and_releases() {
        let mut owner = owner();
        let mut state = NumberInputState::new();
        let mut effects = FieldResponse::default();

        state.step(&mut owner, 1.0, SurfaceEvent::KeyUp(FieldKey::ArrowUp), &mut effects);
        assert_eq!(owner.value, 110.0);
        assert_eq!(effects.committed, Some(110.0));
        assert!(effects.select_all);
        assert!(state.field().is_editing());
        assert!(!state.adapter.is_armed());
    }

    #[test]
    fn test_step_starts_from_typed_text() {
        let mut owner = owner();
        owner.value = 50.0;
        let mut state = NumberInputState::new();
        let mut effects = FieldResponse::default();

        state.dispatch(&mut owner, SurfaceEvent::Focus, &mut effects);
        state.dispatch(&mut owner, SurfaceEvent::TextChanged("700".to_string()), &mut effects);
        state.step(&mut owner, 1.0, SurfaceEvent::KeyUp(FieldKey::ArrowUp), &mut effects);
        assert_eq!(owner.value, 710.0);
        assert_eq!(state.field().display_text(owner.value), "710");
    }

    #[test]
    fn test_step_is_validated() {
        let mut owner = owner();
        owner.value = 0.0;
        let mut state = NumberInputState::new();
        let mut effects = FieldResponse::default();

        state.step(&mut owner, -1.0, SurfaceEvent::PointerUp, &mut effects);
        assert_eq!(owner.value, 0.0);
    }

    #[test]
    fn test_renders_headless() {
        let ctx = egui::Context::default();
        let mut owner = owner();
        let mut state = NumberInputState::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.add(NumberInput::new(&mut state, &mut owner).id_salt("value"));
            });
        });
        assert!(!state.field().is_editing());
        assert_eq!(owner.value, 100.0);
    }
}
