// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editable numeric text field.
//!
//! [`EditableNumberField`] separates *typing* (local, provisional text) from
//! *committing* (a validated value pushed to the owner). The owner is reached
//! through a [`ValueBinding`], which is read again on every operation so a
//! field always validates against the latest value and domain, even when
//! they changed while the field was idle.

use crate::domain::{format_number, parse_number, validate, NumericDomain};

/// Source and sink of the committed value a field edits
pub trait ValueBinding {
    /// Current committed value
    fn value(&self) -> f64;

    /// Current domain the value must satisfy
    fn domain(&self) -> NumericDomain;

    /// Store a validated value
    fn commit(&mut self, value: f64);
}

/// Why a commit was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitReason {
    /// Enter key
    Enter,
    /// Focus left without a confirming key
    Blur,
}

/// Key that asked the display surface to drop focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKey {
    /// Enter (value already committed)
    Enter,
    /// Escape (edit already discarded)
    Escape,
}

/// Transient state between focus and blur
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// Text as typed
    pub raw_text: String,
    /// Whether the live text fails validation
    pub has_error: bool,
    /// A stepper or arrow gesture is in progress
    pub stepping: bool,
}

/// Field state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldState {
    /// Showing the committed value
    #[default]
    Idle,
    /// Editing session active
    Editing(EditSession),
}

/// What the display surface must do after an operation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldResponse {
    /// Value pushed to the binding, if any
    pub committed: Option<f64>,
    /// Select the whole text
    pub select_all: bool,
    /// Drop focus
    pub request_blur: bool,
}

/// Numeric text field state machine
#[derive(Debug, Clone, Default)]
pub struct EditableNumberField {
    state: FieldState,
    pending_blur: Option<BlurKey>,
}

impl EditableNumberField {
    /// Create an idle field
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// Whether a session is active
    pub fn is_editing(&self) -> bool {
        matches!(self.state, FieldState::Editing(_))
    }

    /// True only while editing text that fails validation
    pub fn is_invalid(&self) -> bool {
        matches!(&self.state, FieldState::Editing(session) if session.has_error)
    }

    /// Text to display for the given committed value
    pub fn display_text(&self, committed: f64) -> String {
        match &self.state {
            FieldState::Idle => format_number(committed),
            FieldState::Editing(session) => session.raw_text.clone(),
        }
    }

    /// Value a stepper steps from: the typed text while editing if it parses
    /// to a finite number, otherwise the committed value
    pub fn step_base(&self, committed: f64) -> f64 {
        match &self.state {
            FieldState::Editing(session) => {
                let typed = parse_number(&session.raw_text);
                if typed.is_finite() {
                    typed
                } else {
                    committed
                }
            }
            FieldState::Idle => committed,
        }
    }

    /// Begin a session from the latest committed value
    pub fn on_focus_gained(&mut self, binding: &impl ValueBinding) -> FieldResponse {
        self.pending_blur = None;
        self.state = FieldState::Editing(EditSession {
            raw_text: format_number(binding.value()),
            has_error: false,
            stepping: false,
        });
        FieldResponse {
            select_all: true,
            ..Default::default()
        }
    }

    /// Record a keystroke edit; only the error flag is derived from it.
    ///
    /// Ignored while idle or during a stepper/arrow gesture. Empty text is
    /// replaced by the domain minimum.
    pub fn on_text_edited(&mut self, binding: &impl ValueBinding, text: &str) -> FieldResponse {
        let FieldState::Editing(session) = &mut self.state else {
            return FieldResponse::default();
        };
        if session.stepping {
            return FieldResponse::default();
        }

        let domain = binding.domain();
        if text.is_empty() {
            session.raw_text = format_number(domain.min());
            session.has_error = false;
        } else {
            session.raw_text = text.to_string();
            session.has_error = validate(parse_number(text), &domain).has_error;
        }
        FieldResponse::default()
    }

    /// Validate and commit a stepped value immediately; the session stays open
    pub fn on_spinner_or_arrow_step(
        &mut self,
        binding: &mut impl ValueBinding,
        raw_value: f64,
    ) -> FieldResponse {
        if !self.is_editing() {
            self.on_focus_gained(&*binding);
        }

        let value = validate(raw_value, &binding.domain()).result;
        binding.commit(value);
        tracing::trace!(raw_value, value, "Stepped value committed");

        self.state = FieldState::Editing(EditSession {
            raw_text: format_number(value),
            has_error: false,
            stepping: true,
        });

        FieldResponse {
            committed: Some(value),
            select_all: true,
            request_blur: false,
        }
    }

    /// End of the stepper/arrow gesture (pointer or key released)
    pub fn on_step_released(&mut self) {
        if let FieldState::Editing(session) = &mut self.state {
            session.stepping = false;
        }
    }

    /// Commit the session text and end the session
    pub fn on_commit_requested(
        &mut self,
        binding: &mut impl ValueBinding,
        reason: CommitReason,
    ) -> FieldResponse {
        let FieldState::Editing(session) = &self.state else {
            return FieldResponse::default();
        };

        let raw_value = parse_number(&session.raw_text);
        let value = validate(raw_value, &binding.domain()).result;
        binding.commit(value);
        tracing::debug!(?reason, value, "Field value committed");

        self.state = FieldState::Idle;
        let request_blur = reason == CommitReason::Enter;
        if request_blur {
            self.pending_blur = Some(BlurKey::Enter);
        }

        FieldResponse {
            committed: Some(value),
            select_all: false,
            request_blur,
        }
    }

    /// Discard the session text without committing (Escape)
    pub fn on_cancel_requested(&mut self) -> FieldResponse {
        if !self.is_editing() {
            return FieldResponse::default();
        }
        tracing::debug!("Field edit cancelled");
        self.state = FieldState::Idle;
        self.pending_blur = Some(BlurKey::Escape);
        FieldResponse {
            request_blur: true,
            ..Default::default()
        }
    }

    /// Focus left the field.
    ///
    /// A blur triggered by Enter or Escape has already been handled; any
    /// other blur commits.
    pub fn on_blur(&mut self, binding: &mut impl ValueBinding) -> FieldResponse {
        match self.pending_blur.take() {
            Some(BlurKey::Enter | BlurKey::Escape) => {
                self.state = FieldState::Idle;
                FieldResponse::default()
            }
            None => {
                let mut response = self.on_commit_requested(binding, CommitReason::Blur);
                response.request_blur = false;
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared value with a call log, like an owner holding state
    struct TestBinding {
        value: f64,
        domain: NumericDomain,
        commits: Vec<f64>,
    }

    impl TestBinding {
        fn new(value: f64, step: f64, min: f64, max: f64) -> Self {
            Self {
                value,
                domain: NumericDomain::new(step, min, max).unwrap(),
                commits: Vec::new(),
            }
        }
    }

    impl ValueBinding for TestBinding {
        fn value(&self) -> f64 {
            self.value
        }

        fn domain(&self) -> NumericDomain {
            self.domain
        }

        fn commit(&mut self, value: f64) {
            self.value = value;
            self.commits.push(value);
        }
    }

    fn type_text(field: &mut EditableNumberField, binding: &TestBinding, text: &str) {
        field.on_focus_gained(binding);
        field.on_text_edited(binding, text);
    }

    #[test]
    fn test_idle_display_is_canonical() {
        let field = EditableNumberField::new();
        assert_eq!(field.display_text(100.0), "100");
        assert_eq!(field.display_text(-0.0), "0");
        assert!(!field.is_editing());
        assert!(!field.is_invalid());
    }

    #[test]
    fn test_focus_selects_all() {
        let binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();
        let response = field.on_focus_gained(&binding);
        assert!(response.select_all);
        assert!(field.is_editing());
        assert_eq!(field.display_text(binding.value), "10");
    }

    #[test]
    fn test_typing_does_not_commit_until_blur() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "25");
        assert!(binding.commits.is_empty());
        assert_eq!(field.display_text(binding.value), "25");
        assert!(field.is_invalid());

        let response = field.on_blur(&mut binding);
        assert_eq!(response.committed, Some(30.0));
        assert_eq!(binding.commits, vec![30.0]);
        assert_eq!(field.display_text(binding.value), "30");
        assert!(!field.is_editing());
        assert!(!field.is_invalid());
    }

    #[test]
    fn test_enter_commits_and_requests_blur() {
        let mut binding = TestBinding::new(40.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "45");
        let response = field.on_commit_requested(&mut binding, CommitReason::Enter);
        assert_eq!(response.committed, Some(50.0));
        assert!(response.request_blur);

        // The blur caused by Enter must not commit again
        let response = field.on_blur(&mut binding);
        assert_eq!(response.committed, None);
        assert_eq!(binding.commits, vec![50.0]);
        assert_eq!(field.display_text(binding.value), "50");
    }

    #[test]
    fn test_escape_reverts_without_commit() {
        let mut binding = TestBinding::new(50.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "55");
        let response = field.on_cancel_requested();
        assert!(response.request_blur);
        assert_eq!(response.committed, None);

        field.on_blur(&mut binding);
        assert!(binding.commits.is_empty());
        assert_eq!(binding.value, 50.0);
        assert_eq!(field.display_text(binding.value), "50");
    }

    #[test]
    fn test_stepping_commits_immediately_and_keeps_session() {
        let mut binding = TestBinding::new(10.0, 1.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();
        field.on_focus_gained(&binding);

        let response = field.on_spinner_or_arrow_step(&mut binding, 11.0);
        assert_eq!(response.committed, Some(11.0));
        assert!(response.select_all);
        assert!(!response.request_blur);
        assert!(field.is_editing());
        assert_eq!(field.display_text(binding.value), "11");
        field.on_step_released();

        field.on_spinner_or_arrow_step(&mut binding, 10.0);
        field.on_step_released();
        assert_eq!(binding.commits, vec![11.0, 10.0]);
        assert!(field.is_editing());

        // Blur after stepping commits the unchanged text once more
        field.on_blur(&mut binding);
        assert_eq!(binding.value, 10.0);
    }

    #[test]
    fn test_text_ignored_while_stepping() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();
        field.on_focus_gained(&binding);
        field.on_spinner_or_arrow_step(&mut binding, 20.0);
        field.on_text_edited(&binding, "999");
        assert_eq!(field.display_text(binding.value), "20");
    }

    #[test]
    fn test_step_on_idle_field_opens_session() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();
        let response = field.on_spinner_or_arrow_step(&mut binding, 20.0);
        assert_eq!(response.committed, Some(20.0));
        assert!(field.is_editing());
    }

    #[test]
    fn test_leading_zeros_are_valid() {
        let mut binding = TestBinding::new(100.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "00100");
        assert!(!field.is_invalid());
        field.on_blur(&mut binding);
        assert_eq!(field.display_text(binding.value), "100");
    }

    #[test]
    fn test_negative_text_flags_then_clamps() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "-5");
        assert_eq!(field.display_text(binding.value), "-5");
        assert!(field.is_invalid());

        field.on_blur(&mut binding);
        assert_eq!(field.display_text(binding.value), "0");
        assert!(!field.is_invalid());
    }

    #[test]
    fn test_decimal_rounds_on_commit() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "15.6");
        assert!(field.is_invalid());
        field.on_blur(&mut binding);
        assert_eq!(binding.value, 20.0);
    }

    #[test]
    fn test_garbage_commits_minimum() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "1e");
        assert!(field.is_invalid());
        field.on_blur(&mut binding);
        assert_eq!(binding.value, 0.0);

        type_text(&mut field, &binding, "abc");
        field.on_blur(&mut binding);
        assert_eq!(binding.value, 0.0);
    }

    #[test]
    fn test_empty_text_becomes_minimum() {
        let binding = TestBinding::new(50.0, 10.0, 20.0, 100.0);
        let mut field = EditableNumberField::new();
        field.on_focus_gained(&binding);
        field.on_text_edited(&binding, "");
        assert_eq!(field.display_text(binding.value), "20");
        assert!(!field.is_invalid());
    }

    #[test]
    fn test_domain_change_while_idle_applies_on_next_commit() {
        let mut binding = TestBinding::new(10.0, 1.0, 0.0, 300.0);
        let mut field = EditableNumberField::new();

        type_text(&mut field, &binding, "300");
        field.on_commit_requested(&mut binding, CommitReason::Enter);
        field.on_blur(&mut binding);
        assert_eq!(binding.value, 300.0);

        binding.domain = NumericDomain::new(1.0, 0.0, 100.0).unwrap();

        field.on_focus_gained(&binding);
        assert_eq!(field.display_text(binding.value), "300");
        field.on_commit_requested(&mut binding, CommitReason::Enter);
        assert_eq!(binding.value, 100.0);
    }

    #[test]
    fn test_refocus_reads_latest_value() {
        let mut binding = TestBinding::new(50.0, 10.0, 0.0, 100.0);
        let mut first = EditableNumberField::new();
        let mut second = EditableNumberField::new();

        first.on_focus_gained(&binding);
        second.on_focus_gained(&binding);
        first.on_blur(&mut binding);

        type_text(&mut first, &binding, "100");
        first.on_commit_requested(&mut binding, CommitReason::Enter);
        first.on_blur(&mut binding);

        // Second was left mid-session with stale text; blur then refocus
        second.on_cancel_requested();
        second.on_blur(&mut binding);
        assert_eq!(second.display_text(binding.value), "100");
        second.on_focus_gained(&binding);
        assert_eq!(second.display_text(binding.value), "100");
    }

    #[test]
    fn test_step_base_follows_typed_text() {
        let binding = TestBinding::new(50.0, 10.0, 0.0, 1000.0);
        let mut field = EditableNumberField::new();
        assert_eq!(field.step_base(binding.value), 50.0);

        type_text(&mut field, &binding, "700");
        assert_eq!(field.step_base(binding.value), 700.0);

        field.on_text_edited(&binding, "7e");
        assert_eq!(field.step_base(binding.value), 50.0);
    }

    #[test]
    fn test_operations_on_idle_field_are_no_ops() {
        let mut binding = TestBinding::new(10.0, 10.0, 0.0, 100.0);
        let mut field = EditableNumberField::new();
        assert_eq!(field.on_text_edited(&binding, "5"), FieldResponse::default());
        assert_eq!(field.on_cancel_requested(), FieldResponse::default());
        assert_eq!(
            field.on_commit_requested(&mut binding, CommitReason::Enter),
            FieldResponse::default()
        );
        assert!(binding.commits.is_empty());
    }
}
