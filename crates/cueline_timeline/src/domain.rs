// SPDX-License-Identifier: MIT OR Apache-2.0
//! Numeric domains and value validation.
//!
//! A [`NumericDomain`] is the lattice `{min, min + step, ..., max}` a field may
//! hold. [`validate`] maps any raw `f64` onto that lattice and reports whether
//! it had to correct anything. Corrections are never errors: the flag only
//! drives UI feedback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance (in steps) under which a value counts as lying on the lattice.
const STEP_TOLERANCE: f64 = 1e-9;

/// Errors raised when constructing a domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Step is zero, negative or not finite
    #[error("Step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    /// A bound is NaN or infinite
    #[error("Domain bounds must be finite, got min={min} max={max}")]
    NonFiniteBounds {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Lower bound above upper bound
    #[error("Domain min {min} is greater than max {max}")]
    InvertedBounds {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

/// Result type for domain construction
pub type Result<T> = std::result::Result<T, DomainError>;

/// The legal lattice of values for a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain", into = "RawDomain")]
pub struct NumericDomain {
    step: f64,
    min: f64,
    max: f64,
}

/// Unchecked serialized form of [`NumericDomain`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawDomain {
    step: f64,
    min: f64,
    max: f64,
}

impl TryFrom<RawDomain> for NumericDomain {
    type Error = DomainError;

    fn try_from(raw: RawDomain) -> Result<Self> {
        Self::new(raw.step, raw.min, raw.max)
    }
}

impl From<NumericDomain> for RawDomain {
    fn from(domain: NumericDomain) -> Self {
        Self {
            step: domain.step,
            min: domain.min,
            max: domain.max,
        }
    }
}

impl NumericDomain {
    /// Create a domain, checking `step > 0` and `min <= max`
    pub fn new(step: f64, min: f64, max: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(DomainError::InvalidStep(step));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(DomainError::NonFiniteBounds { min, max });
        }
        if min > max {
            return Err(DomainError::InvertedBounds { min, max });
        }
        Ok(Self { step, min, max })
    }

    /// Build a domain from constants known to be valid
    pub(crate) const fn from_parts(step: f64, min: f64, max: f64) -> Self {
        Self { step, min, max }
    }

    /// Step between legal values
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Lowest legal value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Highest legal value
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Same domain with a different upper bound.
    ///
    /// The bound is raised to `min` if it would fall below it, so the result
    /// is always a valid domain.
    pub fn with_max(self, max: f64) -> Self {
        let max = if max.is_finite() { max.max(self.min) } else { self.max };
        Self { max, ..self }
    }

    /// Whether `value` is finite, inside the bounds and on the lattice
    pub fn contains(&self, value: f64) -> bool {
        !validate(value, self).has_error
    }
}

/// Outcome of validating a raw value against a domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationResult {
    /// Closest legal value
    pub result: f64,
    /// Whether any correction stage fired
    pub has_error: bool,
}

/// Map a raw value onto the domain's lattice.
///
/// Stages run in a fixed order, each on the output of the previous one:
/// 1. non-finite values map to `min` (`NaN`, `-inf`) or `max` (`+inf`)
/// 2. out-of-range values are clamped into `[min, max]`
/// 3. off-step values round half-up to the nearest step counted from `min`
pub fn validate(raw: f64, domain: &NumericDomain) -> ValidationResult {
    let mut result = raw;
    let mut has_error = false;

    // Finiteness
    if raw.is_nan() || raw == f64::NEG_INFINITY {
        result = domain.min;
        has_error = true;
    } else if raw == f64::INFINITY {
        result = domain.max;
        has_error = true;
    }

    // Range
    if result < domain.min || result > domain.max {
        result = result.clamp(domain.min, domain.max);
        has_error = true;
    }

    // Step
    let steps = (result - domain.min) / domain.step;
    let nearest = (steps + 0.5).floor();
    if (steps - nearest).abs() > STEP_TOLERANCE {
        result = domain.min + nearest * domain.step;
        if result > domain.max {
            result -= domain.step;
        }
        // A lattice narrower than one step only holds `min`.
        if result < domain.min {
            result = domain.min;
        }
        has_error = true;
    }

    ValidationResult { result, has_error }
}

/// Parse user text as a decimal number.
///
/// Accepts `[+-]digits[.digits][e[+-]digits]` with surrounding whitespace.
/// Anything else, including partial input such as `"1e"` or `"-"`, gives
/// `NaN`, which [`validate`] maps to the domain minimum.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if !is_decimal_literal(text) {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Canonical text for a committed value (no leading zeros, no `-0`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(step: f64, min: f64, max: f64) -> NumericDomain {
        NumericDomain::new(step, min, max).unwrap()
    }

    #[test]
    fn test_domain_construction() {
        assert!(NumericDomain::new(10.0, 0.0, 100.0).is_ok());
        assert_eq!(
            NumericDomain::new(0.0, 0.0, 100.0),
            Err(DomainError::InvalidStep(0.0))
        );
        assert!(matches!(
            NumericDomain::new(1.0, 10.0, 0.0),
            Err(DomainError::InvertedBounds { .. })
        ));
        assert!(matches!(
            NumericDomain::new(1.0, f64::NAN, 0.0),
            Err(DomainError::NonFiniteBounds { .. })
        ));
    }

    #[test]
    fn test_non_finite_values() {
        let d = domain(10.0, 0.0, 100.0);

        let nan = validate(f64::NAN, &d);
        assert_eq!(nan.result, 0.0);
        assert!(nan.has_error);

        let neg_inf = validate(f64::NEG_INFINITY, &d);
        assert_eq!(neg_inf.result, 0.0);
        assert!(neg_inf.has_error);

        let inf = validate(f64::INFINITY, &d);
        assert_eq!(inf.result, 100.0);
        assert!(inf.has_error);
    }

    #[test]
    fn test_range_and_step_stages() {
        let d = domain(10.0, 0.0, 100.0);

        assert_eq!(validate(50.0, &d), ValidationResult { result: 50.0, has_error: false });
        assert_eq!(validate(-5.0, &d), ValidationResult { result: 0.0, has_error: true });
        assert_eq!(validate(250.0, &d), ValidationResult { result: 100.0, has_error: true });
        assert_eq!(validate(25.0, &d), ValidationResult { result: 30.0, has_error: true });
        assert_eq!(validate(24.9, &d), ValidationResult { result: 20.0, has_error: true });
        assert_eq!(validate(15.6, &d), ValidationResult { result: 20.0, has_error: true });
    }

    #[test]
    fn test_fraction_rounds_with_unit_step() {
        let d = domain(1.0, 0.0, 100.0);
        assert_eq!(validate(10.5, &d).result, 11.0);
        assert_eq!(validate(10.4, &d).result, 10.0);
        assert!(validate(10.4, &d).has_error);
    }

    #[test]
    fn test_step_counted_from_min() {
        let d = domain(10.0, 5.0, 100.0);
        assert_eq!(validate(5.0, &d).result, 5.0);
        assert_eq!(validate(16.0, &d).result, 15.0);
        // Off-lattice max: rounding above it steps back down
        assert_eq!(validate(100.0, &d).result, 95.0);
        assert!(validate(100.0, &d).has_error);
    }

    #[test]
    fn test_narrow_domain_holds_min() {
        let d = domain(10.0, 0.0, 4.0);
        assert_eq!(validate(3.0, &d).result, 0.0);
        assert_eq!(validate(f64::INFINITY, &d).result, 0.0);
    }

    #[test]
    fn test_decimal_step_is_idempotent() {
        let d = domain(0.1, 0.0, 10.0);
        let first = validate(0.34, &d);
        assert!(first.has_error);
        let second = validate(first.result, &d);
        assert!(!second.has_error);
        assert!(!validate(0.3, &d).has_error);
    }

    #[test]
    fn test_result_always_legal() {
        let domains = [
            domain(10.0, 0.0, 100.0),
            domain(1.0, 0.0, 300.0),
            domain(10.0, 100.0, 6000.0),
            domain(0.25, -2.0, 2.0),
            domain(7.0, 0.0, 50.0),
        ];
        let mut raws = vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::MAX, f64::MIN];
        let mut x = -7000.0;
        while x <= 7000.0 {
            raws.push(x);
            x += 13.37;
        }

        for d in &domains {
            for &raw in &raws {
                let v = validate(raw, d);
                assert!(v.result.is_finite(), "{raw} on {d:?}");
                assert!(v.result >= d.min() && v.result <= d.max(), "{raw} on {d:?}");
                assert!(!validate(v.result, d).has_error, "{raw} on {d:?} not idempotent");
            }
        }
    }

    #[test]
    fn test_with_max() {
        let d = domain(10.0, 0.0, 6000.0);
        assert_eq!(d.with_max(4000.0).max(), 4000.0);
        assert_eq!(d.with_max(-10.0).max(), 0.0);
        assert_eq!(d.with_max(f64::NAN).max(), 6000.0);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("25"), 25.0);
        assert_eq!(parse_number("00100"), 100.0);
        assert_eq!(parse_number("-5"), -5.0);
        assert_eq!(parse_number(" 15.6 "), 15.6);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("5."), 5.0);
        assert_eq!(parse_number("1e+2"), 100.0);
        assert!(parse_number("1e").is_nan());
        assert!(parse_number("-").is_nan());
        assert!(parse_number(".").is_nan());
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("NaN").is_nan());
        assert!(parse_number("12abc").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-30.0), "-30");
    }

    #[test]
    fn test_domain_ron_round_trip_rejects_invalid() {
        let d = domain(10.0, 100.0, 6000.0);
        let text = ron::to_string(&d).unwrap();
        let back: NumericDomain = ron::from_str(&text).unwrap();
        assert_eq!(back, d);

        let bad: std::result::Result<NumericDomain, _> =
            ron::from_str("(step: 0.0, min: 0.0, max: 1.0)");
        assert!(bad.is_err());
    }
}
