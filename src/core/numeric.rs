//! Numeric coercion for user-supplied figures
//!
//! The estimator and rack planner assume sanitized input. Everything that
//! arrives from a form field, a command-line flag, or a YAML file goes
//! through these helpers first.

/// Clamp to a finite, non-negative value (NaN, infinities and negatives become 0)
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamp to at least `floor`; NaN and infinities fall back to `floor`
pub fn at_least(value: f64, floor: f64) -> f64 {
    if !value.is_finite() || value < floor {
        floor
    } else {
        value
    }
}

/// Normalize an order quantity to at least one part
pub fn quantity(value: i64) -> u32 {
    let clamped = value.clamp(1, u32::MAX as i64) as u32;
    if i64::from(clamped) != value {
        tracing::warn!(requested = value, used = clamped, "quantity normalized");
    }
    clamped
}

/// Lenient numeric parse used for field-by-field edits
///
/// Returns `None` for empty or unparseable text and for non-finite values.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to cents for display and comparisons against quoted prices
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(3.5), 3.5);
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_at_least() {
        assert_eq!(at_least(0.1, 0.25), 0.25);
        assert_eq!(at_least(f64::NAN, 0.25), 0.25);
        assert_eq!(at_least(0.5, 0.25), 0.5);
    }

    #[test]
    fn test_quantity_floor() {
        assert_eq!(quantity(0), 1);
        assert_eq!(quantity(-12), 1);
        assert_eq!(quantity(250), 250);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 45.5 "), Some(45.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(3.749), 3.75);
        assert_eq!(round_cents(375.0), 375.0);
    }
}
