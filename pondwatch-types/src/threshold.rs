//! Threshold ranges and status classification.

use crate::Locale;

/// Allowed range for a parameter.
///
/// Either bound may be absent; a one-sided range only ever classifies in
/// the direction it constrains.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    /// Values strictly below this are [`ParameterStatus::Low`].
    pub min: Option<f64>,
    /// Values strictly above this are [`ParameterStatus::High`].
    pub max: Option<f64>,
}

impl Range {
    /// A range with both bounds.
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A range with only an upper bound.
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

/// Classification of a single measured value against its [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterStatus {
    Low,
    Normal,
    High,
    /// The value was absent or not a number.
    Unknown,
}

impl ParameterStatus {
    /// True for `Low` and `High`.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, ParameterStatus::Low | ParameterStatus::High)
    }

    /// Short status label for tables and cards.
    pub fn label(&self, locale: Locale) -> &'static str {
        locale.status_label(*self)
    }
}

/// Classify `value` against `range`.
///
/// - absent or NaN → `Unknown`
/// - below `min` → `Low`
/// - otherwise above `max` → `High`
/// - otherwise → `Normal`
///
/// Bounds are exclusive: a value equal to a bound is `Normal`.
pub fn classify(value: Option<f64>, range: &Range) -> ParameterStatus {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return ParameterStatus::Unknown;
    };

    if range.min.is_some_and(|min| value < min) {
        ParameterStatus::Low
    } else if range.max.is_some_and(|max| value > max) {
        ParameterStatus::High
    } else {
        ParameterStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_two_sided_range() {
        let range = Range::between(28.0, 32.0);
        assert_eq!(classify(Some(26.0), &range), ParameterStatus::Low);
        assert_eq!(classify(Some(34.0), &range), ParameterStatus::High);
        assert_eq!(classify(Some(30.0), &range), ParameterStatus::Normal);
        assert_eq!(classify(None, &range), ParameterStatus::Unknown);
    }

    #[test]
    fn classify_bounds_are_exclusive() {
        let range = Range::between(4.0, 8.0);
        assert_eq!(classify(Some(4.0), &range), ParameterStatus::Normal);
        assert_eq!(classify(Some(8.0), &range), ParameterStatus::Normal);
    }

    #[test]
    fn classify_upper_bound_only_never_low() {
        let range = Range::at_most(0.5);
        assert_eq!(classify(Some(0.6), &range), ParameterStatus::High);
        assert_eq!(classify(Some(0.3), &range), ParameterStatus::Normal);
        assert_eq!(classify(Some(-100.0), &range), ParameterStatus::Normal);
    }

    #[test]
    fn classify_lower_bound_only_never_high() {
        let range = Range {
            min: Some(7.5),
            max: None,
        };
        assert_eq!(classify(Some(7.0), &range), ParameterStatus::Low);
        assert_eq!(classify(Some(1e9), &range), ParameterStatus::Normal);
    }

    #[test]
    fn classify_nan_is_unknown() {
        let range = Range::between(0.0, 1.0);
        assert_eq!(classify(Some(f64::NAN), &range), ParameterStatus::Unknown);
    }

    #[test]
    fn default_range_is_always_normal() {
        assert_eq!(
            classify(Some(f64::MAX), &Range::default()),
            ParameterStatus::Normal
        );
    }

    #[test]
    fn abnormal_only_for_low_and_high() {
        assert!(ParameterStatus::Low.is_abnormal());
        assert!(ParameterStatus::High.is_abnormal());
        assert!(!ParameterStatus::Normal.is_abnormal());
        assert!(!ParameterStatus::Unknown.is_abnormal());
    }
}
