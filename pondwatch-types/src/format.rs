//! Display formatting for values and timestamps.

use chrono::{DateTime, TimeZone};

use crate::ParameterDefinition;

/// Placeholder for an absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a value with the parameter's precision, without unit.
///
/// ```rust
/// use pondwatch_types::{format_value, Parameter};
///
/// assert_eq!(format_value(Some(6.0), Parameter::DissolvedOxygen.definition()), "6.00");
/// assert_eq!(format_value(Some(0.25), Parameter::Ammonia.definition()), "0.250");
/// assert_eq!(format_value(None, Parameter::Ph.definition()), "N/A");
/// ```
pub fn format_value(value: Option<f64>, definition: &ParameterDefinition) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.*}", definition.decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a value followed by the parameter's unit, if it has one.
pub fn format_with_unit(value: Option<f64>, definition: &ParameterDefinition) -> String {
    let formatted = format_value(value, definition);
    if value.is_none() || definition.unit.is_empty() {
        formatted
    } else {
        format!("{} {}", formatted, definition.unit)
    }
}

/// Format a timestamp as `DD/MM/YYYY HH:MM:SS` in the given zone.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parameter;
    use chrono::Utc;

    #[test]
    fn units_are_appended() {
        let oxygen = Parameter::DissolvedOxygen.definition();
        assert_eq!(format_with_unit(Some(5.5), oxygen), "5.50 mg/L");

        let ph = Parameter::Ph.definition();
        assert_eq!(format_with_unit(Some(8.0), ph), "8.00");
        assert_eq!(format_with_unit(None, oxygen), "N/A");
    }

    #[test]
    fn non_finite_values_are_not_available() {
        let salinity = Parameter::Salinity.definition();
        assert_eq!(format_value(Some(f64::NAN), salinity), "N/A");
    }

    #[test]
    fn timestamp_format() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 8, 3, 9).unwrap();
        assert_eq!(format_timestamp(&time), "01/05/2024 08:03:09");
    }
}
