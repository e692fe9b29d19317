//! Parsing of user-typed values.
//!
//! A floor panel hands the simulation raw text. These helpers turn that
//! text into typed values, accepting anything that denotes a whole number
//! (`"-5"`, `"+12"`, `"1e3"`) and rejecting everything else with the
//! reason a user would need to fix it.

use crate::core::FloorRange;
use crate::error::{ElevatorError, FloorRejection};
use crate::motion::SpeedProfile;
use crate::validation::validate_range;

/// Parse text denoting a whole number that fits in an `i64`.
pub(crate) fn parse_integer(text: &str) -> Result<i64, FloorRejection> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }
    let value: f64 = text.parse().map_err(|_| FloorRejection::Unparsable)?;
    if !value.is_finite() {
        return Err(FloorRejection::NonFinite);
    }
    if value.fract() != 0.0 {
        return Err(FloorRejection::NotInteger);
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(FloorRejection::Unrepresentable);
    }
    Ok(value as i64)
}

/// Parse a destination floor. Range checks happen when the floor is
/// requested, against the range in force at that moment.
///
/// ```rust
/// use liftsim::input::parse_floor;
///
/// assert_eq!(parse_floor(" -5 ").unwrap(), -5);
/// assert!(parse_floor("0").is_err());
/// assert!(parse_floor("2.5").is_err());
/// ```
pub fn parse_floor(text: &str) -> Result<i64, ElevatorError> {
    match parse_integer(text) {
        Ok(0) => Err(ElevatorError::invalid_floor(text.trim(), FloorRejection::Zero)),
        Ok(floor) => Ok(floor),
        Err(reason) => Err(ElevatorError::invalid_floor(text.trim(), reason)),
    }
}

/// Parse both ends of a floor range, reporting every problem at once.
pub fn parse_range(min: &str, max: &str) -> Result<FloorRange, ElevatorError> {
    validate_range(min, max).map_err(|violations| ElevatorError::InvalidRange { violations })
}

/// Parse a custom speed. Only digits and a decimal point are meaningful;
/// anything else typed into the field is ignored, and extra decimal points
/// after the first are dropped.
pub fn parse_custom_speed(text: &str) -> Result<SpeedProfile, ElevatorError> {
    let mut seen_point = false;
    let cleaned: String = text
        .chars()
        .filter(|c| match *c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect();

    let speed: f64 = cleaned.parse().map_err(|_| ElevatorError::InvalidSpeed {
        value: text.to_string(),
    })?;
    SpeedProfile::custom(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse_exactly() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("+7"), Ok(7));
        assert_eq!(parse_integer("-9007199254740993"), Ok(-9_007_199_254_740_993));
        assert_eq!(parse_integer("9223372036854775807"), Ok(i64::MAX));
    }

    #[test]
    fn integral_floats_are_accepted() {
        assert_eq!(parse_integer("1e3"), Ok(1000));
        assert_eq!(parse_integer("-4.0"), Ok(-4));
    }

    #[test]
    fn rejects_with_specific_reasons() {
        assert_eq!(parse_integer(""), Err(FloorRejection::Unparsable));
        assert_eq!(parse_integer("ten"), Err(FloorRejection::Unparsable));
        assert_eq!(parse_integer("inf"), Err(FloorRejection::NonFinite));
        assert_eq!(parse_integer("2.5"), Err(FloorRejection::NotInteger));
        assert_eq!(parse_integer("1e19"), Err(FloorRejection::Unrepresentable));
    }

    #[test]
    fn floor_zero_is_rejected() {
        assert_eq!(
            parse_floor("0"),
            Err(ElevatorError::InvalidFloor {
                value: "0".to_string(),
                reason: FloorRejection::Zero,
            })
        );
        assert!(matches!(
            parse_floor("-0.0"),
            Err(ElevatorError::InvalidFloor {
                reason: FloorRejection::Zero,
                ..
            })
        ));
    }

    #[test]
    fn range_errors_carry_all_violations() {
        match parse_range("a", "b") {
            Err(ElevatorError::InvalidRange { violations }) => assert_eq!(violations.len(), 2),
            other => panic!("expected InvalidRange, got {other:?}"),
        }
    }

    #[test]
    fn custom_speed_ignores_stray_characters() {
        assert_eq!(
            parse_custom_speed("35 km/s").unwrap(),
            SpeedProfile::Custom(35.0)
        );
        assert_eq!(
            parse_custom_speed("1.2.3").unwrap(),
            SpeedProfile::Custom(1.23)
        );
    }

    #[test]
    fn custom_speed_must_be_positive() {
        assert!(matches!(
            parse_custom_speed("0"),
            Err(ElevatorError::InvalidSpeed { .. })
        ));
        assert!(matches!(
            parse_custom_speed("fast"),
            Err(ElevatorError::InvalidSpeed { .. })
        ));
    }
}
