//! Command rejections and non-fatal warnings.
//!
//! Every command on [`Elevator`](crate::Elevator) returns
//! `Result<Accepted, ElevatorError>`. Rejections are recoverable and leave
//! the simulation untouched; warnings ride along with a successful result.

use crate::core::floor::MAX_SAFE_FLOOR;
use crate::motion::Direction;
use crate::validation::RangeViolation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a gated command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyReason {
    /// A trip is in flight
    Moving,
    /// The emergency stop is engaged
    SosActive,
}

impl fmt::Display for BusyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moving => f.write_str("elevator is moving"),
            Self::SosActive => f.write_str("emergency stop is active"),
        }
    }
}

/// Why a floor value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorRejection {
    /// There is no floor 0
    Zero,
    NotInteger,
    Unparsable,
    NonFinite,
    /// Integral but outside what a signed 64-bit floor can hold
    Unrepresentable,
    OutOfRange { min: i64, max: i64 },
}

impl fmt::Display for FloorRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("floor 0 does not exist"),
            Self::NotInteger => f.write_str("floor must be a whole number"),
            Self::Unparsable => f.write_str("not a number"),
            Self::NonFinite => f.write_str("floor must be finite"),
            Self::Unrepresentable => f.write_str("floor is too large to represent"),
            Self::OutOfRange { min, max } => write!(f, "floor must lie within [{min}, {max}]"),
        }
    }
}

/// Errors returned by elevator commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElevatorError {
    #[error("invalid floor '{value}': {reason}")]
    InvalidFloor {
        value: String,
        reason: FloorRejection,
    },

    #[error("cannot move {direction}: floor {limit} is the last floor that way")]
    BoundaryReached { direction: Direction, limit: i64 },

    #[error("command rejected: {reason}")]
    Busy { reason: BusyReason },

    #[error("invalid floor range: {}", describe_violations(.violations))]
    InvalidRange { violations: Vec<RangeViolation> },

    #[error("invalid custom speed '{value}': must be a positive finite number")]
    InvalidSpeed { value: String },

    #[error("door is already closed")]
    DoorAlreadyClosed,
}

impl ElevatorError {
    pub(crate) fn invalid_floor(value: impl ToString, reason: FloorRejection) -> Self {
        Self::InvalidFloor {
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this rejection was caused by the elevator's current activity
    /// rather than by the command's arguments.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

fn describe_violations(violations: &[RangeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Non-fatal condition reported alongside an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Warning {
    /// The floor is beyond the range a display value can track exactly.
    Precision { value: i64 },
}

impl Warning {
    /// Precision warning for `value` if it lies past the safe-integer bound.
    pub fn precision(value: i64) -> Option<Self> {
        (value.unsigned_abs() > MAX_SAFE_FLOOR as u64).then_some(Self::Precision { value })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precision { value } => write!(
                f,
                "floor {value} exceeds the safe integer range; positions may lose precision"
            ),
        }
    }
}

/// Successful command outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub warnings: Vec<Warning>,
}

impl Accepted {
    pub fn with_warnings(warnings: Vec<Warning>) -> Self {
        Self { warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub type CommandResult = Result<Accepted, ElevatorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Bound;

    #[test]
    fn precision_warning_only_past_safe_bound() {
        assert_eq!(Warning::precision(MAX_SAFE_FLOOR), None);
        assert_eq!(Warning::precision(-MAX_SAFE_FLOOR), None);
        assert_eq!(
            Warning::precision(MAX_SAFE_FLOOR + 1),
            Some(Warning::Precision {
                value: MAX_SAFE_FLOOR + 1
            })
        );
        assert!(Warning::precision(i64::MIN).is_some());
    }

    #[test]
    fn invalid_range_lists_every_violation() {
        let err = ElevatorError::InvalidRange {
            violations: vec![
                RangeViolation::Unparsable {
                    bound: Bound::Min,
                    text: "abc".to_string(),
                },
                RangeViolation::NonFinite { bound: Bound::Max },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("abc"));
        assert!(message.contains("; "));
    }

    #[test]
    fn busy_is_classified() {
        let busy = ElevatorError::Busy {
            reason: BusyReason::Moving,
        };
        assert!(busy.is_busy());
        assert!(!ElevatorError::DoorAlreadyClosed.is_busy());
        assert_eq!(busy.to_string(), "command rejected: elevator is moving");
    }

    #[test]
    fn floor_rejection_messages_name_the_range() {
        let err = ElevatorError::invalid_floor(
            7,
            FloorRejection::OutOfRange { min: -2, max: 5 },
        );
        assert_eq!(
            err.to_string(),
            "invalid floor '7': floor must lie within [-2, 5]"
        );
    }
}
