//! Floor range validation.

use crate::core::FloorRange;
use crate::error::FloorRejection;
use crate::input::parse_integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Which end of a range a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Min,
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("lowest floor"),
            Self::Max => f.write_str("highest floor"),
        }
    }
}

/// A single problem with a requested floor range.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RangeViolation {
    #[error("{bound} '{text}' is not a number")]
    Unparsable { bound: Bound, text: String },

    #[error("{bound} must be finite")]
    NonFinite { bound: Bound },

    #[error("{bound} must be a whole number")]
    NotInteger { bound: Bound },

    #[error("{bound} is too large to represent")]
    Unrepresentable { bound: Bound },

    #[error("lowest floor {min} must be below highest floor {max}")]
    MinNotBelowMax { min: i64, max: i64 },
}

impl RangeViolation {
    fn from_rejection(bound: Bound, text: &str, rejection: FloorRejection) -> Self {
        match rejection {
            FloorRejection::NonFinite => Self::NonFinite { bound },
            FloorRejection::NotInteger => Self::NotInteger { bound },
            FloorRejection::Unrepresentable => Self::Unrepresentable { bound },
            _ => Self::Unparsable {
                bound,
                text: text.to_string(),
            },
        }
    }
}

fn parse_bound(bound: Bound, text: &str) -> Result<i64, RangeViolation> {
    parse_integer(text).map_err(|rejection| RangeViolation::from_rejection(bound, text, rejection))
}

fn as_check(parsed: &Result<i64, RangeViolation>) -> Validation<(), NonEmptyVec<RangeViolation>> {
    match parsed {
        Ok(_) => Validation::success(()),
        Err(violation) => Validation::fail(violation.clone()),
    }
}

/// Parse and check both ends of a floor range typed by a user,
/// accumulating every violation.
///
/// Zero is an acceptable bound: a range of `0..=10` services floors 1-10.
pub fn validate_range(min: &str, max: &str) -> Result<FloorRange, Vec<RangeViolation>> {
    let min_bound = parse_bound(Bound::Min, min);
    let max_bound = parse_bound(Bound::Max, max);

    let mut checks = vec![as_check(&min_bound), as_check(&max_bound)];
    if let (Ok(lo), Ok(hi)) = (&min_bound, &max_bound) {
        checks.push(if lo < hi {
            Validation::success(())
        } else {
            Validation::fail(RangeViolation::MinNotBelowMax { min: *lo, max: *hi })
        });
    }

    if let Validation::Failure(errors) = Validation::all_vec(checks) {
        return Err(errors.iter().cloned().collect());
    }

    let min = min_bound.map_err(|violation| vec![violation])?;
    let max = max_bound.map_err(|violation| vec![violation])?;
    FloorRange::new(min, max).map_err(|_| vec![RangeViolation::MinNotBelowMax { min, max }])
}
