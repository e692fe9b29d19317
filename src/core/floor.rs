//! Floor numbering and the configurable floor range.
//!
//! Floors are signed integers with no floor 0: negative floors are below
//! ground ("B" floors), positive floors above ground ("F" floors).

use crate::error::{ElevatorError, FloorRejection};
use crate::validation::RangeViolation;
use serde::{Deserialize, Serialize};

/// Largest magnitude a floor can have while its `f64` display position is
/// still exact (2^53 - 1).
pub const MAX_SAFE_FLOOR: i64 = 9_007_199_254_740_991;

/// Span above which [`floor_buttons`] lists only floors near the car.
pub const FULL_LISTING_SPAN: i128 = 10_000;

/// Floors either side of the car listed for very tall buildings.
pub const NEARBY_LISTING_RADIUS: i64 = 50;

/// Inclusive range of serviceable floors, `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRange {
    min: i64,
    max: i64,
}

impl Default for FloorRange {
    fn default() -> Self {
        Self {
            min: -1000,
            max: 2000,
        }
    }
}

impl FloorRange {
    pub fn new(min: i64, max: i64) -> Result<Self, ElevatorError> {
        if min >= max {
            return Err(ElevatorError::InvalidRange {
                violations: vec![RangeViolation::MinNotBelowMax { min, max }],
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, floor: i64) -> bool {
        (self.min..=self.max).contains(&floor)
    }

    /// Clamp `floor` into the range, stepping off zero when the nearest
    /// bound is 0. A range with `min < max` always holds a non-zero floor.
    pub fn clamp(&self, floor: i64) -> i64 {
        let clamped = floor.clamp(self.min, self.max);
        match clamped {
            0 if self.max == 0 => -1,
            0 => 1,
            f => f,
        }
    }

    /// Check that `floor` is a real, serviceable floor.
    pub fn validate(&self, floor: i64) -> Result<i64, ElevatorError> {
        if floor == 0 {
            return Err(ElevatorError::invalid_floor(floor, FloorRejection::Zero));
        }
        if !self.contains(floor) {
            return Err(ElevatorError::invalid_floor(
                floor,
                FloorRejection::OutOfRange {
                    min: self.min,
                    max: self.max,
                },
            ));
        }
        Ok(floor)
    }
}

/// Human-facing label: `B3` below ground, `F12` above, `0` for the
/// (non-existent) ground plane.
///
/// ```rust
/// use liftsim::format_floor;
///
/// assert_eq!(format_floor(-3), "B3");
/// assert_eq!(format_floor(12), "F12");
/// ```
pub fn format_floor(floor: i64) -> String {
    match floor {
        f if f < 0 => format!("B{}", f.unsigned_abs()),
        f if f > 0 => format!("F{f}"),
        _ => "0".to_string(),
    }
}

/// The committed floor closest to a display position: rounds, steps off
/// zero toward the side the position is on, then clamps into `range`.
pub fn nearest_floor(display: f64, range: &FloorRange) -> i64 {
    if !display.is_finite() {
        return range.clamp(1);
    }
    let rounded = display.round();
    let floor = if rounded >= i64::MAX as f64 {
        i64::MAX
    } else if rounded <= i64::MIN as f64 {
        i64::MIN
    } else {
        rounded as i64
    };
    let floor = match floor {
        0 if display < 0.0 => -1,
        0 => 1,
        f => f,
    };
    range.clamp(floor)
}

/// Floors to offer on a selection panel, ascending, zero skipped.
///
/// Spans up to [`FULL_LISTING_SPAN`] list every floor; taller buildings
/// list the floors within [`NEARBY_LISTING_RADIUS`] of `current` plus both
/// range bounds.
pub fn floor_buttons(range: &FloorRange, current: i64) -> Vec<i64> {
    let span = i128::from(range.max) - i128::from(range.min);
    if span <= FULL_LISTING_SPAN {
        return (range.min..=range.max).filter(|f| *f != 0).collect();
    }

    let start = current
        .saturating_sub(NEARBY_LISTING_RADIUS)
        .max(range.min);
    let end = current.saturating_add(NEARBY_LISTING_RADIUS).min(range.max);

    let mut floors = Vec::new();
    if range.min < start && range.min != 0 {
        floors.push(range.min);
    }
    floors.extend((start..=end).filter(|f| *f != 0));
    if range.max > end && range.max != 0 {
        floors.push(range.max);
    }
    floors
}
