//! Reachability in the zero-free floor space.
//!
//! Floors skip 0, so arithmetic on floor numbers has to go through a
//! contiguous *ordinal* index: floor 1 is ordinal 0, floor -1 is ordinal
//! -1, floor 2 is ordinal 1 and so on. Moving `n` steps of size `s` is
//! then plain addition of `n * s` ordinals, and crossing ground level
//! needs no special case.
//!
//! Ordinals are `i128` so any pair of `i64` floors has a representable
//! difference.

use super::Direction;
use crate::core::FloorRange;

/// Contiguous index of a floor. Floor 0 does not exist; it maps to the
/// same ordinal as floor 1.
///
/// ```rust
/// use liftsim::motion::reach::ordinal;
///
/// assert_eq!(ordinal(1), 0);
/// assert_eq!(ordinal(-1), -1);
/// assert_eq!(ordinal(5) - ordinal(-5), 9);
/// ```
pub fn ordinal(floor: i64) -> i128 {
    let floor = i128::from(floor);
    if floor > 0 {
        floor - 1
    } else {
        floor
    }
}

/// Floor at an ordinal index, `None` when it does not fit in an `i64`.
pub fn floor_at(ordinal: i128) -> Option<i64> {
    let floor = if ordinal >= 0 { ordinal + 1 } else { ordinal };
    i64::try_from(floor).ok()
}

/// Number of floors passed going from `from` to `to`, counting the arrival
/// floor and never counting floor 0.
pub fn ordinal_distance(from: i64, to: i64) -> u128 {
    (ordinal(to) - ordinal(from)).unsigned_abs()
}

/// Floor one `step` away from `current` in `direction`, if it lies in
/// `range`.
pub fn relative_destination(
    current: i64,
    direction: Direction,
    step: u8,
    range: &FloorRange,
) -> Option<i64> {
    let ordinal = ordinal(current) + direction.signum() * i128::from(step);
    floor_at(ordinal).filter(|floor| range.contains(*floor))
}

/// Where a direct trip actually stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub floor: i64,
    /// Whether `floor` is the requested target.
    pub exact: bool,
}

/// Landing floor for a trip from `current` to `target` moving `step`
/// ordinals at a time.
///
/// When the target is not a whole number of steps away, the two reachable
/// floors either side of it are considered: the one closer in floor number
/// wins, ties go to the floor beyond the target, and a candidate outside
/// `range` is never chosen. The floor short of the target always lies
/// between `current` and `target`, so a landing always exists.
///
/// ```rust
/// use liftsim::core::FloorRange;
/// use liftsim::motion::reach::{landing_floor, Landing};
///
/// let range = FloorRange::new(-10, 10).unwrap();
/// // Express from 4 down to 1 stops at 2: the other candidate, -1, is
/// // two floors away once ground level is skipped.
/// assert_eq!(landing_floor(4, 1, 2, &range), Landing { floor: 2, exact: false });
/// assert_eq!(landing_floor(1, 5, 2, &range), Landing { floor: 5, exact: true });
/// ```
pub fn landing_floor(current: i64, target: i64, step: u8, range: &FloorRange) -> Landing {
    let step = i128::from(step.max(1));
    let diff = ordinal(target) - ordinal(current);
    let remainder = diff.abs() % step;
    if remainder == 0 {
        return Landing {
            floor: target,
            exact: true,
        };
    }

    let sign = diff.signum();
    let short = ordinal(target) - sign * remainder;
    let beyond = short + sign * step;

    let short_floor = floor_at(short).unwrap_or(current);
    let beyond_floor = floor_at(beyond).filter(|floor| range.contains(*floor));

    let gap = |floor: i64| (i128::from(floor) - i128::from(target)).abs();
    let floor = match beyond_floor {
        Some(beyond) if gap(beyond) <= gap(short_floor) => beyond,
        _ => short_floor,
    };
    Landing {
        floor,
        exact: false,
    }
}
