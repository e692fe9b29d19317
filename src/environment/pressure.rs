//! Barometric pressure by floor.

use super::FLOOR_HEIGHT_M;

/// Standard sea-level pressure at ground level, in pascals.
pub const SEA_LEVEL_PA: f64 = 101_325.0;

/// Linear pressure drop per metre of height.
pub const PA_PER_METRE: f64 = 12.0;

/// Pressure at a (possibly fractional) floor position, rounded to the
/// nearest pascal and clamped at vacuum.
///
/// ```rust
/// use liftsim::environment::pressure;
///
/// assert_eq!(pressure(0.0), 101_325);
/// assert_eq!(pressure(10.0), 100_965);
/// assert_eq!(pressure(2000.0), 0);
/// ```
pub fn pressure(floor: f64) -> u64 {
    let height = floor * FLOOR_HEIGHT_M;
    let pa = (SEA_LEVEL_PA - height * PA_PER_METRE).max(0.0);
    // float-to-int `as` saturates, so very deep basements cannot wrap
    pa.round() as u64
}

/// `101.33 kPa` at or above one kilopascal, `850 Pa` below.
pub fn format_pressure(pa: u64) -> String {
    if pa >= 1000 {
        format!("{:.2} kPa", pa as f64 / 1000.0)
    } else {
        format!("{pa} Pa")
    }
}
