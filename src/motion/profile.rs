//! Speed profiles.

use crate::error::ElevatorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum maximum-speed at which the car runs express, skipping every
/// other floor.
pub const EXPRESS_SPEED: f64 = 30.0;

/// Maximum speed and base step interval of the car.
///
/// ```rust
/// use liftsim::motion::SpeedProfile;
/// use std::time::Duration;
///
/// assert_eq!(SpeedProfile::Fast.base_interval(), Duration::from_millis(150));
///
/// let express = SpeedProfile::custom(35.0).unwrap();
/// assert_eq!(express.floor_step(), 2);
/// assert_eq!(express.base_interval(), Duration::from_millis(75));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedProfile {
    Slow,
    #[default]
    Normal,
    Fast,
    Custom(f64),
}

impl SpeedProfile {
    /// Custom profile; the speed must be finite and positive.
    pub fn custom(speed: f64) -> Result<Self, ElevatorError> {
        if speed.is_finite() && speed > 0.0 {
            Ok(Self::Custom(speed))
        } else {
            Err(ElevatorError::InvalidSpeed {
                value: speed.to_string(),
            })
        }
    }

    /// Re-check a profile that was built directly or deserialized.
    pub fn validated(self) -> Result<Self, ElevatorError> {
        match self {
            Self::Custom(speed) => Self::custom(speed),
            preset => Ok(preset),
        }
    }

    pub fn max_speed(&self) -> f64 {
        match self {
            Self::Slow => 1.0,
            Self::Normal => 2.0,
            Self::Fast => 3.0,
            Self::Custom(speed) => *speed,
        }
    }

    /// Base time per floor before speed scaling.
    pub fn base_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(600),
            Self::Normal => Duration::from_millis(300),
            Self::Fast => Duration::from_millis(150),
            Self::Custom(speed) => {
                let millis = (600.0 - 15.0 * speed).clamp(30.0, 1000.0);
                millis_duration(millis)
            }
        }
    }

    /// Floors covered per step: 2 when express, else 1.
    pub fn floor_step(&self) -> u8 {
        if self.max_speed() >= EXPRESS_SPEED {
            2
        } else {
            1
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Custom(_) => "custom",
        }
    }
}

/// Whole-millisecond duration from a non-negative float, rounded.
pub(crate) fn millis_duration(millis: f64) -> Duration {
    Duration::from_millis(millis.max(0.0).round() as u64)
}
