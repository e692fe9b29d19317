//! Atmospheric layers and the standard temperature lapse above ground.

use super::FLOOR_HEIGHT_M;
use serde::{Deserialize, Serialize};

/// Atmospheric band around the car, by altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphericLayer {
    /// Up to 50 m
    Surface,
    /// Up to 500 m
    LowAltitude,
    /// Up to 12 km
    Troposphere,
    /// Up to 50 km
    Stratosphere,
    /// Up to 85 km
    Mesosphere,
    /// Up to 600 km
    Thermosphere,
    Exosphere,
}

impl AtmosphericLayer {
    pub const ALL: [AtmosphericLayer; 7] = [
        Self::Surface,
        Self::LowAltitude,
        Self::Troposphere,
        Self::Stratosphere,
        Self::Mesosphere,
        Self::Thermosphere,
        Self::Exosphere,
    ];

    /// Layer containing `altitude_m` metres above ground.
    pub fn at_altitude(altitude_m: f64) -> Self {
        match altitude_m {
            a if a <= 50.0 => Self::Surface,
            a if a <= 500.0 => Self::LowAltitude,
            a if a <= 12_000.0 => Self::Troposphere,
            a if a <= 50_000.0 => Self::Stratosphere,
            a if a <= 85_000.0 => Self::Mesosphere,
            a if a <= 600_000.0 => Self::Thermosphere,
            _ => Self::Exosphere,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Surface => "Surface",
            Self::LowAltitude => "Low altitude",
            Self::Troposphere => "Troposphere",
            Self::Stratosphere => "Stratosphere",
            Self::Mesosphere => "Mesosphere",
            Self::Thermosphere => "Thermosphere",
            Self::Exosphere => "Exosphere",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Surface => "Buildings and everyday human activity",
            Self::LowAltitude => "Low-level flight and high-rise towers",
            Self::Troposphere => "Where most weather happens",
            Self::Stratosphere => "Home of the ozone layer, temperature steady",
            Self::Mesosphere => "The coldest layer of the atmosphere",
            Self::Thermosphere => "Where aurorae form",
            Self::Exosphere => "Transition from atmosphere to space",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Surface => "🏢",
            Self::LowAltitude => "🏗️",
            Self::Troposphere => "☁️",
            Self::Stratosphere => "🌌",
            Self::Mesosphere => "❄️",
            Self::Thermosphere => "🌠",
            Self::Exosphere => "🚀",
        }
    }
}

/// Layer and air temperature at an above-ground floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericReading {
    pub layer: AtmosphericLayer,
    pub altitude_m: f64,
    pub temperature_c: f64,
}

/// Air temperature in °C at `altitude_m`, piecewise linear in the style of
/// the International Standard Atmosphere.
///
/// ```rust
/// use liftsim::environment::temperature;
///
/// assert_eq!(temperature(0.0), 15.0);
/// assert_eq!(temperature(15_000.0), -56.5);
/// ```
pub fn temperature(altitude_m: f64) -> f64 {
    let km = altitude_m / 1000.0;
    match km {
        k if k <= 11.0 => 15.0 - 6.5 * k,
        k if k <= 20.0 => -56.5,
        k if k <= 32.0 => -56.5 + (k - 20.0),
        k if k <= 47.0 => -44.5 + 2.8 * (k - 32.0),
        k if k <= 85.0 => -2.5 - 2.8 * (k - 47.0),
        k => -86.28 + 0.5 * (k - 85.0),
    }
}

/// Reading for a floor above ground; `None` at or below ground.
pub fn atmospheric_layer(floor: i64) -> Option<AtmosphericReading> {
    if floor <= 0 {
        return None;
    }
    let altitude_m = floor as f64 * FLOOR_HEIGHT_M;
    Some(AtmosphericReading {
        layer: AtmosphericLayer::at_altitude(altitude_m),
        altitude_m,
        temperature_c: temperature(altitude_m),
    })
}
