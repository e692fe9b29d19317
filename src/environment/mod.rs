//! Environment around the car as a pure function of its position.
//!
//! Nothing here holds state: the elevator samples the environment after
//! every display update and hands the result to the
//! [`AlarmSupervisor`](crate::alarm::AlarmSupervisor).
//!
//! Pressure follows the raw (possibly fractional) display position so it
//! changes smoothly during a trip; the layer classifications follow the
//! rounded floor.
//!
//! ```rust
//! use liftsim::environment::{sample, GeologicalLayer};
//!
//! let below = sample(-4.2);
//! assert_eq!(below.geology, Some(GeologicalLayer::Clay));
//! assert!(below.atmosphere.is_none());
//! assert!(below.pressure_pa > 101_325);
//! ```

mod atmosphere;
mod geology;
mod pressure;

pub use atmosphere::{atmospheric_layer, temperature, AtmosphericLayer, AtmosphericReading};
pub use geology::{geological_layer, GeologicalLayer};
pub use pressure::{format_pressure, pressure, PA_PER_METRE, SEA_LEVEL_PA};

use serde::{Deserialize, Serialize};

/// Storey height used for every altitude conversion.
pub const FLOOR_HEIGHT_M: f64 = 3.0;

/// Everything the environment says about one display position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    pub display_floor: f64,
    pub pressure_pa: u64,
    pub geology: Option<GeologicalLayer>,
    pub atmosphere: Option<AtmosphericReading>,
}

impl EnvironmentSample {
    /// Air temperature when above ground.
    pub fn temperature_c(&self) -> Option<f64> {
        self.atmosphere.map(|reading| reading.temperature_c)
    }
}

/// Round a display position to the floor used for layer lookups.
pub(crate) fn round_floor(display: f64) -> i64 {
    // `as` saturates and maps NaN to 0, which has no layer
    display.round() as i64
}

/// Sample the environment at a display position.
pub fn sample(display_floor: f64) -> EnvironmentSample {
    let floor = round_floor(display_floor);
    EnvironmentSample {
        display_floor,
        pressure_pa: pressure(display_floor),
        geology: geological_layer(floor),
        atmosphere: atmospheric_layer(floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_exclusive() {
        for floor in [-50.0, -1.0, -0.4, 0.0, 0.4, 1.0, 900.0] {
            let s = sample(floor);
            assert!(!(s.geology.is_some() && s.atmosphere.is_some()));
        }
    }

    #[test]
    fn near_ground_positions_have_no_layer() {
        let s = sample(0.4);
        assert_eq!(s.geology, None);
        assert_eq!(s.atmosphere, None);
        assert_eq!(s.temperature_c(), None);
        assert!(s.pressure_pa < 101_325);
    }

    #[test]
    fn above_ground_reports_temperature() {
        let s = sample(1.6);
        assert_eq!(
            s.atmosphere.map(|r| r.layer),
            Some(AtmosphericLayer::Surface)
        );
        assert!(s.temperature_c().is_some());
    }
}
