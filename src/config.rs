//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs the fields it
//! changes:
//!
//! ```rust
//! use liftsim::config::ElevatorConfig;
//! use liftsim::motion::SpeedProfile;
//!
//! let config = ElevatorConfig::from_json_str(r#"{
//!     "speed_profile": "fast",
//!     "timing": { "sos_timeout_ms": null }
//! }"#).unwrap();
//!
//! assert_eq!(config.speed_profile, SpeedProfile::Fast);
//! assert_eq!(config.timing.sos_timeout(), None);
//! assert_eq!(config.initial_floor, 1);
//! ```

use crate::alarm::AlarmThresholds;
use crate::core::{FloorRange, DEFAULT_HISTORY_CAPACITY};
use crate::door::DoorTiming;
use crate::motion::SpeedProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Durations driving the timed sequences, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Display sampling period while moving
    pub frame_ms: u64,
    /// Door cycle delay after a one-step move
    pub relative_door_delay_ms: u64,
    /// Door cycle delay after a direct trip
    pub direct_door_delay_ms: u64,
    pub door_open_ms: u64,
    pub door_hold_ms: u64,
    pub door_close_ms: u64,
    pub sos_beacon_ms: u64,
    /// `None` keeps the emergency on until switched off
    pub sos_timeout_ms: Option<u64>,
    /// Warning light half-period
    pub alarm_flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: 50,
            relative_door_delay_ms: 200,
            direct_door_delay_ms: 300,
            door_open_ms: 1_000,
            door_hold_ms: 2_000,
            door_close_ms: 1_000,
            sos_beacon_ms: 1_000,
            sos_timeout_ms: Some(10_000),
            alarm_flash_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn relative_door_delay(&self) -> Duration {
        Duration::from_millis(self.relative_door_delay_ms)
    }

    pub fn direct_door_delay(&self) -> Duration {
        Duration::from_millis(self.direct_door_delay_ms)
    }

    pub fn door(&self) -> DoorTiming {
        DoorTiming {
            open: Duration::from_millis(self.door_open_ms),
            hold: Duration::from_millis(self.door_hold_ms),
            close: Duration::from_millis(self.door_close_ms),
        }
    }

    pub fn sos_beacon(&self) -> Duration {
        Duration::from_millis(self.sos_beacon_ms)
    }

    pub fn sos_timeout(&self) -> Option<Duration> {
        self.sos_timeout_ms.map(Duration::from_millis)
    }

    pub fn alarm_flash(&self) -> Duration {
        Duration::from_millis(self.alarm_flash_ms)
    }
}

/// Complete configuration of one elevator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Floor the car starts at and returns to on reset
    pub initial_floor: i64,
    pub floor_range: FloorRange,
    pub speed_profile: SpeedProfile,
    /// Add the cosmetic wobble to the display while moving
    pub display_jitter: bool,
    /// Phase and door transitions retained for inspection
    pub history_capacity: usize,
    pub timing: TimingConfig,
    pub alarms: AlarmThresholds,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            initial_floor: 1,
            floor_range: FloorRange::default(),
            speed_profile: SpeedProfile::default(),
            display_jitter: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            timing: TimingConfig::default(),
            alarms: AlarmThresholds::default(),
        }
    }
}

/// A single problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("floor range {min}..={max} is empty: lowest floor must be below highest")]
    EmptyRange { min: i64, max: i64 },

    #[error("initial floor cannot be 0")]
    ZeroInitialFloor,

    #[error("initial floor {floor} lies outside {min}..={max}")]
    InitialFloorOutOfRange { floor: i64, min: i64, max: i64 },

    #[error("custom speed {speed} must be finite and positive")]
    InvalidSpeed { speed: f64 },

    #[error("{field} must be greater than zero")]
    ZeroPeriod { field: &'static str },

    #[error("history capacity must be at least 1")]
    ZeroHistory,

    #[error("{alarm} alarm clears before it raises: raise {raise}, clear {clear}")]
    InvertedHysteresis {
        alarm: &'static str,
        raise: f64,
        clear: f64,
    },
}

/// Errors loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {}", describe(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

impl ElevatorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every field, accumulating ALL violations.
    pub fn check(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let range = &self.floor_range;
        let (min, max) = (range.min(), range.max());
        let timing = &self.timing;
        let alarms = &self.alarms;

        let mut checks = vec![
            check(min < max, || ConfigViolation::EmptyRange { min, max }),
            check(self.initial_floor != 0, || ConfigViolation::ZeroInitialFloor),
            check(self.speed_profile.validated().is_ok(), || {
                ConfigViolation::InvalidSpeed {
                    speed: self.speed_profile.max_speed(),
                }
            }),
            check(self.history_capacity > 0, || ConfigViolation::ZeroHistory),
            check(
                alarms.pressure_clear_at_or_above_pa >= alarms.pressure_raise_below_pa,
                || ConfigViolation::InvertedHysteresis {
                    alarm: "pressure",
                    raise: alarms.pressure_raise_below_pa as f64,
                    clear: alarms.pressure_clear_at_or_above_pa as f64,
                },
            ),
            check(
                alarms.temperature_clear_above_c >= alarms.temperature_raise_at_or_below_c,
                || ConfigViolation::InvertedHysteresis {
                    alarm: "temperature",
                    raise: alarms.temperature_raise_at_or_below_c,
                    clear: alarms.temperature_clear_above_c,
                },
            ),
        ];

        if self.initial_floor != 0 {
            checks.push(check(
                (min..=max).contains(&self.initial_floor),
                || ConfigViolation::InitialFloorOutOfRange {
                    floor: self.initial_floor,
                    min,
                    max,
                },
            ));
        }

        let periods = [
            ("frame_ms", timing.frame_ms),
            ("sos_beacon_ms", timing.sos_beacon_ms),
            ("alarm_flash_ms", timing.alarm_flash_ms),
            ("sos_timeout_ms", timing.sos_timeout_ms.unwrap_or(1)),
        ];
        for (field, value) in periods {
            checks.push(check(value > 0, || ConfigViolation::ZeroPeriod { field }));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Like [`check`](Self::check) but as a `Result`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.check() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }
}
