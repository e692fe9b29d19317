//! Pressure and temperature alarms.
//!
//! The supervisor compares every environment sample against a pair of
//! thresholds per alarm. An alarm raises when its reading crosses the raise
//! threshold and clears only once the reading is back past the clear
//! threshold, so a reading hovering at the boundary does not chatter.
//!
//! While the pressure alarm is active the warning light flashes until the
//! alarm clears or is acknowledged.

use crate::elevator::Timer;
use crate::environment::EnvironmentSample;
use crate::scheduler::{Scheduler, TimerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    Pressure,
    Temperature,
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressure => f.write_str("pressure"),
            Self::Temperature => f.write_str("temperature"),
        }
    }
}

/// Raise and clear thresholds for both alarms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmThresholds {
    /// Pressure alarm raises below this many pascals
    pub pressure_raise_below_pa: u64,
    /// and clears at or above this many
    pub pressure_clear_at_or_above_pa: u64,
    /// Temperature alarm raises at or below this many °C
    pub temperature_raise_at_or_below_c: f64,
    /// and clears above this many
    pub temperature_clear_above_c: f64,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            pressure_raise_below_pa: 70_000,
            pressure_clear_at_or_above_pa: 70_000,
            temperature_raise_at_or_below_c: -30.0,
            temperature_clear_above_c: -30.0,
        }
    }
}

/// A change in alarm state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "change")]
pub enum AlarmChange {
    Raised { kind: AlarmKind, reading: f64 },
    Cleared { kind: AlarmKind },
}

/// Observable alarm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmStatus {
    pub pressure: bool,
    pub temperature: bool,
    /// Warning light currently lit
    pub warning_light: bool,
    /// Flashing silenced for the current pressure alarm
    pub acknowledged: bool,
}

#[derive(Debug, Clone)]
pub struct AlarmSupervisor {
    thresholds: AlarmThresholds,
    status: AlarmStatus,
    flash_timer: Option<TimerId>,
}

impl AlarmSupervisor {
    pub fn new(thresholds: AlarmThresholds) -> Self {
        Self {
            thresholds,
            status: AlarmStatus::default(),
            flash_timer: None,
        }
    }

    pub fn status(&self) -> AlarmStatus {
        self.status
    }

    pub fn thresholds(&self) -> &AlarmThresholds {
        &self.thresholds
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_timer.is_some()
    }

    /// Compare a sample against the thresholds. Nothing changes while the
    /// emergency stop is engaged.
    pub(crate) fn evaluate(
        &mut self,
        sample: &EnvironmentSample,
        sos_active: bool,
        scheduler: &mut Scheduler<Timer>,
        flash_period: Duration,
    ) -> Vec<AlarmChange> {
        let mut changes = Vec::new();
        if sos_active {
            return changes;
        }

        let t = self.thresholds;
        let pressure = sample.pressure_pa;
        if !self.status.pressure && pressure < t.pressure_raise_below_pa {
            self.status.pressure = true;
            self.status.acknowledged = false;
            self.start_flashing(scheduler, flash_period);
            changes.push(AlarmChange::Raised {
                kind: AlarmKind::Pressure,
                reading: pressure as f64,
            });
        } else if self.status.pressure && pressure >= t.pressure_clear_at_or_above_pa {
            self.status.pressure = false;
            self.status.acknowledged = false;
            self.stop_flashing(scheduler);
            changes.push(AlarmChange::Cleared {
                kind: AlarmKind::Pressure,
            });
        }

        // ground level and below count as warm
        match sample.temperature_c() {
            Some(temp) if !self.status.temperature && temp <= t.temperature_raise_at_or_below_c => {
                self.status.temperature = true;
                changes.push(AlarmChange::Raised {
                    kind: AlarmKind::Temperature,
                    reading: temp,
                });
            }
            reading
                if self.status.temperature
                    && reading.map_or(true, |temp| temp > t.temperature_clear_above_c) =>
            {
                self.status.temperature = false;
                changes.push(AlarmChange::Cleared {
                    kind: AlarmKind::Temperature,
                });
            }
            _ => {}
        }

        changes
    }

    /// Flash period elapsed; returns the new light state while flashing.
    pub(crate) fn on_flash(
        &mut self,
        scheduler: &mut Scheduler<Timer>,
        period: Duration,
    ) -> Option<bool> {
        self.flash_timer = None;
        if !self.status.pressure || self.status.acknowledged {
            self.status.warning_light = false;
            return None;
        }
        self.status.warning_light = !self.status.warning_light;
        self.flash_timer = Some(scheduler.schedule_in(period, Timer::AlarmFlash));
        Some(self.status.warning_light)
    }

    /// Silence the warning light without clearing the alarms. Returns
    /// whether there was anything to silence.
    pub(crate) fn acknowledge(&mut self, scheduler: &mut Scheduler<Timer>) -> bool {
        if !self.status.pressure || self.status.acknowledged {
            return false;
        }
        self.status.acknowledged = true;
        self.stop_flashing(scheduler);
        true
    }

    /// Drop both alarms and the light.
    pub(crate) fn clear_all(&mut self, scheduler: &mut Scheduler<Timer>) -> Vec<AlarmChange> {
        let mut changes = Vec::new();
        if self.status.pressure {
            changes.push(AlarmChange::Cleared {
                kind: AlarmKind::Pressure,
            });
        }
        if self.status.temperature {
            changes.push(AlarmChange::Cleared {
                kind: AlarmKind::Temperature,
            });
        }
        self.stop_flashing(scheduler);
        self.status = AlarmStatus::default();
        changes
    }

    fn start_flashing(&mut self, scheduler: &mut Scheduler<Timer>, period: Duration) {
        self.stop_flashing(scheduler);
        self.status.warning_light = true;
        self.flash_timer = Some(scheduler.schedule_in(period, Timer::AlarmFlash));
    }

    fn stop_flashing(&mut self, scheduler: &mut Scheduler<Timer>) {
        if let Some(id) = self.flash_timer.take() {
            scheduler.cancel(id);
        }
        self.status.warning_light = false;
    }
}
