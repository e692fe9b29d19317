//! Emergency stop.
//!
//! While active the elevator refuses motion and door commands, a beacon
//! fires at a fixed period, and an optional timeout switches the
//! emergency off again on its own.

use crate::elevator::Timer;
use crate::scheduler::{Scheduler, SimInstant, TimerId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why the emergency stop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SosClearReason {
    Manual,
    Timeout,
    Reset,
}

/// Observable emergency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SosStatus {
    pub active: bool,
    pub activated_at: Option<SimInstant>,
    /// When the emergency clears by itself, if it does
    pub auto_clear_at: Option<SimInstant>,
    /// Beacons sent during the current emergency
    pub beacons: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SosController {
    status: SosStatus,
    beacon_timer: Option<TimerId>,
    timeout_timer: Option<TimerId>,
}

impl SosController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status.active
    }

    pub fn status(&self) -> SosStatus {
        self.status
    }

    /// Engage the emergency, arming the beacon and the optional timeout.
    pub(crate) fn activate(
        &mut self,
        scheduler: &mut Scheduler<Timer>,
        beacon_period: Duration,
        timeout: Option<Duration>,
    ) {
        self.cancel_timers(scheduler);
        let now = scheduler.now();
        self.status = SosStatus {
            active: true,
            activated_at: Some(now),
            auto_clear_at: timeout.map(|timeout| now + timeout),
            beacons: 0,
        };
        self.beacon_timer = Some(scheduler.schedule_in(beacon_period, Timer::SosBeacon));
        self.timeout_timer = timeout.map(|timeout| scheduler.schedule_in(timeout, Timer::SosTimeout));
    }

    /// Switch the emergency off. Returns whether it was active.
    pub(crate) fn deactivate(&mut self, scheduler: &mut Scheduler<Timer>) -> bool {
        self.cancel_timers(scheduler);
        let was_active = self.status.active;
        self.status = SosStatus::default();
        was_active
    }

    /// Beacon period elapsed; returns the beacon count if still active.
    pub(crate) fn on_beacon(
        &mut self,
        scheduler: &mut Scheduler<Timer>,
        period: Duration,
    ) -> Option<u64> {
        self.beacon_timer = None;
        if !self.status.active {
            return None;
        }
        self.status.beacons += 1;
        self.beacon_timer = Some(scheduler.schedule_in(period, Timer::SosBeacon));
        Some(self.status.beacons)
    }

    /// Timeout elapsed; returns whether this ended the emergency.
    pub(crate) fn on_timeout(&mut self, scheduler: &mut Scheduler<Timer>) -> bool {
        self.timeout_timer = None;
        self.deactivate(scheduler)
    }

    fn cancel_timers(&mut self, scheduler: &mut Scheduler<Timer>) {
        if let Some(id) = self.beacon_timer.take() {
            scheduler.cancel(id);
        }
        if let Some(id) = self.timeout_timer.take() {
            scheduler.cancel(id);
        }
    }
}
