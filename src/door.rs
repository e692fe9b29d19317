//! Door controller.
//!
//! The door is either open or closed; its movement between the two is
//! modelled as a delay on the simulated clock. An arrival runs the
//! automatic cycle (open, hold, close). A manual open keeps the door open
//! until someone closes it, and a manual close completes after one
//! transit time.

use crate::core::{State, StateHistory, StateTransition};
use crate::elevator::Timer;
use crate::error::ElevatorError;
use crate::scheduler::{Scheduler, SimInstant, TimerId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Position of the car door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Open,
    #[default]
    Closed,
}

impl State for DoorState {
    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    fn is_at_rest(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Durations of the automatic door cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTiming {
    pub open: Duration,
    pub hold: Duration,
    pub close: Duration,
}

impl DoorTiming {
    /// Time from the start of an automatic cycle until the door is shut.
    pub fn cycle(&self) -> Duration {
        self.open + self.hold + self.close
    }
}

#[derive(Debug, Clone)]
pub struct DoorController {
    state: DoorState,
    /// Automatic cycle waiting to start
    open_timer: Option<TimerId>,
    /// Door closing
    close_timer: Option<TimerId>,
    history: StateHistory<DoorState>,
}

impl DoorController {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            state: DoorState::Closed,
            open_timer: None,
            close_timer: None,
            history: StateHistory::with_capacity(history_capacity),
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    /// Whether a close is under way.
    pub fn is_closing(&self) -> bool {
        self.close_timer.is_some()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.open_timer.is_some() || self.close_timer.is_some()
    }

    pub fn history(&self) -> &StateHistory<DoorState> {
        &self.history
    }

    /// Start the automatic cycle after `delay`.
    pub(crate) fn schedule_cycle(&mut self, scheduler: &mut Scheduler<Timer>, delay: Duration) {
        self.cancel_timers(scheduler);
        self.open_timer = Some(scheduler.schedule_in(delay, Timer::DoorOpen));
    }

    /// Run the automatic cycle now: open, then close after the full cycle.
    pub(crate) fn start_cycle(&mut self, scheduler: &mut Scheduler<Timer>, timing: &DoorTiming) {
        self.cancel_timers(scheduler);
        self.set_state(DoorState::Open, scheduler.now());
        self.close_timer = Some(scheduler.schedule_in(timing.cycle(), Timer::DoorClose));
        info!(closes_in_ms = timing.cycle().as_millis() as u64, "door cycle started");
    }

    /// The scheduled cycle start is due.
    pub(crate) fn on_open_due(&mut self, scheduler: &mut Scheduler<Timer>, timing: &DoorTiming) {
        self.open_timer = None;
        self.start_cycle(scheduler, timing);
    }

    /// Open and stay open.
    pub(crate) fn open_manually(&mut self, scheduler: &mut Scheduler<Timer>) {
        self.cancel_timers(scheduler);
        self.set_state(DoorState::Open, scheduler.now());
        info!("door held open");
    }

    /// Begin closing; the door is shut after `transit`.
    pub(crate) fn close_manually(
        &mut self,
        scheduler: &mut Scheduler<Timer>,
        transit: Duration,
    ) -> Result<(), ElevatorError> {
        if self.state == DoorState::Closed {
            return Err(ElevatorError::DoorAlreadyClosed);
        }
        self.cancel_timers(scheduler);
        self.close_timer = Some(scheduler.schedule_in(transit, Timer::DoorClose));
        info!(transit_ms = transit.as_millis() as u64, "door closing");
        Ok(())
    }

    /// The door has finished closing.
    pub(crate) fn on_close_due(&mut self, now: SimInstant) {
        self.close_timer = None;
        self.set_state(DoorState::Closed, now);
    }

    /// Shut the door at once and drop any pending sequence, as when the car
    /// starts moving.
    pub(crate) fn force_close(&mut self, scheduler: &mut Scheduler<Timer>) {
        self.cancel_timers(scheduler);
        self.set_state(DoorState::Closed, scheduler.now());
    }

    /// Drop pending timers, leaving the door where it is.
    pub(crate) fn cancel_timers(&mut self, scheduler: &mut Scheduler<Timer>) {
        if let Some(id) = self.open_timer.take() {
            scheduler.cancel(id);
        }
        if let Some(id) = self.close_timer.take() {
            scheduler.cancel(id);
        }
    }

    fn set_state(&mut self, state: DoorState, now: SimInstant) {
        if self.state == state {
            return;
        }
        self.history.record(StateTransition {
            from: self.state,
            to: state,
            at: now,
        });
        self.state = state;
    }
}
