//! The elevator: single owner of all simulation state.
//!
//! [`Elevator`] ties the controllers together over one virtual clock.
//! Commands (see the `commands` module) change state immediately and
//! schedule follow-up timers; [`Elevator::advance`] moves the clock and
//! fires those timers in order. After every fired timer the display is
//! refreshed and the environment and alarms re-evaluated, so each timer
//! sees the effects of the ones before it.
//!
//! # Example
//!
//! ```rust
//! use liftsim::{Elevator, ElevatorConfig, MotionPhase};
//! use std::time::Duration;
//!
//! let mut elevator = Elevator::new(ElevatorConfig::default()).unwrap();
//! elevator.request_go_to(-5).unwrap();
//! assert!(elevator.is_moving());
//!
//! elevator.advance(Duration::from_millis(1_740));
//! assert_eq!(elevator.current_floor(), -5);
//! assert_eq!(elevator.phase(), MotionPhase::Stopped);
//! ```

mod commands;
mod events;
mod guards;
mod snapshot;
mod timer;

pub use commands::Command;
pub use events::{ElevatorEvent, EventRecord};
pub use snapshot::ElevatorSnapshot;
pub(crate) use timer::Timer;

use crate::alarm::{AlarmChange, AlarmStatus, AlarmSupervisor};
use crate::config::{ConfigError, ElevatorConfig};
use crate::core::{self, FloorRange, StateHistory};
use crate::door::{DoorController, DoorState};
use crate::environment::{self, format_pressure, EnvironmentSample};
use crate::motion::{MotionController, MotionPhase, SpeedProfile, TripKind, TripProgress};
use crate::scheduler::{Scheduler, SimInstant, TimerId};
use crate::sos::{SosClearReason, SosController, SosStatus};
use guards::{CommandContext, CommandGuards};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Elevator {
    config: ElevatorConfig,
    range: FloorRange,
    profile: SpeedProfile,
    scheduler: Scheduler<Timer>,
    motion: MotionController,
    door: DoorController,
    sos: SosController,
    alarms: AlarmSupervisor,
    guards: CommandGuards,
    environment: EnvironmentSample,
    /// Pending tick or arrival of the trip in flight
    motion_timer: Option<TimerId>,
    frame_timer: Option<TimerId>,
    events: Vec<EventRecord>,
}

impl Default for Elevator {
    fn default() -> Self {
        Self::build(ElevatorConfig::default())
    }
}

impl Elevator {
    /// Validate `config` and build an elevator at its initial floor.
    pub fn new(config: ElevatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ElevatorConfig) -> Self {
        let range = config.floor_range;
        let floor = range.clamp(config.initial_floor);
        let mut elevator = Self {
            range,
            profile: config.speed_profile,
            scheduler: Scheduler::new(),
            motion: MotionController::new(floor, config.history_capacity),
            door: DoorController::new(config.history_capacity),
            sos: SosController::new(),
            alarms: AlarmSupervisor::new(config.alarms),
            guards: CommandGuards::new(),
            environment: environment::sample(floor as f64),
            motion_timer: None,
            frame_timer: None,
            events: Vec::new(),
            config,
        };
        elevator.observe();
        elevator
    }

    pub fn config(&self) -> &ElevatorConfig {
        &self.config
    }

    /// Current simulated time.
    pub fn now(&self) -> SimInstant {
        self.scheduler.now()
    }

    pub fn floor_range(&self) -> FloorRange {
        self.range
    }

    pub fn speed_profile(&self) -> SpeedProfile {
        self.profile
    }

    pub fn current_floor(&self) -> i64 {
        self.motion.current_floor()
    }

    pub fn display_floor(&self) -> f64 {
        self.motion.display_floor()
    }

    pub fn target_floor(&self) -> Option<i64> {
        self.motion.target_floor()
    }

    pub fn phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    pub fn speed(&self) -> f64 {
        self.motion.speed()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    pub fn door_state(&self) -> DoorState {
        self.door.state()
    }

    pub fn sos_status(&self) -> SosStatus {
        self.sos.status()
    }

    pub fn alarm_status(&self) -> AlarmStatus {
        self.alarms.status()
    }

    pub fn environment(&self) -> &EnvironmentSample {
        &self.environment
    }

    pub fn motion_history(&self) -> &StateHistory<MotionPhase> {
        self.motion.history()
    }

    pub fn door_history(&self) -> &StateHistory<DoorState> {
        self.door.history()
    }

    /// Floors to offer on a selection panel.
    pub fn floor_buttons(&self) -> Vec<i64> {
        core::floor_buttons(&self.range, self.current_floor())
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        let current_floor = self.current_floor();
        ElevatorSnapshot {
            at: self.now(),
            current_floor,
            floor_label: core::format_floor(current_floor),
            display_floor: self.display_floor(),
            target_floor: self.target_floor(),
            direction: self.motion.trip().map(|plan| plan.direction()),
            phase: self.phase(),
            speed: self.speed(),
            speed_profile: self.profile,
            floor_range: self.range,
            door: self.door.state(),
            door_closing: self.door.is_closing(),
            sos: self.sos.status(),
            alarms: self.alarms.status(),
            environment: self.environment,
            pressure_label: format_pressure(self.environment.pressure_pa),
        }
    }

    /// Nothing in flight: no trip, no door sequence, no emergency.
    pub fn is_idle(&self) -> bool {
        !self.is_moving() && !self.door.has_pending_timers() && !self.sos.is_active()
    }

    /// Move the clock forward by `dt`, firing every timer that falls due.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.now() + dt;
        while let Some((_, timer)) = self.scheduler.pop_due(until) {
            debug!(timer = timer.name(), at = %self.now(), "timer fired");
            self.handle(timer);
            self.observe();
        }
        self.scheduler.advance_to(until);
        self.observe();
    }

    /// Advance until [`is_idle`](Self::is_idle) or until `limit` has
    /// elapsed. Returns whether the elevator went idle.
    pub fn run_until_idle(&mut self, limit: Duration) -> bool {
        let deadline = self.now() + limit;
        while !self.is_idle() {
            match self.scheduler.next_due() {
                Some(due) if due <= deadline => {
                    let step = due.saturating_since(self.now());
                    self.advance(step);
                }
                _ => return false,
            }
        }
        true
    }

    fn context(&self) -> CommandContext {
        CommandContext {
            moving: self.is_moving(),
            sos_active: self.sos.is_active(),
        }
    }

    fn emit(&mut self, event: ElevatorEvent) {
        self.events.push(EventRecord {
            at: self.now(),
            event,
        });
    }

    fn emit_phase_change(&mut self, before: MotionPhase) {
        let after = self.motion.phase();
        if before != after {
            self.emit(ElevatorEvent::PhaseChanged {
                from: before,
                to: after,
            });
        }
    }

    fn emit_alarm_changes(&mut self, changes: Vec<AlarmChange>) {
        for change in changes {
            match change {
                AlarmChange::Raised { kind, reading } => {
                    warn!(%kind, reading, floor = self.current_floor(), "alarm raised");
                    self.emit(ElevatorEvent::AlarmRaised { kind, reading });
                }
                AlarmChange::Cleared { kind } => {
                    info!(%kind, "alarm cleared");
                    self.emit(ElevatorEvent::AlarmCleared { kind });
                }
            }
        }
    }

    /// Refresh the display and re-evaluate environment and alarms.
    fn observe(&mut self) {
        let now = self.now();
        let display = self.motion.refresh_display(now, self.config.display_jitter);
        self.environment = environment::sample(display);
        let changes = self.alarms.evaluate(
            &self.environment,
            self.sos.is_active(),
            &mut self.scheduler,
            self.config.timing.alarm_flash(),
        );
        self.emit_alarm_changes(changes);
    }

    fn schedule_progress(&mut self, progress: TripProgress) {
        let id = match progress {
            TripProgress::Tick { index, at } => {
                self.scheduler.schedule_at(at, Timer::MotionTick(index))
            }
            TripProgress::Arrive { at } => self.scheduler.schedule_at(at, Timer::Arrival),
        };
        self.motion_timer = Some(id);
    }

    fn cancel_motion_timers(&mut self) {
        if let Some(id) = self.motion_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.frame_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn handle(&mut self, timer: Timer) {
        let now = self.now();
        match timer {
            Timer::MotionTick(index) => {
                self.motion_timer = None;
                let before = self.motion.phase();
                if let Some(progress) = self.motion.on_tick(index, now) {
                    self.emit_phase_change(before);
                    if matches!(self.motion.trip(), Some(plan) if plan.kind() == TripKind::Direct)
                    {
                        self.emit(ElevatorEvent::FloorPassed {
                            floor: self.motion.current_floor(),
                        });
                    }
                    self.schedule_progress(progress);
                }
            }
            Timer::Arrival => {
                self.motion_timer = None;
                let before = self.motion.phase();
                if let Some(arrival) = self.motion.on_arrival(now) {
                    self.cancel_motion_timers();
                    self.emit_phase_change(before);
                    info!(floor = arrival.floor, kind = ?arrival.kind, "arrived");
                    self.emit(ElevatorEvent::Arrived {
                        floor: arrival.floor,
                    });
                    if arrival.snapped() {
                        info!(
                            requested = arrival.requested,
                            landed = arrival.floor,
                            "express trip stopped at nearest reachable floor"
                        );
                        self.emit(ElevatorEvent::SnappedToNearest {
                            requested: arrival.requested,
                            landed: arrival.floor,
                        });
                    }
                    let delay = match arrival.kind {
                        TripKind::Relative => self.config.timing.relative_door_delay(),
                        TripKind::Direct => self.config.timing.direct_door_delay(),
                    };
                    self.door.schedule_cycle(&mut self.scheduler, delay);
                }
            }
            Timer::Frame => {
                self.frame_timer = None;
                if self.is_moving() {
                    self.frame_timer = Some(
                        self.scheduler
                            .schedule_in(self.config.timing.frame(), Timer::Frame),
                    );
                }
            }
            Timer::DoorOpen => {
                let timing = self.config.timing.door();
                self.door.on_open_due(&mut self.scheduler, &timing);
                info!(floor = self.current_floor(), "door opened");
                self.emit(ElevatorEvent::DoorOpened);
            }
            Timer::DoorClose => {
                self.door.on_close_due(now);
                info!(floor = self.current_floor(), "door closed");
                self.emit(ElevatorEvent::DoorClosed);
            }
            Timer::SosBeacon => {
                let period = self.config.timing.sos_beacon();
                if let Some(count) = self.sos.on_beacon(&mut self.scheduler, period) {
                    warn!(count, floor = self.current_floor(), "SOS beacon");
                    self.emit(ElevatorEvent::SosBeacon { count });
                }
            }
            Timer::SosTimeout => {
                if self.sos.on_timeout(&mut self.scheduler) {
                    info!("emergency stop timed out");
                    self.emit(ElevatorEvent::SosDeactivated {
                        reason: SosClearReason::Timeout,
                    });
                }
            }
            Timer::AlarmFlash => {
                let period = self.config.timing.alarm_flash();
                if let Some(on) = self.alarms.on_flash(&mut self.scheduler, period) {
                    self.emit(ElevatorEvent::WarningLight { on });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::error::{BusyReason, ElevatorError};
    use crate::motion::Direction;

    fn quiet() -> Elevator {
        Elevator::new(ElevatorConfig {
            display_jitter: false,
            ..ElevatorConfig::default()
        })
        .unwrap()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn kinds(elevator: &Elevator) -> Vec<ElevatorEvent> {
        elevator.events().iter().map(|record| record.event).collect()
    }

    #[test]
    fn starts_at_rest_on_the_initial_floor() {
        let elevator = quiet();
        assert_eq!(elevator.current_floor(), 1);
        assert_eq!(elevator.display_floor(), 1.0);
        assert_eq!(elevator.phase(), MotionPhase::Stopped);
        assert_eq!(elevator.door_state(), DoorState::Closed);
        assert!(elevator.is_idle());
        assert!(elevator.events().is_empty());
    }

    #[test]
    fn invalid_config_is_refused() {
        let result = Elevator::new(ElevatorConfig {
            initial_floor: 0,
            ..ElevatorConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn one_step_move_then_door_cycle() {
        let mut elevator = quiet();
        elevator.request_move(Direction::Up).unwrap();
        assert_eq!(elevator.phase(), MotionPhase::Accelerating);

        elevator.advance(ms(379));
        assert!(elevator.is_moving());
        assert_eq!(elevator.current_floor(), 1);

        elevator.advance(ms(1));
        assert_eq!(elevator.current_floor(), 2);
        assert_eq!(elevator.display_floor(), 2.0);
        assert!(!elevator.is_moving());

        elevator.advance(ms(200));
        assert_eq!(elevator.door_state(), DoorState::Open);
        elevator.advance(ms(4_000));
        assert_eq!(elevator.door_state(), DoorState::Closed);
        assert!(elevator.is_idle());
    }

    #[test]
    fn display_moves_between_ticks() {
        let mut elevator = quiet();
        elevator.request_go_to(3).unwrap();
        // first tick at 300 starts a 240ms animation 1 -> 2
        elevator.advance(ms(420));
        assert_eq!(elevator.display_floor(), 1.5);
        assert_eq!(elevator.current_floor(), 2);
    }

    #[test]
    fn commands_are_refused_while_moving() {
        let mut elevator = quiet();
        elevator.request_go_to(10).unwrap();
        let busy = Err(ElevatorError::Busy {
            reason: BusyReason::Moving,
        });

        assert_eq!(elevator.request_go_to(5), busy);
        assert_eq!(elevator.request_move(Direction::Up), busy);
        assert_eq!(elevator.request_open_door(), busy);
        assert_eq!(elevator.request_close_door(), busy);
        assert_eq!(elevator.reset(), busy);
        assert_eq!(elevator.set_floor_range(-10, 10), busy);
    }

    #[test]
    fn frame_timer_stops_after_arrival() {
        let mut elevator = quiet();
        elevator.request_go_to(2).unwrap();
        assert!(elevator.run_until_idle(ms(10_000)));
        assert!(elevator.scheduler.is_empty());
    }

    #[test]
    fn run_until_idle_gives_up_at_the_limit() {
        let mut elevator = Elevator::new(ElevatorConfig {
            timing: TimingConfig {
                sos_timeout_ms: None,
                ..TimingConfig::default()
            },
            ..ElevatorConfig::default()
        })
        .unwrap();
        elevator.toggle_sos().unwrap();
        assert!(!elevator.run_until_idle(ms(5_000)));
        assert!(elevator.sos_status().active);
        assert_eq!(elevator.sos_status().beacons, 5);
    }

    #[test]
    fn direct_trips_report_each_floor_passed() {
        let mut elevator = quiet();
        elevator.request_go_to(-3).unwrap();
        elevator.run_until_idle(ms(10_000));

        let passed: Vec<i64> = kinds(&elevator)
            .into_iter()
            .filter_map(|event| match event {
                ElevatorEvent::FloorPassed { floor } => Some(floor),
                _ => None,
            })
            .collect();
        assert_eq!(passed, vec![-1, -2, -3]);
    }
}
