//! The command surface.
//!
//! Every command either changes state and returns [`Accepted`] or is
//! refused with an [`ElevatorError`] and changes nothing.

use super::{Elevator, ElevatorEvent, Timer};
use crate::core::FloorRange;
use crate::error::{Accepted, CommandResult, Warning};
use crate::motion::{plan_direct, plan_relative, Direction, SpeedProfile, TripPlan};
use crate::sos::SosClearReason;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A command as it appears in a scenario script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum Command {
    SetFloorRange { min: i64, max: i64 },
    Move { direction: Direction },
    GoTo { floor: i64 },
    OpenDoor,
    CloseDoor,
    ToggleSos,
    Reset,
    SetSpeedProfile { profile: SpeedProfile },
    AcknowledgeAlarms,
}

impl Elevator {
    /// Run `command` through the matching method.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        match command {
            Command::SetFloorRange { min, max } => self.set_floor_range(min, max),
            Command::Move { direction } => self.request_move(direction),
            Command::GoTo { floor } => self.request_go_to(floor),
            Command::OpenDoor => self.request_open_door(),
            Command::CloseDoor => self.request_close_door(),
            Command::ToggleSos => self.toggle_sos(),
            Command::Reset => self.reset(),
            Command::SetSpeedProfile { profile } => self.set_speed_profile(profile),
            Command::AcknowledgeAlarms => self.acknowledge_alarms(),
        }
    }

    /// Replace the serviceable range, moving a car left outside it to the
    /// nearest floor inside.
    pub fn set_floor_range(&mut self, min: i64, max: i64) -> CommandResult {
        self.guards.reconfigure(&self.context())?;
        let range = FloorRange::new(min, max)?;
        let warnings = precision_warnings(&[min, max]);

        self.range = range;
        let floor = range.clamp(self.current_floor());
        if floor != self.current_floor() {
            info!(from = self.current_floor(), to = floor, "car moved into new range");
            self.motion.place(floor);
        }
        info!(min, max, "floor range changed");
        self.emit(ElevatorEvent::FloorRangeChanged { min, max });
        self.emit_warnings(&warnings);
        self.observe();
        Ok(Accepted::with_warnings(warnings))
    }

    /// Move one step up or down.
    pub fn request_move(&mut self, direction: Direction) -> CommandResult {
        self.guards.operate(&self.context())?;
        let plan = plan_relative(self.current_floor(), direction, &self.profile, &self.range)?;
        self.start_trip(plan);
        Ok(Accepted::default())
    }

    /// Travel straight to `target`. Asking for the floor the car is at
    /// runs the door cycle instead.
    pub fn request_go_to(&mut self, target: i64) -> CommandResult {
        self.guards.operate(&self.context())?;
        let target = self.range.validate(target)?;
        let warnings = precision_warnings(&[target]);
        self.emit_warnings(&warnings);

        if target == self.current_floor() {
            self.open_at_rest();
            return Ok(Accepted::with_warnings(warnings));
        }

        match plan_direct(self.current_floor(), target, &self.profile, &self.range) {
            Some(plan) => self.start_trip(plan),
            None => {
                // express car already at the nearest reachable floor
                let landed = self.current_floor();
                info!(requested = target, landed, "already at nearest reachable floor");
                self.emit(ElevatorEvent::SnappedToNearest {
                    requested: target,
                    landed,
                });
                self.open_at_rest();
            }
        }
        Ok(Accepted::with_warnings(warnings))
    }

    /// Open the door and keep it open.
    pub fn request_open_door(&mut self) -> CommandResult {
        self.guards.operate(&self.context())?;
        let was_open = self.door.is_open();
        self.door.open_manually(&mut self.scheduler);
        if !was_open {
            self.emit(ElevatorEvent::DoorOpened);
        }
        Ok(Accepted::default())
    }

    /// Start closing the door.
    pub fn request_close_door(&mut self) -> CommandResult {
        self.guards.operate(&self.context())?;
        let transit = self.config.timing.door().close;
        self.door.close_manually(&mut self.scheduler, transit)?;
        self.emit(ElevatorEvent::DoorClosing);
        Ok(Accepted::default())
    }

    /// Engage the emergency stop, or release it if engaged.
    pub fn toggle_sos(&mut self) -> CommandResult {
        if self.sos.deactivate(&mut self.scheduler) {
            info!(floor = self.current_floor(), "emergency stop released");
            self.emit(ElevatorEvent::SosDeactivated {
                reason: SosClearReason::Manual,
            });
            self.observe();
            return Ok(Accepted::default());
        }

        let before = self.motion.phase();
        self.cancel_motion_timers();
        let now = self.now();
        let halt = self.motion.halt(now, &self.range);
        self.emit_phase_change(before);
        self.door.cancel_timers(&mut self.scheduler);
        let cleared = self.alarms.clear_all(&mut self.scheduler);
        self.emit_alarm_changes(cleared);

        let timing = self.config.timing;
        self.sos
            .activate(&mut self.scheduler, timing.sos_beacon(), timing.sos_timeout());
        warn!(
            floor = halt.floor,
            interrupted_trip = halt.interrupted,
            "emergency stop engaged"
        );
        self.emit(ElevatorEvent::SosActivated {
            floor: halt.floor,
            interrupted_trip: halt.interrupted,
        });
        self.observe();
        Ok(Accepted::default())
    }

    /// Return to the initial floor with everything switched off.
    pub fn reset(&mut self) -> CommandResult {
        self.guards.reconfigure(&self.context())?;

        if self.sos.deactivate(&mut self.scheduler) {
            self.emit(ElevatorEvent::SosDeactivated {
                reason: SosClearReason::Reset,
            });
        }
        let cleared = self.alarms.clear_all(&mut self.scheduler);
        self.emit_alarm_changes(cleared);
        self.cancel_motion_timers();
        if self.door.is_open() {
            self.emit(ElevatorEvent::DoorClosed);
        }
        self.door.force_close(&mut self.scheduler);

        let floor = self.range.clamp(self.config.initial_floor);
        self.motion.place(floor);
        info!(floor, "elevator reset");
        self.emit(ElevatorEvent::Reset { floor });
        self.observe();
        Ok(Accepted::default())
    }

    /// Change the speed profile. Takes effect from the next trip.
    pub fn set_speed_profile(&mut self, profile: SpeedProfile) -> CommandResult {
        let profile = profile.validated()?;
        self.profile = profile;
        info!(profile = profile.name(), max_speed = profile.max_speed(), "speed profile changed");
        self.emit(ElevatorEvent::SpeedProfileChanged { profile });
        Ok(Accepted::default())
    }

    /// Silence the flashing warning light. The alarms stay raised.
    pub fn acknowledge_alarms(&mut self) -> CommandResult {
        if self.alarms.acknowledge(&mut self.scheduler) {
            info!("alarms acknowledged");
            self.emit(ElevatorEvent::AlarmsAcknowledged);
        }
        Ok(Accepted::default())
    }

    fn start_trip(&mut self, plan: TripPlan) {
        self.cancel_motion_timers();
        if self.door.is_open() {
            self.emit(ElevatorEvent::DoorClosed);
        }
        self.door.force_close(&mut self.scheduler);

        let before = self.motion.phase();
        let now = self.now();
        info!(
            kind = ?plan.kind(),
            from = plan.origin(),
            to = plan.destination(),
            speed = plan.max_speed(),
            "trip started"
        );
        self.emit(ElevatorEvent::TripStarted {
            kind: plan.kind(),
            direction: plan.direction(),
            from: plan.origin(),
            to: plan.destination(),
        });
        let progress = self.motion.begin(plan, now);
        self.emit_phase_change(before);
        self.schedule_progress(progress);
        self.frame_timer = Some(
            self.scheduler
                .schedule_in(self.config.timing.frame(), Timer::Frame),
        );
        self.observe();
    }

    fn open_at_rest(&mut self) {
        let timing = self.config.timing.door();
        let was_open = self.door.is_open();
        self.door.start_cycle(&mut self.scheduler, &timing);
        if !was_open {
            self.emit(ElevatorEvent::DoorOpened);
        }
    }

    fn emit_warnings(&mut self, warnings: &[Warning]) {
        for warning in warnings {
            let Warning::Precision { value } = *warning;
            warn!(value, "{warning}");
            self.emit(ElevatorEvent::PrecisionWarning { value });
        }
    }
}

fn precision_warnings(values: &[i64]) -> Vec<Warning> {
    values.iter().copied().filter_map(Warning::precision).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ElevatorConfig, TimingConfig};
    use crate::core::MAX_SAFE_FLOOR;
    use crate::door::DoorState;
    use crate::error::{BusyReason, ElevatorError, FloorRejection};
    use crate::motion::MotionPhase;
    use std::time::Duration;

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

    fn has(elevator: &Elevator, event: ElevatorEvent) -> bool {
        elevator.events().iter().any(|record| record.event == event)
    }

    #[test]
    fn go_to_zero_or_outside_range_is_rejected() {
        let mut elevator = quiet();
        assert_eq!(
            elevator.request_go_to(0),
            Err(ElevatorError::invalid_floor(0, FloorRejection::Zero))
        );
        assert!(matches!(
            elevator.request_go_to(5_000),
            Err(ElevatorError::InvalidFloor {
                reason: FloorRejection::OutOfRange { .. },
                ..
            })
        ));
        assert!(!elevator.is_moving());
        assert!(elevator.events().is_empty());
    }

    #[test]
    fn go_to_current_floor_cycles_the_door() {
        let mut elevator = quiet();
        elevator.request_go_to(1).unwrap();
        assert!(!elevator.is_moving());
        assert_eq!(elevator.door_state(), DoorState::Open);

        elevator.advance(ms(3_999));
        assert_eq!(elevator.door_state(), DoorState::Open);
        elevator.advance(ms(1));
        assert_eq!(elevator.door_state(), DoorState::Closed);
    }

    #[test]
    fn move_past_the_boundary_is_rejected() {
        let mut elevator = quiet();
        elevator.set_floor_range(-2, 1).unwrap();
        assert_eq!(
            elevator.request_move(Direction::Up),
            Err(ElevatorError::BoundaryReached {
                direction: Direction::Up,
                limit: 1
            })
        );
        assert!(elevator.request_move(Direction::Down).is_ok());
    }

    #[test]
    fn move_down_from_one_crosses_zero() {
        let mut elevator = quiet();
        elevator.request_move(Direction::Down).unwrap();
        elevator.advance(ms(380));
        assert_eq!(elevator.current_floor(), -1);
    }

    #[test]
    fn express_move_skips_a_floor() {
        let mut elevator = quiet();
        elevator
            .set_speed_profile(SpeedProfile::custom(40.0).unwrap())
            .unwrap();
        elevator.request_move(Direction::Up).unwrap();
        elevator.run_until_idle(ms(10_000));
        assert_eq!(elevator.current_floor(), 3);
    }

    #[test]
    fn express_go_to_snaps_to_reachable_floor() {
        let mut elevator = quiet();
        elevator
            .set_speed_profile(SpeedProfile::custom(40.0).unwrap())
            .unwrap();
        elevator.request_go_to(4).unwrap();
        elevator.run_until_idle(ms(10_000));

        assert_eq!(elevator.current_floor(), 5);
        assert!(has(
            &elevator,
            ElevatorEvent::SnappedToNearest {
                requested: 4,
                landed: 5
            }
        ));
    }

    #[test]
    fn starting_a_trip_closes_an_open_door() {
        let mut elevator = quiet();
        elevator.request_open_door().unwrap();
        assert_eq!(elevator.door_state(), DoorState::Open);

        elevator.request_go_to(2).unwrap();
        assert_eq!(elevator.door_state(), DoorState::Closed);
        assert!(has(&elevator, ElevatorEvent::DoorClosed));
    }

    #[test]
    fn manual_open_holds_until_closed() {
        let mut elevator = quiet();
        elevator.request_go_to(1).unwrap();
        elevator.request_open_door().unwrap();
        elevator.advance(ms(60_000));
        assert_eq!(elevator.door_state(), DoorState::Open);

        elevator.request_close_door().unwrap();
        elevator.advance(ms(999));
        assert_eq!(elevator.door_state(), DoorState::Open);
        elevator.advance(ms(1));
        assert_eq!(elevator.door_state(), DoorState::Closed);
        assert_eq!(
            elevator.request_close_door(),
            Err(ElevatorError::DoorAlreadyClosed)
        );
    }

    #[test]
    fn sos_mid_trip_freezes_at_nearest_floor() {
        let mut elevator = quiet();
        elevator.request_go_to(10).unwrap();
        // tick 3 commits floor 4 at 900, animating from 3
        elevator.advance(ms(1_000));
        let display = elevator.display_floor();
        assert!(display > 3.0 && display < 4.0);

        elevator.toggle_sos().unwrap();
        assert_eq!(elevator.phase(), MotionPhase::Stopped);
        assert_eq!(elevator.current_floor(), display.round() as i64);
        assert_eq!(elevator.display_floor(), elevator.current_floor() as f64);
        assert!(has(
            &elevator,
            ElevatorEvent::SosActivated {
                floor: elevator.current_floor(),
                interrupted_trip: true
            }
        ));

        let busy = Err(ElevatorError::Busy {
            reason: BusyReason::SosActive,
        });
        assert_eq!(elevator.request_go_to(5), busy);
        assert_eq!(elevator.request_move(Direction::Up), busy);
        assert_eq!(elevator.request_open_door(), busy);

        // nothing from the aborted trip fires later
        let frozen = elevator.current_floor();
        elevator.advance(ms(5_000));
        assert_eq!(elevator.current_floor(), frozen);
        assert_eq!(elevator.door_state(), DoorState::Closed);
    }

    #[test]
    fn sos_times_out() {
        let mut elevator = quiet();
        elevator.toggle_sos().unwrap();
        elevator.advance(ms(9_999));
        assert!(elevator.sos_status().active);
        elevator.advance(ms(1));
        assert!(!elevator.sos_status().active);
        assert!(has(
            &elevator,
            ElevatorEvent::SosDeactivated {
                reason: SosClearReason::Timeout
            }
        ));
        assert!(has(&elevator, ElevatorEvent::SosBeacon { count: 9 }));
    }

    #[test]
    fn sos_toggles_off_manually() {
        let mut elevator = Elevator::new(ElevatorConfig {
            timing: TimingConfig {
                sos_timeout_ms: None,
                ..TimingConfig::default()
            },
            ..ElevatorConfig::default()
        })
        .unwrap();
        elevator.toggle_sos().unwrap();
        elevator.advance(ms(60_000));
        assert!(elevator.sos_status().active);

        elevator.toggle_sos().unwrap();
        assert!(!elevator.sos_status().active);
        assert!(elevator.is_idle());
    }

    #[test]
    fn sos_clears_alarms_and_suppresses_new_ones() {
        let mut elevator = quiet();
        elevator.set_floor_range(-10, 10_000).unwrap();
        elevator.request_go_to(900).unwrap();
        elevator.run_until_idle(ms(600_000));
        assert!(elevator.alarm_status().pressure);

        elevator.toggle_sos().unwrap();
        assert!(!elevator.alarm_status().pressure);
        assert!(!elevator.alarm_status().temperature);
        elevator.advance(ms(2_000));
        assert!(!elevator.alarm_status().pressure);

        // released at altitude: the alarm comes straight back
        elevator.toggle_sos().unwrap();
        assert!(elevator.alarm_status().pressure);
    }

    #[test]
    fn acknowledge_silences_the_light() {
        let mut elevator = quiet();
        elevator.set_floor_range(-10, 10_000).unwrap();
        elevator.request_go_to(900).unwrap();
        elevator.run_until_idle(ms(600_000));
        assert!(elevator.alarms.is_flashing());

        elevator.acknowledge_alarms().unwrap();
        assert!(has(&elevator, ElevatorEvent::AlarmsAcknowledged));
        assert!(!elevator.alarm_status().warning_light);
        assert!(elevator.alarm_status().pressure);
        assert!(!elevator.alarms.is_flashing());
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut elevator = quiet();
        elevator.request_go_to(-3).unwrap();
        assert_eq!(
            elevator.reset(),
            Err(ElevatorError::Busy {
                reason: BusyReason::Moving
            })
        );
        elevator.advance(ms(1_500));
        elevator.toggle_sos().unwrap();

        elevator.reset().unwrap();
        assert_eq!(elevator.current_floor(), 1);
        assert_eq!(elevator.phase(), MotionPhase::Stopped);
        assert_eq!(elevator.door_state(), DoorState::Closed);
        assert!(!elevator.sos_status().active);
        assert!(!elevator.alarm_status().pressure);
        assert!(elevator.is_idle());
    }

    #[test]
    fn range_change_clamps_the_car() {
        let mut elevator = quiet();
        elevator.request_go_to(8).unwrap();
        elevator.run_until_idle(ms(60_000));

        elevator.set_floor_range(-5, 5).unwrap();
        assert_eq!(elevator.current_floor(), 5);
        assert!(elevator.set_floor_range(5, 5).is_err());
        assert_eq!(elevator.floor_range(), FloorRange::new(-5, 5).unwrap());
    }

    #[test]
    fn huge_range_warns_about_precision() {
        let mut elevator = quiet();
        let accepted = elevator.set_floor_range(-10, i64::MAX).unwrap();
        assert_eq!(
            accepted.warnings,
            vec![Warning::Precision { value: i64::MAX }]
        );
        assert!(has(
            &elevator,
            ElevatorEvent::PrecisionWarning { value: i64::MAX }
        ));

        let accepted = elevator.request_go_to(MAX_SAFE_FLOOR).unwrap();
        assert!(!accepted.has_warnings());
        assert!(elevator.is_moving());
    }

    #[test]
    fn invalid_custom_speed_is_rejected() {
        let mut elevator = quiet();
        assert!(matches!(
            elevator.set_speed_profile(SpeedProfile::Custom(f64::NAN)),
            Err(ElevatorError::InvalidSpeed { .. })
        ));
        assert_eq!(elevator.speed_profile(), SpeedProfile::Normal);
    }

    #[test]
    fn commands_dispatch_from_json() {
        let mut elevator = quiet();
        let script = r#"[
            {"command": "set_speed_profile", "profile": "fast"},
            {"command": "go_to", "floor": -2},
            {"command": "toggle_sos"}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(script).unwrap();
        for command in commands {
            elevator.execute(command).unwrap();
        }
        assert_eq!(elevator.speed_profile(), SpeedProfile::Fast);
        assert!(elevator.sos_status().active);
    }
}
