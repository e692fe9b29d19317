//! Point-in-time view of the whole elevator.

use crate::alarm::AlarmStatus;
use crate::core::FloorRange;
use crate::door::DoorState;
use crate::environment::EnvironmentSample;
use crate::motion::{Direction, MotionPhase, SpeedProfile};
use crate::scheduler::SimInstant;
use crate::sos::SosStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatorSnapshot {
    pub at: SimInstant,
    pub current_floor: i64,
    /// `B3`, `F12`
    pub floor_label: String,
    pub display_floor: f64,
    pub target_floor: Option<i64>,
    pub direction: Option<Direction>,
    pub phase: MotionPhase,
    pub speed: f64,
    pub speed_profile: SpeedProfile,
    pub floor_range: FloorRange,
    pub door: DoorState,
    pub door_closing: bool,
    pub sos: SosStatus,
    pub alarms: AlarmStatus,
    pub environment: EnvironmentSample,
    /// `101.33 kPa`
    pub pressure_label: String,
}
