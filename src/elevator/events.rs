//! Observable events, stamped with the simulated instant they occurred at.

use crate::alarm::AlarmKind;
use crate::motion::{Direction, MotionPhase, SpeedProfile, TripKind};
use crate::scheduler::SimInstant;
use crate::sos::SosClearReason;
use serde::{Deserialize, Serialize};

/// Something that happened to the elevator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ElevatorEvent {
    TripStarted {
        kind: TripKind,
        direction: Direction,
        from: i64,
        to: i64,
    },
    PhaseChanged {
        from: MotionPhase,
        to: MotionPhase,
    },
    /// A direct trip committed a waypoint as the current floor
    FloorPassed {
        floor: i64,
    },
    Arrived {
        floor: i64,
    },
    /// An express trip could not stop at the requested floor
    SnappedToNearest {
        requested: i64,
        landed: i64,
    },
    DoorOpened,
    DoorClosing,
    DoorClosed,
    AlarmRaised {
        kind: AlarmKind,
        reading: f64,
    },
    AlarmCleared {
        kind: AlarmKind,
    },
    AlarmsAcknowledged,
    WarningLight {
        on: bool,
    },
    SosActivated {
        floor: i64,
        interrupted_trip: bool,
    },
    SosBeacon {
        count: u64,
    },
    SosDeactivated {
        reason: SosClearReason,
    },
    FloorRangeChanged {
        min: i64,
        max: i64,
    },
    SpeedProfileChanged {
        profile: SpeedProfile,
    },
    PrecisionWarning {
        value: i64,
    },
    Reset {
        floor: i64,
    },
}

/// An event and when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub at: SimInstant,
    #[serde(flatten)]
    pub event: ElevatorEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_flat() {
        let record = EventRecord {
            at: SimInstant::from_millis(1_740),
            event: ElevatorEvent::Arrived { floor: -5 },
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "at": 1740, "event": "arrived", "floor": -5 })
        );
    }
}
