//! Timer payloads carried by the elevator's scheduler.

/// Everything that can be due on the simulated clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Timer {
    /// Next tick of the trip in flight
    MotionTick(u64),
    Arrival,
    /// Display sample while moving
    Frame,
    /// Start of the automatic door cycle
    DoorOpen,
    /// Door finishes closing
    DoorClose,
    SosBeacon,
    SosTimeout,
    /// Warning light toggle
    AlarmFlash,
}

impl Timer {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::MotionTick(_) => "motion_tick",
            Self::Arrival => "arrival",
            Self::Frame => "frame",
            Self::DoorOpen => "door_open",
            Self::DoorClose => "door_close",
            Self::SosBeacon => "sos_beacon",
            Self::SosTimeout => "sos_timeout",
            Self::AlarmFlash => "alarm_flash",
        }
    }
}
