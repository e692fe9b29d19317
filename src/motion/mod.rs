//! Car motion: phases, speed profiles, trip planning and the controller
//! that plays a planned trip out against the scheduler.
//!
//! A trip is computed up front as a [`TripPlan`]: the list of ticks with
//! the floor committed, phase and speed at each, plus the arrival instant.
//! The [`MotionController`] then only has to apply ticks as their timers
//! fire, which keeps the SOS abort trivial: cancel the remaining timers and
//! freeze the display.

mod controller;
mod plan;
mod profile;
pub mod reach;

pub use controller::{jitter, Arrival, Halt, MotionController, TripProgress};
pub use plan::{
    plan_direct, plan_relative, ramp, Animation, PlannedTick, Segment, TripKind, TripPlan,
    MIN_STEP_INTERVAL,
};
pub use profile::SpeedProfile;

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the car's motion. `Stopped` between trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPhase {
    #[default]
    Stopped,
    Accelerating,
    Cruising,
    Decelerating,
}

impl State for MotionPhase {
    fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Accelerating => "accelerating",
            Self::Cruising => "cruising",
            Self::Decelerating => "decelerating",
        }
    }

    fn is_at_rest(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction from `from` toward `to`, `None` when equal.
    pub fn between(from: i64, to: i64) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Up),
            std::cmp::Ordering::Less => Some(Self::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// `+1` for up, `-1` for down.
    pub fn signum(&self) -> i128 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}
