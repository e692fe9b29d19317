//! Trip planning.
//!
//! Plans are pure values. A direct trip may span billions of floors, so
//! ticks are computed on demand from the plan's parameters rather than
//! stored.

use super::profile::millis_duration;
use super::reach::{self, floor_at, ordinal};
use super::{Direction, MotionPhase, SpeedProfile};
use crate::core::FloorRange;
use crate::error::ElevatorError;
use crate::scheduler::SimInstant;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Shortest step interval of a direct trip.
pub const MIN_STEP_INTERVAL: Duration = Duration::from_millis(20);

/// Which command started a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripKind {
    /// One step up or down
    Relative,
    /// Straight to a requested floor
    Direct,
}

/// Straight-line change of the displayed floor between two floors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub from: f64,
    pub to: f64,
    pub start: SimInstant,
    pub duration: Duration,
}

impl Animation {
    pub fn new(from: i64, to: i64, start: SimInstant, duration: Duration) -> Self {
        Self {
            from: from as f64,
            to: to as f64,
            start,
            duration,
        }
    }

    /// Display position at `now`, holding the endpoints outside the
    /// animation window.
    pub fn position_at(&self, now: SimInstant) -> f64 {
        let total = self.duration.as_millis() as f64;
        if total == 0.0 {
            return self.to;
        }
        let elapsed = now.saturating_since(self.start).as_millis() as f64;
        let t = (elapsed / total).min(1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn end(&self) -> SimInstant {
        self.start + self.duration
    }
}

/// Display movement started by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: i64,
    pub to: i64,
    pub duration: Duration,
}

/// One step of a trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedTick {
    pub index: u64,
    /// Offset from the start of the trip
    pub offset: Duration,
    pub phase: MotionPhase,
    pub speed: f64,
    /// Floor committed as current when the tick fires
    pub commit: Option<i64>,
    pub segment: Option<Segment>,
}

/// A fully parameterised trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripPlan {
    Relative {
        origin: i64,
        destination: i64,
        direction: Direction,
        max_speed: f64,
        accelerate: Duration,
        cruise: Duration,
        decelerate: Duration,
    },
    Direct {
        origin: i64,
        requested: i64,
        destination: i64,
        direction: Direction,
        max_speed: f64,
        step: u8,
        steps: u64,
        accel_steps: u64,
        decel_steps: u64,
        interval: Duration,
    },
}

/// Plan a one-step move. Rejected when the destination leaves `range`.
pub fn plan_relative(
    origin: i64,
    direction: Direction,
    profile: &SpeedProfile,
    range: &FloorRange,
) -> Result<TripPlan, ElevatorError> {
    let destination = reach::relative_destination(origin, direction, profile.floor_step(), range)
        .ok_or(ElevatorError::BoundaryReached {
            direction,
            limit: match direction {
                Direction::Up => range.max(),
                Direction::Down => range.min(),
            },
        })?;

    let max_speed = profile.max_speed();
    let base = profile.base_interval().as_millis() as f64;
    let factor = (max_speed / 10.0).min(3.0);
    let accelerate = millis_duration((base * 0.2 * factor).max(100.0));
    let cruise = millis_duration((base * 0.6).max(50.0));

    Ok(TripPlan::Relative {
        origin,
        destination,
        direction,
        max_speed,
        accelerate,
        cruise,
        decelerate: accelerate,
    })
}

/// Plan a direct trip to a validated `target`. `None` when the landing
/// floor is the origin and the car need not move.
pub fn plan_direct(
    origin: i64,
    target: i64,
    profile: &SpeedProfile,
    range: &FloorRange,
) -> Option<TripPlan> {
    let step = profile.floor_step();
    let landing = reach::landing_floor(origin, target, step, range);
    let direction = Direction::between(origin, landing.floor)?;

    let distance = reach::ordinal_distance(origin, landing.floor) / u128::from(step);
    let steps = u64::try_from(distance).unwrap_or(u64::MAX);

    let max_speed = profile.max_speed();
    let (accel_steps, decel_steps) = ramp_lengths(steps, max_speed);
    let base = profile.base_interval().as_millis() as f64;
    let interval = millis_duration(base / (max_speed / 5.0).max(1.0)).max(MIN_STEP_INTERVAL);

    Some(TripPlan::Direct {
        origin,
        requested: target,
        destination: landing.floor,
        direction,
        max_speed,
        step,
        steps,
        accel_steps,
        decel_steps,
        interval,
    })
}

/// Steps spent accelerating and decelerating on a trip of `steps`.
fn ramp_lengths(steps: u64, max_speed: f64) -> (u64, u64) {
    let factor = (max_speed / 5.0).min(4.0);
    let min_accel = (factor.floor() as u64).max(1);
    let max_accel = (steps / 4).max(2);
    let accel = max_accel.min(min_accel.max(steps / 3));
    if accel.saturating_mul(2) > steps {
        let accel = steps / 2;
        (accel, steps - accel)
    } else {
        (accel, accel)
    }
}

/// Phase and speed multiplier at step `k` of `steps`.
///
/// ```rust
/// use liftsim::motion::{ramp, MotionPhase};
///
/// let (phase, multiplier) = ramp(1, 10, 2, 2);
/// assert_eq!(phase, MotionPhase::Accelerating);
/// assert!((multiplier - 0.6).abs() < 1e-9);
/// assert_eq!(ramp(5, 10, 2, 2), (MotionPhase::Cruising, 1.0));
/// assert_eq!(ramp(10, 10, 2, 2).0, MotionPhase::Decelerating);
/// ```
pub fn ramp(k: u64, steps: u64, accel_steps: u64, decel_steps: u64) -> (MotionPhase, f64) {
    if accel_steps > 0 && k <= accel_steps {
        let m = 0.2 + 0.8 * k as f64 / accel_steps as f64;
        (MotionPhase::Accelerating, m)
    } else if decel_steps > 0 && k > steps - decel_steps.min(steps) {
        let into = k - (steps - decel_steps.min(steps));
        let m = 1.0 - 0.8 * into as f64 / decel_steps as f64;
        (MotionPhase::Decelerating, m)
    } else {
        (MotionPhase::Cruising, 1.0)
    }
}

/// Speed as shown on the panel, to one decimal.
fn display_speed(speed: f64) -> f64 {
    (speed * 10.0).round() / 10.0
}

fn scaled(duration: Duration, k: u64) -> Duration {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(millis.saturating_mul(k))
}

impl TripPlan {
    pub fn kind(&self) -> TripKind {
        match self {
            Self::Relative { .. } => TripKind::Relative,
            Self::Direct { .. } => TripKind::Direct,
        }
    }

    pub fn origin(&self) -> i64 {
        match self {
            Self::Relative { origin, .. } | Self::Direct { origin, .. } => *origin,
        }
    }

    /// Floor the car will stop at.
    pub fn destination(&self) -> i64 {
        match self {
            Self::Relative { destination, .. } | Self::Direct { destination, .. } => *destination,
        }
    }

    /// Floor the user asked for; differs from the destination when an
    /// express trip snapped to a reachable floor.
    pub fn requested(&self) -> i64 {
        match self {
            Self::Relative { destination, .. } => *destination,
            Self::Direct { requested, .. } => *requested,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Relative { direction, .. } | Self::Direct { direction, .. } => *direction,
        }
    }

    pub fn max_speed(&self) -> f64 {
        match self {
            Self::Relative { max_speed, .. } | Self::Direct { max_speed, .. } => *max_speed,
        }
    }

    pub fn snapped(&self) -> bool {
        self.destination() != self.requested()
    }

    /// Indices of the ticks this trip fires.
    pub fn ticks(&self) -> RangeInclusive<u64> {
        match self {
            Self::Relative { .. } => 0..=2,
            Self::Direct { steps, .. } => 1..=*steps,
        }
    }

    /// Time from the start of the trip to tick `k`.
    pub fn tick_offset(&self, k: u64) -> Duration {
        match self {
            Self::Relative {
                accelerate, cruise, ..
            } => match k {
                0 => Duration::ZERO,
                1 => *accelerate,
                _ => *accelerate + *cruise,
            },
            Self::Direct { interval, .. } => scaled(*interval, k),
        }
    }

    /// Time from the start of the trip to arrival.
    pub fn arrival_offset(&self) -> Duration {
        match self {
            Self::Relative {
                accelerate,
                cruise,
                decelerate,
                ..
            } => *accelerate + *cruise + *decelerate,
            Self::Direct {
                steps, interval, ..
            } => scaled(*interval, *steps).saturating_add(animation_time(*interval)),
        }
    }

    /// Floor reached after `k` steps of a direct trip.
    fn waypoint(&self, k: u64) -> i64 {
        match self {
            Self::Relative {
                origin,
                destination,
                ..
            } => {
                if k == 0 {
                    *origin
                } else {
                    *destination
                }
            }
            Self::Direct {
                origin,
                destination,
                direction,
                step,
                ..
            } => {
                let moved = i128::from(k) * i128::from(*step) * direction.signum();
                floor_at(ordinal(*origin) + moved).unwrap_or(*destination)
            }
        }
    }

    /// Tick `k`, which must lie in [`ticks`](Self::ticks).
    pub fn tick(&self, k: u64) -> PlannedTick {
        match self {
            Self::Relative {
                origin,
                destination,
                max_speed,
                ..
            } => {
                let (phase, multiplier) = match k {
                    0 => (MotionPhase::Accelerating, 0.3),
                    1 => (MotionPhase::Cruising, 1.0),
                    _ => (MotionPhase::Decelerating, 0.3),
                };
                PlannedTick {
                    index: k,
                    offset: self.tick_offset(k),
                    phase,
                    speed: display_speed(max_speed * multiplier),
                    commit: None,
                    segment: (k == 0).then_some(Segment {
                        from: *origin,
                        to: *destination,
                        duration: self.arrival_offset(),
                    }),
                }
            }
            Self::Direct {
                max_speed,
                steps,
                accel_steps,
                decel_steps,
                interval,
                ..
            } => {
                let (phase, multiplier) = ramp(k, *steps, *accel_steps, *decel_steps);
                let floor = self.waypoint(k);
                PlannedTick {
                    index: k,
                    offset: self.tick_offset(k),
                    phase,
                    speed: display_speed(max_speed * multiplier),
                    commit: Some(floor),
                    segment: Some(Segment {
                        from: self.waypoint(k.saturating_sub(1)),
                        to: floor,
                        duration: animation_time(*interval),
                    }),
                }
            }
        }
    }
}

/// Display animation per direct-trip step: four fifths of the interval.
fn animation_time(interval: Duration) -> Duration {
    interval * 4 / 5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> FloorRange {
        FloorRange::default()
    }

    #[test]
    fn normal_relative_timing() {
        let plan = plan_relative(1, Direction::Up, &SpeedProfile::Normal, &wide()).unwrap();
        assert_eq!(plan.destination(), 2);
        assert_eq!(plan.tick_offset(1), Duration::from_millis(100));
        assert_eq!(plan.tick_offset(2), Duration::from_millis(280));
        assert_eq!(plan.arrival_offset(), Duration::from_millis(380));

        let first = plan.tick(0);
        assert_eq!(first.phase, MotionPhase::Accelerating);
        assert_eq!(first.speed, 0.6);
        assert_eq!(
            first.segment,
            Some(Segment {
                from: 1,
                to: 2,
                duration: Duration::from_millis(380)
            })
        );
        assert_eq!(plan.tick(1).speed, 2.0);
        assert_eq!(plan.tick(2).phase, MotionPhase::Decelerating);
    }

    #[test]
    fn fast_custom_relative_timing_scales_acceleration() {
        let profile = SpeedProfile::custom(35.0).unwrap();
        let plan = plan_relative(1, Direction::Down, &profile, &wide()).unwrap();
        // base 75ms: accelerate max(100, 75*0.2*3) = 100, cruise max(50, 45) = 50
        assert_eq!(plan.destination(), -2);
        assert_eq!(plan.arrival_offset(), Duration::from_millis(250));
    }

    #[test]
    fn relative_rejects_leaving_the_range() {
        let range = FloorRange::new(-1, 3).unwrap();
        assert_eq!(
            plan_relative(3, Direction::Up, &SpeedProfile::Normal, &range),
            Err(ElevatorError::BoundaryReached {
                direction: Direction::Up,
                limit: 3
            })
        );
    }

    #[test]
    fn direct_trip_to_basement() {
        let plan = plan_direct(1, -5, &SpeedProfile::Normal, &wide()).unwrap();
        assert_eq!(plan.ticks(), 1..=5);
        assert_eq!(plan.tick_offset(5), Duration::from_millis(1_500));
        assert_eq!(plan.arrival_offset(), Duration::from_millis(1_740));

        let floors: Vec<_> = plan.ticks().map(|k| plan.tick(k).commit).collect();
        assert_eq!(floors, vec![Some(-1), Some(-2), Some(-3), Some(-4), Some(-5)]);

        let phases: Vec<_> = plan.ticks().map(|k| plan.tick(k).phase).collect();
        assert_eq!(
            phases,
            vec![
                MotionPhase::Accelerating,
                MotionPhase::Cruising,
                MotionPhase::Cruising,
                MotionPhase::Cruising,
                MotionPhase::Decelerating,
            ]
        );
        assert_eq!(plan.tick(5).speed, 0.4);
        assert_eq!(
            plan.tick(1).segment,
            Some(Segment {
                from: 1,
                to: -1,
                duration: Duration::from_millis(240)
            })
        );
    }

    #[test]
    fn same_floor_needs_no_trip() {
        assert!(plan_direct(4, 4, &SpeedProfile::Normal, &wide()).is_none());
        let tight = FloorRange::new(1, 2).unwrap();
        let express = SpeedProfile::custom(40.0).unwrap();
        assert!(plan_direct(1, 2, &express, &tight).is_none());
    }

    #[test]
    fn express_trip_snaps_and_steps_by_two() {
        let express = SpeedProfile::custom(40.0).unwrap();
        let plan = plan_direct(1, 10, &express, &wide()).unwrap();
        assert_eq!(plan.destination(), 11);
        assert!(plan.snapped());
        let floors: Vec<_> = plan.ticks().filter_map(|k| plan.tick(k).commit).collect();
        assert_eq!(floors, vec![3, 5, 7, 9, 11]);
        // base 0 clamps to 30ms, divided by 8 is below the 20ms minimum
        assert_eq!(plan.tick_offset(1), MIN_STEP_INTERVAL);
    }

    #[test]
    fn short_trips_skip_phases() {
        assert_eq!(ramp_lengths(1, 2.0), (0, 1));
        assert_eq!(ramp_lengths(2, 2.0), (1, 1));
        assert_eq!(ramp_lengths(3, 35.0), (1, 2));
        assert_eq!(ramp_lengths(30, 2.0), (7, 7));

        let (phase, multiplier) = ramp(1, 1, 0, 1);
        assert_eq!(phase, MotionPhase::Decelerating);
        assert!((multiplier - 0.2).abs() < 1e-9);
    }

    #[test]
    fn ramp_stays_within_bounds() {
        for steps in 1..60u64 {
            let (accel, decel) = ramp_lengths(steps, 20.0);
            assert!(accel + decel <= steps);
            for k in 1..=steps {
                let (_, m) = ramp(k, steps, accel, decel);
                assert!((0.2 - 1e-9..=1.0 + 1e-9).contains(&m), "steps {steps} k {k}: {m}");
            }
        }
    }

    #[test]
    fn huge_trips_do_not_overflow() {
        let range = FloorRange::new(i64::MIN, i64::MAX).unwrap();
        let plan = plan_direct(i64::MIN, i64::MAX, &SpeedProfile::Fast, &range).unwrap();
        assert_eq!(plan.tick(*plan.ticks().end()).commit, Some(i64::MAX));
        assert!(plan.arrival_offset() > Duration::from_secs(1));
    }

    #[test]
    fn animation_interpolates_and_holds() {
        let anim = Animation::new(1, 3, SimInstant::from_millis(100), Duration::from_millis(200));
        assert_eq!(anim.position_at(SimInstant::from_millis(0)), 1.0);
        assert_eq!(anim.position_at(SimInstant::from_millis(200)), 2.0);
        assert_eq!(anim.position_at(SimInstant::from_millis(900)), 3.0);
        assert_eq!(anim.end(), SimInstant::from_millis(300));
    }
}
