//! Plays trip plans out over simulated time.

use super::plan::{Animation, TripKind, TripPlan};
use super::MotionPhase;
use crate::core::{nearest_floor, FloorRange, StateHistory, StateTransition};
use crate::scheduler::SimInstant;
use tracing::debug;

/// Largest speed factor the display jitter scales with.
const MAX_JITTER_FACTOR: f64 = 10.0;

/// Cosmetic wobble added to the display floor while moving, at most
/// ±0.2 floors.
pub fn jitter(now: SimInstant, speed: f64) -> f64 {
    let factor = (speed / 10.0).clamp(0.1, MAX_JITTER_FACTOR);
    (now.as_millis() as f64 * factor / 200.0).sin() * 0.02 * factor
}

/// What the owner of the clock must schedule next for the active trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripProgress {
    Tick { index: u64, at: SimInstant },
    Arrive { at: SimInstant },
}

/// A completed trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub floor: i64,
    pub requested: i64,
    pub kind: TripKind,
}

impl Arrival {
    /// Whether the car stopped short of or beyond the requested floor.
    pub fn snapped(&self) -> bool {
        self.floor != self.requested
    }
}

/// Result of an emergency halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt {
    /// Floor the display froze at
    pub floor: i64,
    /// Whether a trip was cut short
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
struct ActiveTrip {
    plan: TripPlan,
    started: SimInstant,
    /// Next tick expected; `None` once only the arrival is left
    next_tick: Option<u64>,
    animation: Option<Animation>,
}

/// Owns the car's position, phase and speed.
#[derive(Debug, Clone)]
pub struct MotionController {
    current_floor: i64,
    display: f64,
    phase: MotionPhase,
    speed: f64,
    trip: Option<ActiveTrip>,
    history: StateHistory<MotionPhase>,
}

impl MotionController {
    pub fn new(floor: i64, history_capacity: usize) -> Self {
        Self {
            current_floor: floor,
            display: floor as f64,
            phase: MotionPhase::Stopped,
            speed: 0.0,
            trip: None,
            history: StateHistory::with_capacity(history_capacity),
        }
    }

    /// Last committed floor.
    pub fn current_floor(&self) -> i64 {
        self.current_floor
    }

    /// Continuous display position as of the last refresh.
    pub fn display_floor(&self) -> f64 {
        self.display
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.trip.is_some()
    }

    /// Requested floor of the trip in flight.
    pub fn target_floor(&self) -> Option<i64> {
        self.trip.as_ref().map(|trip| trip.plan.requested())
    }

    pub fn trip(&self) -> Option<&TripPlan> {
        self.trip.as_ref().map(|trip| &trip.plan)
    }

    pub fn history(&self) -> &StateHistory<MotionPhase> {
        &self.history
    }

    /// Start a trip. Ticks due immediately are applied before returning.
    pub fn begin(&mut self, plan: TripPlan, now: SimInstant) -> TripProgress {
        let first = *plan.ticks().start();
        self.trip = Some(ActiveTrip {
            plan,
            started: now,
            next_tick: Some(first),
            animation: None,
        });
        self.speed = 0.0;
        self.set_phase(MotionPhase::Accelerating, now);
        debug!(
            kind = ?plan.kind(),
            from = plan.origin(),
            to = plan.destination(),
            "trip started"
        );

        if plan.tick_offset(first).is_zero() {
            if let Some(progress) = self.apply_tick(first, now) {
                return progress;
            }
        }
        TripProgress::Tick {
            index: first,
            at: now + plan.tick_offset(first),
        }
    }

    /// Apply tick `index` if it is the one the active trip expects.
    pub fn on_tick(&mut self, index: u64, now: SimInstant) -> Option<TripProgress> {
        let expected = self.trip.as_ref()?.next_tick?;
        if expected != index {
            return None;
        }
        self.apply_tick(index, now)
    }

    fn apply_tick(&mut self, index: u64, now: SimInstant) -> Option<TripProgress> {
        let trip = self.trip.as_mut()?;
        let tick = trip.plan.tick(index);

        if let Some(segment) = tick.segment {
            trip.animation = Some(Animation::new(
                segment.from,
                segment.to,
                now,
                segment.duration,
            ));
        }

        let progress = if index < *trip.plan.ticks().end() {
            trip.next_tick = Some(index + 1);
            TripProgress::Tick {
                index: index + 1,
                at: trip.started + trip.plan.tick_offset(index + 1),
            }
        } else {
            trip.next_tick = None;
            TripProgress::Arrive {
                at: trip.started + trip.plan.arrival_offset(),
            }
        };

        if let Some(floor) = tick.commit {
            self.current_floor = floor;
        }
        self.speed = tick.speed;
        self.set_phase(tick.phase, now);
        debug!(
            tick = index,
            floor = self.current_floor,
            phase = %tick.phase,
            speed = tick.speed,
            "motion tick"
        );
        Some(progress)
    }

    /// Finish the active trip once all of its ticks have fired.
    pub fn on_arrival(&mut self, now: SimInstant) -> Option<Arrival> {
        if self.trip.as_ref()?.next_tick.is_some() {
            return None;
        }
        let trip = self.trip.take()?;
        let floor = trip.plan.destination();
        self.current_floor = floor;
        self.display = floor as f64;
        self.speed = 0.0;
        self.set_phase(MotionPhase::Stopped, now);
        Some(Arrival {
            floor,
            requested: trip.plan.requested(),
            kind: trip.plan.kind(),
        })
    }

    /// Recompute the display position at `now`.
    pub fn refresh_display(&mut self, now: SimInstant, with_jitter: bool) -> f64 {
        self.display = match &self.trip {
            None => self.current_floor as f64,
            Some(trip) => {
                let base = trip
                    .animation
                    .map(|animation| animation.position_at(now))
                    .unwrap_or(self.current_floor as f64);
                if with_jitter {
                    base + jitter(now, self.speed)
                } else {
                    base
                }
            }
        };
        self.display
    }

    /// Stop dead: drop the trip and freeze the display at the nearest
    /// valid floor, committing it as current.
    pub fn halt(&mut self, now: SimInstant, range: &FloorRange) -> Halt {
        let interrupted = self.trip.take().is_some();
        let floor = nearest_floor(self.display, range);
        self.place(floor);
        self.speed = 0.0;
        self.set_phase(MotionPhase::Stopped, now);
        Halt { floor, interrupted }
    }

    /// Put a stationary car at `floor`.
    pub fn place(&mut self, floor: i64) {
        self.current_floor = floor;
        self.display = floor as f64;
    }

    fn set_phase(&mut self, phase: MotionPhase, now: SimInstant) {
        if self.phase == phase {
            return;
        }
        self.history.record(StateTransition {
            from: self.phase,
            to: phase,
            at: now,
        });
        self.phase = phase;
    }
}
