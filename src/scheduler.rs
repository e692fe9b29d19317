//! Virtual-clock timer queue.
//!
//! Every time-dependent behaviour in the simulation (motion ticks, door
//! sequences, the SOS beacon and timeout, the warning-light flash) is a
//! timer in a single [`Scheduler`]. Timers are ordered by due instant and
//! then by scheduling order, so two timers due at the same instant fire in
//! the order they were scheduled. Cancelling a timer removes it from the
//! queue; nothing is left behind to fire later.
//!
//! # Example
//!
//! ```rust
//! use liftsim::scheduler::{Scheduler, SimInstant};
//! use std::time::Duration;
//!
//! let mut scheduler = Scheduler::new();
//! let first = scheduler.schedule_in(Duration::from_millis(30), "door");
//! scheduler.schedule_in(Duration::from_millis(10), "tick");
//! scheduler.cancel(first);
//!
//! let until = SimInstant::from_millis(100);
//! let (_, payload) = scheduler.pop_due(until).unwrap();
//! assert_eq!(payload, "tick");
//! assert_eq!(scheduler.now(), SimInstant::from_millis(10));
//! assert!(scheduler.pop_due(until).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// A point on the simulated clock, in whole milliseconds since start.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimInstant(u64);

impl SimInstant {
    pub const ZERO: SimInstant = SimInstant(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: SimInstant) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimInstant {
    type Output = SimInstant;

    fn add(self, rhs: Duration) -> SimInstant {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        SimInstant(self.0.saturating_add(millis))
    }
}

impl fmt::Display for SimInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

/// Handle to a scheduled timer, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Ordered queue of pending timers carrying payloads of type `T`.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: SimInstant,
    next_seq: u64,
    queue: BTreeMap<(SimInstant, u64), T>,
    due_by_id: HashMap<u64, SimInstant>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: SimInstant::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> SimInstant {
        self.now
    }

    /// Schedule `payload` at an absolute instant. Instants in the past fire
    /// on the next [`pop_due`](Self::pop_due).
    pub fn schedule_at(&mut self, due: SimInstant, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), payload);
        self.due_by_id.insert(seq, due);
        TimerId(seq)
    }

    /// Schedule `payload` to fire `delay` after the current instant.
    pub fn schedule_in(&mut self, delay: Duration, payload: T) -> TimerId {
        self.schedule_at(self.now + delay, payload)
    }

    /// Cancel a pending timer, returning its payload if it had not fired.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let due = self.due_by_id.remove(&id.0)?;
        self.queue.remove(&(due, id.0))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id.0)
    }

    /// Due instant of the earliest pending timer.
    pub fn next_due(&self) -> Option<SimInstant> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock forward to its due instant.
    pub fn pop_due(&mut self, until: SimInstant) -> Option<(TimerId, T)> {
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }
        let payload = self.queue.remove(&key)?;
        self.due_by_id.remove(&key.1);
        if key.0 > self.now {
            self.now = key.0;
        }
        Some((TimerId(key.1), payload))
    }

    /// Move the clock forward to `instant`. The clock never runs backwards.
    pub fn advance_to(&mut self, instant: SimInstant) {
        if instant > self.now {
            self.now = instant;
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
