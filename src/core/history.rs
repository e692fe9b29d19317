//! Bounded state transition history.
//!
//! Records transitions between discrete controller states against the
//! simulated clock. The history keeps the most recent `capacity`
//! transitions so a long-running simulation does not grow without bound.

use super::state::State;
use crate::scheduler::SimInstant;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use liftsim::core::StateTransition;
/// use liftsim::motion::MotionPhase;
/// use liftsim::scheduler::SimInstant;
///
/// let transition = StateTransition {
///     from: MotionPhase::Stopped,
///     to: MotionPhase::Accelerating,
///     at: SimInstant::from_millis(0),
/// };
/// assert_eq!(transition.to, MotionPhase::Accelerating);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Simulated instant of the transition
    pub at: SimInstant,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use liftsim::core::{StateHistory, StateTransition};
/// use liftsim::motion::MotionPhase;
/// use liftsim::scheduler::SimInstant;
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(StateTransition {
///     from: MotionPhase::Stopped,
///     to: MotionPhase::Accelerating,
///     at: SimInstant::from_millis(0),
/// });
/// history.record(StateTransition {
///     from: MotionPhase::Accelerating,
///     to: MotionPhase::Stopped,
///     at: SimInstant::from_millis(900),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![MotionPhase::Stopped, MotionPhase::Accelerating, MotionPhase::Stopped]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

/// Default number of transitions retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history retaining at most `capacity` transitions
    /// (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Record a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed, oldest first: the `from` of the oldest retained
    /// transition followed by the `to` of each transition.
    pub fn get_path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        match (self.transitions.front(), self.transitions.back()) {
            (Some(first), Some(last)) => Some(last.at.saturating_since(first.at)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
