//! Guard predicates for gating commands.
//!
//! A guard pairs a pure predicate over some context with the rejection to
//! report when the predicate does not hold. Command handlers evaluate
//! their guards before touching any state.

use crate::error::ElevatorError;

/// Pure predicate that decides whether a command may proceed.
///
/// # Example
///
/// ```rust
/// use liftsim::core::Guard;
/// use liftsim::error::{BusyReason, ElevatorError};
///
/// struct Cab {
///     moving: bool,
/// }
///
/// let stationary = Guard::new(
///     |cab: &Cab| !cab.moving,
///     ElevatorError::Busy { reason: BusyReason::Moving },
/// );
///
/// assert!(stationary.check(&Cab { moving: false }));
/// assert_eq!(
///     stationary.enforce(&Cab { moving: true }),
///     Err(ElevatorError::Busy { reason: BusyReason::Moving })
/// );
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
    rejection: ElevatorError,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate and the error reported when it
    /// fails.
    pub fn new<F>(predicate: F, rejection: ElevatorError) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            rejection,
        }
    }

    /// Check if the guard allows the command in this context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    /// Like [`check`](Self::check) but returns the rejection on failure.
    pub fn enforce(&self, context: &C) -> Result<(), ElevatorError> {
        if self.check(context) {
            Ok(())
        } else {
            Err(self.rejection.clone())
        }
    }

    pub fn rejection(&self) -> &ElevatorError {
        &self.rejection
    }
}

/// Evaluate guards in order, reporting the first rejection.
pub fn enforce_all<C>(guards: &[Guard<C>], context: &C) -> Result<(), ElevatorError> {
    guards.iter().try_for_each(|guard| guard.enforce(context))
}
