//! Core `State` trait for the discrete states tracked by the simulation.
//!
//! Motion phases and door positions both implement this trait so they can
//! be recorded in a [`StateHistory`](super::StateHistory) and named in logs.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for discrete controller states.
///
/// All methods are pure. A state is a plain value describing where a
/// controller currently sits in its sequence.
///
/// # Required Traits
///
/// - `Copy`: states are small tags and are recorded by value
/// - `PartialEq`: transitions compare states to detect changes
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: states appear in snapshots and reports
///
/// # Example
///
/// ```rust
/// use liftsim::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
/// enum Hatch {
///     Sealed,
///     Venting,
/// }
///
/// impl State for Hatch {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Sealed => "sealed",
///             Self::Venting => "venting",
///         }
///     }
///
///     fn is_at_rest(&self) -> bool {
///         matches!(self, Self::Sealed)
///     }
/// }
///
/// assert_eq!(Hatch::Venting.name(), "venting");
/// assert!(Hatch::Sealed.is_at_rest());
/// ```
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Stable lowercase name for logs and reports.
    fn name(&self) -> &'static str;

    /// Whether this is the resting state the controller returns to between
    /// sequences.
    ///
    /// Default implementation returns `false`.
    fn is_at_rest(&self) -> bool {
        false
    }
}
