//! Core building blocks shared by every controller.
//!
//! - Floor numbering and the serviceable floor range
//! - The `State` trait for discrete controller states
//! - Guard predicates for command gating
//! - Bounded transition history
//!
//! Everything here is pure; the timed behaviour lives in the controllers
//! and the [`scheduler`](crate::scheduler).

pub mod floor;
mod guard;
mod history;
mod state;

pub use floor::{floor_buttons, format_floor, nearest_floor, FloorRange, MAX_SAFE_FLOOR};
pub use guard::{enforce_all, Guard};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::State;
