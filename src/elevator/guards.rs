//! Preconditions of the elevator's commands.

use crate::core::{enforce_all, Guard};
use crate::error::{BusyReason, ElevatorError};

/// What the guards need to know about the elevator.
pub(crate) struct CommandContext {
    pub moving: bool,
    pub sos_active: bool,
}

fn not_in_emergency() -> Guard<CommandContext> {
    Guard::new(
        |ctx: &CommandContext| !ctx.sos_active,
        ElevatorError::Busy {
            reason: BusyReason::SosActive,
        },
    )
}

fn stationary() -> Guard<CommandContext> {
    Guard::new(
        |ctx: &CommandContext| !ctx.moving,
        ElevatorError::Busy {
            reason: BusyReason::Moving,
        },
    )
}

/// Guard sets per command family.
pub(crate) struct CommandGuards {
    /// Moves and door commands
    operate: Vec<Guard<CommandContext>>,
    /// Reset and range changes, which the emergency stop does not block
    reconfigure: Vec<Guard<CommandContext>>,
}

impl CommandGuards {
    pub(crate) fn new() -> Self {
        Self {
            operate: vec![not_in_emergency(), stationary()],
            reconfigure: vec![stationary()],
        }
    }

    pub(crate) fn operate(&self, ctx: &CommandContext) -> Result<(), ElevatorError> {
        enforce_all(&self.operate, ctx)
    }

    pub(crate) fn reconfigure(&self, ctx: &CommandContext) -> Result<(), ElevatorError> {
        enforce_all(&self.reconfigure, ctx)
    }
}
