//! # Roller demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Demand for the game piece rollers.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum RollerDemand {
    Stopped,

    /// Pull a game piece in, with the given duty cycle in [0, 1].
    Intake(f64),

    /// Push a game piece out, with the given duty cycle in [0, 1].
    Outtake(f64),
}

impl Default for RollerDemand {
    fn default() -> Self {
        RollerDemand::Stopped
    }
}
