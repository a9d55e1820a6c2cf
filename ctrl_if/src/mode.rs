//! # Robot modes

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The operating mode of the robot.
///
/// Actions are only scheduled while the robot is enabled (any mode other than `Disabled`).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum RobotMode {
    Disabled,
    Teleop,
    Auto,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotMode {
    /// Returns true if the robot is enabled in this mode.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RobotMode::Disabled)
    }
}

impl Default for RobotMode {
    fn default() -> Self {
        RobotMode::Disabled
    }
}
