//! # Arm demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Named heights the elevator and arm can be raised to.
///
/// `L1` to `L4` are the scoring levels, `AlgaeL2` and `AlgaeL3` sit between the branches so the
/// algae grabber can reach the algae resting there.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArmLevel {
    Stow,
    L1,
    L2,
    L3,
    L4,
    AlgaeL2,
    AlgaeL3,
}

impl Default for ArmLevel {
    fn default() -> Self {
        ArmLevel::Stow
    }
}
