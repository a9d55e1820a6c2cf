//! # Path following interface
//!
//! The path following service plans and tracks a route to a target pose within a set of motion
//! constraints. Only the interface is defined here, the exec provides a simulated implementation
//! in [`crate::sim`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use ctrl_if::eqpt::drive::ChassisSpeeds;

use crate::loc::Pose2;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

pub trait PathFollower {
    /// Start following a path to `target`, replacing any request in progress.
    fn begin(&mut self, target: &Pose2, constraints: &MotionConstraints) -> FollowHandle;

    /// Advance the request by one cycle from the current pose.
    fn step(&mut self, handle: FollowHandle, current: &Pose2) -> FollowStatus;

    /// Abandon the request. Has no effect if the handle is not the active request.
    fn cancel(&mut self, handle: FollowHandle);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifies a follow request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FollowHandle(pub u64);

/// Velocity and acceleration bounds for a motion.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConstraints {
    pub max_speed_ms: f64,
    pub max_accel_mss: f64,
    pub max_rot_speed_rads: f64,
    pub max_rot_accel_radss: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FollowStatus {
    /// Still travelling, the drivetrain should be given these speeds.
    Driving(ChassisSpeeds),

    /// The target has been reached.
    Complete,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotionConstraints {
    /// Scale the velocity limits by `factor`, keeping the acceleration limits.
    pub fn with_velocity_scale(&self, factor: f64) -> Self {
        Self {
            max_speed_ms: self.max_speed_ms * factor,
            max_rot_speed_rads: self.max_rot_speed_rads * factor,
            ..*self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_velocity_scale() {
        let limits = MotionConstraints {
            max_speed_ms: 4.0,
            max_accel_mss: 3.0,
            max_rot_speed_rads: 10.0,
            max_rot_accel_radss: 8.0,
        };

        let scaled = limits.with_velocity_scale(0.3);
        assert!((scaled.max_speed_ms - 1.2).abs() < 1e-12);
        assert!((scaled.max_rot_speed_rads - 3.0).abs() < 1e-12);
        assert_eq!(scaled.max_accel_mss, 3.0);
        assert_eq!(scaled.max_rot_accel_radss, 8.0);
    }
}
