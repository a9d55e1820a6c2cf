//! # Alignment module
//!
//! Computes where the robot should stand to score at the nearest landmark, and builds the action
//! which drives it there and then signals the operator.
//!
//! The target is expressed in the landmark's own frame: `v` forwards, a lateral offset selected
//! by the [`AlignSide`] and a half turn so that the robot faces the landmark.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod action;
mod drive_to_pose;
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{f64::consts::PI, fmt::Display};

use serde::{Deserialize, Serialize};

pub use action::align_to_landmark;
pub use drive_to_pose::DriveToPose;
pub use params::AlignParams;

use crate::{
    loc::{Pose2, Transform2},
    path_follow::MotionConstraints,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Output of the targeting computation, fixed for the lifetime of an alignment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlignTarget {
    pub pose: Pose2,
    pub constraints: MotionConstraints,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which scoring position at the landmark to align to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AlignSide {
    Left,
    Center,
    Right,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AlignError {
    #[error("No landmarks are available to align to")]
    NoTargetAvailable,

    #[error("The current pose of the robot is not known")]
    PoseUnavailable,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AlignSide {
    /// Lateral offset in the landmark frame, positive to the landmark's left.
    pub fn lateral_offset_m(&self, params: &AlignParams) -> f64 {
        let d = params.branch_offset_m;
        let h = params.lateral_bias_m;

        match self {
            AlignSide::Right => d - h,
            AlignSide::Left => -d - h,
            AlignSide::Center => -h,
        }
    }
}

impl Display for AlignSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlignSide::Left => "LEFT",
            AlignSide::Center => "CENTER",
            AlignSide::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Compute the alignment target for the landmark nearest to `current`.
///
/// Velocity limits in the returned constraints are scaled by `params.speed_scale`, acceleration
/// limits are passed through unchanged. Returns [`AlignError::NoTargetAvailable`] if there are
/// no landmarks.
pub fn compute_alignment_target(
    current: &Pose2,
    landmarks: &[Pose2],
    side: AlignSide,
    params: &AlignParams,
    limits: &MotionConstraints,
) -> Result<AlignTarget, AlignError> {
    let landmark = current
        .nearest(landmarks)
        .ok_or(AlignError::NoTargetAvailable)?;

    let offset = Transform2::new(params.forward_offset_m, side.lateral_offset_m(params), PI);

    Ok(AlignTarget {
        pose: landmark.transform_by(&offset),
        constraints: limits.with_velocity_scale(params.speed_scale),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn params() -> AlignParams {
        AlignParams {
            forward_offset_m: 0.45,
            branch_offset_m: 0.5,
            lateral_bias_m: 0.1,
            speed_scale: 0.3,
        }
    }

    fn limits() -> MotionConstraints {
        MotionConstraints {
            max_speed_ms: 4.0,
            max_accel_mss: 3.0,
            max_rot_speed_rads: 9.0,
            max_rot_accel_radss: 8.0,
        }
    }

    #[test]
    fn test_lateral_offsets() {
        let p = params();
        assert!((AlignSide::Right.lateral_offset_m(&p) - 0.4).abs() < EPS);
        assert!((AlignSide::Left.lateral_offset_m(&p) + 0.6).abs() < EPS);
        assert!((AlignSide::Center.lateral_offset_m(&p) + 0.1).abs() < EPS);
    }

    #[test]
    fn test_selects_nearest_landmark() {
        let current = Pose2::new(0.0, 0.0, 0.0);
        let landmarks = vec![
            Pose2::new(3.0, 0.0, 0.0),
            Pose2::new(1.0, 0.0, 0.0),
            Pose2::new(0.0, 5.0, 0.0),
        ];

        let target =
            compute_alignment_target(&current, &landmarks, AlignSide::Right, &params(), &limits())
                .unwrap();

        // Landmark at (1, 0) facing +X: forwards 0.45, left 0.4, turned to face it
        assert!((target.pose.position_m.x - 1.45).abs() < EPS);
        assert!((target.pose.position_m.y - 0.4).abs() < EPS);
        assert!((target.pose.heading_rad.abs() - PI).abs() < EPS);
    }

    #[test]
    fn test_rotated_landmark() {
        let current = Pose2::new(0.0, 0.0, 0.0);
        let landmarks = vec![Pose2::new(2.0, 3.0, PI / 2.0)];

        let target =
            compute_alignment_target(&current, &landmarks, AlignSide::Left, &params(), &limits())
                .unwrap();

        // Forwards is +Y and left is -X in this landmark's frame
        assert!((target.pose.position_m.x - 2.6).abs() < EPS);
        assert!((target.pose.position_m.y - 3.45).abs() < EPS);
        assert!((target.pose.heading_rad + PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_constraints() {
        let target = compute_alignment_target(
            &Pose2::default(),
            &[Pose2::new(1.0, 1.0, 0.0)],
            AlignSide::Center,
            &params(),
            &limits(),
        )
        .unwrap();

        assert!((target.constraints.max_speed_ms - 1.2).abs() < EPS);
        assert!((target.constraints.max_rot_speed_rads - 2.7).abs() < EPS);
        assert_eq!(target.constraints.max_accel_mss, 3.0);
        assert_eq!(target.constraints.max_rot_accel_radss, 8.0);
    }

    #[test]
    fn test_no_landmarks() {
        assert_eq!(
            compute_alignment_target(
                &Pose2::default(),
                &[],
                AlignSide::Left,
                &params(),
                &limits()
            ),
            Err(AlignError::NoTargetAvailable)
        );
    }

    fn pose_strategy() -> impl Strategy<Value = Pose2> {
        (-10.0f64..10.0, -10.0f64..10.0, -PI..PI).prop_map(|(x, y, h)| Pose2::new(x, y, h))
    }

    proptest! {
        #[test]
        fn prop_target_is_deterministic_and_offset_from_a_landmark(
            current in pose_strategy(),
            landmarks in prop::collection::vec(pose_strategy(), 1..8),
        ) {
            let p = params();
            let first =
                compute_alignment_target(&current, &landmarks, AlignSide::Right, &p, &limits());
            let second =
                compute_alignment_target(&current, &landmarks, AlignSide::Right, &p, &limits());
            prop_assert_eq!(first, second);

            let target = first.unwrap();
            let nearest = current.nearest(&landmarks).unwrap();
            let expected = (p.forward_offset_m.powi(2) + 0.4f64.powi(2)).sqrt();
            prop_assert!((nearest.distance_to(&target.pose) - expected).abs() < 1e-6);
        }
    }
}
