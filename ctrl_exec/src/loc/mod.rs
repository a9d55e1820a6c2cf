//! # Localisation module
//!
//! Field-frame poses and the landmark layout. Pose estimation itself happens outside this
//! workspace; the robot only receives a snapshot of the current pose each cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Isometry2, Vector2};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position and heading in the field frame.
///
/// Loaded headings are wrapped the same way as those given to [`Pose2::new`].
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPose2")]
pub struct Pose2 {
    /// Position in the field frame
    pub position_m: Vector2<f64>,

    /// Angle to the positive field X axis, in the range [-pi, pi)
    pub heading_rad: f64,
}

/// A pose as written in a parameter file, heading not yet wrapped.
#[derive(Deserialize)]
struct RawPose2 {
    position_m: Vector2<f64>,
    heading_rad: f64,
}

/// A rigid transform expressed in the frame of the pose it is applied to.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Transform2 {
    pub translation_m: Vector2<f64>,
    pub rotation_rad: f64,
}

/// A known field-fixed reference pose.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: u32,
    pub pose: Pose2,
}

/// Layout of the field, loaded from `field.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldLayout {
    pub landmarks: Vec<Landmark>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: util::maths::wrap_pi(heading_rad),
        }
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(self.position_m, self.heading_rad)
    }

    pub fn from_isometry(iso: &Isometry2<f64>) -> Self {
        Self::new(
            iso.translation.vector.x,
            iso.translation.vector.y,
            iso.rotation.angle(),
        )
    }

    /// Apply a transform expressed in this pose's own frame.
    pub fn transform_by(&self, transform: &Transform2) -> Self {
        Self::from_isometry(&(self.to_isometry() * transform.to_isometry()))
    }

    pub fn distance_to(&self, other: &Pose2) -> f64 {
        (other.position_m - self.position_m).norm()
    }

    /// The candidate closest to this pose. Ties go to the earliest candidate.
    pub fn nearest<'a>(&self, candidates: &'a [Pose2]) -> Option<&'a Pose2> {
        candidates
            .iter()
            .min_by_key(|c| OrderedFloat(self.distance_to(c)))
    }
}

impl From<RawPose2> for Pose2 {
    fn from(raw: RawPose2) -> Self {
        Self::new(raw.position_m.x, raw.position_m.y, raw.heading_rad)
    }
}

impl Transform2 {
    pub fn new(x_m: f64, y_m: f64, rotation_rad: f64) -> Self {
        Self {
            translation_m: Vector2::new(x_m, y_m),
            rotation_rad,
        }
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(self.translation_m, self.rotation_rad)
    }
}

impl FieldLayout {
    /// Landmark poses in layout order.
    pub fn poses(&self) -> Vec<Pose2> {
        self.landmarks.iter().map(|l| l.pose).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_nearest() {
        let here = Pose2::new(0.0, 0.0, 0.0);
        let candidates = vec![
            Pose2::new(3.0, 0.0, 0.0),
            Pose2::new(0.0, 1.0, 0.0),
            Pose2::new(-5.0, 0.0, 0.0),
        ];

        assert_eq!(here.nearest(&candidates), Some(&candidates[1]));
        assert_eq!(here.nearest(&[]), None);

        // Equal distances resolve to the first in order
        let tied = vec![Pose2::new(2.0, 0.0, 0.0), Pose2::new(0.0, -2.0, 1.0)];
        assert_eq!(here.nearest(&tied), Some(&tied[0]));
    }

    #[test]
    fn test_transform_by() {
        let landmark = Pose2::new(2.0, 3.0, FRAC_PI_2);
        let target = landmark.transform_by(&Transform2::new(0.4, 0.4, PI));

        assert!((target.position_m.x - 1.6).abs() < EPS);
        assert!((target.position_m.y - 3.4).abs() < EPS);
        assert!((target.heading_rad + FRAC_PI_2).abs() < EPS);
        assert!((landmark.distance_to(&target) - 0.32f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_field_layout_from_toml() {
        let layout: FieldLayout = util::params::from_str(
            r#"
            [[landmarks]]
            id = 7
            pose = { position_m = [1.0, 2.0], heading_rad = 0.5 }

            [[landmarks]]
            id = 8
            pose = { position_m = [3.0, 4.0], heading_rad = -0.5 }
            "#,
        )
        .unwrap();

        assert_eq!(layout.landmarks.len(), 2);
        assert_eq!(layout.landmarks[1].id, 8);
        assert_eq!(layout.poses()[0].position_m, Vector2::new(1.0, 2.0));
        assert!((layout.poses()[0].heading_rad - 0.5).abs() < EPS);
    }

    #[test]
    fn test_loaded_heading_is_wrapped() {
        let layout: FieldLayout = util::params::from_str(
            r#"
            [[landmarks]]
            id = 1
            pose = { position_m = [0.0, 0.0], heading_rad = 4.0 }

            [[landmarks]]
            id = 2
            pose = { position_m = [0.0, 0.0], heading_rad = -7.0 }
            "#,
        )
        .unwrap();

        let poses = layout.poses();
        assert!((poses[0].heading_rad - (4.0 - 2.0 * PI)).abs() < EPS);
        assert!((poses[1].heading_rad - (-7.0 + 2.0 * PI)).abs() < EPS);

        for p in poses.iter() {
            assert!(p.heading_rad >= -PI && p.heading_rad < PI);
        }
    }
}
