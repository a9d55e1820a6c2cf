//! # Drivetrain demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Field-relative chassis speed demand.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct ChassisSpeeds {
    /// Speed along the field X axis.
    ///
    /// Units: meters/second
    pub vx_ms: f64,

    /// Speed along the field Y axis.
    ///
    /// Units: meters/second
    pub vy_ms: f64,

    /// Rotation rate, positive anticlockwise.
    ///
    /// Units: radians/second
    pub omega_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ChassisSpeeds {
    pub fn new(vx_ms: f64, vy_ms: f64, omega_rads: f64) -> Self {
        Self {
            vx_ms,
            vy_ms,
            omega_rads,
        }
    }

    /// A demand that holds the drivetrain still.
    pub fn stop() -> Self {
        Self::default()
    }

    /// Magnitude of the linear part of the demand.
    pub fn linear_speed_ms(&self) -> f64 {
        self.vx_ms.hypot(self.vy_ms)
    }
}
