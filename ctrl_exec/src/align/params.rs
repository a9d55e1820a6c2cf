//! Parameters structure for alignment

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for alignment targeting.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct AlignParams {
    // ---- OFFSETS ----
    /// Distance from the robot's odometry centre to its front bumper, applied along the
    /// landmark's forward axis (`v`).
    ///
    /// Units: meters
    pub forward_offset_m: f64,

    /// Lateral distance from the landmark to either scoring branch (`d`).
    ///
    /// Units: meters
    pub branch_offset_m: f64,

    /// Lateral offset of the game piece from the robot centre line (`h`), subtracted for every
    /// side.
    ///
    /// Units: meters
    pub lateral_bias_m: f64,

    // ---- MOTION ----
    /// Factor applied to the drivetrain's velocity limits while aligning. Acceleration limits
    /// are not scaled.
    pub speed_scale: f64,
}
