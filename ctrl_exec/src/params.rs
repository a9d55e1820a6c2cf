//! # Control Executable Parameters
//!
//! This module provides parameters for the control executable, loaded from `ctrl_exec.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use thiserror::Error;

use util::logger::LogParams;

use crate::{
    align::AlignParams,
    commands::{
        arm::ArmParams, drive::DriveParams, leds::LedParams, rollers::RollerParams,
    },
    sim::SimParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CtrlExecParams {
    // ---- CYCLE ----
    /// Target length of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Time the robot must stay disabled before the drivetrain brakes are released.
    ///
    /// Units: seconds
    pub coast_mode_delay_s: f64,

    /// Logging configuration
    pub log: LogParams,

    // ---- SUBSYSTEMS ----
    pub drive: DriveParams,
    pub align: AlignParams,
    pub leds: LedParams,
    pub arm: ArmParams,
    pub rollers: RollerParams,

    /// Simulated plant and path follower
    pub sim: SimParams,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("The cycle period must be a positive number of seconds, found {0}")]
    InvalidCyclePeriod(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CtrlExecParams {
    /// Check the values which the exec divides by or turns into durations.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.cycle_period_s.is_finite() && self.cycle_period_s > 0.0) {
            return Err(ParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file_parses() {
        let params: CtrlExecParams =
            util::params::from_str(include_str!("../../params/ctrl_exec.toml")).unwrap();

        assert_eq!(params.cycle_period_s, 0.02);
        assert_eq!(params.coast_mode_delay_s, 10.0);
        assert_eq!(params.align.speed_scale, 0.3);
        assert!(params.drive.limits.max_speed_ms > 0.0);
        assert!(params.arm.l4_m > params.arm.l1_m);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_cycle_period_rejected() {
        let mut params: CtrlExecParams =
            util::params::from_str(include_str!("../../params/ctrl_exec.toml")).unwrap();

        for period in [0.0, -0.02, f64::NAN, f64::INFINITY].iter() {
            params.cycle_period_s = *period;
            assert!(matches!(
                params.validate(),
                Err(ParamsError::InvalidCyclePeriod(_))
            ));
        }
    }

    #[test]
    fn test_field_file_parses() {
        let field: crate::loc::FieldLayout =
            util::params::from_str(include_str!("../../params/field.toml")).unwrap();

        assert!(!field.landmarks.is_empty());
    }
}
