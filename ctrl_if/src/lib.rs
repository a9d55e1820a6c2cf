//! # Control interface crate.
//!
//! Provides all common interface types shared between the control executable, the utility crate
//! and any tooling that produces input scripts.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Exec events, i.e. inputs delivered to the control executable from a script or a driver station
pub mod event;

/// Demand definitions for equipment (drivetrain, status lights, rollers)
pub mod eqpt;

/// Operator controller model
pub mod input;

/// Robot operating modes
pub mod mode;
