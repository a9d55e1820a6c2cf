//! # Commands
//!
//! Factories for the robot's actions, grouped by the subsystem they drive.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Elevator and arm actions
pub mod arm;

/// Drivetrain actions and the operator interrupt
pub mod drive;

/// Status light animations and indications
pub mod leds;

/// Coral roller and algae grabber actions
pub mod rollers;
