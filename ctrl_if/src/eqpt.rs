//! # Equipment Interface
//!
//! This module defines the demand structures written by actions to the robot's equipment. The
//! low level device drivers (or the simulation) consume these once per cycle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod arm;
pub mod drive;
pub mod leds;
pub mod rollers;
