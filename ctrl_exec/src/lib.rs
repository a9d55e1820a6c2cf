//! # Control library.
//!
//! This library allows other crates in the workspace, and the benches, to access items defined
//! inside the control crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Alignment - computes the pose to align to a landmark from and the action which drives there
pub mod align;

/// Operator bindings - wires the controllers and sensors to actions
pub mod bindings;

/// Actions for each subsystem
pub mod commands;

/// Global data store for the executable
pub mod data_store;

/// Localisation types - poses and the field layout
pub mod loc;

/// Exec parameters
pub mod params;

/// Path following interface
pub mod path_follow;

/// The robot state actions operate on
pub mod robot;

/// Action scheduler - resources, actions, composites and triggers
pub mod sched;

/// Simulated path follower and plant
pub mod sim;
