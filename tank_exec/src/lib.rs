//! # Tank library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the tank crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Blackboard - holds the latest telemetry snapshot shared between modules
pub mod blackboard;

/// Data store - owns the controllers and per-cycle data of the executable
pub mod data_store;

/// Navigation control - drives the hull along the planned waypoints
pub mod nav_ctrl;

/// Executable parameters
pub mod params;

/// Perception - selects the target to engage from the detections
pub mod per;

/// Telecommand processor - routes TCs to the modules and builds their replies
pub mod tc_processor;

/// Turret control - aims the turret and barrel and fires
pub mod turret_ctrl;

/// Visualisation sink - publishes path visualisation frames
pub mod viz_sink;
