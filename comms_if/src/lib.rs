//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software: the telecommands accepted by
//! the executable, the telemetry snapshot published by the simulator, and the replies sent back.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Command and reply definitions for equipment (drive, turret, perception)
pub mod eqpt;

/// Pose report string format
pub mod pose;

/// Tagged OK/ERROR replies
pub mod reply;

/// Telemetry snapshot published by the simulator
pub mod telemetry;

/// Frames consumed by the path visualisation
pub mod viz;
