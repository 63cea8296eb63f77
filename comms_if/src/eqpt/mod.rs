//! # Equipment Interface
//!
//! This module defines the commands sent to the tank's equipment and the observations received
//! from it.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

/// Hull drive commands
pub mod drive;

/// Perception detections
pub mod per;

/// Turret and barrel commands
pub mod turret;
