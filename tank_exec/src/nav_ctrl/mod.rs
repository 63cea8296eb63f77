//! # Navigation control module
//!
//! Navigation control drives the hull towards a destination along a sequence of waypoints produced
//! by a [`PathPlanner`]. Each tick it:
//!
//!  1. Measures the distance to the active waypoint, advancing to the next waypoint (or finishing
//!     the plan) once inside the tolerance radius.
//!  2. Computes a pure pursuit steering demand towards a lookahead point, low pass filtered across
//!     ticks, and a speed demand which ramps down close to the waypoint.
//!  3. Converts steering and speed into weights for the four discrete drive keys and samples one of
//!     them, so that near-equal weights do not lock the hull into oscillation.
//!
//! Heading is never measured directly. It is estimated by the [`PoseTracker`] from the bearing
//! between successive position reports, smoothed to reject jitter in the reports.
//!
//! Positions are planar `(x, z)` vectors in the simulator's world frame. Headings are measured
//! from the +z axis towards +x, i.e. `atan2(dx, dz)`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod blender;
pub mod follower;
pub mod params;
pub mod planner;
pub mod pose;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use blender::*;
pub use follower::*;
pub use params::Params;
pub use planner::*;
pub use pose::*;
pub use state::*;

use comms_if::pose::PoseParseError;
use util::params::LoadError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur in navigation control.
///
/// All of these are validation errors: the controller state is left untouched when one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Invalid position report: {0}")]
    InvalidPosition(PoseParseError),

    #[error("Invalid destination: {0}")]
    InvalidDestination(PoseParseError),

    /// A destination can only be planned to from a known position.
    #[error("No position has been reported yet")]
    NoPose,

    #[error("Obstacle at index {0} has non-finite or unordered bounds")]
    InvalidObstacle(usize),
}
