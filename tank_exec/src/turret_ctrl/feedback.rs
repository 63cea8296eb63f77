//! Simulated turret feedback
//!
//! The simulator does not report the turret bearing between snapshots, so
//! every rotate command is assumed to move the turret a fixed step. The
//! stepped bearing is handed to a feedback sink so downstream readers see it
//! before the next snapshot arrives.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use crate::blackboard::Blackboard;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Receives simulated turret bearings.
pub trait TurretFeedback: Send {
    /// Publish the bearing the turret is assumed to have after a rotate
    /// command issued against the snapshot taken at `time_s`.
    fn publish_bearing(&mut self, time_s: f64, turret_x_deg: f64);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Discards simulated bearings.
#[derive(Debug, Default)]
pub struct NoFeedback;

/// Writes simulated bearings back onto the blackboard.
#[derive(Debug)]
pub struct BlackboardFeedback {
    blackboard: Arc<Blackboard>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TurretFeedback for NoFeedback {
    fn publish_bearing(&mut self, _time_s: f64, _turret_x_deg: f64) {}
}

impl BlackboardFeedback {
    pub fn new(blackboard: Arc<Blackboard>) -> Self {
        Self { blackboard }
    }
}

impl TurretFeedback for BlackboardFeedback {
    fn publish_bearing(&mut self, time_s: f64, turret_x_deg: f64) {
        self.blackboard.set_turret_bearing(time_s, turret_x_deg);
    }
}
