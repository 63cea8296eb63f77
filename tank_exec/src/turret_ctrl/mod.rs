//! # Turret control module
//!
//! Turret control aims the turret and barrel at the tracked target and fires
//! once both are on target. It is a small state machine re-evaluated on every
//! new telemetry snapshot:
//!
//! - Rotate the turret until the heading error is inside tolerance.
//! - If the target is inside the effective range, elevate the barrel until the
//!   elevation error is inside tolerance.
//! - Fire.
//!
//! A target out of range with the turret on target is held. Snapshots which
//! are not newer than the last one processed produce no action.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod aiming;
pub mod ballistics;
mod feedback;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use ballistics::BarrelSolution;
pub use feedback::*;
pub use params::*;
pub use state::*;

use comms_if::eqpt::turret::{ActionReply, TurretKey};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TurretCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TurretCtrlError {
    #[error("Telemetry snapshot contains a non-finite {0}")]
    NonFiniteSnapshot(&'static str),

    #[error("Target distance must be finite and positive, found {0}")]
    InvalidDistance(f64),
}

/// The action chosen by turret control for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurretAction {
    /// No target, or the snapshot is not newer than the last one.
    Idle,

    /// On target but out of range.
    Hold,

    Rotate {
        key: TurretKey,
        weight: f64,

        /// Bearing the turret is assumed to reach after the command.
        ///
        /// Units: degrees
        sim_turret_x_deg: f64,
    },

    Elevate {
        key: TurretKey,
        weight: f64,
    },

    Fire,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TurretAction {
    pub fn to_reply(&self) -> ActionReply {
        match self {
            TurretAction::Idle | TurretAction::Hold => ActionReply::neutral(),
            TurretAction::Rotate { key, weight, .. } => ActionReply::new(*key, Some(*weight)),
            TurretAction::Elevate { key, weight } => ActionReply::new(*key, Some(*weight)),
            TurretAction::Fire => ActionReply::new(TurretKey::Fire, None),
        }
    }
}
