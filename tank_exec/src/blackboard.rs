//! # Blackboard
//!
//! Holds the latest telemetry snapshot. The telemetry handler is the single
//! writer of full snapshots. Readers always take a complete copy so a tick
//! never sees a snapshot assembled from two different writes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use comms_if::telemetry::Telemetry;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Blackboard {
    snapshot: RwLock<Option<Telemetry>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot.
    pub fn publish(&self, telemetry: Telemetry) {
        *self.write() = Some(telemetry);
    }

    /// A copy of the latest snapshot, if one has been published.
    pub fn snapshot(&self) -> Option<Telemetry> {
        self.read().clone()
    }

    /// Write a simulated turret bearing into the snapshot taken at `time_s`.
    ///
    /// The write is dropped if the snapshot has been replaced since, returns
    /// true if it was applied.
    pub fn set_turret_bearing(&self, time_s: f64, turret_x_deg: f64) -> bool {
        let mut guard = self.write();

        match guard.as_mut() {
            Some(t) if t.time == time_s => {
                t.player_turret_x = turret_x_deg;
                trace!("Blackboard turret bearing set to {:.2} deg", turret_x_deg);
                true
            }
            _ => false,
        }
    }

    // Writers replace the whole snapshot, poisoning is ignored
    fn read(&self) -> RwLockReadGuard<Option<Telemetry>> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<Option<Telemetry>> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
