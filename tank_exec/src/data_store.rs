//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use comms_if::eqpt::{drive::MoveReply, turret::ActionReply};

use crate::{
    blackboard::Blackboard,
    nav_ctrl::{self, NavCtrl},
    per::TargetTracker,
    turret_ctrl::{self, TurretCtrl},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Data store for the executable.
///
/// Owns every controller and the state shared between them. Nothing here is
/// global, the main loop passes the store by reference to whatever needs it.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time at the start of the cycle
    pub session_time_s: f64,

    // Shared state
    pub blackboard: Arc<Blackboard>,
    pub target_tracker: TargetTracker,

    // NavCtrl
    pub nav_ctrl: NavCtrl,
    pub nav_ctrl_input: nav_ctrl::InputData,
    pub nav_ctrl_output: Option<MoveReply>,
    pub nav_ctrl_status_rpt: nav_ctrl::StatusReport,

    // TurretCtrl
    pub turret_ctrl: TurretCtrl,
    pub turret_ctrl_input: turret_ctrl::InputData,
    pub turret_ctrl_output: Option<ActionReply>,
    pub turret_ctrl_status_rpt: turret_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(nav_ctrl: NavCtrl, turret_ctrl: TurretCtrl, blackboard: Arc<Blackboard>) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            session_time_s: 0.0,
            blackboard,
            target_tracker: TargetTracker::new(),
            nav_ctrl,
            nav_ctrl_input: nav_ctrl::InputData::default(),
            nav_ctrl_output: None,
            nav_ctrl_status_rpt: nav_ctrl::StatusReport::default(),
            turret_ctrl,
            turret_ctrl_input: turret_ctrl::InputData::default(),
            turret_ctrl_output: None,
            turret_ctrl_status_rpt: turret_ctrl::StatusReport::default(),
            num_consec_cycle_overruns: 0,
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the per-cycle outputs and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.nav_ctrl_input = nav_ctrl::InputData::default();
        self.nav_ctrl_output = None;
        self.nav_ctrl_status_rpt = nav_ctrl::StatusReport::default();
        self.turret_ctrl_input = turret_ctrl::InputData::default();
        self.turret_ctrl_output = None;
        self.turret_ctrl_status_rpt = turret_ctrl::StatusReport::default();

        self.session_time_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}
