//! Main tank executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand processing and handling (telemetry, pose reports,
//!           destinations, obstacles, detections)
//!         - Navigation control processing
//!         - Turret control processing
//!         - Visualisation output
//!
//! # Usage
//!
//!     tank_exec <script_path>
//!
//! Parameters are loaded from `$TANK_SW_ROOT/params`, sessions are written to
//! `$TANK_SW_ROOT/sessions`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use comms_if::eqpt::turret::ActionReply;
use tank_lib::{
    blackboard::Blackboard,
    data_store::DataStore,
    nav_ctrl::NavCtrl,
    params::TankExecParams,
    tc_processor,
    turret_ctrl::{BlackboardFeedback, TurretCtrl},
    viz_sink::{SessionVizSink, VizSink},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("tank_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Tank Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: TankExecParams = util::params::load("tank_exec.toml")
        .wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let blackboard = Arc::new(Blackboard::new());

    let mut nav_ctrl = NavCtrl::default();
    nav_ctrl
        .init("nav_ctrl.toml", &session)
        .wrap_err("Failed to initialise NavCtrl")?;
    info!("NavCtrl init complete");

    let mut turret_ctrl = TurretCtrl::default()
        .with_feedback(Box::new(BlackboardFeedback::new(blackboard.clone())));
    turret_ctrl
        .init("turret_ctrl.toml", &session)
        .wrap_err("Failed to initialise TurretCtrl")?;
    info!("TurretCtrl init complete");

    let mut ds = DataStore::new(nav_ctrl, turret_ctrl, blackboard);

    let mut viz_sink = SessionVizSink::new(&session);
    let mut last_viz_instant: Option<Instant> = None;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let cycle_frequency_hz = 1.0 / exec_params.cycle_period_s;

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- TELECOMMAND PROCESSING ----

        match si.get_pending_tcs(session::get_elapsed_seconds()) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    let reply = tc_processor::exec(&mut ds, tc);
                    info!("{}: {}", tc.name(), reply);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- NAVIGATION ----

        ds.nav_ctrl_input.hold = exec_params.halt_when_engaged && ds.target_tracker.is_engaged();

        match ds.nav_ctrl.proc(&ds.nav_ctrl_input) {
            Ok((move_reply, rpt)) => {
                if ds.is_1_hz_cycle {
                    info!("Move: {}", serde_json::to_string(&move_reply)?);
                }
                ds.nav_ctrl_output = Some(move_reply);
                ds.nav_ctrl_status_rpt = rpt;
            }
            Err(e) => {
                warn!("Error during NavCtrl processing: {}", e);
                ds.nav_ctrl_output = Some(ds.nav_ctrl.stop_reply());
            }
        }

        // ---- TURRET ----

        ds.turret_ctrl_input.snapshot = ds.blackboard.snapshot();
        ds.turret_ctrl_input.target = ds.target_tracker.target().copied();

        match ds.turret_ctrl.proc(&ds.turret_ctrl_input) {
            Ok((action, rpt)) => {
                let reply: ActionReply = action.to_reply();
                if !reply.is_neutral() {
                    info!("Action: {}", serde_json::to_string(&reply)?);
                }
                ds.turret_ctrl_output = Some(reply);
                ds.turret_ctrl_status_rpt = rpt;
            }
            Err(e) => {
                // Bad snapshots only affect this cycle
                warn!("Error during TurretCtrl processing: {}", e);
                ds.turret_ctrl_output = Some(ActionReply::neutral());
            }
        }

        // ---- VISUALISATION ----

        if exec_params.viz_period_s > 0.0 {
            let due = match last_viz_instant {
                Some(i) => i.elapsed().as_secs_f64() >= exec_params.viz_period_s,
                None => true,
            };

            if due {
                viz_sink.publish(ds.nav_ctrl.viz_frame());
                last_viz_instant = Some(Instant::now());
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    viz_sink.publish(ds.nav_ctrl.viz_frame());
    info!("{} visualisation frames published", viz_sink.num_frames());

    info!("End of execution");

    session.exit();

    Ok(())
}
