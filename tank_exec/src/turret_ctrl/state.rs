//! Implementations for the TurretCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::Vector2;
use serde::Serialize;
use std::f64::consts::PI;

// Internal
use super::{
    aiming, ballistics,
    BarrelSolution, NoFeedback, Params,
    TurretAction, TurretCtrlError, TurretFeedback};
use comms_if::{
    eqpt::{per::Detection, turret::TurretKey},
    telemetry::Telemetry};
use util::{
    maths::clamp,
    module::State,
    params,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Turret control module state
pub struct TurretCtrl {
    params: Params,

    feedback: Box<dyn TurretFeedback>,

    /// Time of the last snapshot processed, zero before the first one.
    last_time_s: f64,

    report: StatusReport,
}

/// Input data to turret control.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Latest telemetry snapshot.
    pub snapshot: Option<Telemetry>,

    /// Target selected by perception, `None` if no target is tracked.
    pub target: Option<Detection>,
}

/// Everything needed to aim at a target, taken from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCtx {
    /// Units: seconds
    pub time_s: f64,

    /// Units: meters
    pub player_m: Vector2<f64>,

    /// Units: meters
    pub target_m: Vector2<f64>,

    /// Units: meters
    pub distance_m: f64,

    /// Turret bearing.
    ///
    /// Units: degrees
    pub turret_x_deg: f64,

    /// Barrel elevation.
    ///
    /// Units: degrees
    pub turret_y_deg: f64,
}

/// Phase of the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Phase {
    Idle,
    RotateTurret,
    ElevateBarrel,
    Fire,
    Hold,
}

/// Status report for TurretCtrl processing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    pub phase: Phase,

    /// True if the snapshot was rejected as not newer than the last one.
    pub stale: bool,

    /// Units: radians
    pub heading_error_rad: f64,

    pub barrel: BarrelSolution,

    pub in_range: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            stale: false,
            heading_error_rad: 0.0,
            barrel: BarrelSolution::default(),
            in_range: false,
        }
    }
}

impl FireCtx {
    /// Build the context from a snapshot and the tracked target.
    ///
    /// Returns `None` if no target is tracked or the snapshot has no enemy
    /// position. The snapshot's distance is preferred over the perception
    /// estimate.
    pub fn from_snapshot(
        snapshot: &Telemetry,
        target: Option<&Detection>
    ) -> Result<Option<Self>, TurretCtrlError> {
        let target = match target {
            Some(t) => t,
            None => return Ok(None),
        };

        let enemy = match snapshot.enemy_pos {
            Some(e) => e,
            None => return Ok(None),
        };

        if !snapshot.time.is_finite() {
            return Err(TurretCtrlError::NonFiniteSnapshot("time"));
        }
        if !snapshot.player_pos.is_finite() {
            return Err(TurretCtrlError::NonFiniteSnapshot("playerPos"));
        }
        if !enemy.is_finite() {
            return Err(TurretCtrlError::NonFiniteSnapshot("enemyPos"));
        }
        if !snapshot.player_turret_x.is_finite() || !snapshot.player_turret_y.is_finite() {
            return Err(TurretCtrlError::NonFiniteSnapshot("turret angle"));
        }

        let distance_m = snapshot.distance.unwrap_or(target.distance);
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(TurretCtrlError::InvalidDistance(distance_m));
        }

        Ok(Some(Self {
            time_s: snapshot.time,
            player_m: Vector2::new(snapshot.player_pos.x, snapshot.player_pos.z),
            target_m: Vector2::new(enemy.x, enemy.z),
            distance_m,
            turret_x_deg: snapshot.player_turret_x,
            turret_y_deg: snapshot.player_turret_y,
        }))
    }
}

impl Default for TurretCtrl {
    fn default() -> Self {
        Self::new(Params::default(), Box::new(NoFeedback))
    }
}

impl TurretCtrl {
    pub fn new(params: Params, feedback: Box<dyn TurretFeedback>) -> Self {
        Self {
            params,
            feedback,
            last_time_s: 0.0,
            report: StatusReport::default(),
        }
    }

    /// Replace the feedback sink for simulated turret bearings.
    pub fn with_feedback(mut self, feedback: Box<dyn TurretFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    /// Choose the action for this tick.
    pub fn get_action(&mut self, ctx: Option<&FireCtx>) -> TurretAction {
        self.report = StatusReport::default();

        let ctx = match ctx {
            Some(c) => c,
            None => return TurretAction::Idle,
        };

        // Only newer snapshots are processed
        if !(ctx.time_s > self.last_time_s) {
            self.report.stale = true;
            trace!("Snapshot at {} s is not newer than {} s", ctx.time_s, self.last_time_s);
            return TurretAction::Idle;
        }
        self.last_time_s = ctx.time_s;

        let heading_error_rad = aiming::heading_error(
            &self.params,
            &ctx.player_m,
            &ctx.target_m,
            ctx.turret_x_deg.to_radians()
        );
        let barrel = ballistics::solve(
            &self.params,
            ctx.distance_m,
            ctx.turret_y_deg.to_radians()
        );
        let in_range = ballistics::in_range(&self.params, ctx.distance_m);

        self.report.heading_error_rad = heading_error_rad;
        self.report.barrel = barrel;
        self.report.in_range = in_range;

        let action = if heading_error_rad.abs() > self.params.turret_tolerance_rad {
            let weight = clamp(&(heading_error_rad.abs() / PI), &self.params.turret_weight_min, &1.0);

            let (key, step_deg) = if heading_error_rad > 0.0 {
                (TurretKey::RotateRight, self.params.sim_rotate_step_deg)
            }
            else {
                (TurretKey::RotateLeft, -self.params.sim_rotate_step_deg)
            };

            let sim_turret_x_deg = ctx.turret_x_deg + step_deg;
            self.feedback.publish_bearing(ctx.time_s, sim_turret_x_deg);

            self.report.phase = Phase::RotateTurret;
            TurretAction::Rotate { key, weight, sim_turret_x_deg }
        }
        else if in_range {
            if barrel.error_rad.abs() > self.params.barrel_tolerance_rad {
                let weight = clamp(&(barrel.error_rad.abs() / PI), &self.params.barrel_weight_min, &1.0);

                // Error is current minus solved elevation
                let key = if barrel.error_rad < 0.0 {
                    TurretKey::ElevateUp
                }
                else {
                    TurretKey::ElevateDown
                };

                self.report.phase = Phase::ElevateBarrel;
                TurretAction::Elevate { key, weight }
            }
            else {
                self.report.phase = Phase::Fire;
                info!("Firing at target {:.1} m away", ctx.distance_m);
                TurretAction::Fire
            }
        }
        else {
            self.report.phase = Phase::Hold;
            TurretAction::Hold
        };

        debug!(
            "TurretCtrl: {:?}, heading err {:.4} rad, barrel err {:.4} rad, in range {}",
            self.report.phase, heading_error_rad, barrel.error_rad, in_range
        );

        action
    }
}

impl State for TurretCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = TurretAction;
    type StatusReport = StatusReport;
    type ProcError = TurretCtrlError;

    /// Initialise the TurretCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;
        self.last_time_s = 0.0;

        session.save("turret_ctrl/params.json", self.params.clone());

        Ok(())
    }

    /// Perform cyclic processing of turret control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let ctx = match input_data.snapshot {
            Some(ref s) => FireCtx::from_snapshot(s, input_data.target.as_ref())?,
            None => None,
        };

        let action = self.get_action(ctx.as_ref());

        Ok((action, self.report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
