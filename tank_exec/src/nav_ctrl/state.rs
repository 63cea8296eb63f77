//! Implementations for the NavCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

// Internal
use super::{
    calc_progress, dead_reckon,
    CmdWeights, CommandBlender, DirectPlanner, NavCtrlError, Params,
    PathFollower, PathPlanner, Pose, PoseTracker, SteeringDemand};
use comms_if::{
    eqpt::drive::{MoveCmd, MoveReply},
    pose::parse_xyz,
    reply::{DestinationReport, PositionReport},
    telemetry::Position3,
    viz::{Obstacle, VizFrame, VizPose}};
use util::{
    maths::clamp,
    module::State,
    params,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation control module state.
///
/// `R` is the random source used to blend commands. It is seeded from entropy
/// by default, tests inject a seeded generator.
pub struct NavCtrl<R = StdRng> {
    params: Params,

    planner: Box<dyn PathPlanner>,
    pose_tracker: PoseTracker,
    follower: PathFollower,
    blender: CommandBlender<R>,

    waypoints: Vec<Vector2<f64>>,
    current_waypoint_idx: usize,
    completed: bool,

    /// Straight line distance to the destination when it was set. Cleared on
    /// every waypoint advance.
    initial_distance_m: Option<f64>,

    last_command: Option<MoveCmd>,

    /// Positions visited since the destination was set.
    actual_path: Vec<Vector2<f64>>,

    obstacles: Vec<Obstacle>,

    report: StatusReport,
}

/// Input data to navigation control.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Hold the hull at STOP this tick without advancing the plan.
    pub hold: bool,
}

/// Status report for the most recent NavCtrl tick.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// Distance to the active waypoint after any advance.
    pub distance_m: f64,

    pub demand: SteeringDemand,
    pub progress: f64,
    pub weights: CmdWeights,

    /// True if the tick advanced to the next waypoint.
    pub waypoint_advanced: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavCtrl<StdRng> {
    /// Create a new controller with an entropy seeded random source.
    pub fn new(params: Params, planner: Box<dyn PathPlanner>) -> Self {
        Self::with_rng(params, planner, StdRng::from_entropy())
    }

}

impl Default for NavCtrl<StdRng> {
    /// Default parameters, planning with a [`DirectPlanner`].
    fn default() -> Self {
        let params = Params::default();
        let planner = direct_planner(&params);

        Self::new(params, Box::new(planner))
    }
}

impl<R: Rng> NavCtrl<R> {
    pub fn with_rng(params: Params, planner: Box<dyn PathPlanner>, rng: R) -> Self {
        Self {
            pose_tracker: PoseTracker::new(&params),
            follower: PathFollower::new(),
            blender: CommandBlender::new(rng),
            params,
            planner,
            waypoints: Vec::new(),
            current_waypoint_idx: 0,
            completed: false,
            initial_distance_m: None,
            last_command: None,
            actual_path: Vec::new(),
            obstacles: Vec::new(),
            report: StatusReport::default(),
        }
    }

    // ---- ACCESSORS ----

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose_tracker.pose()
    }

    pub fn waypoints(&self) -> &[Vector2<f64>] {
        &self.waypoints
    }

    pub fn current_waypoint_idx(&self) -> usize {
        self.current_waypoint_idx
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn initial_distance_m(&self) -> Option<f64> {
        self.initial_distance_m
    }

    pub fn last_command(&self) -> Option<MoveCmd> {
        self.last_command
    }

    pub fn actual_path(&self) -> &[Vector2<f64>] {
        &self.actual_path
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    // ---- OPERATIONS ----

    /// Handle a `"x,y,z"` position report.
    pub fn update_position(&mut self, position: &str) -> Result<PositionReport, NavCtrlError> {
        let pos = parse_xyz(position).map_err(NavCtrlError::InvalidPosition)?;
        let (x, z) = pos.planar();

        Ok(self.update_position_m(Vector2::new(x, z)))
    }

    /// Handle a planar position report.
    pub fn update_position_m(&mut self, position_m: Vector2<f64>) -> PositionReport {
        let update = self.pose_tracker.update(position_m);

        self.actual_path.push(position_m);

        PositionReport {
            position: update.pose.position_array(),
            heading_degrees: update.pose.heading_deg(),
        }
    }

    /// Handle a `"x,y,z"` destination request.
    ///
    /// The destination is clamped into the world and a new plan is requested
    /// from the current position, also clamped into the world. If the planner
    /// finds no path the plan is immediately complete.
    pub fn set_destination(&mut self, destination: &str) -> Result<DestinationReport, NavCtrlError> {
        let dest = parse_xyz(destination).map_err(NavCtrlError::InvalidDestination)?;

        let pose = self.pose_tracker.pose().ok_or(NavCtrlError::NoPose)?;

        let world = self.params.world_size_m;
        let dest = Position3::new(
            clamp(&dest.x, &0.0, &world),
            dest.y,
            clamp(&dest.z, &0.0, &world)
        );
        let (x, z) = dest.planar();
        let goal_m = Vector2::new(x, z);
        let start_m = Vector2::new(
            clamp(&pose.position_m[0], &0.0, &world),
            clamp(&pose.position_m[1], &0.0, &world)
        );

        self.actual_path = vec![pose.position_m];
        self.waypoints = self.planner.find_path(start_m, goal_m);
        self.current_waypoint_idx = 0;
        self.completed = self.waypoints.is_empty();
        self.initial_distance_m = Some((goal_m - pose.position_m).norm());

        if self.completed {
            info!("No path to ({:.2}, {:.2}), destination dropped", x, z);
        }
        else {
            info!(
                "Destination set to ({:.2}, {:.2}) with {} waypoints",
                x, z, self.waypoints.len()
            );
        }
        debug!("Waypoints: {:?}", self.waypoints);

        Ok(DestinationReport {
            destination: dest,
            initial_distance: self.initial_distance_m,
            waypoints: self.waypoints.iter().map(|w| [w[0], w[1]]).collect(),
        })
    }

    /// Add obstacles to the known set.
    ///
    /// All obstacles are validated before any are added. Returns the total
    /// number of known obstacles.
    pub fn update_obstacles(&mut self, obstacles: &[Obstacle]) -> Result<usize, NavCtrlError> {
        if let Some(i) = obstacles.iter().position(|o| !o.is_valid()) {
            return Err(NavCtrlError::InvalidObstacle(i));
        }

        self.obstacles.extend_from_slice(obstacles);
        self.planner.set_obstacles(&self.obstacles);

        Ok(self.obstacles.len())
    }

    /// Compute the drive command for this tick.
    ///
    /// Returns STOP if there is no pose, no plan, or the plan is complete.
    /// Otherwise the chosen command is used to dead reckon the pose until the
    /// next position report.
    pub fn get_move(&mut self) -> MoveReply {
        self.report = StatusReport::default();

        let pose = match self.pose_tracker.pose() {
            Some(p) if !self.completed => p,
            _ => return self.stop_reply(),
        };

        let mut target_m = match self.waypoints.get(self.current_waypoint_idx) {
            Some(t) => *t,
            None => return self.stop_reply(),
        };

        let mut distance_m = (target_m - pose.position_m).norm();

        if distance_m < self.params.tolerance_m {
            if self.current_waypoint_idx + 1 >= self.waypoints.len() {
                self.completed = true;
                self.initial_distance_m = None;
                self.report.distance_m = distance_m;

                info!("Final waypoint reached");
                return self.stop_reply();
            }

            self.current_waypoint_idx += 1;
            self.initial_distance_m = None;
            self.report.waypoint_advanced = true;

            target_m = self.waypoints[self.current_waypoint_idx];
            distance_m = (target_m - pose.position_m).norm();

            debug!(
                "Advanced to waypoint {} of {}",
                self.current_waypoint_idx,
                self.waypoints.len()
            );
        }

        let demand = self.follower.steer(&self.params, &pose, &target_m, distance_m);
        let progress = calc_progress(distance_m, self.initial_distance_m);
        let weights = CmdWeights::calc(
            &self.params,
            demand.steering,
            demand.speed,
            demand.heading_error_rad,
            progress
        );

        self.report.distance_m = distance_m;
        self.report.demand = demand;
        self.report.progress = progress;
        self.report.weights = weights;

        let (cmd, weight) = match self.blender.choose(&weights) {
            Some(c) => c,
            None => return self.stop_reply(),
        };

        self.last_command = Some(cmd);

        let dr_pos_m = dead_reckon(&self.params, &pose, cmd, demand.speed);
        self.pose_tracker.set_dead_reckoned(dr_pos_m);
        self.actual_path.push(dr_pos_m);

        trace!(
            "NavCtrl: {:?} (w {:.3}) dist {:.2} err {:.3} steer {:.3} speed {:.3}",
            cmd, weight, distance_m, demand.heading_error_rad, demand.steering, demand.speed
        );

        MoveReply {
            cmd,
            weight,
            current_waypoint_idx: self.current_waypoint_idx,
            completed: self.completed,
        }
    }

    /// A STOP reply carrying the current plan state.
    pub fn stop_reply(&self) -> MoveReply {
        MoveReply::stop(self.current_waypoint_idx, self.completed)
    }

    /// Build a visualisation frame of the current state.
    pub fn viz_frame(&self) -> VizFrame {
        VizFrame {
            obstacles: self.obstacles.clone(),
            waypoints: self.waypoints.iter().map(|w| [w[0], w[1]]).collect(),
            actual_path: self.actual_path.iter().map(|p| [p[0], p[1]]).collect(),
            current_pose: self.pose_tracker.pose().map(|p| VizPose {
                position: p.position_array(),
                heading_deg: p.heading_deg(),
            }),
        }
    }
}

impl<R: Rng> State for NavCtrl<R> {
    type InitData = &'static str;
    type InitError = NavCtrlError;

    type InputData = InputData;
    type OutputData = MoveReply;
    type StatusReport = StatusReport;
    type ProcError = NavCtrlError;

    /// Initialise the NavCtrl module.
    ///
    /// Expected init data is the path to the parameter file, relative to the
    /// parameters directory. Any existing plan and pose are dropped and a
    /// [`DirectPlanner`] is used.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(NavCtrlError::ParamLoadError)?;

        self.planner = Box::new(direct_planner(&params));
        self.pose_tracker = PoseTracker::new(&params);
        self.follower = PathFollower::new();
        self.waypoints.clear();
        self.current_waypoint_idx = 0;
        self.completed = false;
        self.initial_distance_m = None;
        self.last_command = None;
        self.actual_path.clear();
        self.obstacles.clear();
        self.report = StatusReport::default();
        self.params = params;

        session.save("nav_ctrl/params.json", self.params.clone());

        Ok(())
    }

    /// Perform cyclic processing of navigation control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let reply = if input_data.hold {
            self.report = StatusReport::default();
            self.stop_reply()
        }
        else {
            self.get_move()
        };

        Ok((reply, self.report))
    }
}

/// Straight line planner whose segment count is bounded by the world diagonal.
fn direct_planner(params: &Params) -> DirectPlanner {
    let planner = DirectPlanner::new(params.waypoint_spacing_m);

    if params.waypoint_spacing_m > 0.0 {
        let diag_m = params.world_size_m * std::f64::consts::SQRT_2;
        planner.with_max_segments((diag_m / params.waypoint_spacing_m).ceil() as usize)
    }
    else {
        planner
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn seeded(seed: u64) -> NavCtrl<StdRng> {
        let params = Params::default();
        let planner = DirectPlanner::new(params.waypoint_spacing_m);
        NavCtrl::with_rng(params, Box::new(planner), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_stop_without_plan() {
        let mut nc = seeded(0);

        assert_eq!(nc.get_move(), MoveReply::stop(0, false));

        nc.update_position("10,0,10").unwrap();
        assert_eq!(nc.get_move(), MoveReply::stop(0, false));
    }

    #[test]
    fn test_invalid_input() {
        let mut nc = seeded(0);

        assert!(matches!(
            nc.update_position("1,2"),
            Err(NavCtrlError::InvalidPosition(_))
        ));
        assert!(matches!(
            nc.update_position("a,b,c"),
            Err(NavCtrlError::InvalidPosition(_))
        ));
        assert!(nc.pose().is_none());

        assert!(matches!(
            nc.set_destination("100,0,100"),
            Err(NavCtrlError::NoPose)
        ));
        assert!(matches!(
            nc.set_destination("100,0"),
            Err(NavCtrlError::InvalidDestination(_))
        ));
    }

    #[test]
    fn test_update_position_report() {
        let mut nc = seeded(0);

        let r = nc.update_position("0,5,0").unwrap();
        assert_eq!(r.position, [0.0, 0.0]);
        assert_eq!(r.heading_degrees, 0.0);

        let r = nc.update_position("10,5,0").unwrap();
        assert_eq!(r.position, [10.0, 0.0]);
        assert!((r.heading_degrees - 18.0).abs() < 1e-9);

        // No motion, no heading change
        let r2 = nc.update_position("10,5,0").unwrap();
        assert_eq!(r2.heading_degrees, r.heading_degrees);

        assert_eq!(nc.actual_path().len(), 3);
    }

    #[test]
    fn test_heading_always_wrapped() {
        let mut nc = seeded(0);

        for i in 0..500 {
            let a = i as f64 * 0.37;
            let pos = format!("{},0,{}", 150.0 + 50.0 * a.sin(), 150.0 - 50.0 * a.cos());
            nc.update_position(&pos).unwrap();

            let h = nc.pose().unwrap().heading_rad;
            assert!(h > -PI && h <= PI);
        }
    }

    #[test]
    fn test_set_destination_clamps() {
        let mut nc = seeded(0);
        nc.update_position("10,0,10").unwrap();

        let r = nc.set_destination("400,3,-20").unwrap();
        assert_eq!(r.destination, Position3::new(300.0, 3.0, 0.0));
        assert!((r.initial_distance.unwrap() - (290.0f64.powi(2) + 100.0).sqrt()).abs() < 1e-9);
        assert_eq!(r.waypoints.last(), Some(&[300.0, 0.0]));
        assert!(!nc.is_completed());
        assert_eq!(nc.actual_path(), &[Vector2::new(10.0, 10.0)]);
    }

    #[test]
    fn test_proc_hold() {
        let mut nc = seeded(5);
        nc.update_position("0,0,0").unwrap();
        nc.set_destination("100,0,100").unwrap();

        let (reply, rpt) = nc.proc(&InputData { hold: true }).unwrap();
        assert_eq!(reply, MoveReply::stop(0, false));
        assert_eq!(rpt.distance_m, 0.0);
        assert!(nc.last_command().is_none());

        let (reply, rpt) = nc.proc(&InputData::default()).unwrap();
        assert_ne!(reply.cmd, MoveCmd::Stop);
        assert!(reply.weight > 0.0);
        assert!(rpt.distance_m > 0.0);
        assert_eq!(nc.last_command(), Some(reply.cmd));
    }

    #[test]
    fn test_plan_from_outside_world() {
        let params = Params::default();
        let planner = direct_planner(&params);
        let mut nc = NavCtrl::with_rng(params, Box::new(planner), StdRng::seed_from_u64(0));

        nc.update_position("1e9,0,0").unwrap();
        let r = nc.set_destination("100,0,100").unwrap();

        // Planned from the world edge at (300, 0)
        assert_eq!(r.waypoints.len(), 7);
        assert_eq!(r.waypoints.last(), Some(&[100.0, 100.0]));
        assert!(r.waypoints.iter().all(|w| w[0] <= 300.0 && w[1] <= 300.0));
        assert!(!nc.is_completed());
        assert_eq!(nc.actual_path(), &[Vector2::new(1e9, 0.0)]);
    }

    #[test]
    fn test_empty_plan_completes() {
        let mut nc = seeded(0);
        nc.update_position("0,0,0").unwrap();
        nc.update_obstacles(&[Obstacle {
            x_min: 90.0,
            x_max: 110.0,
            z_min: 90.0,
            z_max: 110.0,
        }])
        .unwrap();

        let r = nc.set_destination("100,0,100").unwrap();
        assert!(r.waypoints.is_empty());
        assert!(nc.is_completed());
        assert_eq!(nc.get_move(), MoveReply::stop(0, true));
    }

    #[test]
    fn test_invalid_obstacles_rejected() {
        let mut nc = seeded(0);
        let good = Obstacle { x_min: 0.0, x_max: 1.0, z_min: 0.0, z_max: 1.0 };
        let bad = Obstacle { x_min: 2.0, x_max: 1.0, ..good };

        assert!(matches!(
            nc.update_obstacles(&[good, bad]),
            Err(NavCtrlError::InvalidObstacle(1))
        ));
        assert!(nc.obstacles().is_empty());

        assert_eq!(nc.update_obstacles(&[good]).unwrap(), 1);
        assert_eq!(nc.update_obstacles(&[good, good]).unwrap(), 3);
    }

    #[test]
    fn test_drive_to_destination() {
        let mut nc = seeded(1234);
        nc.update_position("0,0,0").unwrap();

        let r = nc.set_destination("100,0,100").unwrap();
        assert!(!r.waypoints.is_empty());
        assert!(!nc.is_completed());

        let num_waypoints = nc.waypoints().len();
        let final_wp = *nc.waypoints().last().unwrap();
        let mut last_idx = 0;
        let mut reached_last_idx = false;

        for _ in 0..200_000 {
            let m = nc.get_move();

            assert!(m.current_waypoint_idx >= last_idx);
            assert!(m.current_waypoint_idx < num_waypoints);
            last_idx = m.current_waypoint_idx;

            if m.current_waypoint_idx == num_waypoints - 1 {
                reached_last_idx = true;
            }

            if m.completed {
                assert_eq!(m.cmd, MoveCmd::Stop);
                break;
            }

            assert_ne!(m.cmd, MoveCmd::Stop);
            assert!(m.weight > 0.0);
        }

        assert!(nc.is_completed());
        assert!(reached_last_idx);
        assert_eq!(nc.current_waypoint_idx(), num_waypoints - 1);

        let pos = nc.pose().unwrap().position_m;
        assert!((pos - final_wp).norm() < nc.params().tolerance_m);

        // Stays stopped
        assert_eq!(nc.get_move(), MoveReply::stop(num_waypoints - 1, true));
    }

    #[test]
    fn test_move_weight_matches_report() {
        let mut nc = seeded(99);
        nc.update_position("150,0,150").unwrap();
        nc.set_destination("150,0,50").unwrap();

        for _ in 0..500 {
            let m = nc.get_move();
            if m.cmd == MoveCmd::Stop {
                break;
            }
            assert!(m.weight > 0.0);
            assert_eq!(m.weight, nc.report().weights.get(m.cmd));
            assert_eq!(nc.last_command(), Some(m.cmd));

            let s = nc.report().demand.speed;
            assert!(s >= nc.params().min_speed && s <= nc.params().max_speed);
        }
    }

    #[test]
    fn test_viz_frame() {
        let mut nc = seeded(5);
        nc.update_position("0,0,0").unwrap();
        nc.set_destination("0,0,70").unwrap();
        nc.get_move();

        let frame = nc.viz_frame();
        assert_eq!(frame.waypoints, vec![[0.0, 35.0], [0.0, 70.0]]);
        assert_eq!(frame.actual_path.len(), 2);
        assert_eq!(frame.actual_path[0], [0.0, 0.0]);
        assert!(frame.current_pose.is_some());
        assert!(frame.obstacles.is_empty());
    }
}
