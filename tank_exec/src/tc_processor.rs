//! # Telecommand processor module
//!
//! The telecommand processor handles TCs from the script or any other source
//! and builds the reply for each one.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Vector2;
use serde::Serialize;
use serde_json::Value;

// Internal
use crate::data_store::DataStore;
use comms_if::{
    reply::{ObstacleReport, PositionReport, Reply, TargetReport},
    tc::Tc,
    telemetry::Telemetry,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to pass the TC on to the relevant modules, and
/// returns the JSON reply. Errors are reported in the reply and never stop
/// execution.
pub fn exec(ds: &mut DataStore, tc: &Tc) -> Value {
    let reply = match tc {
        Tc::Info(t) => to_json(handle_info(ds, t)),
        Tc::UpdatePosition(p) => to_json(Reply::from(ds.nav_ctrl.update_position(p))),
        Tc::SetDestination(d) => to_json(Reply::from(ds.nav_ctrl.set_destination(d))),
        Tc::UpdateObstacles(o) => to_json(Reply::from(
            ds.nav_ctrl
                .update_obstacles(o)
                .map(|num_obstacles| ObstacleReport { num_obstacles }),
        )),
        Tc::Detections(d) => {
            let target = ds.target_tracker.update(d);
            to_json(Reply::Ok(TargetReport {
                num_detections: d.len(),
                target,
            }))
        }
    };

    if reply.get("status").and_then(Value::as_str) == Some("ERROR") {
        warn!("{} rejected: {}", tc.name(), reply);
    }
    else {
        debug!("{} -> {}", tc.name(), reply);
    }

    reply
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Publish a telemetry snapshot and feed its position to navigation.
fn handle_info(ds: &mut DataStore, telemetry: &Telemetry) -> Reply<PositionReport> {
    if !telemetry.time.is_finite() {
        return Reply::error("Telemetry time is not finite");
    }
    if !telemetry.player_pos.is_finite() {
        return Reply::error("Telemetry playerPos is not finite");
    }

    ds.blackboard.publish(telemetry.clone());

    let (x, z) = telemetry.player_pos.planar();
    Reply::Ok(ds.nav_ctrl.update_position_m(Vector2::new(x, z)))
}

fn to_json<T: Serialize>(reply: Reply<T>) -> Value {
    match serde_json::to_value(&reply) {
        Ok(v) => v,
        Err(e) => {
            warn!("Could not serialise reply: {}", e);
            Value::Null
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        blackboard::Blackboard,
        nav_ctrl::{DirectPlanner, NavCtrl, Params},
        turret_ctrl::TurretCtrl,
    };
    use comms_if::{
        eqpt::per::Detection,
        telemetry::Position3,
        viz::Obstacle,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;
    use std::sync::Arc;

    fn data_store() -> DataStore {
        let params = Params::default();
        let planner = DirectPlanner::new(params.waypoint_spacing_m);
        let nav = NavCtrl::with_rng(params, Box::new(planner), StdRng::seed_from_u64(3));

        DataStore::new(nav, TurretCtrl::default(), Arc::new(Blackboard::new()))
    }

    #[test]
    fn test_position_and_destination() {
        let mut ds = data_store();

        let r = exec(&mut ds, &Tc::SetDestination("100,0,100".into()));
        assert_eq!(r["status"], "ERROR");

        let r = exec(&mut ds, &Tc::UpdatePosition("0,0,0".into()));
        assert_eq!(r, json!({"status": "OK", "position": [0.0, 0.0], "heading_degrees": 0.0}));

        let r = exec(&mut ds, &Tc::SetDestination("100,0,100".into()));
        assert_eq!(r["status"], "OK");
        assert_eq!(r["destination"], json!({"x": 100.0, "y": 0.0, "z": 100.0}));
        assert_eq!(r["waypoints"].as_array().map(|w| w.len()), Some(5));

        let r = exec(&mut ds, &Tc::UpdatePosition("0,0".into()));
        assert_eq!(r["status"], "ERROR");
        assert!(r["message"].as_str().is_some());
    }

    #[test]
    fn test_info_publishes() {
        let mut ds = data_store();

        let mut t = Telemetry::new(2.5, Position3::new(10.0, 1.0, 20.0));
        t.enemy_pos = Some(Position3::new(10.0, 1.0, 80.0));

        let r = exec(&mut ds, &Tc::Info(t.clone()));
        assert_eq!(r["status"], "OK");
        assert_eq!(r["position"], json!([10.0, 20.0]));

        assert_eq!(ds.blackboard.snapshot(), Some(t));
        assert_eq!(
            ds.nav_ctrl.pose().map(|p| p.position_m),
            Some(Vector2::new(10.0, 20.0))
        );

        let bad = Telemetry::new(std::f64::NAN, Position3::default());
        let r = exec(&mut ds, &Tc::Info(bad));
        assert_eq!(r["status"], "ERROR");
        assert_eq!(ds.blackboard.snapshot().map(|s| s.time), Some(2.5));
    }

    #[test]
    fn test_obstacles_and_detections() {
        let mut ds = data_store();

        let o = Obstacle { x_min: 0.0, x_max: 1.0, z_min: 0.0, z_max: 1.0 };
        let r = exec(&mut ds, &Tc::UpdateObstacles(vec![o, o]));
        assert_eq!(r, json!({"status": "OK", "num_obstacles": 2}));

        let r = exec(&mut ds, &Tc::UpdateObstacles(vec![Obstacle { x_min: 5.0, ..o }]));
        assert_eq!(r["status"], "ERROR");

        let r = exec(
            &mut ds,
            &Tc::Detections(vec![
                Detection { id: 3, distance: 70.0, pixel_count: 40 },
                Detection { id: 4, distance: 45.0, pixel_count: 12 },
            ]),
        );
        assert_eq!(r["num_detections"], 2);
        assert_eq!(r["target"]["id"], 4);
        assert!(ds.target_tracker.is_engaged());

        let r = exec(&mut ds, &Tc::Detections(vec![]));
        assert_eq!(r, json!({"status": "OK", "num_detections": 0, "target": null}));
        assert!(!ds.target_tracker.is_engaged());
    }
}
