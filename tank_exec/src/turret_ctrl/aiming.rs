//! Turret aiming geometry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use std::f64::consts::FRAC_PI_2;

use super::Params;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Bearing of the target in the turret frame.
///
/// The bearing of the unit goal vector is rotated by a quarter turn and then
/// by the calibrated frame alignment angle, which is deliberately not exactly
/// a quarter turn. A zero length goal vector gives a zero bearing before
/// alignment.
///
/// Units: radians
pub fn goal_heading(params: &Params, player_m: &Vector2<f64>, target_m: &Vector2<f64>) -> f64 {
    let mut goal = target_m - player_m;
    let norm = goal.norm();
    if norm > 0.0 {
        goal /= norm;
    }

    goal[0].atan2(goal[1]) - FRAC_PI_2 + params.frame_alignment_rad
}

/// Turret heading error, goal heading minus turret bearing, in `(-pi, pi]`.
///
/// Units: radians
pub fn heading_error(
    params: &Params,
    player_m: &Vector2<f64>,
    target_m: &Vector2<f64>,
    turret_bearing_rad: f64
) -> f64 {
    wrap_pi(goal_heading(params, player_m, target_m) - turret_bearing_rad)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
