//! Pure pursuit path follower

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{Params, Pose};
use util::maths::{clamp, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Steering and speed demands for a single tick.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SteeringDemand {
    /// Units: meters
    pub lookahead_m: f64,

    /// Heading of the lookahead point from the current position.
    ///
    /// Units: radians
    pub target_heading_rad: f64,

    /// Target heading minus current heading, in `(-pi, pi]`.
    ///
    /// Units: radians
    pub heading_error_rad: f64,

    /// Unfiltered pure pursuit curvature.
    ///
    /// Units: 1/meters
    pub curvature_m: f64,

    /// Filtered steering demand. Positive steers right.
    pub steering: f64,

    /// Normalised speed demand.
    pub speed: f64,
}

/// Path follower.
///
/// The only state carried between ticks is the previous steering demand,
/// which feeds the steering low pass filter.
#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    last_steering: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_steering(&self) -> f64 {
        self.last_steering
    }

    /// Compute the demands needed to reach `target_m` from `pose`.
    ///
    /// `distance_m` is the distance from the pose to the target.
    pub fn steer(
        &mut self,
        params: &Params,
        pose: &Pose,
        target_m: &Vector2<f64>,
        distance_m: f64
    ) -> SteeringDemand {
        let lookahead_m = calc_lookahead(params, distance_m);

        // Direction of the goal, weighted and renormalised
        let mut goal_dir = target_m - pose.position_m;
        let goal_norm = goal_dir.norm();
        if goal_norm > 0.0 {
            goal_dir /= goal_norm;
        }

        let mut target_dir = goal_dir * params.goal_weight;
        let target_norm = target_dir.norm();
        if target_norm > 0.0 {
            target_dir /= target_norm;
        }
        else {
            target_dir = goal_dir;
        }

        // Offset of the lookahead point from the current position
        let offset = target_dir * lookahead_m;
        let target_heading_rad = offset[0].atan2(offset[1]);

        let heading_error_rad = wrap_pi(target_heading_rad - pose.heading_rad);
        let curvature_m = 2.0 * heading_error_rad.sin() / lookahead_m.max(0.01);

        let steering = params.steering_smoothing * self.last_steering
            + (1.0 - params.steering_smoothing) * curvature_m;
        self.last_steering = steering;

        SteeringDemand {
            lookahead_m,
            target_heading_rad,
            heading_error_rad,
            curvature_m,
            steering,
            speed: calc_speed(params, distance_m, steering.abs()),
        }
    }
}

/// Lookahead distance for the given distance to the target.
pub fn calc_lookahead(params: &Params, distance_m: f64) -> f64 {
    clamp(
        &(distance_m * params.lookahead_gain + params.lookahead_offset_m),
        &params.lookahead_min_m,
        &params.lookahead_max_m
    )
}

/// Speed demand, always within `[min_speed, max_speed]`.
///
/// Inside half the slow radius the speed ramps linearly down to zero at the
/// target (before clamping). Outside it, speed is reduced by the magnitude of
/// the steering demand.
pub fn calc_speed(params: &Params, distance_m: f64, abs_steering: f64) -> f64 {
    let ramp_radius_m = params.slow_radius_m * 0.5;

    let speed = if distance_m < ramp_radius_m {
        util::maths::lin_map((0.0, ramp_radius_m), (0.0, params.max_speed), distance_m)
    }
    else {
        params.max_speed - abs_steering * params.speed_factor
    };

    clamp(&speed, &params.min_speed, &params.max_speed)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
