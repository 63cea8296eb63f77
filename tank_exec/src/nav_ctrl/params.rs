//! Parameters structure for NavCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for navigation control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {

    // ---- WORLD ----

    /// Side length of the square world. Destinations are clamped into
    /// `[0, world_size_m]` on both planar axes.
    ///
    /// Units: meters
    pub world_size_m: f64,

    /// Maximum spacing between planned waypoints.
    ///
    /// Units: meters
    pub waypoint_spacing_m: f64,

    // ---- POSE ESTIMATION ----

    /// Weight given to the previous heading estimate when smoothing, between
    /// 0 and 1.
    pub heading_smoothing: f64,

    /// Displacements shorter than this do not update the heading estimate.
    ///
    /// Units: meters
    pub min_heading_update_m: f64,

    // ---- PATH FOLLOWING ----

    /// Radius around a waypoint inside which it is considered reached.
    ///
    /// Units: meters
    pub tolerance_m: f64,

    /// Minimum lookahead distance.
    ///
    /// Units: meters
    pub lookahead_min_m: f64,

    /// Maximum lookahead distance.
    ///
    /// Units: meters
    pub lookahead_max_m: f64,

    /// Gain on the distance to the waypoint used to derive the lookahead.
    pub lookahead_gain: f64,

    /// Offset added to the scaled distance when deriving the lookahead.
    ///
    /// Units: meters
    pub lookahead_offset_m: f64,

    /// Weight given to the previous steering demand when smoothing, between
    /// 0 and 1.
    pub steering_smoothing: f64,

    /// Weight of the goal direction when projecting the lookahead point. The
    /// weighted direction is renormalised, a zero weight falls back on the
    /// raw goal direction.
    pub goal_weight: f64,

    // ---- SPEED ----

    /// Distance from the waypoint inside which speed ramps down.
    ///
    /// Units: meters
    pub slow_radius_m: f64,

    /// Maximum normalised speed demand.
    pub max_speed: f64,

    /// Minimum normalised speed demand.
    pub min_speed: f64,

    /// How strongly the steering magnitude reduces the speed demand.
    pub speed_factor: f64,

    // ---- COMMAND BLENDING ----

    /// Base weights for each directional command.
    pub weight_factors: WeightFactors,

    /// Additional weight given to a turning command per unit of steering.
    pub steer_weight_gain: f64,

    /// Heading error magnitude beyond which reversing becomes a candidate.
    ///
    /// Units: radians
    pub reverse_heading_error_rad: f64,

    /// Gain applied to route progress when boosting command weights.
    pub progress_gain: f64,

    /// Distance a single drive command is assumed to move the hull when
    /// dead reckoning.
    ///
    /// Units: meters
    pub move_step_m: f64,
}

/// Base weights of the directional commands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightFactors {
    pub right: f64,
    pub left: f64,
    pub forward: f64,
    pub back: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            world_size_m: 300.0,
            waypoint_spacing_m: 35.0,
            heading_smoothing: 0.8,
            min_heading_update_m: 0.01,
            tolerance_m: 15.0,
            lookahead_min_m: 1.0,
            lookahead_max_m: 10.0,
            lookahead_gain: 0.5,
            lookahead_offset_m: 5.0,
            steering_smoothing: 0.7,
            goal_weight: 2.0,
            slow_radius_m: 50.0,
            max_speed: 1.0,
            min_speed: 0.1,
            speed_factor: 0.8,
            weight_factors: WeightFactors::default(),
            steer_weight_gain: 2.0,
            reverse_heading_error_rad: 0.6 * std::f64::consts::PI,
            progress_gain: 0.5,
            move_step_m: 0.1,
        }
    }
}

impl Default for WeightFactors {
    fn default() -> Self {
        Self {
            right: 0.6,
            left: 0.6,
            forward: 0.5,
            back: 0.5,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_param_file_matches_defaults() {
        let p: Params = util::params::from_toml_str(
            include_str!("../../../params/nav_ctrl.toml")
        ).unwrap();
        let d = Params::default();

        assert_eq!(p.tolerance_m, d.tolerance_m);
        assert_eq!(p.heading_smoothing, d.heading_smoothing);
        assert_eq!(p.steering_smoothing, d.steering_smoothing);
        assert_eq!(p.weight_factors.right, d.weight_factors.right);
        assert_eq!(p.weight_factors.back, d.weight_factors.back);
        assert!((p.reverse_heading_error_rad - d.reverse_heading_error_rad).abs() < 1e-12);
        assert_eq!(p.move_step_m, d.move_step_m);
    }
}
