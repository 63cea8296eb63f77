//! Parameters structure for TurretCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for turret control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {

    // ---- TOLERANCES ----

    /// Turret heading error below which the turret is on target.
    ///
    /// Units: radians
    pub turret_tolerance_rad: f64,

    /// Barrel elevation error below which the barrel is on target.
    ///
    /// Units: radians
    pub barrel_tolerance_rad: f64,

    // ---- BALLISTICS ----

    /// Shortest distance at which a firing solution exists.
    ///
    /// Units: meters
    pub effective_min_range_m: f64,

    /// Longest distance at which a firing solution exists.
    ///
    /// Units: meters
    pub effective_max_range_m: f64,

    /// Coefficients of the inverse range curve, giving the barrel elevation
    /// for a distance `d` as
    /// `(-linear + sqrt(disc_gain * d - disc_offset)) / denominator`.
    ///
    /// Units: degrees
    pub elevation_curve: ElevationCurve,

    // ---- AIMING ----

    /// Angle added to the goal bearing to align it with the turret frame.
    ///
    /// Units: radians
    pub frame_alignment_rad: f64,

    /// Lower bound on the weight of a rotate command.
    pub turret_weight_min: f64,

    /// Lower bound on the weight of an elevate command.
    pub barrel_weight_min: f64,

    /// Turret bearing step assumed for each rotate command.
    ///
    /// Units: degrees
    pub sim_rotate_step_deg: f64,
}

/// Calibrated inverse of the range curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElevationCurve {
    pub linear: f64,
    pub disc_gain: f64,
    pub disc_offset: f64,
    pub denominator: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            turret_tolerance_rad: 0.011,
            barrel_tolerance_rad: 0.011,
            effective_min_range_m: 21.002,
            effective_max_range_m: 115.8,
            elevation_curve: ElevationCurve::default(),
            frame_alignment_rad: 1.5707,
            turret_weight_min: 0.2,
            barrel_weight_min: 0.5,
            sim_rotate_step_deg: 1.0,
        }
    }
}

impl Default for ElevationCurve {
    fn default() -> Self {
        Self {
            linear: 5.914,
            disc_gain: 1.492,
            disc_offset: 24.264784,
            denominator: 0.746,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_param_file_matches_defaults() {
        let p: Params = util::params::from_toml_str(
            include_str!("../../../params/turret_ctrl.toml")
        ).unwrap();
        let d = Params::default();

        assert_eq!(p.turret_tolerance_rad, d.turret_tolerance_rad);
        assert_eq!(p.effective_min_range_m, d.effective_min_range_m);
        assert_eq!(p.effective_max_range_m, d.effective_max_range_m);
        assert_eq!(p.elevation_curve.disc_offset, d.elevation_curve.disc_offset);
        assert_eq!(p.frame_alignment_rad, d.frame_alignment_rad);
    }
}
