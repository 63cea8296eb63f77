//! Barrel elevation solver
//!
//! The range of a shot is calibrated as a quadratic in barrel elevation,
//! `d = 0.373 θ² + 5.914 θ + 41.24` with `θ` in degrees. The solver uses the
//! calibrated positive root of its inverse, which is only valid inside the
//! effective range band.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::Params;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Barrel elevation solution.
///
/// Both fields are zero when the distance is outside the effective range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BarrelSolution {
    /// Units: radians
    pub elevation_rad: f64,

    /// Current elevation minus the solved elevation, in `(-pi, pi]`.
    ///
    /// Units: radians
    pub error_rad: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// True if a solution exists for the distance.
pub fn in_range(params: &Params, distance_m: f64) -> bool {
    distance_m >= params.effective_min_range_m && distance_m <= params.effective_max_range_m
}

/// Solve for the barrel elevation needed to hit a target `distance_m` away.
pub fn solve(params: &Params, distance_m: f64, current_elevation_rad: f64) -> BarrelSolution {
    if !in_range(params, distance_m) {
        return BarrelSolution::default();
    }

    let c = &params.elevation_curve;

    // Round off at the band edges must not produce a NaN
    let disc = (c.disc_gain * distance_m - c.disc_offset).max(0.0);
    let elevation_deg = (-c.linear + disc.sqrt()) / c.denominator;
    let elevation_rad = elevation_deg.to_radians();

    BarrelSolution {
        elevation_rad,
        error_rad: wrap_pi(current_elevation_rad - elevation_rad),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
