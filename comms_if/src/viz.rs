//! # Visualisation frames
//!
//! The path visualisation consumes a frame describing the known obstacles, the planned waypoints,
//! the path actually driven, and the current pose. Frames are write-only from the controllers'
//! point of view.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An axis aligned obstacle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

/// The pose drawn on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VizPose {
    /// `[x, z]`
    pub position: [f64; 2],
    pub heading_deg: f64,
}

/// One frame of the path visualisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VizFrame {
    pub obstacles: Vec<Obstacle>,
    pub waypoints: Vec<[f64; 2]>,
    pub actual_path: Vec<[f64; 2]>,
    pub current_pose: Option<VizPose>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Obstacle {
    /// True if the bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        [self.x_min, self.x_max, self.z_min, self.z_max]
            .iter()
            .all(|v| v.is_finite())
            && self.x_min <= self.x_max
            && self.z_min <= self.z_max
    }

    /// True if the planar point lies inside or on the obstacle.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        x >= self.x_min && x <= self.x_max && z >= self.z_min && z <= self.z_max
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_obstacle() {
        let o = Obstacle { x_min: 10.0, x_max: 20.0, z_min: -5.0, z_max: 5.0 };
        assert!(o.is_valid());
        assert!(o.contains(15.0, 0.0));
        assert!(o.contains(10.0, 5.0));
        assert!(!o.contains(9.9, 0.0));

        let flipped = Obstacle { x_min: 20.0, x_max: 10.0, ..o };
        assert!(!flipped.is_valid());
        let nan = Obstacle { z_max: std::f64::NAN, ..o };
        assert!(!nan.is_valid());
    }
}
