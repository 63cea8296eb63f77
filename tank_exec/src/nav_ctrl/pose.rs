//! Pose estimation from successive position reports

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use serde::Serialize;
use std::time::Instant;

// Internal
use super::Params;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Planar pose of the hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Position `(x, z)` in the world frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading from +z towards +x, in `(-pi, pi]`.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// Result of feeding a position into the tracker.
#[derive(Debug, Clone, Copy)]
pub struct PoseUpdate {
    pub pose: Pose,

    /// Time since the previous report, `None` for the first report.
    ///
    /// Units: seconds
    pub dt_s: Option<f64>,

    /// True if the report moved the hull far enough to update the heading.
    pub heading_updated: bool,
}

/// Tracks the hull pose, estimating heading from the bearing between
/// consecutive reports.
#[derive(Debug, Clone)]
pub struct PoseTracker {
    heading_smoothing: f64,
    min_heading_update_m: f64,

    position_m: Option<Vector2<f64>>,
    heading_rad: f64,
    last_update: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn heading_deg(&self) -> f64 {
        self.heading_rad.to_degrees()
    }

    /// Position as an `[x, z]` array.
    pub fn position_array(&self) -> [f64; 2] {
        [self.position_m[0], self.position_m[1]]
    }
}

impl PoseTracker {
    pub fn new(params: &Params) -> Self {
        Self {
            heading_smoothing: params.heading_smoothing,
            min_heading_update_m: params.min_heading_update_m,
            position_m: None,
            heading_rad: 0.0,
            last_update: None,
        }
    }

    /// The current pose, or `None` if no position has been reported.
    pub fn pose(&self) -> Option<Pose> {
        self.position_m.map(|p| Pose {
            position_m: p,
            heading_rad: self.heading_rad,
        })
    }

    /// Feed a new position report.
    ///
    /// The heading estimate is blended towards the bearing of the
    /// displacement from the previous position, unless the displacement is
    /// too small to give a meaningful bearing.
    pub fn update(&mut self, position_m: Vector2<f64>) -> PoseUpdate {
        let now = Instant::now();
        let dt_s = self
            .last_update
            .map(|t| now.duration_since(t).as_secs_f64());

        let mut heading_updated = false;

        if let Some(prev) = self.position_m {
            let delta = position_m - prev;

            if delta.norm() > self.min_heading_update_m {
                let bearing = delta[0].atan2(delta[1]);

                self.heading_rad = wrap_pi(
                    self.heading_smoothing * self.heading_rad
                    + (1.0 - self.heading_smoothing) * bearing
                );
                heading_updated = true;
            }
        }

        self.position_m = Some(position_m);
        self.last_update = Some(now);

        trace!(
            "Pose update: ({:.3}, {:.3}) heading {:.2} deg, dt {:?}",
            position_m[0],
            position_m[1],
            self.heading_rad.to_degrees(),
            dt_s
        );

        PoseUpdate {
            pose: Pose {
                position_m,
                heading_rad: self.heading_rad,
            },
            dt_s,
            heading_updated,
        }
    }

    /// Overwrite the position with a dead reckoned estimate, leaving the
    /// heading untouched.
    pub fn set_dead_reckoned(&mut self, position_m: Vector2<f64>) {
        if self.position_m.is_some() {
            self.position_m = Some(position_m);
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_first_report_keeps_heading() {
        let mut t = PoseTracker::new(&Params::default());
        assert!(t.pose().is_none());

        let u = t.update(Vector2::new(10.0, 20.0));
        assert!(u.dt_s.is_none());
        assert!(!u.heading_updated);
        assert_eq!(u.pose.heading_rad, 0.0);
        assert_eq!(t.pose().unwrap().position_m, Vector2::new(10.0, 20.0));
    }

    #[test]
    fn test_heading_smoothing() {
        let params = Params::default();
        let mut t = PoseTracker::new(&params);

        t.update(Vector2::new(0.0, 0.0));

        // Moving along +x gives a bearing of pi/2, blended with the initial
        // zero heading.
        let u = t.update(Vector2::new(1.0, 0.0));
        assert!(u.heading_updated);
        assert!((u.pose.heading_rad - 0.2 * PI / 2.0).abs() < 1e-12);
        assert!(u.dt_s.is_some());

        // Repeated motion converges on the bearing.
        for i in 2..100 {
            t.update(Vector2::new(i as f64, 0.0));
        }
        assert!((t.pose().unwrap().heading_rad - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_small_motion_ignored() {
        let mut t = PoseTracker::new(&Params::default());

        t.update(Vector2::new(5.0, 5.0));
        t.update(Vector2::new(6.0, 6.0));
        let heading = t.pose().unwrap().heading_rad;

        // Same position twice, and a sub-threshold nudge, leave the heading
        // alone.
        let u = t.update(Vector2::new(6.0, 6.0));
        assert!(!u.heading_updated);
        assert_eq!(u.pose.heading_rad, heading);

        let u = t.update(Vector2::new(6.005, 6.0));
        assert!(!u.heading_updated);
        assert_eq!(u.pose.heading_rad, heading);
    }

    #[test]
    fn test_heading_stays_wrapped() {
        let mut t = PoseTracker::new(&Params::default());
        let mut p = Vector2::new(150.0, 150.0);
        t.update(p);

        // Drive around a circle in both directions
        for i in 0..720 {
            let a = (i as f64).to_radians() * 3.0;
            p += Vector2::new(a.sin(), a.cos());
            let h = t.update(p).pose.heading_rad;
            assert!(h > -PI && h <= PI, "heading {} out of range", h);
        }
        for i in 0..720 {
            let a = -(i as f64).to_radians() * 5.0;
            p += Vector2::new(a.sin(), a.cos());
            let h = t.update(p).pose.heading_rad;
            assert!(h > -PI && h <= PI, "heading {} out of range", h);
        }
    }

    #[test]
    fn test_dead_reckoned_needs_pose() {
        let mut t = PoseTracker::new(&Params::default());
        t.set_dead_reckoned(Vector2::new(1.0, 1.0));
        assert!(t.pose().is_none());

        t.update(Vector2::new(0.0, 0.0));
        t.set_dead_reckoned(Vector2::new(1.0, 1.0));
        assert_eq!(t.pose().unwrap().position_m, Vector2::new(1.0, 1.0));
        assert_eq!(t.pose().unwrap().heading_rad, 0.0);
    }
}
