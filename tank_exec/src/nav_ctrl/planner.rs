//! Path planning interface

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;

// Internal
use comms_if::viz::Obstacle;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A path planner provides the waypoints navigation control follows.
pub trait PathPlanner: Send {
    /// Plan a path from `start_m` to `goal_m`.
    ///
    /// The returned waypoints exclude the start. An empty path means the goal
    /// cannot be reached.
    fn find_path(&self, start_m: Vector2<f64>, goal_m: Vector2<f64>) -> Vec<Vector2<f64>>;

    /// Inform the planner of the full set of known obstacles.
    fn set_obstacles(&mut self, _obstacles: &[Obstacle]) {}
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Straight line planner.
///
/// Splits the line from start to goal into equal segments no longer than the
/// configured spacing. At most `max_segments` segments are produced, beyond
/// that the segments are stretched. Obstacles are only used to reject goals
/// which lie inside one, the line itself is not checked.
#[derive(Debug, Clone)]
pub struct DirectPlanner {
    spacing_m: f64,
    max_segments: usize,
    obstacles: Vec<Obstacle>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DirectPlanner {
    /// Default upper bound on the number of segments in a path.
    pub const DEFAULT_MAX_SEGMENTS: usize = 1024;

    pub fn new(spacing_m: f64) -> Self {
        Self {
            spacing_m,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
            obstacles: Vec::new(),
        }
    }

    /// Set the upper bound on the number of segments, at least one.
    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments.max(1);
        self
    }
}

impl PathPlanner for DirectPlanner {
    fn find_path(&self, start_m: Vector2<f64>, goal_m: Vector2<f64>) -> Vec<Vector2<f64>> {
        if self.obstacles.iter().any(|o| o.contains(goal_m[0], goal_m[1])) {
            debug!("Goal ({}, {}) is inside an obstacle", goal_m[0], goal_m[1]);
            return Vec::new();
        }

        let delta = goal_m - start_m;
        let dist_m = delta.norm();

        let num_segments = if self.spacing_m > 0.0 && dist_m.is_finite() {
            (dist_m / self.spacing_m)
                .ceil()
                .max(1.0)
                .min(self.max_segments as f64) as usize
        }
        else {
            1
        };

        let mut path: Vec<Vector2<f64>> = (1..num_segments)
            .map(|i| start_m + delta * (i as f64 / num_segments as f64))
            .collect();
        path.push(goal_m);

        path
    }

    fn set_obstacles(&mut self, obstacles: &[Obstacle]) {
        self.obstacles = obstacles.to_vec();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_direct_path() {
        let p = DirectPlanner::new(35.0);
        let start = Vector2::new(0.0, 0.0);
        let goal = Vector2::new(100.0, 100.0);

        let path = p.find_path(start, goal);
        assert_eq!(path.len(), 5);
        assert_eq!(*path.last().unwrap(), goal);

        let mut prev = start;
        for wp in path.iter() {
            assert!((wp - prev).norm() <= 35.0 + 1e-9);
            prev = *wp;
        }
    }

    #[test]
    fn test_short_path() {
        let p = DirectPlanner::new(35.0);
        let goal = Vector2::new(1.0, 2.0);

        assert_eq!(p.find_path(Vector2::new(0.0, 0.0), goal), vec![goal]);
        assert_eq!(p.find_path(goal, goal), vec![goal]);
    }

    #[test]
    fn test_goal_in_obstacle() {
        let mut p = DirectPlanner::new(35.0);
        p.set_obstacles(&[Obstacle {
            x_min: 40.0,
            x_max: 60.0,
            z_min: 40.0,
            z_max: 60.0,
        }]);

        assert!(p.find_path(Vector2::new(0.0, 0.0), Vector2::new(50.0, 50.0)).is_empty());

        // Passing through is allowed
        assert_eq!(p.find_path(Vector2::new(0.0, 0.0), Vector2::new(100.0, 100.0)).len(), 5);
    }

    #[test]
    fn test_segment_limit() {
        let goal = Vector2::new(100.0, 100.0);

        let p = DirectPlanner::new(35.0).with_max_segments(3);
        let path = p.find_path(Vector2::new(0.0, 0.0), goal);
        assert_eq!(path.len(), 3);
        assert_eq!(*path.last().unwrap(), goal);

        let path = DirectPlanner::new(1.0).find_path(Vector2::new(1e12, 0.0), goal);
        assert_eq!(path.len(), DirectPlanner::DEFAULT_MAX_SEGMENTS);
        assert_eq!(*path.last().unwrap(), goal);
    }
}
