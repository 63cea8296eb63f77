//! # Perception target selection
//!
//! The segmentation pipeline reports every target it sees in a frame. The
//! tracker picks the one to engage: the nearest, with ties going to the
//! target covering more pixels. An empty batch drops the target.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use std::cmp::Ordering;

use comms_if::eqpt::per::Detection;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TargetTracker {
    target: Option<Detection>,
    num_detections: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a batch of detections, returning the selected target.
    ///
    /// Detections with a non-finite or non-positive distance are ignored.
    pub fn update(&mut self, detections: &[Detection]) -> Option<Detection> {
        let was_engaged = self.is_engaged();

        self.num_detections = detections.len();
        self.target = detections
            .iter()
            .filter(|d| d.distance.is_finite() && d.distance > 0.0)
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.pixel_count.cmp(&a.pixel_count))
            })
            .copied();

        match (was_engaged, self.target) {
            (false, Some(t)) => info!("Target {} acquired at {:.1} m", t.id, t.distance),
            (true, None) => info!("Target lost"),
            (_, Some(t)) => debug!("Tracking target {} at {:.1} m", t.id, t.distance),
            _ => (),
        }

        self.target
    }

    pub fn target(&self) -> Option<&Detection> {
        self.target.as_ref()
    }

    /// Number of detections in the last batch, including rejected ones.
    pub fn num_detections(&self) -> usize {
        self.num_detections
    }

    pub fn is_engaged(&self) -> bool {
        self.target.is_some()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn det(id: u32, distance: f64, pixel_count: u32) -> Detection {
        Detection { id, distance, pixel_count }
    }

    #[test]
    fn test_nearest_selected() {
        let mut t = TargetTracker::new();
        assert!(!t.is_engaged());

        let sel = t.update(&[det(0, 80.0, 10), det(1, 40.0, 5), det(2, 95.0, 500)]);
        assert_eq!(sel.map(|d| d.id), Some(1));
        assert!(t.is_engaged());
        assert_eq!(t.num_detections(), 3);
    }

    #[test]
    fn test_tie_prefers_larger() {
        let mut t = TargetTracker::new();
        let sel = t.update(&[det(0, 50.0, 10), det(1, 50.0, 300), det(2, 50.0, 20)]);
        assert_eq!(sel.map(|d| d.id), Some(1));
    }

    #[test]
    fn test_empty_and_invalid() {
        let mut t = TargetTracker::new();
        t.update(&[det(0, 50.0, 10)]);
        assert!(t.is_engaged());

        assert!(t.update(&[]).is_none());
        assert!(!t.is_engaged());

        assert!(t.update(&[det(0, std::f64::NAN, 10), det(1, 0.0, 10)]).is_none());
        assert_eq!(t.num_detections(), 2);
    }
}
