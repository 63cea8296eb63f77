//! Command blending
//!
//! Steering and speed demands are converted into weights for each of the
//! directional drive keys. One key is then sampled with probability
//! proportional to its weight rather than taking the heaviest, which stops the
//! hull locking into oscillation between two near-equal commands.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng
};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

// Internal
use super::{Params, Pose};
use comms_if::eqpt::drive::MoveCmd;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Weights of the directional commands. A command is a candidate only if its
/// weight is strictly positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CmdWeights {
    pub right: f64,
    pub left: f64,
    pub forward: f64,
    pub back: f64,
}

/// Samples drive commands from their weights.
pub struct CommandBlender<R> {
    rng: R,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CmdWeights {
    /// Calculate the weights for the given demands.
    ///
    /// `progress` is the fraction of the route already covered, between 0 and
    /// 1. Every active weight is boosted by it.
    pub fn calc(
        params: &Params,
        steering: f64,
        speed: f64,
        heading_error_rad: f64,
        progress: f64
    ) -> Self {
        let wf = &params.weight_factors;
        let turn_gain = 1.0 + steering.abs() * params.steer_weight_gain;

        let mut weights = Self {
            right: if steering > 0.0 { wf.right * turn_gain } else { 0.0 },
            left: if steering < 0.0 { wf.left * turn_gain } else { 0.0 },
            forward: wf.forward * speed,
            back: if heading_error_rad.abs() > params.reverse_heading_error_rad {
                wf.back
            }
            else {
                0.0
            },
        };

        let boost = 1.0 + progress * params.progress_gain;
        for w in weights.iter_mut() {
            if *w > 0.0 {
                *w *= boost;
            }
        }

        weights
    }

    pub fn get(&self, cmd: MoveCmd) -> f64 {
        match cmd {
            MoveCmd::Right => self.right,
            MoveCmd::Left => self.left,
            MoveCmd::Forward => self.forward,
            MoveCmd::Back => self.back,
            MoveCmd::Stop => 0.0,
        }
    }

    /// The candidate commands and their weights.
    pub fn candidates(&self) -> Vec<(MoveCmd, f64)> {
        MoveCmd::DIRECTIONAL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, w)| *w > 0.0)
            .collect()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        vec![&mut self.right, &mut self.left, &mut self.forward, &mut self.back].into_iter()
    }
}

/// Fraction of the route covered, between 0 and 1.
///
/// Zero if there is no initial distance to compare against or the target has
/// already been reached.
pub fn calc_progress(distance_m: f64, initial_distance_m: Option<f64>) -> f64 {
    match initial_distance_m {
        Some(init) if init != 0.0 && distance_m > 0.0 => (1.0 - distance_m / init).max(0.0),
        _ => 0.0,
    }
}

/// Dead reckon the position after executing `cmd` for one tick.
///
/// Forward and back move along the heading, right and left perpendicular to
/// it. Stop leaves the position where it is.
pub fn dead_reckon(params: &Params, pose: &Pose, cmd: MoveCmd, speed: f64) -> Vector2<f64> {
    let step_m = params.move_step_m * speed;

    let (direction, sign) = match cmd {
        MoveCmd::Forward => (pose.heading_rad, 1.0),
        MoveCmd::Back => (pose.heading_rad, -1.0),
        MoveCmd::Right => (pose.heading_rad + FRAC_PI_2, 1.0),
        MoveCmd::Left => (pose.heading_rad - FRAC_PI_2, 1.0),
        MoveCmd::Stop => return pose.position_m,
    };

    pose.position_m + Vector2::new(direction.sin(), direction.cos()) * step_m * sign
}

impl<R: Rng> CommandBlender<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Sample one command from the weights.
    ///
    /// Returns `None` if no command has a positive weight.
    pub fn choose(&mut self, weights: &CmdWeights) -> Option<(MoveCmd, f64)> {
        let candidates = weights.candidates();

        let dist = WeightedIndex::new(candidates.iter().map(|(_, w)| *w)).ok()?;
        let chosen = candidates[dist.sample(&mut self.rng)];

        trace!("Blended {:?} from {:?}", chosen, candidates);

        Some(chosen)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;
    use std::f64::consts::PI;

    #[test]
    fn test_weights() {
        let p = Params::default();

        // Steering right, no progress
        let w = CmdWeights::calc(&p, 0.25, 0.8, 0.1, 0.0);
        assert!((w.right - 0.6 * 1.5).abs() < 1e-12);
        assert_eq!(w.left, 0.0);
        assert!((w.forward - 0.4).abs() < 1e-12);
        assert_eq!(w.back, 0.0);

        // Steering left with a sharp reversal needed, half way along
        let w = CmdWeights::calc(&p, -0.25, 0.8, -0.7 * PI, 0.5);
        assert_eq!(w.right, 0.0);
        assert!((w.left - 0.6 * 1.5 * 1.25).abs() < 1e-12);
        assert!((w.forward - 0.4 * 1.25).abs() < 1e-12);
        assert!((w.back - 0.5 * 1.25).abs() < 1e-12);

        // Zero steering gives no turning candidates
        let w = CmdWeights::calc(&p, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(
            w.candidates(),
            vec![(MoveCmd::Forward, 0.5)]
        );
    }

    #[test]
    fn test_progress() {
        assert_eq!(calc_progress(50.0, Some(100.0)), 0.5);
        assert_eq!(calc_progress(150.0, Some(100.0)), 0.0);
        assert_eq!(calc_progress(50.0, None), 0.0);
        assert_eq!(calc_progress(50.0, Some(0.0)), 0.0);
        assert_eq!(calc_progress(0.0, Some(100.0)), 0.0);
    }

    #[test]
    fn test_choose_only_positive() {
        let mut b = CommandBlender::new(StdRng::seed_from_u64(7));

        let weights = CmdWeights {
            right: 0.0,
            left: 0.9,
            forward: 0.3,
            back: -1.0,
        };

        let mut counts = HashMap::new();
        for _ in 0..2000 {
            let (cmd, w) = b.choose(&weights).unwrap();
            assert!(w > 0.0);
            assert_eq!(w, weights.get(cmd));
            *counts.entry(cmd).or_insert(0usize) += 1;
        }

        assert!(!counts.contains_key(&MoveCmd::Right));
        assert!(!counts.contains_key(&MoveCmd::Back));

        // Roughly 3:1 in favour of left
        let left = counts[&MoveCmd::Left] as f64;
        let fwd = counts[&MoveCmd::Forward] as f64;
        assert!(left / fwd > 2.0 && left / fwd < 4.5);

        assert!(b.choose(&CmdWeights::default()).is_none());
    }

    #[test]
    fn test_choose_is_seeded() {
        let weights = CmdWeights {
            right: 0.5,
            left: 0.5,
            forward: 0.5,
            back: 0.5,
        };

        let mut a = CommandBlender::new(StdRng::seed_from_u64(42));
        let mut b = CommandBlender::new(StdRng::seed_from_u64(42));

        for _ in 0..100 {
            assert_eq!(a.choose(&weights), b.choose(&weights));
        }
    }

    #[test]
    fn test_dead_reckon() {
        let p = Params::default();
        let pose = Pose {
            position_m: Vector2::new(10.0, 10.0),
            heading_rad: 0.0,
        };

        let fwd = dead_reckon(&p, &pose, MoveCmd::Forward, 1.0);
        assert!((fwd - Vector2::new(10.0, 10.1)).norm() < 1e-12);

        let back = dead_reckon(&p, &pose, MoveCmd::Back, 0.5);
        assert!((back - Vector2::new(10.0, 9.95)).norm() < 1e-12);

        // Right of +z is +x
        let right = dead_reckon(&p, &pose, MoveCmd::Right, 1.0);
        assert!((right - Vector2::new(10.1, 10.0)).norm() < 1e-12);

        let left = dead_reckon(&p, &pose, MoveCmd::Left, 1.0);
        assert!((left - Vector2::new(9.9, 10.0)).norm() < 1e-12);

        assert_eq!(dead_reckon(&p, &pose, MoveCmd::Stop, 1.0), pose.position_m);
    }
}
