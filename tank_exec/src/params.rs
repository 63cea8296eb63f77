//! # Tank Executable Parameters
//!
//! This module provide parameters for the tank executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankExecParams {
    /// Target period of one cycle
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// If true the hull is held at STOP while perception has a target engaged
    pub halt_when_engaged: bool,

    /// Period between visualisation frames, no frames are published if zero
    ///
    /// Units: seconds
    pub viz_period_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for TankExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.1,
            halt_when_engaged: true,
            viz_period_s: 1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_exec_params() {
        let p: TankExecParams = util::params::from_toml_str(
            "cycle_period_s = 0.05\nhalt_when_engaged = false\nviz_period_s = 0.0\n",
        )
        .unwrap();

        assert_eq!(p.cycle_period_s, 0.05);
        assert!(!p.halt_when_engaged);
        assert_eq!(p.viz_period_s, 0.0);
    }
}
