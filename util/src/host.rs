//! Host platform utility functions

use std::{env, path::PathBuf};

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "TANK_SW_ROOT";

/// Get the software root directory, i.e. the directory containing `params`, `scripts` and
/// `sessions`.
pub fn get_tank_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
