//! # Telemetry snapshot
//!
//! The simulator publishes a full snapshot of the world every tick. Field names follow the
//! simulator's camelCase JSON; angles are in degrees, distances in meters.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position in the simulator world. `y` is up and is ignored by the planar controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The latest snapshot of the world, as published on the blackboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// Simulation time of the snapshot in seconds
    pub time: f64,

    /// Position of the controlled tank
    pub player_pos: Position3,

    #[serde(default)]
    pub player_speed: f64,

    /// Turret bearing in degrees
    #[serde(default)]
    pub player_turret_x: f64,

    /// Barrel elevation in degrees
    #[serde(default)]
    pub player_turret_y: f64,

    /// Body heading in degrees
    #[serde(default)]
    pub player_body_x: f64,

    /// Position of the tracked enemy, if any
    #[serde(default)]
    pub enemy_pos: Option<Position3>,

    #[serde(default)]
    pub enemy_speed: f64,

    /// Distance to the tracked enemy in meters, if known
    #[serde(default)]
    pub distance: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Position3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The planar `(x, z)` part of the position.
    pub fn planar(&self) -> (f64, f64) {
        (self.x, self.z)
    }

    /// True if every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Telemetry {
    /// Create a snapshot with only the time and player position set.
    pub fn new(time: f64, player_pos: Position3) -> Self {
        Self {
            time,
            player_pos,
            player_speed: 0.0,
            player_turret_x: 0.0,
            player_turret_y: 0.0,
            player_body_x: 0.0,
            enemy_pos: None,
            enemy_speed: 0.0,
            distance: None,
        }
    }
}
