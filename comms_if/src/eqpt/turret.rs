//! # Turret commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A turret key command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretKey {
    /// Rotate the turret clockwise (increasing bearing).
    #[serde(rename = "E")]
    RotateRight,

    /// Rotate the turret anticlockwise (decreasing bearing).
    #[serde(rename = "Q")]
    RotateLeft,

    /// Raise the barrel.
    #[serde(rename = "R")]
    ElevateUp,

    /// Lower the barrel.
    #[serde(rename = "F")]
    ElevateDown,

    #[serde(rename = "FIRE")]
    Fire,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Reply to an action request.
///
/// The neutral reply has an empty key and zero weight. A fire reply carries no weight at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReply {
    pub turret: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TurretKey {
    /// The key sent to the simulator.
    pub fn key(&self) -> &'static str {
        match self {
            TurretKey::RotateRight => "E",
            TurretKey::RotateLeft => "Q",
            TurretKey::ElevateUp => "R",
            TurretKey::ElevateDown => "F",
            TurretKey::Fire => "FIRE",
        }
    }
}

impl ActionReply {
    /// The "do nothing" reply.
    pub fn neutral() -> Self {
        Self {
            turret: String::new(),
            weight: Some(0.0),
        }
    }

    pub fn new(key: TurretKey, weight: Option<f64>) -> Self {
        Self {
            turret: key.key().to_string(),
            weight,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.turret.is_empty()
    }
}
