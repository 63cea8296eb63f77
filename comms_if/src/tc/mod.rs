//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface. Each telecommand corresponds to one request the surrounding
//! service can make of the tank.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use thiserror::Error;

// Internal
use crate::{
    eqpt::per::Detection,
    telemetry::Telemetry,
    viz::Obstacle
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction or observation sent to the tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tc {
    /// A full telemetry snapshot from the simulator. Published on the
    /// blackboard and used as a pose report.
    Info(Telemetry),

    /// A pose report as an `"x,y,z"` string.
    UpdatePosition(String),

    /// A new destination as an `"x,y,z"` string.
    SetDestination(String),

    /// Axis aligned obstacles to add to the known obstacle list.
    UpdateObstacles(Vec<Obstacle>),

    /// The targets detected by the perception pipeline this tick. An empty
    /// list means nothing is in view.
    Detections(Vec<Detection>)
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Short name of the TC, used when logging.
    pub fn name(&self) -> &'static str {
        match self {
            Tc::Info(_) => "Info",
            Tc::UpdatePosition(_) => "UpdatePosition",
            Tc::SetDestination(_) => "SetDestination",
            Tc::UpdateObstacles(_) => "UpdateObstacles",
            Tc::Detections(_) => "Detections"
        }
    }
}
