//! # Replies
//!
//! Every request handled by the tank is answered with a tagged reply: `{"status": "OK", ...}`
//! carrying the payload's fields, or `{"status": "ERROR", "message": "..."}`. The transport layer is
//! responsible for mapping errors onto its own failure codes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{eqpt::per::Detection, telemetry::Position3};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A tagged OK/ERROR reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Reply<T> {
    #[serde(rename = "OK")]
    Ok(T),

    #[serde(rename = "ERROR")]
    Error { message: String },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Reply payload for a pose report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    /// The stored planar position `[x, z]`
    pub position: [f64; 2],

    /// The smoothed heading in degrees
    pub heading_degrees: f64,
}

/// Reply payload for a destination request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationReport {
    /// The destination after clamping into the world bounds
    pub destination: Position3,

    /// Straight line distance from the current position to the destination
    pub initial_distance: Option<f64>,

    /// The planned waypoints, `[x, z]`
    pub waypoints: Vec<[f64; 2]>,
}

/// Reply payload for an obstacle update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleReport {
    /// Number of obstacles now known
    pub num_obstacles: usize,
}

/// Reply payload for a detection batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Number of detections in the batch
    pub num_detections: usize,

    /// The target selected for engagement, if any
    pub target: Option<Detection>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> Reply<T> {
    pub fn error<M: Display>(message: M) -> Self {
        Reply::Error {
            message: message.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }
}

impl<T, E: Display> From<Result<T, E>> for Reply<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(t) => Reply::Ok(t),
            Err(e) => Reply::error(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_json() {
        let ok: Reply<PositionReport> = Ok::<_, String>(PositionReport {
            position: [1.0, 2.0],
            heading_degrees: 90.0,
        })
        .into();
        assert!(ok.is_ok());
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "OK", "position": [1.0, 2.0], "heading_degrees": 90.0})
        );

        let err: Reply<PositionReport> = Err::<PositionReport, _>("bad position").into();
        assert!(!err.is_ok());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "ERROR", "message": "bad position"})
        );

        let obs: Reply<ObstacleReport> = Reply::Ok(ObstacleReport { num_obstacles: 2 });
        assert_eq!(
            serde_json::to_value(&obs).unwrap(),
            json!({"status": "OK", "num_obstacles": 2})
        );
    }
}
