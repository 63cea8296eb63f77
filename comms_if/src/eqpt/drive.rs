//! # Drive commands
//!
//! The hull is driven by one of five discrete key commands per tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A discrete drive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCmd {
    /// Bring the hull to a stop.
    #[serde(rename = "STOP")]
    Stop,

    /// Step to the right of the current heading.
    #[serde(rename = "D")]
    Right,

    /// Step to the left of the current heading.
    #[serde(rename = "A")]
    Left,

    /// Drive forwards along the current heading.
    #[serde(rename = "W")]
    Forward,

    /// Drive backwards along the current heading.
    #[serde(rename = "S")]
    Back,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Reply to a move request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveReply {
    #[serde(rename = "move")]
    pub cmd: MoveCmd,

    /// Weight of the chosen command, always strictly positive.
    pub weight: f64,

    /// Index of the waypoint currently being driven to.
    pub current_waypoint_idx: usize,

    /// True once the final waypoint has been reached.
    pub completed: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveCmd {
    /// The directional commands, in the order their weights are evaluated.
    pub const DIRECTIONAL: [MoveCmd; 4] = [MoveCmd::Right, MoveCmd::Left, MoveCmd::Forward, MoveCmd::Back];

    /// The key sent to the simulator.
    pub fn key(&self) -> &'static str {
        match self {
            MoveCmd::Stop => "STOP",
            MoveCmd::Right => "D",
            MoveCmd::Left => "A",
            MoveCmd::Forward => "W",
            MoveCmd::Back => "S",
        }
    }
}

impl MoveReply {
    /// A stop reply, which always carries unit weight.
    pub fn stop(current_waypoint_idx: usize, completed: bool) -> Self {
        Self {
            cmd: MoveCmd::Stop,
            weight: 1.0,
            current_waypoint_idx,
            completed,
        }
    }
}
