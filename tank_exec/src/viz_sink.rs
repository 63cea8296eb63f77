//! # Visualisation sink
//!
//! Frames are published on a best effort basis and are never read back by
//! the controllers.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use std::path::PathBuf;

use comms_if::viz::VizFrame;
use util::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

pub trait VizSink {
    fn publish(&mut self, frame: VizFrame);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Saves frames into the session directory, overwriting the previous frame.
pub struct SessionVizSink {
    session: Session,
    path: PathBuf,
    num_frames: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SessionVizSink {
    /// Default session relative frame path.
    pub const FRAME_PATH: &'static str = "viz/path_frame.json";

    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            path: PathBuf::from(Self::FRAME_PATH),
            num_frames: 0,
        }
    }

    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }
}

impl VizSink for SessionVizSink {
    fn publish(&mut self, frame: VizFrame) {
        self.num_frames += 1;
        trace!(
            "Viz frame {}: {} waypoints, {} path points",
            self.num_frames,
            frame.waypoints.len(),
            frame.actual_path.len()
        );
        self.session.save(&self.path, frame);
    }
}
