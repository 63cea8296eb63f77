//! # Perception Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A target found by the segmentation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Identifier of the detection within the frame
    pub id: u32,

    /// Estimated distance to the target in meters
    pub distance: f64,

    /// Number of image pixels classified as the target
    pub pixel_count: u32,
}
