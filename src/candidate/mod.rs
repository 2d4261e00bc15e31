//! Detection candidates and their pruning.
//!
//! Includes greedy IOU non-maximum suppression.

pub(crate) mod nms;

use crate::geometry::BoxDimensions;

/// One decoded detection.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateBox {
    /// Box geometry in input-image pixels.
    pub dimensions: BoxDimensions,
    /// Label of the top-scoring class.
    pub label: String,
    /// Index of the top-scoring class.
    pub class_id: usize,
    /// Softmax probability of the top-scoring class.
    pub class_score: f32,
    /// Objectness after the sigmoid, in `[0, 1]`.
    pub confidence: f32,
}

impl CandidateBox {
    /// Class probability weighted by objectness.
    pub fn combined_score(&self) -> f32 {
        self.class_score * self.confidence
    }
}

impl std::fmt::Display for CandidateBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = &self.dimensions;
        write!(
            f,
            "{}:{}, {}:{} - {}:{}",
            self.label, self.confidence, d.x, d.y, d.width, d.height
        )
    }
}
