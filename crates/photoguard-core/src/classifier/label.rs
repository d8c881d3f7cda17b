//! Labeled confidence scores produced by classification.

use serde::{Deserialize, Serialize};

/// One labeled confidence score from a classification call.
///
/// Produced fresh per call; has no identity beyond the tuple itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Classifier-provided category name.
    pub label: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
}

impl LabelScore {
    /// Creates a new label score, clamping confidence to [0.0, 1.0].
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
