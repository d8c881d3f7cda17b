//! Content classifier adapter.
//!
//! Wraps a black-box image classification capability behind a uniform
//! interface so alternate or mock classifiers can be substituted.

mod label;
mod vision;

pub use label::LabelScore;
pub use vision::{VisionClassifier, VisionClassifierConfig};

use image::DynamicImage;

use crate::error::ClassifierError;

/// Trait for pluggable image classification backends.
///
/// Implementations are stateless across calls apart from their underlying
/// inference session, so a single instance may screen any number of images.
pub trait ImageClassifier {
    /// Classifies the given image and returns labeled confidence scores.
    ///
    /// The returned collection may be empty and carries no ordering
    /// guarantee.
    fn classify(&mut self, image: &DynamicImage) -> Result<Vec<LabelScore>, ClassifierError>;

    /// Returns the name of this classifier for logging/debugging.
    fn name(&self) -> &'static str;
}
