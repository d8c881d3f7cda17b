//! Error types for classification and screening.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the classifier adapter.
///
/// The underlying model is a black box; its failures surface here verbatim
/// and are never retried by the engine.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Model file not found.
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    /// ONNX runtime error.
    #[cfg(feature = "ml")]
    #[error("ONNX runtime error: {0}")]
    OrtError(#[from] ort::Error),

    /// Label map missing or malformed.
    #[error("Invalid label map: {0}")]
    InvalidLabels(String),

    /// Inference error.
    #[error("Inference error: {0}")]
    Inference(String),

    /// ML feature not enabled.
    #[error("ML feature not enabled - rebuild with --features ml")]
    MlNotEnabled,
}

/// Errors from the screening layer.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Input could not be decoded into a raster image.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Image too large.
    #[error("Image too large: {0} bytes (max: {1} bytes)")]
    ImageTooLarge(usize, usize),

    /// Input is not valid base64 image data.
    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(String),

    /// Failed to read an input file.
    #[error("Failed to read {path:?}: {message}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },

    /// The underlying classifier failed.
    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

impl From<image::ImageError> for ScreenError {
    fn from(e: image::ImageError) -> Self {
        ScreenError::ImageDecode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_error_display() {
        let err = ClassifierError::ModelNotFound("models/vision.onnx".to_string());
        assert_eq!(err.to_string(), "Model file not found: models/vision.onnx");
    }

    #[test]
    fn screen_error_wraps_classifier_error() {
        let err: ScreenError = ClassifierError::Inference("bad output".to_string()).into();
        assert!(matches!(err, ScreenError::Classifier(_)));
        assert!(err.to_string().contains("bad output"));
    }

    #[test]
    fn image_too_large_reports_both_sizes() {
        let err = ScreenError::ImageTooLarge(20, 10);
        assert_eq!(err.to_string(), "Image too large: 20 bytes (max: 10 bytes)");
    }
}
