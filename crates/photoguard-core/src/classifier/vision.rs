//! ONNX-backed vision classifier.
//!
//! Runs a Vision Transformer image-classification model via ONNX Runtime
//! and returns one labeled confidence score per model class. Designed to
//! run in <100ms on CPU.

#[cfg(feature = "ml")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ImageClassifier, LabelScore};
use crate::error::ClassifierError;

/// Configuration for the vision classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionClassifierConfig {
    /// Path to the ONNX model file.
    pub model_path: String,
    /// Path to the JSON label map (array of class names in output order).
    pub labels_path: String,
    /// Model input size (default: 224x224 for ViT models).
    pub input_size: u32,
}

impl Default for VisionClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: "models/vision_classifier.onnx".to_string(),
            labels_path: "models/vision_labels.json".to_string(),
            input_size: 224,
        }
    }
}

/// ML-based image classifier using a Vision Transformer model.
///
/// Runs ONNX inference and maps the model's logits to labeled confidence
/// scores via the configured label map. Supports common image formats
/// through the `image` crate.
#[cfg(feature = "ml")]
#[derive(Debug)]
pub struct VisionClassifier {
    session: ort::session::Session,
    labels: Vec<String>,
    config: VisionClassifierConfig,
}

#[cfg(feature = "ml")]
impl VisionClassifier {
    /// Creates a new vision classifier by loading the ONNX model and its
    /// label map.
    ///
    /// Returns an error if the model or label map cannot be loaded.
    pub fn new(config: VisionClassifierConfig) -> Result<Self, ClassifierError> {
        use ort::session::{builder::GraphOptimizationLevel, Session};

        if !Path::new(&config.model_path).exists() {
            return Err(ClassifierError::ModelNotFound(config.model_path.clone()));
        }

        let labels = load_labels(&config.labels_path)?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)? // Use 2 threads for image inference
            .commit_from_file(&config.model_path)?;

        tracing::info!(
            "Vision classifier loaded: {} classes from {}",
            labels.len(),
            config.model_path
        );

        Ok(Self {
            session,
            labels,
            config,
        })
    }

    /// Loads the classifier from default paths.
    pub fn load_default() -> Result<Self, ClassifierError> {
        Self::new(VisionClassifierConfig::default())
    }

    /// Attempts to load the classifier, returning None if files don't exist.
    ///
    /// This is the preferred way to initialize when graceful fallback is
    /// desired.
    pub fn try_load(config: VisionClassifierConfig) -> Option<Self> {
        Self::new(config).ok()
    }

    /// Returns the class names in model output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the model input size.
    pub fn input_size(&self) -> u32 {
        self.config.input_size
    }

    /// Classifies a decoded image and returns one score per model class.
    pub fn classify_image(
        &mut self,
        image: &image::DynamicImage,
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        // Preprocess: resize to model input size and convert to RGB
        let resized = image.resize_exact(
            self.config.input_size,
            self.config.input_size,
            image::imageops::FilterType::Triangle,
        );
        let rgb_img = resized.to_rgb8();

        // Convert to normalized float tensor [1, 3, H, W]
        // Normalization values for ImageNet-pretrained models
        let mean = [0.485, 0.456, 0.406];
        let std = [0.229, 0.224, 0.225];

        let input_size = self.config.input_size as usize;
        let mut tensor_data = vec![0.0f32; 3 * input_size * input_size];

        for (y, row) in rgb_img.rows().enumerate() {
            for (x, pixel) in row.enumerate() {
                let r = (pixel[0] as f32 / 255.0 - mean[0]) / std[0];
                let g = (pixel[1] as f32 / 255.0 - mean[1]) / std[1];
                let b = (pixel[2] as f32 / 255.0 - mean[2]) / std[2];

                // CHW format: [channel][height][width]
                tensor_data[y * input_size + x] = r;
                tensor_data[input_size * input_size + y * input_size + x] = g;
                tensor_data[2 * input_size * input_size + y * input_size + x] = b;
            }
        }

        let input_tensor = ort::value::Tensor::from_array((
            [1usize, 3, input_size, input_size],
            tensor_data.into_boxed_slice(),
        ))?;

        let outputs = self.session.run(ort::inputs![
            "pixel_values" => input_tensor
        ])?;

        let logits_tensor = outputs["logits"].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::Inference(format!("Failed to extract logits: {}", e))
        })?;

        let logits = logits_tensor.1;

        if logits.len() < self.labels.len() {
            return Err(ClassifierError::Inference(format!(
                "Expected {} output classes, got {}",
                self.labels.len(),
                logits.len()
            )));
        }

        let probs = softmax(&logits[..self.labels.len()]);
        let scores = self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, prob)| LabelScore::new(label.clone(), prob))
            .collect();

        Ok(scores)
    }
}

/// Loads a JSON label map (array of class names).
#[cfg(feature = "ml")]
fn load_labels(path: &str) -> Result<Vec<String>, ClassifierError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ClassifierError::InvalidLabels(format!("Failed to read {}: {}", path, e)))?;
    let labels: Vec<String> = serde_json::from_str(&data)
        .map_err(|e| ClassifierError::InvalidLabels(format!("Failed to parse {}: {}", path, e)))?;

    if labels.is_empty() {
        return Err(ClassifierError::InvalidLabels(format!(
            "Label map {} is empty",
            path
        )));
    }

    Ok(labels)
}

/// Computes softmax over the given logits.
#[cfg(feature = "ml")]
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exp_vals.iter().sum();
    exp_vals.iter().map(|x| x / sum).collect()
}

/// Stub classifier when the ML feature is not enabled.
///
/// Always returns an error indicating ML is not available.
#[cfg(not(feature = "ml"))]
#[derive(Debug)]
pub struct VisionClassifier {
    _config: VisionClassifierConfig,
}

#[cfg(not(feature = "ml"))]
impl VisionClassifier {
    /// Creates a stub classifier (ML feature not enabled).
    pub fn new(_config: VisionClassifierConfig) -> Result<Self, ClassifierError> {
        Err(ClassifierError::MlNotEnabled)
    }

    /// Loads the classifier from default paths (ML feature not enabled).
    pub fn load_default() -> Result<Self, ClassifierError> {
        Err(ClassifierError::MlNotEnabled)
    }

    /// Attempts to load the classifier (always returns None when ML is
    /// disabled).
    pub fn try_load(_config: VisionClassifierConfig) -> Option<Self> {
        None
    }

    /// Returns the class names (ML feature not enabled).
    pub fn labels(&self) -> &[String] {
        &[]
    }

    /// Returns the model input size.
    pub fn input_size(&self) -> u32 {
        224
    }

    /// Classifies a decoded image (ML feature not enabled).
    pub fn classify_image(
        &mut self,
        _image: &image::DynamicImage,
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        Err(ClassifierError::MlNotEnabled)
    }
}

impl ImageClassifier for VisionClassifier {
    fn classify(
        &mut self,
        image: &image::DynamicImage,
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        self.classify_image(image)
    }

    fn name(&self) -> &'static str {
        "vision"
    }
}
