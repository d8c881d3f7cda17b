//! Screening orchestration.
//!
//! Combines an injectable classifier with a keyword policy to produce
//! verdicts for decoded images, raw bytes, files, and base64 payloads.
//! Classifier failures propagate to the caller; they are never converted
//! into a silently safe verdict.

use std::path::{Path, PathBuf};
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::classifier::{ImageClassifier, LabelScore};
use crate::engine::{evaluate, Verdict};
use crate::error::ScreenError;
use crate::policy::KeywordPolicy;

/// Configuration for the content screener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Maximum accepted input size in bytes (default: 10MB).
    pub max_image_size: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            max_image_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// Result of screening one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// The engine's decision.
    pub verdict: Verdict,
    /// Raw classifier observations the verdict was derived from.
    pub scores: Vec<LabelScore>,
    /// Screening duration in microseconds.
    pub duration_us: u64,
    /// When the screening ran.
    pub screened_at: DateTime<Utc>,
}

/// Outcome of one entry in a batch screening run.
///
/// A failed entry records the error text instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// The screened file.
    pub path: PathBuf,
    /// The report, when screening succeeded.
    pub report: Option<ScreeningReport>,
    /// The error text, when screening failed.
    pub error: Option<String>,
}

impl BatchOutcome {
    /// Returns true if this entry was screened successfully.
    pub fn success(&self) -> bool {
        self.report.is_some()
    }
}

/// Screens images through a classifier and evaluates the results against a
/// keyword policy.
///
/// Stateless across calls; a single screener may process any number of
/// images, and separate instances may run in parallel.
pub struct ContentScreener<C> {
    classifier: C,
    policy: KeywordPolicy,
    config: ScreenerConfig,
}

impl<C: ImageClassifier> ContentScreener<C> {
    /// Creates a screener with the default configuration.
    pub fn new(classifier: C, policy: KeywordPolicy) -> Self {
        Self::with_config(classifier, policy, ScreenerConfig::default())
    }

    /// Creates a screener with the given configuration.
    pub fn with_config(classifier: C, policy: KeywordPolicy, config: ScreenerConfig) -> Self {
        Self {
            classifier,
            policy,
            config,
        }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &KeywordPolicy {
        &self.policy
    }

    /// Replaces the active policy.
    pub fn set_policy(&mut self, policy: KeywordPolicy) {
        self.policy = policy;
    }

    /// Screens a decoded image.
    pub fn screen_image(&mut self, image: &DynamicImage) -> Result<ScreeningReport, ScreenError> {
        let start = Instant::now();

        let scores = self.classifier.classify(image)?;
        let verdict = evaluate(&scores, &self.policy);

        if verdict.is_inappropriate {
            tracing::warn!(
                "Classifier '{}' flagged image: {}",
                self.classifier.name(),
                verdict.matched_categories.join(", ")
            );
        } else {
            tracing::debug!(
                "Classifier '{}' found no inappropriate content in {} observations",
                self.classifier.name(),
                scores.len()
            );
        }

        Ok(ScreeningReport {
            verdict,
            scores,
            duration_us: start.elapsed().as_micros() as u64,
            screened_at: Utc::now(),
        })
    }

    /// Screens encoded image bytes.
    ///
    /// Supports JPEG, PNG, WebP, and GIF (first frame) formats. Inputs
    /// larger than the configured maximum are rejected before decoding.
    pub fn screen_bytes(&mut self, data: &[u8]) -> Result<ScreeningReport, ScreenError> {
        if data.len() > self.config.max_image_size {
            return Err(ScreenError::ImageTooLarge(
                data.len(),
                self.config.max_image_size,
            ));
        }

        let image = image::load_from_memory(data)?;
        self.screen_image(&image)
    }

    /// Screens an image file.
    pub fn screen_file(&mut self, path: &Path) -> Result<ScreeningReport, ScreenError> {
        let data = std::fs::read(path).map_err(|e| ScreenError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.screen_bytes(&data)
    }

    /// Screens a base64-encoded image, with or without a data URI prefix.
    pub fn screen_base64(&mut self, base64_data: &str) -> Result<ScreeningReport, ScreenError> {
        // Handle data URI prefix
        let base64_str = if let Some(pos) = base64_data.find(',') {
            &base64_data[pos + 1..]
        } else {
            base64_data
        };

        let data = STANDARD
            .decode(base64_str)
            .map_err(|e| ScreenError::InvalidBase64(e.to_string()))?;

        self.screen_bytes(&data)
    }

    /// Evaluates pre-computed label scores against the active policy.
    ///
    /// Bypasses the classifier entirely; never fails.
    pub fn screen_scores(&self, scores: &[LabelScore]) -> Verdict {
        evaluate(scores, &self.policy)
    }

    /// Screens a set of files, recording a per-file outcome.
    ///
    /// A failure on one file does not abort the rest of the batch.
    pub fn screen_batch<I, P>(&mut self, paths: I) -> Vec<BatchOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut outcomes = Vec::new();

        for path in paths {
            let path = path.as_ref().to_path_buf();
            match self.screen_file(&path) {
                Ok(report) => outcomes.push(BatchOutcome {
                    path,
                    report: Some(report),
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!("Failed to screen {:?}: {}", path, e);
                    outcomes.push(BatchOutcome {
                        path,
                        report: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        outcomes
    }
}
