//! Keyword policy: the configurable definition of "inappropriate".
//!
//! The keyword set and confidence threshold are passed explicitly into the
//! rule engine rather than read from module-level constants.

use serde::{Deserialize, Serialize};

/// Default keyword substrings flagged as inappropriate.
const DEFAULT_KEYWORDS: &[&str] = &[
    "nude",
    "naked",
    "underwear",
    "bikini",
    "swimsuit",
    "violence",
    "weapon",
    "blood",
    "gore",
];

/// Named confidence-threshold presets.
/// Note: Higher thresholds = fewer false positives (less sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ThresholdPreset {
    /// Aggressive flagging (0.4).
    Strict,
    /// Balanced flagging (0.6).
    Balanced,
    /// Conservative flagging (0.8).
    #[default]
    Lenient,
    /// Custom threshold.
    Custom(f32),
}

impl ThresholdPreset {
    /// Returns the threshold value for this preset.
    pub fn threshold(&self) -> f32 {
        match self {
            ThresholdPreset::Strict => 0.4,
            ThresholdPreset::Balanced => 0.6,
            ThresholdPreset::Lenient => 0.8,
            ThresholdPreset::Custom(t) => t.clamp(0.0, 1.0),
        }
    }
}

/// Keyword set and confidence threshold defining "inappropriate".
///
/// A label qualifies when, lowercased, it contains at least one keyword and
/// its confidence strictly exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPolicy {
    /// Substrings matched case-insensitively against classifier labels.
    pub keywords: Vec<String>,
    /// Confidence scores must strictly exceed this value to qualify.
    pub threshold: f32,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            threshold: ThresholdPreset::default().threshold(),
        }
    }
}

impl KeywordPolicy {
    /// Creates a policy with the given keywords and threshold (clamped to
    /// [0.0, 1.0]).
    pub fn new(keywords: Vec<String>, threshold: f32) -> Self {
        Self {
            keywords,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Creates a policy with the default keywords and a preset threshold.
    pub fn with_preset(preset: ThresholdPreset) -> Self {
        Self {
            threshold: preset.threshold(),
            ..Default::default()
        }
    }

    /// Replaces the threshold (clamped to [0.0, 1.0]).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Replaces the keyword set.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Returns the first keyword contained in the given lowercased label.
    pub fn matched_keyword(&self, label_lower: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| label_lower.contains(k.as_str()))
            .map(|k| k.as_str())
    }
}
