//! Photoguard Core - classifier adapter, keyword policy, and rule engine.
//!
//! Screens images for potentially inappropriate content (nudity, violence,
//! weapons) by running an on-device image classifier and applying a
//! keyword/threshold policy to its labeled confidence scores.
//!
//! The classifier is an injectable capability behind the [`ImageClassifier`]
//! trait; the decision rule is the pure [`evaluate`] function. The
//! [`ContentScreener`] combines the two for callers that start from bytes,
//! files, or base64 payloads rather than pre-computed scores.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod policy;
pub mod screening;

pub use classifier::{ImageClassifier, LabelScore, VisionClassifier, VisionClassifierConfig};
pub use engine::{evaluate, Verdict};
pub use error::{ClassifierError, ScreenError};
pub use policy::{KeywordPolicy, ThresholdPreset};
pub use screening::{BatchOutcome, ContentScreener, ScreenerConfig, ScreeningReport};
