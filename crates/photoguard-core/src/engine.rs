//! Inappropriate-content rule engine.
//!
//! Deterministic policy evaluation over classifier output. A single pure
//! function with no I/O and no shared state, consumed by both the screening
//! flow and any verification harness.

use serde::{Deserialize, Serialize};

use crate::classifier::LabelScore;
use crate::policy::KeywordPolicy;

/// Decision output for one screened image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the image was flagged as inappropriate.
    pub is_inappropriate: bool,
    /// Matched categories, each formatted as `"label (confidence%)"`, in
    /// input order.
    pub matched_categories: Vec<String>,
}

impl Verdict {
    /// Creates an empty (safe) verdict.
    pub fn safe() -> Self {
        Self::default()
    }

    /// Creates a verdict from matched category descriptions.
    pub fn from_matches(matched_categories: Vec<String>) -> Self {
        let is_inappropriate = !matched_categories.is_empty();
        Self {
            is_inappropriate,
            matched_categories,
        }
    }
}

/// Evaluates classifier output against a keyword policy.
///
/// A score qualifies when its lowercased label contains at least one policy
/// keyword (first match suffices) and its confidence strictly exceeds the
/// policy threshold. A score exactly at the threshold does not qualify.
/// Qualifying scores are formatted and appended in input order; an empty
/// input yields a safe verdict.
pub fn evaluate(scores: &[LabelScore], policy: &KeywordPolicy) -> Verdict {
    let mut matched = Vec::new();

    for score in scores {
        let label = score.label.to_lowercase();
        if policy.matched_keyword(&label).is_some() && score.confidence > policy.threshold {
            matched.push(format!(
                "{} ({}%)",
                label,
                (score.confidence * 100.0).round() as u32
            ));
        }
    }

    Verdict::from_matches(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> KeywordPolicy {
        KeywordPolicy::default()
    }

    #[test]
    fn empty_input_is_safe() {
        let verdict = evaluate(&[], &policy());
        assert!(!verdict.is_inappropriate);
        assert!(verdict.matched_categories.is_empty());
    }

    #[test]
    fn matching_label_above_threshold_flags() {
        let scores = vec![
            LabelScore::new("beach", 0.9),
            LabelScore::new("nudity", 0.85),
        ];
        let verdict = evaluate(&scores, &policy());
        assert!(verdict.is_inappropriate);
        assert_eq!(verdict.matched_categories, vec!["nudity (85%)".to_string()]);
    }

    #[test]
    fn non_matching_label_is_safe() {
        let scores = vec![LabelScore::new("landscape", 0.99)];
        let verdict = evaluate(&scores, &policy());
        assert!(!verdict.is_inappropriate);
        assert!(verdict.matched_categories.is_empty());
    }

    #[test]
    fn confidence_equal_to_threshold_does_not_qualify() {
        let scores = vec![LabelScore::new("weapon", 0.8)];
        let verdict = evaluate(&scores, &policy());
        assert!(!verdict.is_inappropriate);
        assert!(verdict.matched_categories.is_empty());
    }

    #[test]
    fn confidence_just_above_threshold_qualifies() {
        let scores = vec![LabelScore::new("weapon", 0.81)];
        let verdict = evaluate(&scores, &policy());
        assert!(verdict.is_inappropriate);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let upper = vec![LabelScore::new("NUDE_BEACH", 0.9)];
        let lower = vec![LabelScore::new("nude_beach", 0.9)];
        let verdict_upper = evaluate(&upper, &policy());
        let verdict_lower = evaluate(&lower, &policy());

        assert!(verdict_upper.is_inappropriate);
        assert_eq!(verdict_upper, verdict_lower);
    }

    #[test]
    fn matched_category_uses_lowercased_label() {
        let scores = vec![LabelScore::new("Weapon", 0.95)];
        let verdict = evaluate(&scores, &policy());
        assert_eq!(verdict.matched_categories, vec!["weapon (95%)".to_string()]);
    }

    #[test]
    fn percentage_is_rounded() {
        let scores = vec![LabelScore::new("gore", 0.856)];
        let verdict = evaluate(&scores, &policy());
        assert_eq!(verdict.matched_categories, vec!["gore (86%)".to_string()]);
    }

    #[test]
    fn matches_preserve_input_order() {
        let scores = vec![
            LabelScore::new("weapon", 0.9),
            LabelScore::new("landscape", 0.99),
            LabelScore::new("blood", 0.85),
        ];
        let verdict = evaluate(&scores, &policy());
        assert_eq!(
            verdict.matched_categories,
            vec!["weapon (90%)".to_string(), "blood (85%)".to_string()]
        );
    }

    #[test]
    fn one_category_per_score_even_with_multiple_keyword_hits() {
        // "nude swimsuit" contains both "nude" and "swimsuit"; the first
        // matching keyword suffices and the score is reported once.
        let scores = vec![LabelScore::new("nude swimsuit", 0.9)];
        let verdict = evaluate(&scores, &policy());
        assert_eq!(verdict.matched_categories.len(), 1);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let scores = vec![
            LabelScore::new("violence", 0.92),
            LabelScore::new("beach", 0.5),
        ];
        let first = evaluate(&scores, &policy());
        let second = evaluate(&scores, &policy());
        assert_eq!(first, second);
    }

    #[test]
    fn lower_threshold_flags_more() {
        let scores = vec![LabelScore::new("bikini", 0.5)];

        let lenient = evaluate(&scores, &policy());
        assert!(!lenient.is_inappropriate);

        let strict = evaluate(
            &scores,
            &KeywordPolicy::with_preset(crate::policy::ThresholdPreset::Strict),
        );
        assert!(strict.is_inappropriate);
    }

    #[test]
    fn custom_keywords_are_honored() {
        let policy = KeywordPolicy::default().with_keywords(vec!["drug".to_string()]);
        let scores = vec![
            LabelScore::new("drugstore", 0.9),
            LabelScore::new("nudity", 0.9),
        ];
        let verdict = evaluate(&scores, &policy);
        assert_eq!(
            verdict.matched_categories,
            vec!["drugstore (90%)".to_string()]
        );
    }

    #[test]
    fn verdict_serde_round_trip() {
        let verdict = Verdict::from_matches(vec!["nudity (85%)".to_string()]);
        let json = serde_json::to_string(&verdict).unwrap();
        let deserialized: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(verdict, deserialized);
    }
}
