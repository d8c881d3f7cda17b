//! Photoguard - on-device screening of images for inappropriate content.
//!
//! `scan` classifies image files with a local vision model and reports a
//! verdict per file. `eval` applies the rule engine to pre-computed label
//! scores, for exercising policies without a model.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use photoguard_core::{
    evaluate, ContentScreener, KeywordPolicy, LabelScore, ThresholdPreset, Verdict,
    VisionClassifier, VisionClassifierConfig,
};
use tracing_subscriber::EnvFilter;

/// Photoguard - screen images for potentially inappropriate content
#[derive(Parser, Debug)]
#[command(name = "photoguard", version, about)]
struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify image files and report a verdict for each
    Scan {
        /// Image files to screen
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Path to the ONNX classification model
        #[arg(long)]
        model: Option<PathBuf>,

        /// Path to the JSON label map for the model
        #[arg(long)]
        labels: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Emit JSON reports instead of human-readable output
        #[arg(long)]
        json: bool,
    },

    /// Evaluate pre-computed label scores from a JSON file
    Eval {
        /// JSON file holding an array of {"label", "confidence"} entries
        scores: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Emit the verdict as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Keyword policy selection flags, shared by both commands.
#[derive(clap::Args, Debug, Default)]
struct PolicyArgs {
    /// Confidence threshold in [0, 1]; scores must strictly exceed it
    #[arg(long)]
    threshold: Option<f32>,

    /// Threshold preset
    #[arg(long, value_enum, conflicts_with = "threshold")]
    preset: Option<PresetArg>,

    /// Comma-separated keywords overriding the default list
    #[arg(long, value_delimiter = ',')]
    keywords: Option<Vec<String>>,

    /// JSON file holding the full keyword policy
    #[arg(long, conflicts_with_all = ["threshold", "preset", "keywords"])]
    policy: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    /// Aggressive flagging (threshold 0.4)
    Strict,
    /// Balanced flagging (threshold 0.6)
    Balanced,
    /// Conservative flagging (threshold 0.8)
    Lenient,
}

impl From<PresetArg> for ThresholdPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Strict => ThresholdPreset::Strict,
            PresetArg::Balanced => ThresholdPreset::Balanced,
            PresetArg::Lenient => ThresholdPreset::Lenient,
        }
    }
}

/// Builds the keyword policy from CLI flags or a policy file.
fn build_policy(args: &PolicyArgs) -> anyhow::Result<KeywordPolicy> {
    if let Some(path) = &args.policy {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {:?}", path))?;
        let policy: KeywordPolicy = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse policy file {:?}", path))?;
        return Ok(policy);
    }

    let mut policy = KeywordPolicy::default();
    if let Some(preset) = args.preset {
        policy = KeywordPolicy::with_preset(preset.into());
    }
    if let Some(threshold) = args.threshold {
        policy = policy.with_threshold(threshold);
    }
    if let Some(keywords) = &args.keywords {
        policy = policy.with_keywords(keywords.clone());
    }
    Ok(policy)
}

/// Default location for model files (the OS data directory).
fn default_model_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "photoguard", "Photoguard").map(|dirs| dirs.data_dir().join("models"))
}

/// Resolves model and label paths, falling back to the data directory.
fn classifier_config(
    model: Option<PathBuf>,
    labels: Option<PathBuf>,
) -> anyhow::Result<VisionClassifierConfig> {
    let defaults = VisionClassifierConfig::default();

    let (default_model, default_labels) = match default_model_dir() {
        Some(dir) => (
            dir.join("vision_classifier.onnx"),
            dir.join("vision_labels.json"),
        ),
        None => (
            PathBuf::from(&defaults.model_path),
            PathBuf::from(&defaults.labels_path),
        ),
    };

    Ok(VisionClassifierConfig {
        model_path: model
            .unwrap_or(default_model)
            .to_string_lossy()
            .into_owned(),
        labels_path: labels
            .unwrap_or(default_labels)
            .to_string_lossy()
            .into_owned(),
        ..defaults
    })
}

fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photoguard={},warn", log_level)));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn print_verdict(verdict: &Verdict) {
    if verdict.is_inappropriate {
        println!("Potentially inappropriate content detected:");
        for category in &verdict.matched_categories {
            println!("  {}", category);
        }
    } else {
        println!("No inappropriate content detected.");
    }
}

fn run_scan(
    paths: Vec<PathBuf>,
    model: Option<PathBuf>,
    labels: Option<PathBuf>,
    policy: PolicyArgs,
    json: bool,
) -> anyhow::Result<i32> {
    let policy = build_policy(&policy)?;
    let config = classifier_config(model, labels)?;

    tracing::info!("Loading vision classifier from {}", config.model_path);
    let classifier = VisionClassifier::new(config).context("Failed to load vision classifier")?;
    let mut screener = ContentScreener::new(classifier, policy);

    let outcomes = screener.screen_batch(paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            match (&outcome.report, &outcome.error) {
                (Some(report), _) => {
                    if report.verdict.is_inappropriate {
                        println!("{}: FLAGGED", outcome.path.display());
                        for category in &report.verdict.matched_categories {
                            println!("  {}", category);
                        }
                    } else {
                        println!("{}: OK", outcome.path.display());
                    }
                }
                (None, Some(error)) => {
                    println!("{}: ERROR {}", outcome.path.display(), error);
                }
                (None, None) => unreachable!("outcome carries a report or an error"),
            }
        }
    }

    let any_failed = outcomes.iter().any(|o| !o.success());
    let any_flagged = outcomes
        .iter()
        .filter_map(|o| o.report.as_ref())
        .any(|r| r.verdict.is_inappropriate);

    Ok(if any_failed {
        2
    } else if any_flagged {
        1
    } else {
        0
    })
}

fn run_eval(scores: PathBuf, policy: PolicyArgs, json: bool) -> anyhow::Result<i32> {
    let policy = build_policy(&policy)?;

    let data = std::fs::read_to_string(&scores)
        .with_context(|| format!("Failed to read scores file {:?}", scores))?;
    let scores: Vec<LabelScore> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse scores file {:?}", scores))?;

    let verdict = evaluate(&scores, &policy);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(&verdict);
    }

    Ok(if verdict.is_inappropriate { 1 } else { 0 })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let code = match cli.command {
        Command::Scan {
            paths,
            model,
            labels,
            policy,
            json,
        } => run_scan(paths, model, labels, policy, json)?,
        Command::Eval {
            scores,
            policy,
            json,
        } => run_eval(scores, policy, json)?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
