//! Engine configuration.
//!
//! Every heuristic threshold is a named field here so tests and deployments
//! can move boundaries without touching the scorers. None of these values were
//! fitted to labelled data; the defaults are hand-tuned.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the analysis engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
}

/// Typing telemetry thresholds. All durations are in milliseconds, all sizes
/// in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Gap between keystrokes that counts as a pause.
    pub pause_threshold_ms: u64,
    /// Maximum keystroke events kept per attempt; oldest are dropped first.
    pub keystroke_log_capacity: usize,
    /// Number of recent events inspected for incremental typing.
    pub incremental_window_events: usize,
    /// Minimum events required before incremental typing can be inferred.
    pub incremental_min_events: usize,
    /// Largest per-event change still considered a keystroke.
    pub small_change_chars: u64,
    /// The incremental window must span less than this.
    pub frequent_typing_window_ms: u64,
    /// A single change larger than this may be a paste.
    pub large_paste_chars: u64,
    /// A large change only counts as a paste after at least this gap.
    pub paste_min_gap_ms: u64,
    /// Longest tolerated stretch without a keystroke.
    pub inactivity_threshold_ms: u64,
    /// Submissions sooner than this after the start may be flagged as fast.
    pub fast_submission_ms: u64,
    /// Answers longer than this are substantial enough for the fast flag.
    pub substantial_length_chars: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: 2_000,
            keystroke_log_capacity: 500,
            incremental_window_events: 5,
            incremental_min_events: 3,
            small_change_chars: 3,
            frequent_typing_window_ms: 5_000,
            large_paste_chars: 50,
            paste_min_gap_ms: 500,
            inactivity_threshold_ms: 30_000,
            fast_submission_ms: 10_000,
            substantial_length_chars: 100,
        }
    }
}

/// Weights of the four sub-scores in the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub flow: f64,
    pub repetition: f64,
    pub paste: f64,
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.keyword + self.flow + self.repetition + self.paste
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.35,
            flow: 0.30,
            repetition: 0.20,
            paste: 0.15,
        }
    }
}

/// Text scoring and signal thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Trimmed answers shorter than this are not analyzed.
    pub min_analyzable_chars: usize,
    pub weights: ScoreWeights,
    /// Keyword coverage above this percentage counts as "present".
    pub keyword_present_threshold: f64,
    /// Fewer qualifying tokens than this skips the repetition penalty.
    pub min_repetition_tokens: usize,
    /// Repetition rate (percent) above which repetition is "high".
    pub high_repetition_rate: f64,
    /// Composite at or above this may be classified "Originality Likely".
    pub originality_threshold: u32,
    /// Composite at or above this (and below originality) needs review.
    pub review_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_analyzable_chars: 10,
            weights: ScoreWeights::default(),
            keyword_present_threshold: 30.0,
            min_repetition_tokens: 10,
            high_repetition_rate: 20.0,
            originality_threshold: 75,
            review_threshold: 55,
        }
    }
}

/// Concept unlock rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Composite score that unlocks the next concept.
    pub unlock_threshold: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            unlock_threshold: 70,
        }
    }
}

impl EngineConfig {
    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.telemetry;
        anyhow::ensure!(
            t.keystroke_log_capacity >= t.incremental_window_events,
            "keystroke_log_capacity ({}) must hold the incremental window ({})",
            t.keystroke_log_capacity,
            t.incremental_window_events
        );
        anyhow::ensure!(
            t.incremental_min_events >= 2 && t.incremental_min_events <= t.incremental_window_events,
            "incremental_min_events must be between 2 and incremental_window_events"
        );

        let w = &self.scoring.weights;
        anyhow::ensure!(
            [w.keyword, w.flow, w.repetition, w.paste]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0),
            "score weights must be finite and non-negative"
        );
        anyhow::ensure!(w.total() > 0.0, "score weights must not all be zero");

        let s = &self.scoring;
        anyhow::ensure!(
            s.review_threshold <= s.originality_threshold && s.originality_threshold <= 100,
            "thresholds must satisfy review <= originality <= 100"
        );
        anyhow::ensure!(
            self.progression.unlock_threshold <= 100,
            "unlock_threshold must be at most 100"
        );
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradientiq.toml` in the current directory
/// 2. `~/.config/gradientiq/config.toml`
///
/// Environment variable override: `GRADIENTIQ_UNLOCK_THRESHOLD`.
pub fn load_config() -> Result<EngineConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EngineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradientiq.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Ok(raw) = std::env::var("GRADIENTIQ_UNLOCK_THRESHOLD") {
        config.progression.unlock_threshold = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid GRADIENTIQ_UNLOCK_THRESHOLD: '{raw}'"))?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a TOML string into an `EngineConfig` (useful for testing).
pub fn parse_config_str(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(content)?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradientiq"))
}
