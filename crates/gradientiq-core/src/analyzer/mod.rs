//! Text heuristics for a submitted answer.
//!
//! Four independent sub-scorers each map `(text, concept)` to a score in
//! `[0, 100]` with supporting evidence. They are hand-tuned heuristics, not a
//! language model, and their output is a soft signal only.

pub mod flow;
pub mod keywords;
pub mod paste;
pub mod profile;
pub mod repetition;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::model::Concept;

pub use flow::{analyze_flow, FlowScore};
pub use keywords::{analyze_keywords, KeywordScore};
pub use paste::{analyze_paste, PasteIndicator, PasteScore};
pub use profile::{
    complexity, detect_quality_jump, writing_profile, LengthCategory, QualityJump, WritingProfile,
};
pub use repetition::{analyze_repetition, RepetitionScore};

/// Qualitative confidence attached to a heuristic judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// The four sub-scores of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub keyword: KeywordScore,
    pub flow: FlowScore,
    pub repetition: RepetitionScore,
    pub paste: PasteScore,
}

impl SubScores {
    /// Placeholder scores for an answer too short to analyze.
    pub fn degenerate() -> Self {
        Self {
            keyword: KeywordScore {
                score: 0,
                matched: Vec::new(),
                total: 0,
                present: false,
            },
            flow: FlowScore::unstructured(0, 0),
            repetition: RepetitionScore::insufficient(0),
            paste: PasteScore::clean(0.0),
        }
    }
}

/// Outcome of running the analyzer over a text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextAnalysis {
    /// The trimmed answer is below the minimum analyzable length.
    InsufficientContent,
    Scored {
        scores: SubScores,
        profile: WritingProfile,
    },
}

/// Runs every sub-scorer over an answer.
#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    config: ScoringConfig,
}

impl TextAnalyzer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn analyze(&self, text: &str, concept: &Concept) -> TextAnalysis {
        self.analyze_with_history(text, concept, &[])
    }

    /// Like [`analyze`](Self::analyze), profiling the writing against the
    /// learner's earlier answers.
    pub fn analyze_with_history(
        &self,
        text: &str,
        concept: &Concept,
        previous: &[String],
    ) -> TextAnalysis {
        if text.trim().chars().count() < self.config.min_analyzable_chars {
            return TextAnalysis::InsufficientContent;
        }

        let scores = SubScores {
            keyword: analyze_keywords(text, concept, self.config.keyword_present_threshold),
            flow: analyze_flow(text),
            repetition: analyze_repetition(
                text,
                self.config.min_repetition_tokens,
                self.config.high_repetition_rate,
            ),
            paste: analyze_paste(text),
        };
        tracing::debug!(
            concept = %concept.id,
            keyword = scores.keyword.score,
            flow = scores.flow.score,
            repetition = scores.repetition.score,
            paste = scores.paste.score,
            "sub-scores computed"
        );

        let profile = writing_profile(text, previous, scores.repetition.high_repetition);
        TextAnalysis::Scored { scores, profile }
    }
}

/// Round a percentage the way the scorers report it, clamped to `[0, 100]`.
pub(crate) fn round_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}
