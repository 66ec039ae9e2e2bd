//! Keyword coverage: how many of a concept's domain terms the answer uses.

use serde::{Deserialize, Serialize};

use super::round_score;
use crate::model::Concept;

/// Score given when a concept has no keywords to match against.
pub const NEUTRAL_SCORE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub score: u32,
    /// Keywords found in the answer, in catalog order.
    pub matched: Vec<String>,
    /// Number of usable keywords on the concept.
    pub total: usize,
    /// Coverage is above the "present" threshold.
    pub present: bool,
}

/// Case-insensitive substring match of the concept's keywords.
///
/// Blank keywords are ignored. A concept without usable keywords scores
/// [`NEUTRAL_SCORE`].
pub fn analyze_keywords(text: &str, concept: &Concept, present_threshold: f64) -> KeywordScore {
    let answer = text.to_lowercase();
    let keywords: Vec<&String> = concept
        .keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .collect();

    let matched: Vec<String> = keywords
        .iter()
        .filter(|k| answer.contains(&k.to_lowercase()))
        .map(|k| k.to_string())
        .collect();

    let raw = if keywords.is_empty() {
        NEUTRAL_SCORE as f64
    } else {
        100.0 * matched.len() as f64 / keywords.len() as f64
    };

    KeywordScore {
        score: round_score(raw),
        matched,
        total: keywords.len(),
        present: raw > present_threshold,
    }
}
