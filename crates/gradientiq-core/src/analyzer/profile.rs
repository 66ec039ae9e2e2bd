//! Descriptive writing statistics reported next to the sub-scores.
//!
//! Nothing here feeds the composite score. The derived flags only become
//! informational notices on a result.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::flow::split_sentences;

/// Template phrases common in boilerplate or generated text.
const GENERIC_PHRASES: &[&str] = &[
    "in conclusion",
    "to sum up",
    "in summary",
    "it is important to note",
    "it should be noted",
    "as mentioned earlier",
    "furthermore",
    "moreover",
    "additionally",
    "on the other hand",
    "in other words",
    "that being said",
    "first and foremost",
    "last but not least",
    "it goes without saying",
    "needless to say",
    "at the end of the day",
    "when all is said and done",
    "the bottom line is",
    "to put it simply",
];

const GENERIC_PHRASE_WEIGHT: usize = 15;
const GENERIC_SCORE_LIMIT: usize = 30;
const GENERIC_PHRASE_LIMIT: usize = 3;
const VARIETY_STD_DEV: f64 = 3.0;
/// Points above the mean of earlier answers that count as a jump.
const QUALITY_JUMP_POINTS: f64 = 25.0;
/// Uniform writing only looks generated above this many words.
const GENERATED_MIN_WORDS: usize = 50;
const LOW_ORIGINALITY_GENERIC_SCORE: u32 = 40;
/// Non-empty answers shorter than this are low originality.
const LOW_ORIGINALITY_WORDS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthCategory {
    Empty,
    VeryShort,
    Short,
    Medium,
    Long,
    VeryLong,
}

impl LengthCategory {
    pub fn from_word_count(words: usize) -> Self {
        match words {
            0 => LengthCategory::Empty,
            1..=19 => LengthCategory::VeryShort,
            20..=49 => LengthCategory::Short,
            50..=149 => LengthCategory::Medium,
            150..=299 => LengthCategory::Long,
            _ => LengthCategory::VeryLong,
        }
    }
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LengthCategory::Empty => "empty",
            LengthCategory::VeryShort => "very short",
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
            LengthCategory::VeryLong => "very long",
        };
        f.write_str(label)
    }
}

/// Complexity of an answer compared with the learner's earlier answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityJump {
    pub current_complexity: f64,
    /// Mean complexity of the earlier answers.
    pub previous_complexity: f64,
    pub magnitude: f64,
    pub detected: bool,
}

/// Rough writing complexity in `[0, 100]` from word length, vocabulary
/// diversity and sentence length.
pub fn complexity(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let n = words.len() as f64;
    let avg_word_len = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / n;
    let unique_ratio = words.iter().collect::<HashSet<_>>().len() as f64 / n;
    let sentences = split_sentences(text).len();
    let words_per_sentence = if sentences == 0 {
        n
    } else {
        n / sentences as f64
    };
    (avg_word_len * 10.0 + unique_ratio * 30.0 + words_per_sentence * 2.0).min(100.0)
}

/// Compare `text` against earlier answers. `None` without a baseline.
pub fn detect_quality_jump(text: &str, previous: &[String]) -> Option<QualityJump> {
    if text.trim().is_empty() {
        return None;
    }
    let earlier: Vec<f64> = previous
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| complexity(p))
        .collect();
    if earlier.is_empty() {
        return None;
    }

    let current_complexity = complexity(text);
    let previous_complexity = earlier.iter().sum::<f64>() / earlier.len() as f64;
    let magnitude = current_complexity - previous_complexity;
    Some(QualityJump {
        current_complexity,
        previous_complexity,
        magnitude,
        detected: magnitude > QUALITY_JUMP_POINTS,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingProfile {
    pub word_count: usize,
    pub length: LengthCategory,
    pub sentence_count: usize,
    pub avg_sentence_words: f64,
    /// Population standard deviation of words per sentence.
    pub sentence_variety: f64,
    pub has_variety: bool,
    pub generic_phrases: Vec<String>,
    /// 15 points per generic phrase, capped at 100.
    pub generic_score: u32,
    pub is_generic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_jump: Option<QualityJump>,
    /// Uniform, long and either generic or a sudden jump in complexity.
    pub looks_generated: bool,
    /// Repetitive, heavily generic or very short.
    pub low_originality: bool,
}

impl WritingProfile {
    pub fn quality_jump_detected(&self) -> bool {
        self.quality_jump.is_some_and(|j| j.detected)
    }
}

/// Profile `text` against the learner's earlier answers.
///
/// `repetitive` is the repetition scorer's verdict on the same text.
pub fn writing_profile(text: &str, previous: &[String], repetitive: bool) -> WritingProfile {
    let word_count = text.split_whitespace().count();

    let lengths: Vec<f64> = split_sentences(text)
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    let sentence_count = lengths.len();
    let (avg_sentence_words, sentence_variety) = if sentence_count == 0 {
        (0.0, 0.0)
    } else {
        let mean = lengths.iter().sum::<f64>() / sentence_count as f64;
        let variance =
            lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / sentence_count as f64;
        let std_dev = if sentence_count > 1 { variance.sqrt() } else { 0.0 };
        (mean, std_dev)
    };

    let lower = text.to_lowercase();
    let generic_phrases: Vec<String> = GENERIC_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| p.to_string())
        .collect();
    let generic_score = (generic_phrases.len() * GENERIC_PHRASE_WEIGHT).min(100);
    let has_variety = sentence_variety > VARIETY_STD_DEV && sentence_count > 2;
    let is_generic =
        generic_score > GENERIC_SCORE_LIMIT || generic_phrases.len() >= GENERIC_PHRASE_LIMIT;
    let generic_score = generic_score as u32;
    let quality_jump = detect_quality_jump(text, previous);

    let looks_generated = !has_variety
        && word_count > GENERATED_MIN_WORDS
        && (is_generic || quality_jump.is_some_and(|j| j.detected));
    let low_originality = repetitive
        || generic_score > LOW_ORIGINALITY_GENERIC_SCORE
        || (1..LOW_ORIGINALITY_WORDS).contains(&word_count);

    WritingProfile {
        word_count,
        length: LengthCategory::from_word_count(word_count),
        sentence_count,
        avg_sentence_words,
        sentence_variety,
        has_variety,
        generic_phrases,
        generic_score,
        is_generic,
        quality_jump,
        looks_generated,
        low_originality,
    }
}
