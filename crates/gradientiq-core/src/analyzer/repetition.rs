//! Repetition: how often significant words recur.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::round_score;

/// Common words ignored when measuring repetition.
const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "will", "would", "could", "should", "about",
];

/// Words must be longer than this to count as tokens.
const MIN_TOKEN_CHARS: usize = 3;

/// A word must occur more than this many times to count as repeated.
const REPEAT_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionScore {
    pub score: u32,
    /// Distinct repeated words as a percentage of significant tokens.
    pub repetition_rate: f64,
    pub high_repetition: bool,
    /// Repeated words, alphabetically.
    pub repeated_words: Vec<String>,
    /// Tokens considered (length > 3).
    pub token_count: usize,
}

impl RepetitionScore {
    pub(crate) fn insufficient(token_count: usize) -> Self {
        Self {
            score: 100,
            repetition_rate: 0.0,
            high_repetition: false,
            repeated_words: Vec::new(),
            token_count,
        }
    }
}

pub fn analyze_repetition(text: &str, min_tokens: usize, high_rate: f64) -> RepetitionScore {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_TOKEN_CHARS)
        .collect();

    if tokens.len() < min_tokens {
        return RepetitionScore::insufficient(tokens.len());
    }

    let significant: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in significant.iter().copied() {
        *frequency.entry(word).or_default() += 1;
    }

    let mut repeated_words: Vec<String> = frequency
        .iter()
        .filter(|(_, count)| **count > REPEAT_LIMIT)
        .map(|(word, _)| word.to_string())
        .collect();
    repeated_words.sort();

    let repetition_rate = if significant.is_empty() {
        0.0
    } else {
        100.0 * repeated_words.len() as f64 / significant.len() as f64
    };

    RepetitionScore {
        score: round_score(100.0 - 2.0 * repetition_rate),
        repetition_rate,
        high_repetition: repetition_rate > high_rate,
        repeated_words,
        token_count: tokens.len(),
    }
}
