//! Paste likelihood from the shape of the final text.
//!
//! This only looks at the submitted text. Typing telemetry has its own,
//! independent paste flag.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Confidence;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://").expect("valid url regex"));
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"));

const LONG_TEXT_CHARS: usize = 500;
const LONG_TEXT_MAX_LINES: usize = 3;
const LONG_LINE_CHARS: usize = 200;
const MANY_LINES: usize = 10;
const UNIFORM_MIN_LINES: usize = 5;
const UNIFORM_MIN_CHARS: usize = 50;
const UNIFORM_MAX_CHARS: usize = 150;
const MIN_PASTE_SCORE: u32 = 30;
const INDICATOR_PENALTY: u32 = 20;

/// A single reason the text looks pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasteIndicator {
    /// Long text with almost no line breaks.
    LongContinuousText,
    /// Many lines, at least one of them very long.
    ManyLongLines,
    /// Several lines of suspiciously similar length.
    UniformBlocks,
    ContainsUrl,
    ContainsDate,
}

impl fmt::Display for PasteIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteIndicator::LongContinuousText => write!(f, "long continuous text"),
            PasteIndicator::ManyLongLines => write!(f, "many long lines"),
            PasteIndicator::UniformBlocks => write!(f, "uniform line blocks"),
            PasteIndicator::ContainsUrl => write!(f, "contains a URL"),
            PasteIndicator::ContainsDate => write!(f, "contains a date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasteScore {
    pub score: u32,
    pub possible_paste: bool,
    pub indicator_count: usize,
    pub indicators: Vec<PasteIndicator>,
    pub confidence: Confidence,
    pub average_line_length: f64,
}

impl PasteScore {
    pub(crate) fn clean(average_line_length: f64) -> Self {
        Self {
            score: 100,
            possible_paste: false,
            indicator_count: 0,
            indicators: Vec::new(),
            confidence: Confidence::Low,
            average_line_length,
        }
    }
}

pub fn analyze_paste(text: &str) -> PasteScore {
    let lines: Vec<usize> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().count())
        .collect();
    let total_chars = text.chars().count();
    let average_line_length = total_chars as f64 / lines.len().max(1) as f64;

    let mut indicators = Vec::new();
    if total_chars > LONG_TEXT_CHARS && lines.len() < LONG_TEXT_MAX_LINES {
        indicators.push(PasteIndicator::LongContinuousText);
    }
    if lines.len() > MANY_LINES && lines.iter().any(|&len| len > LONG_LINE_CHARS) {
        indicators.push(PasteIndicator::ManyLongLines);
    }
    if lines.len() >= UNIFORM_MIN_LINES
        && lines
            .iter()
            .all(|&len| len > UNIFORM_MIN_CHARS && len < UNIFORM_MAX_CHARS)
    {
        indicators.push(PasteIndicator::UniformBlocks);
    }
    if URL_PATTERN.is_match(text) {
        indicators.push(PasteIndicator::ContainsUrl);
    }
    if DATE_PATTERN.is_match(text) {
        indicators.push(PasteIndicator::ContainsDate);
    }

    let count = indicators.len();
    let possible_paste = count >= 2;
    let score = if possible_paste {
        100u32
            .saturating_sub(INDICATOR_PENALTY * count as u32)
            .max(MIN_PASTE_SCORE)
    } else {
        100
    };
    let confidence = match count {
        0..=1 => Confidence::Low,
        2 => Confidence::Medium,
        _ => Confidence::High,
    };

    PasteScore {
        score,
        possible_paste,
        indicator_count: count,
        indicators,
        confidence,
        average_line_length,
    }
}
