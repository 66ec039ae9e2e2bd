//! Structural flow: does the answer read as intro, reasoning, conclusion?

use serde::{Deserialize, Serialize};

const INTRO_CUES: &[&str] = &[
    "first",
    "begin",
    "start",
    "introduction",
    "let us",
    "consider",
    "we can",
];

const REASONING_CUES: &[&str] = &[
    "because", "therefore", "thus", "since", "as", "when", "which", "that",
];

const CONCLUSION_CUES: &[&str] = &[
    "therefore",
    "thus",
    "hence",
    "finally",
    "in conclusion",
    "result",
    "so",
];

const BASE_SCORE: u32 = 40;
const SINGLE_SENTENCE_SCORE: u32 = 20;
const INTRO_BONUS: u32 = 20;
const REASONING_BONUS: u32 = 25;
const CONCLUSION_BONUS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowScore {
    pub score: u32,
    pub sentence_count: usize,
    pub has_intro: bool,
    pub has_reasoning: bool,
    pub has_conclusion: bool,
    pub structured: bool,
    /// Every cue phrase found anywhere in the text. Informational only.
    pub cues_found: Vec<String>,
}

impl FlowScore {
    pub(crate) fn unstructured(score: u32, sentence_count: usize) -> Self {
        Self {
            score,
            sentence_count,
            has_intro: false,
            has_reasoning: false,
            has_conclusion: false,
            structured: false,
            cues_found: Vec::new(),
        }
    }
}

/// Split on runs of `.`, `!` and `?`, keeping non-blank segments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn contains_any(haystack: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| haystack.contains(cue))
}

pub fn analyze_flow(text: &str) -> FlowScore {
    let lower = text.to_lowercase();
    let sentences = split_sentences(&lower);
    let count = sentences.len();

    let mut cues_found: Vec<String> = Vec::new();
    for cue in INTRO_CUES.iter().chain(REASONING_CUES).chain(CONCLUSION_CUES) {
        if lower.contains(cue) && !cues_found.iter().any(|c| c == cue) {
            cues_found.push(cue.to_string());
        }
    }

    let (Some(first), Some(last)) = (sentences.first(), sentences.last()) else {
        return FlowScore::unstructured(SINGLE_SENTENCE_SCORE, 0);
    };
    if count < 2 {
        return FlowScore {
            cues_found,
            ..FlowScore::unstructured(SINGLE_SENTENCE_SCORE, count)
        };
    }

    let has_intro = contains_any(first, INTRO_CUES) || count >= 3;
    let interior = &sentences[1..count - 1];
    let has_reasoning = interior.iter().any(|s| contains_any(s, REASONING_CUES)) || count >= 4;
    let has_conclusion = count >= 3 && contains_any(last, CONCLUSION_CUES);
    let structured = has_intro || (has_reasoning && count >= 3);

    let mut score = BASE_SCORE;
    if has_intro {
        score += INTRO_BONUS;
    }
    if has_reasoning {
        score += REASONING_BONUS;
    }
    if has_conclusion {
        score += CONCLUSION_BONUS;
    }

    FlowScore {
        score: score.min(100),
        sentence_count: count,
        has_intro,
        has_reasoning,
        has_conclusion,
        structured,
        cues_found,
    }
}
