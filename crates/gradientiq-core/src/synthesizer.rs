//! Signal synthesis: turn sub-scores and telemetry into learner feedback.
//!
//! The composite is a weighted mean of the four sub-scores. Telemetry flags
//! and writing-profile flags never move the composite; they are surfaced
//! next to it as notices.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::{Confidence, SubScores, TextAnalysis, TextAnalyzer, WritingProfile};
use crate::config::{ScoreWeights, ScoringConfig};
use crate::model::Concept;
use crate::telemetry::{TelemetryFlags, TelemetrySummary};

/// Shown with every result.
pub const HEURISTIC_DISCLAIMER: &str = "This feedback comes from rule-based text heuristics, \
not a trained model. Treat it as a prompt for reflection, not a grade.";

const TERMINOLOGY_HINT: &str = "Include more concept-specific terminology";
const STRUCTURE_HINT: &str = "Organize your answer with clear introduction and explanation";
const DEPTH_TERMINOLOGY_HINT: &str = "Use more concept-specific terminology and examples";
const DEPTH_STRUCTURE_HINT: &str = "Structure your answer: intro → explanation → conclusion";
const REPETITION_HINT: &str = "Reduce repetition and vary your explanations";
const PASTE_HINT: &str = "Note: Large text blocks detected. Ensure content is in your own words.";
const ELABORATE_HINT: &str = "Provide a more detailed answer with explanations";

/// Discrete classification of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    OriginalityLikely,
    NeedsReview,
    LowConceptualDepth,
    InsufficientContent,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::OriginalityLikely => "Originality Likely",
            Signal::NeedsReview => "Needs Review",
            Signal::LowConceptualDepth => "Low Conceptual Depth",
            Signal::InsufficientContent => "Insufficient Content",
        }
    }

    /// One-line explanation shown under the label.
    pub fn description(&self) -> &'static str {
        match self {
            Signal::OriginalityLikely => {
                "The answer shows good conceptual understanding with relevant keywords and logical structure."
            }
            Signal::NeedsReview => {
                "The answer has some good elements but could benefit from improvement."
            }
            Signal::LowConceptualDepth => {
                "The answer may lack sufficient conceptual depth or structure."
            }
            Signal::InsufficientContent => "Answer is too short to analyze meaningfully.",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something notable about how the answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorNotice {
    TypedIncrementally,
    PasteDetected,
    InactivityObserved,
    SuspiciouslyFast,
}

impl BehaviorNotice {
    /// Notices for every raised flag, in a fixed order.
    pub fn from_flags(flags: &TelemetryFlags) -> Vec<BehaviorNotice> {
        [
            (flags.typed_incrementally, BehaviorNotice::TypedIncrementally),
            (flags.paste_detected, BehaviorNotice::PasteDetected),
            (flags.inactivity_observed, BehaviorNotice::InactivityObserved),
            (flags.suspiciously_fast, BehaviorNotice::SuspiciouslyFast),
        ]
        .into_iter()
        .filter_map(|(raised, notice)| raised.then_some(notice))
        .collect()
    }
}

impl fmt::Display for BehaviorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorNotice::TypedIncrementally => write!(f, "answer was typed incrementally"),
            BehaviorNotice::PasteDetected => write!(f, "a large insertion looked like a paste"),
            BehaviorNotice::InactivityObserved => write!(f, "long period without typing"),
            BehaviorNotice::SuspiciouslyFast => {
                write!(f, "long answer submitted very soon after starting")
            }
        }
    }
}

/// Something notable about how the answer is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingNotice {
    QualityJump,
    LooksGenerated,
    LowOriginality,
}

impl WritingNotice {
    pub fn from_profile(profile: &WritingProfile) -> Vec<WritingNotice> {
        [
            (profile.quality_jump_detected(), WritingNotice::QualityJump),
            (profile.looks_generated, WritingNotice::LooksGenerated),
            (profile.low_originality, WritingNotice::LowOriginality),
        ]
        .into_iter()
        .filter_map(|(raised, notice)| raised.then_some(notice))
        .collect()
    }
}

impl fmt::Display for WritingNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritingNotice::QualityJump => {
                write!(f, "writing is much more complex than earlier answers")
            }
            WritingNotice::LooksGenerated => write!(f, "uniform, template-like writing"),
            WritingNotice::LowOriginality => {
                write!(f, "repetitive, generic or very short writing")
            }
        }
    }
}

/// Feedback for one submitted answer. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Attempt this result belongs to, when produced by a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<Uuid>,
    pub concept_id: String,
    pub composite: u32,
    pub signal: Signal,
    pub confidence: Confidence,
    pub description: String,
    pub disclaimer: String,
    pub scores: SubScores,
    pub suggestions: Vec<String>,
    pub behavior: Vec<BehaviorNotice>,
    #[serde(default)]
    pub writing: Vec<WritingNotice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetrySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<WritingProfile>,
}

impl AnalysisResult {
    pub fn is_insufficient(&self) -> bool {
        self.signal == Signal::InsufficientContent
    }
}

/// Weighted mean of the sub-scores, normalized by the weight total.
///
/// Always within `[0, 100]`. Zero or invalid weights yield 0.
pub fn composite_score(scores: &SubScores, weights: &ScoreWeights) -> u32 {
    let total = weights.total();
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }
    let weighted = weights.keyword * scores.keyword.score as f64
        + weights.flow * scores.flow.score as f64
        + weights.repetition * scores.repetition.score as f64
        + weights.paste * scores.paste.score as f64;
    crate::analyzer::round_score(weighted / total)
}

/// Maps sub-scores and telemetry to a [`Signal`] with suggestions.
#[derive(Debug, Clone, Default)]
pub struct SignalSynthesizer {
    config: ScoringConfig,
}

impl SignalSynthesizer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn synthesize(
        &self,
        concept_id: &str,
        scores: SubScores,
        flags: &TelemetryFlags,
    ) -> AnalysisResult {
        let composite = composite_score(&scores, &self.config.weights);
        let keyword_present = scores.keyword.present;
        let structured = scores.flow.structured;

        let mut suggestions = Vec::new();
        let (signal, confidence) = if composite >= self.config.originality_threshold
            && keyword_present
            && structured
        {
            (Signal::OriginalityLikely, Confidence::High)
        } else if composite >= self.config.review_threshold
            && composite < self.config.originality_threshold
        {
            if !keyword_present {
                suggestions.push(TERMINOLOGY_HINT.to_string());
            }
            if !structured {
                suggestions.push(STRUCTURE_HINT.to_string());
            }
            (Signal::NeedsReview, Confidence::Medium)
        } else {
            if !keyword_present {
                suggestions.push(DEPTH_TERMINOLOGY_HINT.to_string());
            }
            if !structured {
                suggestions.push(DEPTH_STRUCTURE_HINT.to_string());
            }
            if scores.repetition.high_repetition {
                suggestions.push(REPETITION_HINT.to_string());
            }
            (Signal::LowConceptualDepth, Confidence::Medium)
        };

        if scores.paste.possible_paste && scores.paste.confidence != Confidence::Low {
            suggestions.push(PASTE_HINT.to_string());
        }

        AnalysisResult {
            attempt_id: None,
            concept_id: concept_id.to_string(),
            composite,
            signal,
            confidence,
            description: signal.description().to_string(),
            disclaimer: HEURISTIC_DISCLAIMER.to_string(),
            scores,
            suggestions,
            behavior: BehaviorNotice::from_flags(flags),
            writing: Vec::new(),
            telemetry: None,
            profile: None,
        }
    }

    /// The fixed result for an answer too short to analyze.
    pub fn insufficient(&self, concept_id: &str, flags: &TelemetryFlags) -> AnalysisResult {
        let signal = Signal::InsufficientContent;
        AnalysisResult {
            attempt_id: None,
            concept_id: concept_id.to_string(),
            composite: 0,
            signal,
            confidence: Confidence::High,
            description: signal.description().to_string(),
            disclaimer: HEURISTIC_DISCLAIMER.to_string(),
            scores: SubScores::degenerate(),
            suggestions: vec![ELABORATE_HINT.to_string()],
            behavior: BehaviorNotice::from_flags(flags),
            writing: Vec::new(),
            telemetry: None,
            profile: None,
        }
    }
}

/// Run the whole text pipeline for one answer.
///
/// Pure: the same inputs always give the same result. Sessions call
/// [`analyze_with_history`] and then attach the attempt id and telemetry
/// summary.
pub fn analyze(
    text: &str,
    concept: &Concept,
    flags: &TelemetryFlags,
    config: &ScoringConfig,
) -> AnalysisResult {
    analyze_with_history(text, concept, flags, &[], config)
}

/// [`analyze`] with the learner's earlier answers as a writing baseline.
pub fn analyze_with_history(
    text: &str,
    concept: &Concept,
    flags: &TelemetryFlags,
    previous: &[String],
    config: &ScoringConfig,
) -> AnalysisResult {
    let synthesizer = SignalSynthesizer::new(config.clone());
    match TextAnalyzer::new(config.clone()).analyze_with_history(text, concept, previous) {
        TextAnalysis::InsufficientContent => synthesizer.insufficient(&concept.id, flags),
        TextAnalysis::Scored { scores, profile } => {
            let mut result = synthesizer.synthesize(&concept.id, scores, flags);
            result.writing = WritingNotice::from_profile(&profile);
            result.profile = Some(profile);
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{FlowScore, KeywordScore, PasteScore, RepetitionScore};
    use crate::model::{Difficulty, QuestionType};

    fn loops() -> Concept {
        Concept {
            id: "Loops".into(),
            subject: "Coding".into(),
            position: 0,
            keywords: [
                "loop", "for", "while", "iteration", "iterate", "array", "index", "sum", "counter",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            difficulty: Difficulty::Medium,
            question: Some("Write a loop to find the sum of an array.".into()),
            question_type: QuestionType::ProblemSolving,
        }
    }

    fn scores(keyword: u32, flow: u32, repetition: u32, paste: u32) -> SubScores {
        SubScores {
            keyword: KeywordScore {
                score: keyword,
                matched: Vec::new(),
                total: 10,
                present: keyword > 30,
            },
            flow: FlowScore {
                structured: flow >= 60,
                ..FlowScore::unstructured(flow, 3)
            },
            repetition: RepetitionScore {
                score: repetition,
                ..RepetitionScore::insufficient(12)
            },
            paste: PasteScore {
                score: paste,
                ..PasteScore::clean(40.0)
            },
        }
    }

    #[test]
    fn composite_stays_in_range() {
        let weights = ScoreWeights::default();
        for k in (0..=100).step_by(25) {
            for f in (0..=100).step_by(25) {
                for r in (0..=100).step_by(25) {
                    for p in (0..=100).step_by(25) {
                        let c = composite_score(&scores(k, f, r, p), &weights);
                        assert!(c <= 100);
                    }
                }
            }
        }
        assert_eq!(composite_score(&scores(100, 100, 100, 100), &weights), 100);
        assert_eq!(composite_score(&scores(0, 0, 0, 0), &weights), 0);
    }

    #[test]
    fn weights_are_normalized() {
        let doubled = ScoreWeights {
            keyword: 0.7,
            flow: 0.6,
            repetition: 0.4,
            paste: 0.3,
        };
        let s = scores(56, 20, 100, 100);
        assert_eq!(
            composite_score(&s, &doubled),
            composite_score(&s, &ScoreWeights::default())
        );
        let zero = ScoreWeights {
            keyword: 0.0,
            flow: 0.0,
            repetition: 0.0,
            paste: 0.0,
        };
        assert_eq!(composite_score(&s, &zero), 0);
    }

    #[test]
    fn high_composite_needs_keywords_and_structure() {
        let synth = SignalSynthesizer::default();
        let result = synth.synthesize("Loops", scores(100, 100, 100, 100), &TelemetryFlags::default());
        assert_eq!(result.signal, Signal::OriginalityLikely);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.suggestions.is_empty());

        // High composite without structure falls through to low depth.
        let result = synth.synthesize("Loops", scores(100, 40, 100, 100), &TelemetryFlags::default());
        assert_eq!(result.composite, 82);
        assert_eq!(result.signal, Signal::LowConceptualDepth);
        assert_eq!(result.suggestions, vec![DEPTH_STRUCTURE_HINT]);
    }

    #[test]
    fn signal_thresholds_are_inclusive() {
        let synth = SignalSynthesizer::default();
        let flags = TelemetryFlags::default();

        let result = synth.synthesize("Loops", scores(75, 75, 75, 75), &flags);
        assert_eq!(result.composite, 75);
        assert!(result.scores.keyword.present && result.scores.flow.structured);
        assert_eq!(result.signal, Signal::OriginalityLikely);

        let result = synth.synthesize("Loops", scores(74, 74, 74, 74), &flags);
        assert_eq!(result.composite, 74);
        assert_eq!(result.signal, Signal::NeedsReview);

        let result = synth.synthesize("Loops", scores(55, 55, 55, 55), &flags);
        assert_eq!(result.composite, 55);
        assert_eq!(result.signal, Signal::NeedsReview);

        let result = synth.synthesize("Loops", scores(54, 54, 54, 54), &flags);
        assert_eq!(result.composite, 54);
        assert_eq!(result.signal, Signal::LowConceptualDepth);
    }

    #[test]
    fn low_depth_lists_every_applicable_hint() {
        let mut s = scores(10, 20, 40, 100);
        s.repetition.high_repetition = true;
        let result = SignalSynthesizer::default().synthesize("Loops", s, &TelemetryFlags::default());
        assert_eq!(result.signal, Signal::LowConceptualDepth);
        assert_eq!(
            result.suggestions,
            vec![DEPTH_TERMINOLOGY_HINT, DEPTH_STRUCTURE_HINT, REPETITION_HINT]
        );
    }

    #[test]
    fn loops_answer_needs_review() {
        let text = "Use a for loop to iterate the array and sum each element because it \
                    accumulates the total, therefore the result is the sum.";
        let result = analyze(text, &loops(), &TelemetryFlags::default(), &ScoringConfig::default());

        assert_eq!(
            result.scores.keyword.matched,
            vec!["loop", "for", "iterate", "array", "sum"]
        );
        assert_eq!(result.scores.keyword.score, 56);
        assert!(result.scores.flow.cues_found.contains(&"because".to_string()));
        assert!(result.scores.flow.cues_found.contains(&"therefore".to_string()));
        assert_eq!(result.composite, 61);
        assert!(result.composite >= 55);
        assert_eq!(result.signal, Signal::NeedsReview);
        assert_eq!(result.suggestions, vec![STRUCTURE_HINT]);
        assert!(result.profile.is_some());
    }

    #[test]
    fn empty_answer_is_insufficient() {
        let result = analyze("", &loops(), &TelemetryFlags::default(), &ScoringConfig::default());
        assert!(result.is_insufficient());
        assert_eq!(result.signal.label(), "Insufficient Content");
        assert_eq!(result.composite, 0);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.suggestions, vec![ELABORATE_HINT]);
        assert_eq!(result.scores.keyword.score, 0);
        assert_eq!(result.scores.flow.score, 0);
        assert_eq!(result.scores.repetition.score, 100);
        assert_eq!(result.scores.paste.score, 100);
    }

    #[test]
    fn pasted_text_adds_hint_without_changing_signal() {
        let mut text = "A for loop will iterate over the array index and add to the sum. ".repeat(9);
        text.push_str("Source: https://example.com/loops");
        assert!(text.chars().count() > 500);

        let result = analyze(&text, &loops(), &TelemetryFlags::default(), &ScoringConfig::default());
        assert!(result.scores.paste.possible_paste);
        assert_eq!(result.suggestions.last().map(String::as_str), Some(PASTE_HINT));
    }

    #[test]
    fn writing_flags_become_notices_only() {
        let generic = "First and foremost a loop will iterate over the array index. \
            Furthermore the loop adds each element to a running sum counter. \
            Moreover the loop stops once the index reaches the array length. \
            The body of the loop runs while the condition still holds true. \
            A loop without any exit condition will never stop its iteration. \
            In conclusion a for loop sums the array without copying any code.";
        let plain = generic
            .replace("First and foremost a", "A")
            .replace("Furthermore the", "Then the")
            .replace("Moreover the", "Then the")
            .replace("In conclusion a", "So a");

        let config = ScoringConfig::default();
        let flags = TelemetryFlags::default();
        let noisy = analyze(generic, &loops(), &flags, &config);
        let quiet = analyze(&plain, &loops(), &flags, &config);

        assert!(noisy.profile.as_ref().unwrap().is_generic);
        assert_eq!(
            noisy.writing,
            vec![WritingNotice::LooksGenerated, WritingNotice::LowOriginality]
        );
        assert!(quiet.writing.is_empty());
        assert_eq!(
            noisy.composite,
            composite_score(&noisy.scores, &config.weights)
        );
        assert_eq!(noisy.signal, quiet.signal);
        assert_eq!(noisy.suggestions, quiet.suggestions);
        assert_eq!(noisy.behavior, quiet.behavior);
    }

    #[test]
    fn history_drives_quality_jump_notice() {
        let dense = "Iteration systematically traverses contiguous memory, \
            accumulating intermediate summations until termination conditions hold.";
        let config = ScoringConfig::default();
        let flags = TelemetryFlags::default();

        let alone = analyze(dense, &loops(), &flags, &config);
        assert!(!alone.writing.contains(&WritingNotice::QualityJump));

        let history = vec!["a b. c d. e f.".to_string()];
        let result = analyze_with_history(dense, &loops(), &flags, &history, &config);
        assert!(result.writing.contains(&WritingNotice::QualityJump));
        assert_eq!(result.composite, alone.composite);
        assert_eq!(result.signal, alone.signal);
    }

    #[test]
    fn insufficient_answers_carry_no_writing_notices() {
        let history = vec!["a b. c d. e f.".to_string()];
        let result = analyze_with_history(
            "loop",
            &loops(),
            &TelemetryFlags::default(),
            &history,
            &ScoringConfig::default(),
        );
        assert!(result.is_insufficient());
        assert!(result.writing.is_empty());
    }

    #[test]
    fn telemetry_flags_become_notices_only() {
        let flags = TelemetryFlags {
            typed_incrementally: true,
            paste_detected: true,
            inactivity_observed: false,
            suspiciously_fast: true,
        };
        let quiet = SignalSynthesizer::default().synthesize(
            "Loops",
            scores(60, 60, 100, 100),
            &TelemetryFlags::default(),
        );
        let noisy = SignalSynthesizer::default().synthesize("Loops", scores(60, 60, 100, 100), &flags);
        assert_eq!(quiet.composite, noisy.composite);
        assert_eq!(quiet.signal, noisy.signal);
        assert_eq!(
            noisy.behavior,
            vec![
                BehaviorNotice::TypedIncrementally,
                BehaviorNotice::PasteDetected,
                BehaviorNotice::SuspiciouslyFast,
            ]
        );
    }
}
