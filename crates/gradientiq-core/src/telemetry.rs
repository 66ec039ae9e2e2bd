//! Typing telemetry for a single answer attempt.
//!
//! The recorder watches how an answer is produced: keystroke deltas, pauses,
//! and large insertions that look like pastes. It only annotates; input is
//! never blocked or rejected. All timestamps are milliseconds from an
//! arbitrary epoch supplied by the caller.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TelemetryConfig;

/// One text-change event on the answer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    /// When the change happened.
    pub at_ms: u64,
    /// Length of the text after the change, in characters.
    pub text_len: usize,
    /// Signed size change from the previous text.
    pub delta: i64,
}

/// A gap between two keystrokes longer than the pause threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseInterval {
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
}

/// Behavioral flags derived from telemetry.
///
/// `typed_incrementally` and `paste_detected` are independent and both
/// monotonic within an attempt. The other two are only set at submit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryFlags {
    pub typed_incrementally: bool,
    pub paste_detected: bool,
    pub inactivity_observed: bool,
    pub suspiciously_fast: bool,
}

/// The mutable state of one answer attempt.
#[derive(Debug, Clone)]
pub struct AnswerAttempt {
    id: Uuid,
    concept_id: String,
    started_at_ms: u64,
    text: String,
    keystrokes: VecDeque<KeystrokeEvent>,
    pauses: Vec<PauseInterval>,
    total_keystrokes: usize,
    last_event_ms: Option<u64>,
    longest_gap_ms: u64,
    typed_incrementally: bool,
    paste_detected: bool,
}

impl AnswerAttempt {
    pub fn new(concept_id: impl Into<String>, started_at_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            concept_id: concept_id.into(),
            started_at_ms,
            text: String::new(),
            keystrokes: VecDeque::new(),
            pauses: Vec::new(),
            total_keystrokes: 0,
            last_event_ms: None,
            longest_gap_ms: 0,
            typed_incrementally: false,
            paste_detected: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn concept_id(&self) -> &str {
        &self.concept_id
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// Latest text seen by the recorder.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Retained keystroke events, oldest first.
    pub fn keystrokes(&self) -> impl ExactSizeIterator<Item = &KeystrokeEvent> {
        self.keystrokes.iter()
    }

    pub fn pauses(&self) -> &[PauseInterval] {
        &self.pauses
    }

    /// Keystrokes recorded over the whole attempt, including trimmed ones.
    pub fn total_keystrokes(&self) -> usize {
        self.total_keystrokes
    }

    pub fn typed_incrementally(&self) -> bool {
        self.typed_incrementally
    }

    pub fn paste_detected(&self) -> bool {
        self.paste_detected
    }

    /// Flags known while typing. Submit-time flags are always `false` here.
    pub fn live_flags(&self) -> TelemetryFlags {
        TelemetryFlags {
            typed_incrementally: self.typed_incrementally,
            paste_detected: self.paste_detected,
            ..Default::default()
        }
    }

    fn reference_ms(&self) -> u64 {
        self.last_event_ms.unwrap_or(self.started_at_ms)
    }
}

/// Result of recording one text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryUpdate {
    pub event: KeystrokeEvent,
    /// Set when the gap before this event was long enough to be a pause.
    pub pause: Option<PauseInterval>,
    pub flags: TelemetryFlags,
}

/// Aggregate telemetry for display or logging alongside a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySummary {
    pub total_keystrokes: usize,
    pub total_pauses: usize,
    /// Mean gap between retained keystrokes; 0 with fewer than two.
    pub mean_keystroke_interval_ms: f64,
    pub longest_pause_ms: u64,
    pub elapsed_ms: u64,
}

/// Stateless recorder; all per-attempt state lives in [`AnswerAttempt`].
#[derive(Debug, Clone, Default)]
pub struct TelemetryRecorder {
    config: TelemetryConfig,
}

impl TelemetryRecorder {
    pub fn new(config: TelemetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Record a change of the answer text from `previous` to `new` at `now`.
    pub fn record_change(
        &self,
        attempt: &mut AnswerAttempt,
        previous: &str,
        new: &str,
        now: u64,
    ) -> TelemetryUpdate {
        let reference = attempt.reference_ms();
        // A clock that runs backwards yields a zero-length gap.
        let at_ms = now.max(reference);
        let gap_ms = at_ms - reference;
        let is_first = attempt.last_event_ms.is_none();

        let text_len = new.chars().count();
        let delta = text_len as i64 - previous.chars().count() as i64;
        let event = KeystrokeEvent {
            at_ms,
            text_len,
            delta,
        };

        attempt.keystrokes.push_back(event);
        while attempt.keystrokes.len() > self.config.keystroke_log_capacity.max(1) {
            attempt.keystrokes.pop_front();
        }
        attempt.total_keystrokes += 1;
        attempt.longest_gap_ms = attempt.longest_gap_ms.max(gap_ms);
        attempt.last_event_ms = Some(at_ms);
        attempt.text.clear();
        attempt.text.push_str(new);

        let pause = if !is_first && gap_ms > self.config.pause_threshold_ms {
            let pause = PauseInterval {
                start_ms: reference,
                end_ms: at_ms,
                duration_ms: gap_ms,
            };
            attempt.pauses.push(pause);
            Some(pause)
        } else {
            None
        };

        if !attempt.typed_incrementally && self.window_is_incremental(attempt) {
            tracing::debug!(attempt = %attempt.id, "incremental typing observed");
            attempt.typed_incrementally = true;
        }

        if !attempt.paste_detected
            && delta.unsigned_abs() > self.config.large_paste_chars
            && gap_ms > self.config.paste_min_gap_ms
        {
            tracing::debug!(attempt = %attempt.id, delta, "paste-like insertion observed");
            attempt.paste_detected = true;
        }

        TelemetryUpdate {
            event,
            pause,
            flags: attempt.live_flags(),
        }
    }

    fn window_is_incremental(&self, attempt: &AnswerAttempt) -> bool {
        let len = attempt.keystrokes.len();
        let size = self.config.incremental_window_events.min(len);
        if size < self.config.incremental_min_events {
            return false;
        }
        let window: Vec<&KeystrokeEvent> = attempt.keystrokes.iter().skip(len - size).collect();
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return false;
        };
        let small = window
            .iter()
            .all(|e| e.delta.unsigned_abs() <= self.config.small_change_chars);
        let span = last.at_ms.saturating_sub(first.at_ms);
        small && span < self.config.frequent_typing_window_ms
    }

    /// Full flag set for a submission of `answer` at `now`.
    pub fn flags_at_submit(&self, attempt: &AnswerAttempt, answer: &str, now: u64) -> TelemetryFlags {
        let trailing_gap = now.saturating_sub(attempt.reference_ms());
        let longest_gap = attempt.longest_gap_ms.max(trailing_gap);
        let elapsed = now.saturating_sub(attempt.started_at_ms);

        TelemetryFlags {
            typed_incrementally: attempt.typed_incrementally,
            paste_detected: attempt.paste_detected,
            inactivity_observed: longest_gap > self.config.inactivity_threshold_ms,
            suspiciously_fast: elapsed < self.config.fast_submission_ms
                && answer.chars().count() > self.config.substantial_length_chars,
        }
    }

    /// Whether the learner is typing right now, for a live activity indicator.
    pub fn is_typing(&self, attempt: &AnswerAttempt, now: u64) -> bool {
        attempt
            .last_event_ms
            .is_some_and(|last| now.saturating_sub(last) <= self.config.pause_threshold_ms)
    }

    pub fn summary(&self, attempt: &AnswerAttempt, now: u64) -> TelemetrySummary {
        let intervals: Vec<u64> = attempt
            .keystrokes
            .iter()
            .zip(attempt.keystrokes.iter().skip(1))
            .map(|(a, b)| b.at_ms.saturating_sub(a.at_ms))
            .collect();
        let mean_keystroke_interval_ms = if intervals.is_empty() {
            0.0
        } else {
            intervals.iter().sum::<u64>() as f64 / intervals.len() as f64
        };

        TelemetrySummary {
            total_keystrokes: attempt.total_keystrokes,
            total_pauses: attempt.pauses.len(),
            mean_keystroke_interval_ms,
            longest_pause_ms: attempt
                .pauses
                .iter()
                .map(|p| p.duration_ms)
                .max()
                .unwrap_or(0),
            elapsed_ms: now.saturating_sub(attempt.started_at_ms),
        }
    }
}

/// Format an elapsed duration as `m:ss` for a timer display.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
