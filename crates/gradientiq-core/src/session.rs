//! Assessment session orchestrator.
//!
//! Owns the catalog, configuration, progression state and the single active
//! answer attempt. The caller supplies wall-clock time in milliseconds on
//! every call; the session never reads a clock itself.

use serde::Serialize;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::model::Catalog;
use crate::progression::{ConceptProgress, ProgressUpdate, ProgressionTracker};
use crate::synthesizer::{analyze_with_history, AnalysisResult};
use crate::telemetry::{AnswerAttempt, TelemetryFlags, TelemetryRecorder, TelemetrySummary};

/// Session event hooks, e.g. for a UI or console log.
pub trait SessionObserver {
    fn on_attempt_started(&self, attempt_id: Uuid, concept_id: &str);
    fn on_attempt_discarded(&self, attempt_id: Uuid, concept_id: &str);
    fn on_analysis_complete(&self, result: &AnalysisResult);
    fn on_concept_unlocked(&self, concept_id: &str);
    fn on_selection_rejected(&self, error: &SessionError);
}

/// No-op session observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_attempt_started(&self, _: Uuid, _: &str) {}
    fn on_attempt_discarded(&self, _: Uuid, _: &str) {}
    fn on_analysis_complete(&self, _: &AnalysisResult) {}
    fn on_concept_unlocked(&self, _: &str) {}
    fn on_selection_rejected(&self, _: &SessionError) {}
}

/// Outcome of submitting an answer.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub result: AnalysisResult,
    pub progress: ProgressUpdate,
}

/// One learner working through a catalog.
pub struct AssessmentSession {
    catalog: Catalog,
    config: EngineConfig,
    recorder: TelemetryRecorder,
    tracker: ProgressionTracker,
    selected_subject: Option<String>,
    active: Option<AnswerAttempt>,
    /// Submitted answers, oldest first. Baseline for quality jumps.
    history: Vec<String>,
    observer: Box<dyn SessionObserver>,
}

impl AssessmentSession {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        let tracker = ProgressionTracker::new(&catalog, config.progression.clone());
        Self {
            recorder: TelemetryRecorder::new(config.telemetry.clone()),
            tracker,
            catalog,
            config,
            selected_subject: None,
            active: None,
            history: Vec::new(),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selected_subject(&self) -> Option<&str> {
        self.selected_subject.as_deref()
    }

    pub fn active_attempt(&self) -> Option<&AnswerAttempt> {
        self.active.as_ref()
    }

    /// Non-blank answers submitted so far in this session.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Switch to a subject. Any attempt on another subject is discarded.
    pub fn select_subject(&mut self, subject: &str) -> Result<(), SessionError> {
        if self.catalog.subject(subject).is_none() {
            return Err(self.reject(SessionError::UnknownSubject(subject.to_string())));
        }
        if self.selected_subject.as_deref() != Some(subject) {
            self.discard_active();
            self.selected_subject = Some(subject.to_string());
        }
        Ok(())
    }

    /// Open a fresh attempt on a concept, replacing any active one.
    ///
    /// Locked or unknown concepts are rejected and leave the session as it
    /// was.
    pub fn start_attempt(&mut self, concept_id: &str, now: u64) -> Result<Uuid, SessionError> {
        if let Err(e) = self.tracker.ensure_selectable(concept_id) {
            return Err(self.reject(e));
        }
        let Some(concept) = self.catalog.concept(concept_id) else {
            return Err(self.reject(SessionError::UnknownConcept(concept_id.to_string())));
        };
        let subject = concept.subject.clone();

        self.discard_active();
        let attempt = AnswerAttempt::new(concept_id, now);
        let id = attempt.id();
        tracing::info!(attempt = %id, concept = concept_id, "attempt started");
        self.observer.on_attempt_started(id, concept_id);
        self.active = Some(attempt);
        self.selected_subject = Some(subject);
        Ok(id)
    }

    /// Drop the active attempt without analyzing it.
    pub fn cancel_attempt(&mut self) -> Option<Uuid> {
        let id = self.active.as_ref().map(AnswerAttempt::id);
        self.discard_active();
        id
    }

    /// Feed a text change of the answer field into telemetry.
    pub fn on_text_changed(
        &mut self,
        previous: &str,
        new: &str,
        now: u64,
    ) -> Result<TelemetryFlags, SessionError> {
        let attempt = self.active.as_mut().ok_or(SessionError::NoActiveAttempt)?;
        Ok(self.recorder.record_change(attempt, previous, new, now).flags)
    }

    /// Analyze `text`, update progression and close the attempt.
    pub fn submit(&mut self, text: &str, now: u64) -> Result<Submission, SessionError> {
        let attempt = self.active.take().ok_or(SessionError::NoActiveAttempt)?;
        let concept = self
            .catalog
            .concept(attempt.concept_id())
            .ok_or_else(|| SessionError::UnknownConcept(attempt.concept_id().to_string()))?;

        let flags = self.recorder.flags_at_submit(&attempt, text, now);
        let mut result =
            analyze_with_history(text, concept, &flags, &self.history, &self.config.scoring);
        result.attempt_id = Some(attempt.id());
        result.telemetry = Some(self.recorder.summary(&attempt, now));

        let progress = self
            .tracker
            .record(&self.catalog, &concept.id, result.composite)?;
        tracing::info!(
            attempt = %attempt.id(),
            concept = %concept.id,
            composite = result.composite,
            signal = %result.signal,
            "attempt submitted"
        );

        if !text.trim().is_empty() {
            self.history.push(text.to_string());
        }
        self.observer.on_analysis_complete(&result);
        if let Some(unlocked) = &progress.newly_unlocked {
            self.observer.on_concept_unlocked(unlocked);
        }
        Ok(Submission { result, progress })
    }

    /// Ordered progress snapshot for a subject.
    pub fn concept_progress(&self, subject: &str) -> Result<Vec<ConceptProgress>, SessionError> {
        self.tracker.progress(&self.catalog, subject)
    }

    /// Time since the active attempt started.
    pub fn elapsed(&self, now: u64) -> Option<u64> {
        self.active
            .as_ref()
            .map(|a| now.saturating_sub(a.started_at_ms()))
    }

    pub fn is_typing(&self, now: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| self.recorder.is_typing(a, now))
    }

    pub fn telemetry_summary(&self, now: u64) -> Option<TelemetrySummary> {
        self.active.as_ref().map(|a| self.recorder.summary(a, now))
    }

    fn discard_active(&mut self) {
        if let Some(old) = self.active.take() {
            tracing::debug!(attempt = %old.id(), concept = old.concept_id(), "attempt discarded");
            self.observer.on_attempt_discarded(old.id(), old.concept_id());
        }
    }

    fn reject(&self, error: SessionError) -> SessionError {
        tracing::warn!("selection rejected: {error}");
        self.observer.on_selection_rejected(&error);
        error
    }
}
