//! Concept progression: which concepts a learner may attempt.
//!
//! Each concept is locked or unlocked, and only ever moves forward. The first
//! concept of every subject starts unlocked; a concept's successor unlocks the
//! first time the concept scores at or above the unlock threshold.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ProgressionConfig;
use crate::error::SessionError;
use crate::model::Catalog;

/// Progress on one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptProgress {
    pub concept_id: String,
    pub subject: String,
    pub unlocked: bool,
    /// Best composite score so far, `None` before the first attempt.
    pub best_score: Option<u32>,
    pub attempts: u32,
    /// This concept has already unlocked its successor.
    pub threshold_reached: bool,
}

/// What changed when a result was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProgressUpdate {
    /// Successor unlocked by this result.
    pub newly_unlocked: Option<String>,
    /// The result beat the previous best.
    pub new_best: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressionTracker {
    config: ProgressionConfig,
    progress: HashMap<String, ConceptProgress>,
}

impl ProgressionTracker {
    /// Start tracking every concept in the catalog.
    pub fn new(catalog: &Catalog, config: ProgressionConfig) -> Self {
        let progress = catalog
            .iter()
            .map(|concept| {
                (
                    concept.id.clone(),
                    ConceptProgress {
                        concept_id: concept.id.clone(),
                        subject: concept.subject.clone(),
                        unlocked: concept.is_first_in_subject(),
                        best_score: None,
                        attempts: 0,
                        threshold_reached: false,
                    },
                )
            })
            .collect();
        Self { config, progress }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn get(&self, concept_id: &str) -> Option<&ConceptProgress> {
        self.progress.get(concept_id)
    }

    pub fn is_unlocked(&self, concept_id: &str) -> bool {
        self.progress.get(concept_id).is_some_and(|p| p.unlocked)
    }

    /// Reject concepts that are unknown or still locked.
    pub fn ensure_selectable(&self, concept_id: &str) -> Result<(), SessionError> {
        match self.progress.get(concept_id) {
            None => Err(SessionError::UnknownConcept(concept_id.to_string())),
            Some(p) if !p.unlocked => Err(SessionError::ConceptLocked(concept_id.to_string())),
            Some(_) => Ok(()),
        }
    }

    /// Record a composite score for an unlocked concept.
    pub fn record(
        &mut self,
        catalog: &Catalog,
        concept_id: &str,
        composite: u32,
    ) -> Result<ProgressUpdate, SessionError> {
        let threshold = self.config.unlock_threshold;
        let entry = self
            .progress
            .get_mut(concept_id)
            .ok_or_else(|| SessionError::UnknownConcept(concept_id.to_string()))?;
        if !entry.unlocked {
            return Err(SessionError::ConceptLocked(concept_id.to_string()));
        }

        entry.attempts += 1;
        let new_best = entry.best_score.map_or(true, |best| composite > best);
        if new_best {
            entry.best_score = Some(composite);
        }

        let mut update = ProgressUpdate {
            newly_unlocked: None,
            new_best,
        };
        if composite < threshold || entry.threshold_reached {
            return Ok(update);
        }
        entry.threshold_reached = true;

        if let Some(next) = catalog.successor(concept_id) {
            if let Some(next_progress) = self.progress.get_mut(&next.id) {
                if !next_progress.unlocked {
                    next_progress.unlocked = true;
                    tracing::info!(from = concept_id, concept = %next.id, "concept unlocked");
                    update.newly_unlocked = Some(next.id.clone());
                }
            }
        }
        Ok(update)
    }

    /// Ordered snapshot of a subject's progress.
    pub fn progress(
        &self,
        catalog: &Catalog,
        subject: &str,
    ) -> Result<Vec<ConceptProgress>, SessionError> {
        let subject = catalog
            .subject(subject)
            .ok_or_else(|| SessionError::UnknownSubject(subject.to_string()))?;
        Ok(subject
            .concepts
            .iter()
            .filter_map(|id| self.progress.get(id).cloned())
            .collect())
    }
}
