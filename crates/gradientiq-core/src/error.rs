//! Session error types.
//!
//! The analysis path itself never fails. These errors report usage
//! preconditions the caller broke, such as opening a locked concept, so a UI
//! can react to them without string matching.

use thiserror::Error;

/// A rejected session operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The concept exists but has not been unlocked yet.
    #[error("concept is locked: {0}")]
    ConceptLocked(String),

    /// The concept id is not in the catalog.
    #[error("unknown concept: {0}")]
    UnknownConcept(String),

    /// The subject name is not in the catalog.
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// A text change or submit arrived while no attempt was open.
    #[error("no active attempt")]
    NoActiveAttempt,
}

impl SessionError {
    /// Returns `true` if the caller asked for something the learner may not
    /// do yet, as opposed to referencing data that does not exist.
    pub fn is_locked(&self) -> bool {
        matches!(self, SessionError::ConceptLocked(_))
    }

    /// The concept id this error refers to, if any.
    pub fn concept_id(&self) -> Option<&str> {
        match self {
            SessionError::ConceptLocked(id) | SessionError::UnknownConcept(id) => Some(id),
            _ => None,
        }
    }
}
