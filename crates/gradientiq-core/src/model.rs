//! Core reference data types for gradientiq.
//!
//! Concepts, subjects and the catalog that groups them. These are loaded once
//! and never mutated while a session runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A single assessable topic within a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier, also used as the display name (e.g. "Loops").
    pub id: String,
    /// Owning subject (e.g. "Coding").
    pub subject: String,
    /// Zero-based position within the subject's ordered concept list.
    pub position: usize,
    /// Domain terms expected in a good answer.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Difficulty label.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Question shown to the learner.
    #[serde(default)]
    pub question: Option<String>,
    /// Kind of answer the question asks for.
    #[serde(default)]
    pub question_type: QuestionType,
}

impl Concept {
    /// Returns `true` if this concept is the entry point of its subject.
    pub fn is_first_in_subject(&self) -> bool {
        self.position == 0
    }
}

/// Difficulty of a concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The kind of answer a question expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Descriptive,
    ProblemSolving,
    StepBasedExplanation,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Descriptive => write!(f, "Descriptive"),
            QuestionType::ProblemSolving => write!(f, "Problem Solving"),
            QuestionType::StepBasedExplanation => write!(f, "Step-based Explanation"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match normalized.as_str() {
            "descriptive" => Ok(QuestionType::Descriptive),
            "problemsolving" => Ok(QuestionType::ProblemSolving),
            "stepbasedexplanation" => Ok(QuestionType::StepBasedExplanation),
            _ => Err(format!("unknown question type: {}", s.trim())),
        }
    }
}

/// A subject and the ordered ids of its concepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub concepts: Vec<String>,
}

/// Immutable collection of subjects and concepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Unique identifier for this catalog.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this catalog.
    #[serde(default)]
    pub description: String,
    /// Subjects in display order.
    pub subjects: Vec<Subject>,
    concepts: HashMap<String, Concept>,
    #[serde(default)]
    duplicates: Vec<String>,
}

impl Catalog {
    /// Build a catalog from concepts listed in order.
    ///
    /// Subjects appear in order of their first concept, and each concept's
    /// `position` is reassigned from its order within the subject. A concept
    /// whose id repeats an earlier one is dropped.
    pub fn from_concepts(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        concepts: impl IntoIterator<Item = Concept>,
    ) -> Self {
        let mut subjects: Vec<Subject> = Vec::new();
        let mut by_id = HashMap::new();
        let mut duplicates = Vec::new();

        for mut concept in concepts {
            if by_id.contains_key(&concept.id) {
                tracing::warn!("duplicate concept id '{}', keeping first", concept.id);
                duplicates.push(concept.id);
                continue;
            }
            let idx = match subjects.iter().position(|s| s.name == concept.subject) {
                Some(idx) => idx,
                None => {
                    subjects.push(Subject {
                        name: concept.subject.clone(),
                        concepts: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };
            let subject = &mut subjects[idx];
            concept.position = subject.concepts.len();
            subject.concepts.push(concept.id.clone());
            by_id.insert(concept.id.clone(), concept);
        }

        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            subjects,
            concepts: by_id,
            duplicates,
        }
    }

    /// Ids that were dropped because an earlier concept already used them.
    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicates
    }

    /// Look up a concept by id.
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// Look up a subject by name.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Concepts of a subject in order. Empty if the subject is unknown.
    pub fn concepts_in(&self, subject: &str) -> Vec<&Concept> {
        self.subject(subject)
            .map(|s| s.concepts.iter().filter_map(|id| self.concept(id)).collect())
            .unwrap_or_default()
    }

    /// The concept that follows `id` within its subject, if any.
    pub fn successor(&self, id: &str) -> Option<&Concept> {
        let concept = self.concept(id)?;
        let subject = self.subject(&concept.subject)?;
        subject
            .concepts
            .get(concept.position + 1)
            .and_then(|next| self.concept(next))
    }

    /// Iterate over all concepts in subject order.
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.subjects
            .iter()
            .flat_map(|s| s.concepts.iter())
            .filter_map(|id| self.concepts.get(id))
    }

    /// Total number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}
