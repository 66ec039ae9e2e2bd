//! The `gradientiq replay` command.
//!
//! Replays recorded answer attempts through an assessment session so the
//! telemetry, scoring and unlock rules can be inspected offline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use serde::{Deserialize, Serialize};

use gradientiq_core::config::load_config_from;
use gradientiq_core::error::SessionError;
use gradientiq_core::progression::ConceptProgress;
use gradientiq_core::session::{AssessmentSession, SessionObserver, Submission};
use gradientiq_core::synthesizer::AnalysisResult;
use gradientiq_core::telemetry::format_elapsed;
use gradientiq_core::Uuid;

use super::{ensure_format, load_catalog, print_result};

/// A recorded session.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    pub attempts: Vec<RecordedAttempt>,
}

#[derive(Debug, Deserialize)]
pub struct RecordedAttempt {
    pub concept: String,
    pub started_at: DateTime<Utc>,
    /// Full answer text after each change.
    #[serde(default)]
    pub events: Vec<RecordedEvent>,
    pub submitted_at: DateTime<Utc>,
    /// Submitted text; defaults to the text of the last event.
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordedEvent {
    pub at: DateTime<Utc>,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum ReplayOutcome {
    Submitted {
        concept: String,
        elapsed: String,
        submission: Submission,
    },
    Rejected {
        concept: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    outcomes: Vec<ReplayOutcome>,
    progress: Vec<ConceptProgress>,
}

/// Console session observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_attempt_started(&self, attempt_id: Uuid, concept_id: &str) {
        eprintln!("  Starting: {concept_id} ({attempt_id})");
    }

    fn on_attempt_discarded(&self, attempt_id: Uuid, concept_id: &str) {
        eprintln!("  Discarded: {concept_id} ({attempt_id})");
    }

    fn on_analysis_complete(&self, result: &AnalysisResult) {
        eprintln!(
            "  Done: {} [{}] composite {}",
            result.concept_id, result.signal, result.composite
        );
    }

    fn on_concept_unlocked(&self, concept_id: &str) {
        eprintln!("  Unlocked: {concept_id}");
    }

    fn on_selection_rejected(&self, error: &SessionError) {
        eprintln!("  REJECTED: {error}");
    }
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read replay script: {}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse replay script: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        attempts = script.attempts.len(),
        "loaded replay script"
    );
    Ok(script)
}

fn millis(at: &DateTime<Utc>) -> Result<u64> {
    u64::try_from(at.timestamp_millis())
        .with_context(|| format!("timestamp before 1970 is not supported: {at}"))
}

pub fn execute(
    script_path: PathBuf,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    ensure_format(&format)?;

    let config = load_config_from(config_path.as_deref())?;
    let catalog = load_catalog(catalog_path.as_deref())?;
    let script = load_script(&script_path)?;
    anyhow::ensure!(
        !script.attempts.is_empty(),
        "replay script has no attempts: {}",
        script_path.display()
    );

    let mut session = AssessmentSession::new(catalog, config);
    if format == "text" {
        session = session.with_observer(Box::new(ConsoleObserver));
    }

    let mut outcomes = Vec::new();
    for recorded in &script.attempts {
        let start = millis(&recorded.started_at)?;
        if let Err(e) = session.start_attempt(&recorded.concept, start) {
            outcomes.push(ReplayOutcome::Rejected {
                concept: recorded.concept.clone(),
                error: e.to_string(),
            });
            continue;
        }

        let mut previous = String::new();
        for event in &recorded.events {
            session.on_text_changed(&previous, &event.text, millis(&event.at)?)?;
            previous.clone_from(&event.text);
        }

        let submitted_at = millis(&recorded.submitted_at)?;
        let elapsed = format_elapsed(session.elapsed(submitted_at).unwrap_or(0));
        let answer = recorded.answer.as_deref().unwrap_or(&previous);
        let submission = session.submit(answer, submitted_at)?;
        outcomes.push(ReplayOutcome::Submitted {
            concept: recorded.concept.clone(),
            elapsed,
            submission,
        });
    }

    let mut progress = Vec::new();
    for subject in &session.catalog().subjects {
        progress.extend(session.concept_progress(&subject.name)?);
    }

    if format == "json" {
        let report = ReplayReport { outcomes, progress };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for outcome in &outcomes {
        println!();
        match outcome {
            ReplayOutcome::Submitted {
                concept,
                elapsed,
                submission,
            } => {
                println!("== {concept} (time {elapsed}) ==");
                print_result(&submission.result);
                if let Some(next) = &submission.progress.newly_unlocked {
                    println!("Unlocked: {next}");
                }
            }
            ReplayOutcome::Rejected { concept, error } => {
                println!("== {concept} ==");
                println!("Rejected: {error}");
            }
        }
    }

    print_progress(&progress);
    Ok(())
}

fn print_progress(progress: &[ConceptProgress]) {
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Concept", "Status", "Best", "Attempts"]);

    for p in progress {
        table.add_row(vec![
            Cell::new(&p.subject),
            Cell::new(&p.concept_id),
            Cell::new(if p.unlocked { "unlocked" } else { "locked" }),
            Cell::new(
                p.best_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(p.attempts),
        ]);
    }

    println!("\n{table}");
}
