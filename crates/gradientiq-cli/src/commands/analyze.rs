//! The `gradientiq analyze` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradientiq_core::config::load_config_from;
use gradientiq_core::synthesizer::analyze;
use gradientiq_core::telemetry::TelemetryFlags;

use super::{ensure_format, load_catalog, print_result};

pub fn execute(
    concept_id: String,
    answer: Option<PathBuf>,
    text: Option<String>,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    ensure_format(&format)?;

    let text = match (answer, text) {
        (Some(path), None) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answer: {}", path.display()))?,
        (None, Some(text)) => text,
        _ => anyhow::bail!("provide exactly one of --answer or --text"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let catalog = load_catalog(catalog_path.as_deref())?;
    let concept = catalog.concept(&concept_id).with_context(|| {
        format!(
            "concept '{concept_id}' not found in catalog '{}'",
            catalog.id
        )
    })?;

    // No typing was observed, so only text heuristics apply.
    let result = analyze(&text, concept, &TelemetryFlags::default(), &config.scoring);
    tracing::debug!(
        concept = %concept.id,
        composite = result.composite,
        signal = %result.signal,
        "answer analyzed"
    );

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Concept: {} ({})", concept.id, concept.subject);
        print_result(&result);
    }

    Ok(())
}
