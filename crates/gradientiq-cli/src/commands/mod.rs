pub mod analyze;
pub mod concepts;
pub mod init;
pub mod replay;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradientiq_core::catalog;
use gradientiq_core::model::Catalog;
use gradientiq_core::synthesizer::AnalysisResult;

/// Load a catalog file, or the built-in catalog when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => {
            anyhow::ensure!(
                !p.is_dir(),
                "expected a catalog file, got a directory: {}",
                p.display()
            );
            catalog::parse_catalog(p)
        }
        None => catalog::builtin_catalog(),
    }
}

pub fn ensure_format(format: &str) -> Result<()> {
    anyhow::ensure!(
        matches!(format, "text" | "json"),
        "unknown format '{format}', expected 'text' or 'json'"
    );
    Ok(())
}

/// Print a result as human-readable text.
pub fn print_result(result: &AnalysisResult) {
    println!(
        "Signal: {} (confidence: {})",
        result.signal, result.confidence
    );
    println!("Composite: {}/100", result.composite);
    println!("{}", result.description);

    let scores = &result.scores;
    let mut table = Table::new();
    table.set_header(vec!["Scorer", "Score", "Evidence"]);
    table.add_row(vec![
        Cell::new("keyword"),
        Cell::new(scores.keyword.score),
        Cell::new(format!(
            "{}/{} matched: {}",
            scores.keyword.matched.len(),
            scores.keyword.total,
            scores.keyword.matched.join(", ")
        )),
    ]);
    table.add_row(vec![
        Cell::new("flow"),
        Cell::new(scores.flow.score),
        Cell::new(format!(
            "{} sentence(s), intro {}, reasoning {}, conclusion {}",
            scores.flow.sentence_count,
            yes_no(scores.flow.has_intro),
            yes_no(scores.flow.has_reasoning),
            yes_no(scores.flow.has_conclusion)
        )),
    ]);
    table.add_row(vec![
        Cell::new("repetition"),
        Cell::new(scores.repetition.score),
        Cell::new(format!(
            "rate {:.1}% over {} tokens",
            scores.repetition.repetition_rate, scores.repetition.token_count
        )),
    ]);
    let indicators: Vec<String> = scores.paste.indicators.iter().map(|i| i.to_string()).collect();
    table.add_row(vec![
        Cell::new("paste"),
        Cell::new(scores.paste.score),
        Cell::new(if indicators.is_empty() {
            "no indicators".to_string()
        } else {
            format!("{} ({} confidence)", indicators.join(", "), scores.paste.confidence)
        }),
    ]);
    println!("{table}");

    if !result.suggestions.is_empty() {
        println!("Suggestions:");
        for s in &result.suggestions {
            println!("  - {s}");
        }
    }
    if !result.behavior.is_empty() {
        println!("Behavior:");
        for notice in &result.behavior {
            println!("  - {notice}");
        }
    }
    if !result.writing.is_empty() {
        println!("Writing:");
        for notice in &result.writing {
            println!("  - {notice}");
        }
    }
    if let Some(profile) = &result.profile {
        println!(
            "Profile: {} words ({}), {} sentence(s){}",
            profile.word_count,
            profile.length,
            profile.sentence_count,
            if profile.is_generic {
                ", generic phrasing"
            } else {
                ""
            }
        );
    }
    println!("Note: {}", result.disclaimer);
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
