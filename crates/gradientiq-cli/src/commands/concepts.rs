//! The `gradientiq concepts` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::load_catalog;

pub fn execute(catalog_path: Option<PathBuf>, subject: Option<String>) -> Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    if let Some(name) = &subject {
        anyhow::ensure!(
            catalog.subject(name).is_some(),
            "subject '{name}' not found. Available: {:?}",
            catalog.subjects.iter().map(|s| &s.name).collect::<Vec<_>>()
        );
    }

    println!("Catalog: {} ({} concepts)", catalog.name, catalog.len());

    let mut table = Table::new();
    table.set_header(vec!["Subject", "#", "Concept", "Difficulty", "Type", "Keywords"]);
    for s in &catalog.subjects {
        if subject.as_ref().is_some_and(|name| *name != s.name) {
            continue;
        }
        for concept in catalog.concepts_in(&s.name) {
            table.add_row(vec![
                Cell::new(&s.name),
                Cell::new(concept.position + 1),
                Cell::new(&concept.id),
                Cell::new(concept.difficulty),
                Cell::new(concept.question_type),
                Cell::new(concept.keywords.len()),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
