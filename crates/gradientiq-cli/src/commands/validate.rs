//! The `gradientiq validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradientiq_core::catalog::{load_catalog_directory, parse_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalogs = if catalog_path.is_dir() {
        load_catalog_directory(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };

    let mut total_warnings = 0;

    for catalog in &catalogs {
        println!(
            "Catalog: {} ({} subjects, {} concepts)",
            catalog.name,
            catalog.subjects.len(),
            catalog.len()
        );

        let warnings = validate_catalog(catalog);
        for w in &warnings {
            let prefix = w
                .concept_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
