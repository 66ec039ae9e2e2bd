//! The `gradientiq init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create gradientiq.toml
    if std::path::Path::new("gradientiq.toml").exists() {
        println!("gradientiq.toml already exists, skipping.");
    } else {
        std::fs::write("gradientiq.toml", SAMPLE_CONFIG)?;
        println!("Created gradientiq.toml");
    }

    // Create example catalog
    std::fs::create_dir_all("catalogs")?;
    let example_path = std::path::Path::new("catalogs/example.toml");
    if example_path.exists() {
        println!("catalogs/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalogs/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Tune thresholds in gradientiq.toml");
    println!("  2. Run: gradientiq validate --catalog catalogs/example.toml");
    println!(
        "  3. Run: gradientiq analyze --catalog catalogs/example.toml --concept Variables --text \"...\""
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradientiq configuration
# Every value below is the default. Delete lines you do not want to change.

[telemetry]
pause_threshold_ms = 2000
keystroke_log_capacity = 500
incremental_window_events = 5
incremental_min_events = 3
small_change_chars = 3
frequent_typing_window_ms = 5000
large_paste_chars = 50
paste_min_gap_ms = 500
inactivity_threshold_ms = 30000
fast_submission_ms = 10000
substantial_length_chars = 100

[scoring]
min_analyzable_chars = 10
keyword_present_threshold = 30.0
min_repetition_tokens = 10
high_repetition_rate = 20.0
originality_threshold = 75
review_threshold = 55

[scoring.weights]
keyword = 0.35
flow = 0.30
repetition = 0.20
paste = 0.15

[progression]
unlock_threshold = 70
"#;

const EXAMPLE_CATALOG: &str = r#"[catalog]
id = "example"
name = "Example Catalog"
description = "A small catalog to get started"

[[concepts]]
id = "Variables"
subject = "Programming"
difficulty = "easy"
question_type = "Descriptive"
question = "Explain what a variable is and how it is assigned."
keywords = ["variable", "value", "assign", "name", "type", "memory"]

[[concepts]]
id = "Functions"
subject = "Programming"
difficulty = "medium"
question_type = "Problem Solving"
question = "Write a function that returns the larger of two numbers."
keywords = ["function", "parameter", "argument", "return", "call", "compare"]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use gradientiq_core::catalog::{parse_catalog_str, validate_catalog};
    use gradientiq_core::config::parse_config_str;
    use std::path::Path;

    #[test]
    fn samples_parse_cleanly() {
        let config = parse_config_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, Default::default());

        let catalog = parse_catalog_str(EXAMPLE_CATALOG, Path::new("example.toml")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(validate_catalog(&catalog).is_empty());
    }
}
