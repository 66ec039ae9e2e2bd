//! TOML concept catalog parser.
//!
//! Loads catalogs from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Catalog, Concept, Difficulty, QuestionType};

const BUILTIN_CATALOG: &str = include_str!("../catalogs/builtin.toml");

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    concepts: Vec<TomlConcept>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlConcept {
    id: String,
    subject: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    question_type: Option<String>,
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let concepts = parsed
        .concepts
        .into_iter()
        .map(|c| {
            let difficulty: Difficulty = c
                .difficulty
                .map(|d| d.parse::<Difficulty>().map_err(|e: String| anyhow::anyhow!("{}", e)))
                .transpose()
                .with_context(|| format!("concept '{}'", c.id))?
                .unwrap_or_default();
            let question_type: QuestionType = c
                .question_type
                .map(|q| q.parse::<QuestionType>().map_err(|e: String| anyhow::anyhow!("{}", e)))
                .transpose()
                .with_context(|| format!("concept '{}'", c.id))?
                .unwrap_or_default();

            Ok(Concept {
                id: c.id,
                subject: c.subject,
                position: 0,
                keywords: c.keywords,
                difficulty,
                question: c.question,
                question_type,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog::from_concepts(
        parsed.catalog.id,
        parsed.catalog.name,
        parsed.catalog.description,
        concepts,
    ))
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// The catalog shipped with the crate: seven subjects, two concepts each.
pub fn builtin_catalog() -> Result<Catalog> {
    parse_catalog_str(BUILTIN_CATALOG, Path::new("builtin.toml"))
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The concept ID (if applicable).
    pub concept_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.is_empty() {
        warnings.push(ValidationWarning {
            concept_id: None,
            message: "catalog has no concepts".into(),
        });
    }

    for id in catalog.duplicate_ids() {
        warnings.push(ValidationWarning {
            concept_id: Some(id.clone()),
            message: format!("duplicate concept ID: {id}"),
        });
    }

    for concept in catalog.iter() {
        let usable: Vec<String> = concept
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if usable.is_empty() {
            warnings.push(ValidationWarning {
                concept_id: Some(concept.id.clone()),
                message: "no keywords; keyword coverage will be neutral".into(),
            });
        }

        let mut seen = HashSet::new();
        for keyword in &usable {
            if !seen.insert(keyword) {
                warnings.push(ValidationWarning {
                    concept_id: Some(concept.id.clone()),
                    message: format!("duplicate keyword: {keyword}"),
                });
            }
        }

        if concept
            .question
            .as_deref()
            .is_some_and(|q| q.trim().is_empty())
        {
            warnings.push(ValidationWarning {
                concept_id: Some(concept.id.clone()),
                message: "question is empty".into(),
            });
        }
    }

    warnings
}
