//! Skill vocabulary: canonical skill names and their surface variants

use crate::error::{Result, SkillMatchError};
use crate::processing::normalizer::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A skill as written in configuration, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl SkillDefinition {
    pub fn new(name: &str, variants: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct VocabularyFile {
    skills: Vec<SkillDefinition>,
}

/// A validated skill with its normalized variants, longest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillEntry {
    name: String,
    variants: Vec<String>,
}

impl SkillEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

/// Immutable, ordered skill vocabulary. Built once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillVocabulary {
    entries: Vec<SkillEntry>,
}

impl SkillVocabulary {
    /// Validate and normalize a list of skill definitions.
    ///
    /// The canonical name always counts as a variant. Variants are
    /// normalized the same way input text is, de-duplicated, and sorted by
    /// descending character length so that longer phrases win over shorter
    /// overlapping ones.
    pub fn new(definitions: Vec<SkillDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(SkillMatchError::InvalidConfiguration(
                "Skill vocabulary is empty".to_string(),
            ));
        }

        let mut seen_names = HashSet::new();
        let mut entries = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let name = definition.name.trim().to_string();
            if name.is_empty() {
                return Err(SkillMatchError::InvalidConfiguration(
                    "Skill with an empty canonical name".to_string(),
                ));
            }
            if !seen_names.insert(name.to_lowercase()) {
                return Err(SkillMatchError::InvalidConfiguration(format!(
                    "Duplicate skill in vocabulary: {}",
                    name
                )));
            }

            let mut variants: Vec<String> = std::iter::once(name.as_str())
                .chain(definition.variants.iter().map(String::as_str))
                .map(normalize)
                .filter(|v| !v.is_empty())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();

            if variants.is_empty() {
                return Err(SkillMatchError::InvalidConfiguration(format!(
                    "Skill '{}' has no usable variants",
                    name
                )));
            }

            variants.sort_by(|a, b| {
                b.chars()
                    .count()
                    .cmp(&a.chars().count())
                    .then_with(|| a.cmp(b))
            });

            entries.push(SkillEntry { name, variants });
        }

        debug!("Built skill vocabulary with {} skills", entries.len());
        Ok(Self { entries })
    }

    /// Load a vocabulary from a TOML or JSON file with a top-level `skills` list.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let file: VocabularyFile = match extension.as_str() {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content).map_err(|e| {
                SkillMatchError::Configuration(format!(
                    "Failed to parse vocabulary '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            other => {
                return Err(SkillMatchError::UnsupportedFormat(format!(
                    "Vocabulary file must be .toml or .json, got '.{}'",
                    other
                )))
            }
        };

        Self::new(file.skills)
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&SkillEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(default_skill_definitions()).expect("Built-in vocabulary is valid")
    }
}

/// Built-in skill table used when no vocabulary file is configured.
pub fn default_skill_definitions() -> Vec<SkillDefinition> {
    vec![
        SkillDefinition::new("Python", &["python3", "py"]),
        SkillDefinition::new(
            "SQL",
            &["mysql", "postgresql", "mariadb", "t-sql", "structured query language"],
        ),
        SkillDefinition::new("Excel", &["ms excel", "excel", "pivot table", "vlookup"]),
        SkillDefinition::new("Power BI", &["powerbi", "power bi"]),
        SkillDefinition::new("Tableau", &["tableau"]),
        SkillDefinition::new("Pandas", &["pandas", "pd"]),
        SkillDefinition::new("Machine Learning", &["machine learning", "ml", "deep learning"]),
        SkillDefinition::new("Data Analysis", &["data analysis", "data analytics"]),
        SkillDefinition::new(
            "Communication",
            &["presentation", "communication", "written communication"],
        ),
    ]
}
