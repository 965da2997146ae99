//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatchError};
use crate::processing::fuzzy_matcher::{FuzzyCutoff, SimilarityMetric};
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub fuzzy_cutoff: f64,
    pub fuzzy_weight: f64,
    pub max_ngram: usize,
    pub min_ngram_chars: usize,
    pub max_examples: usize,
    pub max_text_chars: usize,
    #[serde(default)]
    pub similarity: SimilarityMetric,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// TOML or JSON skill table; the built-in table is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub staging_dir: PathBuf,
    pub enable_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub progress_bar_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: FuzzyCutoff::DEFAULT,
            fuzzy_weight: 0.6,
            max_ngram: 4,
            min_ngram_chars: 2,
            max_examples: 10,
            max_text_chars: 2_000_000,
            similarity: SimilarityMetric::default(),
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<()> {
        FuzzyCutoff::new(self.fuzzy_cutoff)?;

        if !self.fuzzy_weight.is_finite() || self.fuzzy_weight < 0.0 {
            return Err(SkillMatchError::InvalidConfiguration(format!(
                "fuzzy_weight must be a non-negative number, got {}",
                self.fuzzy_weight
            )));
        }
        if self.max_ngram == 0 {
            return Err(SkillMatchError::InvalidConfiguration(
                "max_ngram must be at least 1".to_string(),
            ));
        }
        if self.max_text_chars == 0 {
            return Err(SkillMatchError::InvalidConfiguration(
                "max_text_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let staging_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skill-matcher")
            .join("staging");

        Self {
            matching: MatchingConfig::default(),
            vocabulary: VocabularyConfig::default(),
            input: InputConfig {
                staging_dir,
                enable_cache: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                progress_bar_length: 20,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first run.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                SkillMatchError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            info!("No configuration found, writing defaults to {}", config_path.display());
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.matching.validate()
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SkillMatchError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }

    /// The configured vocabulary file, or the built-in table.
    pub fn load_vocabulary(&self) -> Result<SkillVocabulary> {
        match &self.vocabulary.path {
            Some(path) => {
                info!("Loading skill vocabulary from {}", path.display());
                SkillVocabulary::from_path(path)
            }
            None => Ok(SkillVocabulary::default()),
        }
    }
}
