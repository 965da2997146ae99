//! Fuzzy n-gram skill matching, used as a fallback for skills with no exact hit

use crate::error::{Result, SkillMatchError};
use crate::processing::vocabulary::SkillEntry;
use difflib::sequencematcher::SequenceMatcher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strsim::{jaro_winkler, normalized_levenshtein};

/// Similarity threshold in `[0, 1]`. Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FuzzyCutoff(f64);

impl FuzzyCutoff {
    pub const DEFAULT: f64 = 0.85;

    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(SkillMatchError::InvalidConfiguration(format!(
                "Fuzzy cutoff must be a number in [0, 1], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for FuzzyCutoff {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl FromStr for FuzzyCutoff {
    type Err = SkillMatchError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s.trim().parse().map_err(|_| {
            SkillMatchError::InvalidConfiguration(format!(
                "Fuzzy cutoff must be numeric, got '{}'",
                s
            ))
        })?;
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for FuzzyCutoff {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        FuzzyCutoff::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for FuzzyCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// String similarity measure used to compare n-grams against variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMetric {
    /// `2 * M / T` over matching character blocks, as computed by a
    /// sequence matcher.
    #[default]
    RatcliffObershelp,
    Levenshtein,
    JaroWinkler,
}

impl SimilarityMetric {
    pub fn ratio(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::RatcliffObershelp => sequence_ratio(a, b),
            SimilarityMetric::Levenshtein => normalized_levenshtein(a, b),
            SimilarityMetric::JaroWinkler => jaro_winkler(a, b),
        }
    }
}

/// Matching-block similarity over chars, computed in `f64`.
fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut matcher = SequenceMatcher::new(a.as_slice(), b.as_slice());
    let matched: usize = matcher.get_matching_blocks().iter().map(|m| m.size).sum();
    2.0 * matched as f64 / total as f64
}

impl FromStr for SimilarityMetric {
    type Err = SkillMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ratcliff-obershelp" | "ratio" => Ok(SimilarityMetric::RatcliffObershelp),
            "levenshtein" => Ok(SimilarityMetric::Levenshtein),
            "jaro-winkler" | "jaro_winkler" | "jarowinkler" => Ok(SimilarityMetric::JaroWinkler),
            _ => Err(SkillMatchError::InvalidConfiguration(format!(
                "Unknown similarity metric: {}. Supported: ratcliff-obershelp, levenshtein, jaro-winkler",
                s
            ))),
        }
    }
}

/// One accepted fuzzy occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit {
    pub skill_index: usize,
    pub ngram: String,
    pub similarity: f64,
    pub token_index: usize,
}

pub struct FuzzyMatcher {
    metric: SimilarityMetric,
    max_ngram: usize,
    min_ngram_chars: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(SimilarityMetric::default(), 4, 2)
    }
}

impl FuzzyMatcher {
    pub fn new(metric: SimilarityMetric, max_ngram: usize, min_ngram_chars: usize) -> Self {
        Self {
            metric,
            max_ngram: max_ngram.max(1),
            min_ngram_chars,
        }
    }

    /// Slide 1..=max_ngram token windows over `tokens` and compare each window
    /// with every variant of the given skills.
    ///
    /// `skills` pairs a vocabulary index with its entry; only skills that had
    /// no exact hit should be passed in. Hits come back in scan order: start
    /// token left to right, then window length, then skill order.
    pub fn find_matches(
        &self,
        tokens: &[String],
        skills: &[(usize, &SkillEntry)],
        cutoff: FuzzyCutoff,
    ) -> Vec<FuzzyHit> {
        let mut hits = Vec::new();
        if skills.is_empty() {
            return hits;
        }

        for start in 0..tokens.len() {
            for len in 1..=self.max_ngram {
                if start + len > tokens.len() {
                    break;
                }

                let ngram = tokens[start..start + len].join(" ");
                if ngram.chars().count() < self.min_ngram_chars {
                    continue;
                }

                for &(skill_index, entry) in skills {
                    let best = self.best_ratio(&ngram, entry);
                    if best >= cutoff.value() {
                        hits.push(FuzzyHit {
                            skill_index,
                            ngram: ngram.clone(),
                            similarity: best,
                            token_index: start,
                        });
                    }
                }
            }
        }

        hits
    }

    fn best_ratio(&self, ngram: &str, entry: &SkillEntry) -> f64 {
        entry
            .variants()
            .iter()
            .map(|variant| self.metric.ratio(ngram, variant))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::vocabulary::{SkillDefinition, SkillVocabulary};

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_cutoff_validation() {
        assert!(FuzzyCutoff::new(0.0).is_ok());
        assert!(FuzzyCutoff::new(1.0).is_ok());
        assert!(FuzzyCutoff::new(1.2).is_err());
        assert!(FuzzyCutoff::new(-0.1).is_err());
        assert!(FuzzyCutoff::new(f64::NAN).is_err());
        assert!("abc".parse::<FuzzyCutoff>().is_err());
        assert_eq!("0.9".parse::<FuzzyCutoff>().unwrap().value(), 0.9);
        assert_eq!(FuzzyCutoff::default().value(), 0.85);
    }

    #[test]
    fn test_misspelling_is_accepted() {
        let vocabulary = SkillVocabulary::new(vec![SkillDefinition::new("Tableau", &[])]).unwrap();
        let skills: Vec<_> = vocabulary.entries().iter().enumerate().collect();
        let matcher = FuzzyMatcher::default();

        let hits = matcher.find_matches(&tokens("built tablaeu dashboards"), &skills, FuzzyCutoff::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ngram, "tablaeu");
        assert!((hits[0].similarity - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(hits[0].token_index, 1);

        let hits = matcher.find_matches(&tokens("built tbl dashboards"), &skills, FuzzyCutoff::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_sequence_ratio_values() {
        let ratio = |a, b| SimilarityMetric::RatcliffObershelp.ratio(a, b);
        assert!((ratio("data analyst", "data analysis") - 0.88).abs() < 1e-12);
        assert!((ratio("excell", "excel") - 10.0 / 11.0).abs() < 1e-12);
        assert_eq!(ratio("tableau", "tableau"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);

        // Edit distance is stricter on the same pair
        assert!(SimilarityMetric::Levenshtein.ratio("data analyst", "data analysis") < 0.85);
    }

    #[test]
    fn test_multi_token_ngram() {
        let vocabulary =
            SkillVocabulary::new(vec![SkillDefinition::new("Machine Learning", &[])]).unwrap();
        let skills: Vec<_> = vocabulary.entries().iter().enumerate().collect();
        let matcher = FuzzyMatcher::default();

        let hits = matcher.find_matches(&tokens("applied machine lerning models"), &skills, FuzzyCutoff::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ngram, "machine lerning");
    }

    #[test]
    fn test_short_ngrams_skipped() {
        let vocabulary = SkillVocabulary::new(vec![SkillDefinition::new("R", &[])]).unwrap();
        let skills: Vec<_> = vocabulary.entries().iter().enumerate().collect();
        let matcher = FuzzyMatcher::default();

        let cutoff = FuzzyCutoff::new(0.0).unwrap();
        let hits = matcher.find_matches(&tokens("r"), &skills, cutoff);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_window_capped() {
        let vocabulary =
            SkillVocabulary::new(vec![SkillDefinition::new("a b c d e", &[])]).unwrap();
        let skills: Vec<_> = vocabulary.entries().iter().enumerate().collect();
        let cutoff = FuzzyCutoff::new(1.0).unwrap();

        let hits = FuzzyMatcher::default().find_matches(&tokens("a b c d e"), &skills, cutoff);
        assert!(hits.is_empty());

        let hits = FuzzyMatcher::new(SimilarityMetric::RatcliffObershelp, 5, 2)
            .find_matches(&tokens("a b c d e"), &skills, cutoff);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("jaro-winkler".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::JaroWinkler);
        assert_eq!("Levenshtein".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Levenshtein);
        assert_eq!(
            "ratcliff-obershelp".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::RatcliffObershelp
        );
        assert_eq!(SimilarityMetric::default(), SimilarityMetric::RatcliffObershelp);
        assert!("cosine".parse::<SimilarityMetric>().is_err());
    }
}
