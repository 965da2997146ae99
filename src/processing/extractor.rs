//! Skill extraction: normalization, exact matching and fuzzy fallback

use crate::config::MatchingConfig;
use crate::error::{Result, SkillMatchError};
use crate::processing::exact_matcher::ExactMatcher;
use crate::processing::fuzzy_matcher::{FuzzyCutoff, FuzzyMatcher, SimilarityMetric};
use crate::processing::normalizer::NormalizedText;
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of example phrases kept on each ranked entry.
const RANKED_SAMPLE_SIZE: usize = 3;

/// Aggregated hits for one canonical skill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillMatch {
    pub count: usize,
    pub examples: Vec<String>,
    pub score: f64,
}

impl SkillMatch {
    /// A skill counts as present when it has a positive score.
    pub fn is_present(&self) -> bool {
        self.score > 0.0
    }

    fn record(&mut self, phrase: &str, weight: f64, max_examples: usize) {
        self.count += 1;
        self.score += weight;
        if self.examples.len() < max_examples && !self.examples.iter().any(|e| e == phrase) {
            self.examples.push(phrase.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSkill {
    pub skill: String,
    pub score: f64,
    pub count: usize,
    pub examples: Vec<String>,
}

/// Everything found in one text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub matches: BTreeMap<String, SkillMatch>,
    pub ranked: Vec<RankedSkill>,
    pub total_tokens: usize,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Synthetic result in which every listed skill is present once.
    ///
    /// Lets a candidate be scored against an explicit requirement list
    /// instead of a job description text.
    pub fn from_skill_list<S: AsRef<str>>(skills: &[S]) -> Self {
        let matches: BTreeMap<String, SkillMatch> = skills
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                (
                    s.to_string(),
                    SkillMatch {
                        count: 1,
                        examples: Vec::new(),
                        score: 1.0,
                    },
                )
            })
            .collect();

        let ranked = rank(&matches);
        Self {
            matches,
            ranked,
            total_tokens: 0,
        }
    }

    /// Names of skills with a positive score.
    pub fn present_skills(&self) -> impl Iterator<Item = &str> {
        self.matches
            .iter()
            .filter(|(_, m)| m.is_present())
            .map(|(skill, _)| skill.as_str())
    }
}

/// Tunables for a [`SkillExtractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorOptions {
    pub cutoff: FuzzyCutoff,
    pub fuzzy_weight: f64,
    pub max_ngram: usize,
    pub min_ngram_chars: usize,
    pub max_examples: usize,
    pub max_text_chars: usize,
    pub similarity: SimilarityMetric,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            cutoff: FuzzyCutoff::default(),
            fuzzy_weight: 0.6,
            max_ngram: 4,
            min_ngram_chars: 2,
            max_examples: 10,
            max_text_chars: 2_000_000,
            similarity: SimilarityMetric::default(),
        }
    }
}

impl ExtractorOptions {
    pub fn with_cutoff(mut self, cutoff: FuzzyCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn from_config(config: &MatchingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cutoff: FuzzyCutoff::new(config.fuzzy_cutoff)?,
            fuzzy_weight: config.fuzzy_weight,
            max_ngram: config.max_ngram,
            min_ngram_chars: config.min_ngram_chars,
            max_examples: config.max_examples,
            max_text_chars: config.max_text_chars,
            similarity: config.similarity,
        })
    }
}

/// Extracts skill mentions from free text against a fixed vocabulary.
pub struct SkillExtractor {
    vocabulary: Arc<SkillVocabulary>,
    exact: ExactMatcher,
    fuzzy: FuzzyMatcher,
    options: ExtractorOptions,
}

impl SkillExtractor {
    pub fn new(vocabulary: Arc<SkillVocabulary>, options: ExtractorOptions) -> Result<Self> {
        let exact = ExactMatcher::new(&vocabulary)?;
        let fuzzy = FuzzyMatcher::new(options.similarity, options.max_ngram, options.min_ngram_chars);

        Ok(Self {
            vocabulary,
            exact,
            fuzzy,
            options,
        })
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Extract skills from `text`.
    ///
    /// Exact matching runs for every skill; fuzzy matching only for skills
    /// that ended up with no exact hit. The only error is an input larger
    /// than `max_text_chars`.
    pub fn extract(&self, text: &str) -> Result<ExtractionResult> {
        let char_count = text.chars().count();
        if char_count > self.options.max_text_chars {
            return Err(SkillMatchError::TextProcessing(format!(
                "Input of {} characters exceeds the limit of {}",
                char_count, self.options.max_text_chars
            )));
        }

        let normalized = NormalizedText::from_raw(text);
        if normalized.is_empty() {
            return Ok(ExtractionResult::empty());
        }

        let entries = self.vocabulary.entries();
        let mut tallies: Vec<SkillMatch> = vec![SkillMatch::default(); entries.len()];

        for hit in self.exact.find_matches(&normalized.text) {
            tallies[hit.skill_index].record(&hit.phrase, 1.0, self.options.max_examples);
        }

        let zero_skills: Vec<_> = entries
            .iter()
            .enumerate()
            .filter(|(idx, _)| tallies[*idx].count == 0)
            .collect();

        trace!(
            "{} of {} skills have no exact hit; running fuzzy fallback",
            zero_skills.len(),
            entries.len()
        );

        for hit in self
            .fuzzy
            .find_matches(&normalized.tokens, &zero_skills, self.options.cutoff)
        {
            tallies[hit.skill_index].record(
                &hit.ngram,
                self.options.fuzzy_weight * hit.similarity,
                self.options.max_examples,
            );
        }

        let matches: BTreeMap<String, SkillMatch> = entries
            .iter()
            .zip(tallies)
            .filter(|(_, tally)| tally.count > 0)
            .map(|(entry, mut tally)| {
                tally.score = round_to(tally.score, 3);
                (entry.name().to_string(), tally)
            })
            .collect();

        let ranked = rank(&matches);
        debug!(
            "Extracted {} skills from {} tokens",
            ranked.len(),
            normalized.token_count()
        );

        Ok(ExtractionResult {
            matches,
            ranked,
            total_tokens: normalized.token_count(),
        })
    }
}

/// Order by score desc, count desc, then skill name asc.
fn rank(matches: &BTreeMap<String, SkillMatch>) -> Vec<RankedSkill> {
    let mut ranked: Vec<RankedSkill> = matches
        .iter()
        .filter(|(_, m)| m.count > 0)
        .map(|(skill, m)| RankedSkill {
            skill: skill.clone(),
            score: m.score,
            count: m.count,
            examples: m.examples.iter().take(RANKED_SAMPLE_SIZE).cloned().collect(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.skill.cmp(&b.skill))
    });
    ranked
}

/// Round to `decimals` places, ties to even on the exact binary value.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::vocabulary::SkillDefinition;

    fn default_extractor() -> SkillExtractor {
        SkillExtractor::new(Arc::new(SkillVocabulary::default()), ExtractorOptions::default()).unwrap()
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = default_extractor();
        let text = "Python and SQL, plus some Tableu and pivot tables";
        assert_eq!(extractor.extract(text).unwrap(), extractor.extract(text).unwrap());
    }

    #[test]
    fn test_exact_hits_score_one_each() {
        let extractor = default_extractor();
        let result = extractor.extract("Python, python3 and more PYTHON").unwrap();

        let python = &result.matches["Python"];
        assert_eq!(python.count, 3);
        assert_eq!(python.score, 3.0);
        assert_eq!(python.examples, vec!["python".to_string(), "python3".to_string()]);
        assert_eq!(result.total_tokens, 5);
    }

    #[test]
    fn test_structured_query_language_single_example() {
        let extractor = default_extractor();
        let result = extractor.extract("expert in structured query language").unwrap();

        let sql = &result.matches["SQL"];
        assert_eq!(sql.count, 1);
        assert_eq!(sql.examples, vec!["structured query language".to_string()]);
    }

    #[test]
    fn test_fuzzy_suppressed_by_exact_hit() {
        let extractor = default_extractor();
        let result = extractor.extract("tableau dashboards, also tableu reports").unwrap();

        let tableau = &result.matches["Tableau"];
        assert_eq!(tableau.count, 1);
        assert_eq!(tableau.score, 1.0);
        assert_eq!(tableau.examples, vec!["tableau".to_string()]);
    }

    #[test]
    fn test_fuzzy_hit_scores_weighted_similarity() {
        let extractor = default_extractor();
        let result = extractor.extract("built tablaeu dashboards").unwrap();

        let tableau = &result.matches["Tableau"];
        assert_eq!(tableau.count, 1);
        // 0.6 * 12/14
        assert_eq!(tableau.score, 0.514);
        assert_eq!(tableau.examples, vec!["tablaeu".to_string()]);
    }

    #[test]
    fn test_fuzzy_phrase_close_to_variant() {
        let extractor = default_extractor();
        let result = extractor.extract("strong data analyst background").unwrap();

        assert_eq!(result.matches.len(), 1);
        let analysis = &result.matches["Data Analysis"];
        assert_eq!(analysis.count, 1);
        // 0.6 * 22/25
        assert_eq!(analysis.score, 0.528);
        assert_eq!(analysis.examples, vec!["data analyst".to_string()]);
        assert_eq!(result.ranked[0].skill, "Data Analysis");
    }

    #[test]
    fn test_empty_text() {
        let extractor = default_extractor();
        for text in ["", "   ", "?!.,"] {
            let result = extractor.extract(text).unwrap();
            assert!(result.matches.is_empty());
            assert!(result.ranked.is_empty());
            assert_eq!(result.total_tokens, 0);
        }
    }

    #[test]
    fn test_no_skills_found() {
        let extractor = default_extractor();
        let result = extractor.extract("gardening and woodworking").unwrap();
        assert!(result.matches.is_empty());
        assert!(result.ranked.is_empty());
        assert_eq!(result.total_tokens, 3);
    }

    #[test]
    fn test_ranking_order() {
        let extractor = default_extractor();
        let result = extractor
            .extract("excel excel python sql sql tableau")
            .unwrap();

        let order: Vec<&str> = result.ranked.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(order, vec!["Excel", "SQL", "Python", "Tableau"]);
    }

    #[test]
    fn test_examples_are_bounded() {
        let vocabulary = SkillVocabulary::new(vec![SkillDefinition::new(
            "Rust",
            &["rustlang", "rust lang", "rust language"],
        )])
        .unwrap();
        let options = ExtractorOptions {
            max_examples: 2,
            ..ExtractorOptions::default()
        };
        let extractor = SkillExtractor::new(Arc::new(vocabulary), options).unwrap();

        let result = extractor.extract("rust, rustlang, rust lang, rust language").unwrap();
        let rust = &result.matches["Rust"];
        assert_eq!(rust.count, 4);
        assert_eq!(rust.examples.len(), 2);
    }

    #[test]
    fn test_text_limit() {
        let options = ExtractorOptions {
            max_text_chars: 10,
            ..ExtractorOptions::default()
        };
        let extractor =
            SkillExtractor::new(Arc::new(SkillVocabulary::default()), options).unwrap();
        assert!(matches!(
            extractor.extract("python python python"),
            Err(SkillMatchError::TextProcessing(_))
        ));
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(3.125, 2), 3.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(200.0 / 3.0, 2), 66.67);
        assert_eq!(round_to(0.6 * 6.0 / 7.0, 3), 0.514);
    }

    #[test]
    fn test_from_skill_list() {
        let result = ExtractionResult::from_skill_list(&["Python", " SQL ", ""]);
        let present: Vec<&str> = result.present_skills().collect();
        assert_eq!(present, vec!["Python", "SQL"]);
        assert_eq!(result.ranked.len(), 2);
    }
}
