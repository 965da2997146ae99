//! Batch analysis: one job description against many candidates

use crate::error::Result;
use crate::processing::extractor::{ExtractionResult, ExtractorOptions, SkillExtractor};
use crate::processing::profile::CandidateProfile;
use crate::processing::scorer::{score_match_with_bar, MatchResult, DEFAULT_BAR_LENGTH};
use crate::processing::vocabulary::SkillVocabulary;
use crate::processing::fuzzy_matcher::FuzzyCutoff;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PLACEHOLDER_NAME: &str = "Candidate";

/// A resume as handed over by the input layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Upstream failure (e.g. the document could not be parsed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            text: text.into(),
            ..Self::default()
        }
    }

    /// A candidate whose source document failed to load.
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Name, then id, then filename, then a generic placeholder.
    pub fn display_name(&self) -> &str {
        [&self.name, &self.id, &self.filename]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub name: String,
    pub resume_results: ExtractionResult,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub profile: CandidateProfile,
}

/// A candidate that could not be analyzed; it still appears in the
/// candidate list with an empty extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMeta {
    pub jd_word_count: usize,
    pub candidates_count: usize,
    pub fuzzy_cutoff: FuzzyCutoff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub jd: ExtractionResult,
    pub candidates: Vec<CandidateAnalysis>,
    pub failures: Vec<CandidateFailure>,
    pub meta: BatchMeta,
}

impl BatchAnalysis {
    /// Candidates sorted by match score, best first. Ties keep input order.
    pub fn leaderboard(&self) -> Vec<&CandidateAnalysis> {
        let mut ranked: Vec<&CandidateAnalysis> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| {
            b.match_result
                .match_score_percent
                .total_cmp(&a.match_result.match_score_percent)
        });
        ranked
    }
}

/// Runs extraction and scoring for a job description and its candidates.
pub struct CandidateAnalyzer {
    extractor: SkillExtractor,
    bar_length: usize,
}

impl CandidateAnalyzer {
    pub fn new(vocabulary: Arc<SkillVocabulary>, options: ExtractorOptions) -> Result<Self> {
        Ok(Self::from_extractor(SkillExtractor::new(vocabulary, options)?))
    }

    pub fn from_extractor(extractor: SkillExtractor) -> Self {
        Self {
            extractor,
            bar_length: DEFAULT_BAR_LENGTH,
        }
    }

    pub fn with_bar_length(mut self, bar_length: usize) -> Self {
        self.bar_length = bar_length;
        self
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    /// Analyze every candidate against the job description text.
    ///
    /// Fails only when the job description itself cannot be processed.
    pub fn analyze(&self, jd_text: &str, candidates: &[Candidate]) -> Result<BatchAnalysis> {
        let jd = self.extractor.extract(jd_text)?;
        Ok(self.analyze_with_jd(jd, word_count(jd_text), candidates))
    }

    /// Analyze candidates against an explicit list of required skills.
    pub fn analyze_against_skills<S: AsRef<str>>(
        &self,
        required_skills: &[S],
        candidates: &[Candidate],
    ) -> BatchAnalysis {
        let jd = ExtractionResult::from_skill_list(required_skills);
        self.analyze_with_jd(jd, 0, candidates)
    }

    fn analyze_with_jd(
        &self,
        jd: ExtractionResult,
        jd_word_count: usize,
        candidates: &[Candidate],
    ) -> BatchAnalysis {
        info!(
            "Analyzing {} candidates against {} job skills",
            candidates.len(),
            jd.present_skills().count()
        );

        let mut analyses = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let name = candidate.display_name().to_string();

            let extraction = match &candidate.error {
                Some(reason) => Err(reason.clone()),
                None => self.extractor.extract(&candidate.text).map_err(|e| e.to_string()),
            };

            let (resume_results, match_result) = match extraction {
                Ok(resume_results) => {
                    let match_result = score_match_with_bar(&resume_results, &jd, self.bar_length);
                    debug!("{}: {}%", name, match_result.match_score_percent);
                    (resume_results, match_result)
                }
                Err(reason) => {
                    warn!("Skipping candidate '{}': {}", name, reason);
                    failures.push(CandidateFailure {
                        index,
                        name: name.clone(),
                        reason,
                    });
                    (
                        ExtractionResult::empty(),
                        MatchResult::unscored(&jd, self.bar_length),
                    )
                }
            };

            analyses.push(CandidateAnalysis {
                name,
                resume_results,
                match_result,
                profile: CandidateProfile::from_text(&candidate.text),
            });
        }

        BatchAnalysis {
            meta: BatchMeta {
                jd_word_count,
                candidates_count: candidates.len(),
                fuzzy_cutoff: self.extractor.options().cutoff,
            },
            jd,
            candidates: analyses,
            failures,
        }
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split pasted resume text on lines consisting of `---`, naming each part
/// "Resume N".
///
/// Only a line whose trimmed content is exactly `---` separates resumes; a
/// `---` inside a line (a date range, a markdown rule with text) is kept.
pub fn split_resume_text(text: &str) -> Vec<Candidate> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim() == "---" {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(idx, text)| Candidate::new(format!("Resume {}", idx + 1), text))
        .collect()
}
