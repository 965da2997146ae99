//! Skill matcher library
//!
//! Extracts a fixed vocabulary of skills from free text (exact whole-phrase
//! matching with a fuzzy n-gram fallback) and scores resumes against a job
//! description by skill-set overlap.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{Result, SkillMatchError};
pub use processing::analyzer::{BatchAnalysis, Candidate, CandidateAnalyzer};
pub use processing::extractor::{ExtractionResult, ExtractorOptions, SkillExtractor};
pub use processing::fuzzy_matcher::FuzzyCutoff;
pub use processing::scorer::{progress_bar, score_match, MatchResult};
pub use processing::vocabulary::{SkillDefinition, SkillVocabulary};

use std::sync::Arc;

/// Extract skills from `text` with default options and the given cutoff.
pub fn extract_skills(
    text: &str,
    vocabulary: Arc<SkillVocabulary>,
    cutoff: f64,
) -> Result<ExtractionResult> {
    let options = ExtractorOptions::default().with_cutoff(FuzzyCutoff::new(cutoff)?);
    SkillExtractor::new(vocabulary, options)?.extract(text)
}

/// Score every candidate against the job description text.
pub fn analyze_candidates(
    jd_text: &str,
    candidates: &[Candidate],
    vocabulary: Arc<SkillVocabulary>,
    cutoff: f64,
) -> Result<BatchAnalysis> {
    let options = ExtractorOptions::default().with_cutoff(FuzzyCutoff::new(cutoff)?);
    CandidateAnalyzer::new(vocabulary, options)?.analyze(jd_text, candidates)
}
