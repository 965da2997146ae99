//! Resume vs. job description match scoring

use crate::processing::extractor::{round_to, ExtractionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_BAR_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub match_score_percent: f64,
    pub progress_bar: String,
}

impl MatchResult {
    /// Zero-percent result for a candidate that could not be analyzed.
    pub fn unscored(jd: &ExtractionResult, bar_length: usize) -> Self {
        score_match_with_bar(&ExtractionResult::empty(), jd, bar_length)
    }
}

/// Compare a resume's extraction against the job description's.
pub fn score_match(resume: &ExtractionResult, jd: &ExtractionResult) -> MatchResult {
    score_match_with_bar(resume, jd, DEFAULT_BAR_LENGTH)
}

pub fn score_match_with_bar(
    resume: &ExtractionResult,
    jd: &ExtractionResult,
    bar_length: usize,
) -> MatchResult {
    let resume_skills: BTreeSet<&str> = resume.present_skills().collect();
    let jd_skills: BTreeSet<&str> = jd.present_skills().collect();

    let matched: Vec<String> = sorted(resume_skills.intersection(&jd_skills));
    let missing: Vec<String> = sorted(jd_skills.difference(&resume_skills));
    let extra: Vec<String> = sorted(resume_skills.difference(&jd_skills));

    let match_score_percent = if jd_skills.is_empty() {
        0.0
    } else {
        round_to(matched.len() as f64 / jd_skills.len() as f64 * 100.0, 2)
    };

    MatchResult {
        resume_skills: sorted(resume_skills.iter()),
        jd_skills: sorted(jd_skills.iter()),
        matched_skills: matched,
        missing_skills: missing,
        extra_skills: extra,
        match_score_percent,
        progress_bar: progress_bar(match_score_percent, bar_length),
    }
}

fn sorted<'a, 'b: 'a>(skills: impl Iterator<Item = &'a &'b str>) -> Vec<String> {
    skills.map(|s| s.to_string()).collect()
}

/// Number of filled cells for `percent` on a bar of `length` cells.
pub fn filled_cells(percent: f64, length: usize) -> usize {
    let p = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    ((p / 100.0) * length as f64).round() as usize
}

/// Fixed-width text bar, e.g. `"█████░░░░░ 50.0%"` for 50 on 10 cells.
///
/// The percent keeps at least one decimal place (`50.0`, `66.67`).
pub fn progress_bar(percent: f64, length: usize) -> String {
    let p = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = filled_cells(p, length);
    format!("{}{} {:?}%", "█".repeat(filled), "░".repeat(length - filled), p)
}
