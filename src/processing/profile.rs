//! Lightweight contact and seniority hints pulled from raw resume text

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub email: Option<String>,
    pub experience_years: u32,
}

impl CandidateProfile {
    pub fn from_text(text: &str) -> Self {
        Self {
            email: find_email(text),
            experience_years: find_experience_years(text),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9+._%-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid email regex")
    })
}

fn experience_regex() -> &'static Regex {
    static EXPERIENCE: OnceLock<Regex> = OnceLock::new();
    EXPERIENCE.get_or_init(|| {
        Regex::new(r"(\d+)\+?\s*(years|year|yrs)").expect("Invalid experience regex")
    })
}

/// First email address in the text, if any.
pub fn find_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}

/// Years from the first "N years" / "N+ yrs" mention, or 0.
pub fn find_experience_years(text: &str) -> u32 {
    experience_regex()
        .captures(&text.to_lowercase())
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
