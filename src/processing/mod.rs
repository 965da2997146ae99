//! Skill extraction and match scoring engine

pub mod normalizer;
pub mod vocabulary;
pub mod exact_matcher;
pub mod fuzzy_matcher;
pub mod extractor;
pub mod scorer;
pub mod profile;
pub mod analyzer;
