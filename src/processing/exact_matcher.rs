//! Exact whole-word / whole-phrase skill matching

use crate::error::{Result, SkillMatchError};
use crate::processing::vocabulary::SkillVocabulary;
use regex::Regex;

/// One exact occurrence of a skill variant in normalized text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactHit {
    pub skill_index: usize,
    pub phrase: String,
}

/// Per-skill compiled alternation patterns, in vocabulary order.
pub struct ExactMatcher {
    patterns: Vec<Regex>,
}

impl ExactMatcher {
    pub fn new(vocabulary: &SkillVocabulary) -> Result<Self> {
        let patterns = vocabulary
            .entries()
            .iter()
            .map(|entry| {
                // Variants arrive sorted longest first; the regex alternation is
                // leftmost-first, so the longest variant wins at a given position.
                let alternation = entry
                    .variants()
                    .iter()
                    .map(|v| bounded_variant(v))
                    .collect::<Vec<_>>()
                    .join("|");

                Regex::new(&alternation).map_err(|e| {
                    SkillMatchError::InvalidConfiguration(format!(
                        "Failed to compile matcher for skill '{}': {}",
                        entry.name(),
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Find all non-overlapping matches of every skill in `normalized` text.
    pub fn find_matches(&self, normalized: &str) -> Vec<ExactHit> {
        let mut hits = Vec::new();

        for (skill_index, pattern) in self.patterns.iter().enumerate() {
            for mat in pattern.find_iter(normalized) {
                hits.push(ExactHit {
                    skill_index,
                    phrase: mat.as_str().trim().to_string(),
                });
            }
        }

        hits
    }

    pub fn skill_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Wrap an escaped variant in token-boundary assertions.
///
/// `\b` only holds next to a word char, so a variant edge made of `+` or `#`
/// uses `\B` instead: the neighbouring char must then be a non-word char too.
fn bounded_variant(variant: &str) -> String {
    let edge = |c: Option<char>| match c {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"\B",
    };

    format!(
        "{}{}{}",
        edge(variant.chars().next()),
        regex::escape(variant),
        edge(variant.chars().last())
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::normalizer::normalize;
    use crate::processing::vocabulary::SkillDefinition;

    fn matcher_for(definitions: Vec<SkillDefinition>) -> ExactMatcher {
        ExactMatcher::new(&SkillVocabulary::new(definitions).unwrap()).unwrap()
    }

    #[test]
    fn test_whole_word_only() {
        let matcher = matcher_for(vec![SkillDefinition::new("Python", &["python3", "py"])]);

        assert!(matcher.find_matches(&normalize("a true pythonista")).is_empty());

        let hits = matcher.find_matches(&normalize("uses python3 daily"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].phrase, "python3");
    }

    #[test]
    fn test_longest_variant_wins() {
        let matcher = matcher_for(vec![SkillDefinition::new(
            "SQL",
            &["structured query language", "sql"],
        )]);

        let hits = matcher.find_matches(&normalize("expert in structured query language"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].phrase, "structured query language");
    }

    #[test]
    fn test_symbol_edges() {
        let matcher = matcher_for(vec![
            SkillDefinition::new("C++", &["cpp"]),
            SkillDefinition::new("C#", &["csharp"]),
        ]);

        let hits = matcher.find_matches(&normalize("C++, C# and c++ again"));
        let cpp = hits.iter().filter(|h| h.skill_index == 0).count();
        let csharp = hits.iter().filter(|h| h.skill_index == 1).count();
        assert_eq!(cpp, 2);
        assert_eq!(csharp, 1);

        assert!(matcher.find_matches("c#x").is_empty());
    }

    #[test]
    fn test_counts_every_occurrence() {
        let matcher = matcher_for(vec![SkillDefinition::new("Excel", &["ms excel"])]);
        let hits = matcher.find_matches(&normalize("MS Excel, excel, EXCEL."));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].phrase, "ms excel");
        assert_eq!(hits[1].phrase, "excel");
        assert_eq!(matcher.skill_count(), 1);
    }
}
