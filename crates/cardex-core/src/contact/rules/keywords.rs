//! Compiled keyword tables.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::KeywordConfig;

lazy_static! {
    static ref DEFAULT_KEYWORDS: KeywordSet =
        KeywordSet::from_config(&KeywordConfig::default()).unwrap();
}

/// Case-insensitive matcher over a keyword list.
///
/// Whole-word matchers need the keyword to stand alone (`rd` does not match
/// inside `Ford`). Substring matchers also find keywords glued to other text
/// by OCR (`ABCINDUSTRIES`).
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Option<Regex>,
}

impl KeywordMatcher {
    /// Compile a whole-word keyword list. Multi-word keywords match across
    /// any run of whitespace. An empty list matches nothing.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        Self::compile(keywords, true)
    }

    /// Compile a keyword list matched anywhere in the text.
    pub fn substring<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        Self::compile(keywords, false)
    }

    fn compile<S: AsRef<str>>(keywords: &[S], whole_word: bool) -> Result<Self, regex::Error> {
        let mut alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }

        // Longest first so "vice president" is reported over "president"
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let pattern = if whole_word {
            format!(r"(?i)(?:^|\W)({})(?:\W|$)", alternatives.join("|"))
        } else {
            format!(r"(?i)({})", alternatives.join("|"))
        };
        Ok(Self {
            regex: Some(Regex::new(&pattern)?),
        })
    }

    /// First keyword found in the text, lowercased.
    pub fn find(&self, text: &str) -> Option<String> {
        let regex = self.regex.as_ref()?;
        regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }
}

/// Keyword matchers for every table in [`KeywordConfig`].
#[derive(Debug, Clone)]
pub struct KeywordSet {
    /// Matched as substrings.
    pub company: KeywordMatcher,
    pub designation: KeywordMatcher,
    pub address: KeywordMatcher,
    pub whatsapp: KeywordMatcher,
}

impl KeywordSet {
    pub fn from_config(config: &KeywordConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            company: KeywordMatcher::substring(&config.company)?,
            designation: KeywordMatcher::new(&config.designation)?,
            address: KeywordMatcher::new(&config.address)?,
            whatsapp: KeywordMatcher::new(&config.whatsapp_markers)?,
        })
    }

    /// Built-in tables, compiled once.
    pub fn defaults() -> Self {
        DEFAULT_KEYWORDS.clone()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_matching() {
        let matcher = KeywordMatcher::new(&["inc", "ltd"]).unwrap();

        assert_eq!(matcher.find("Acme Inc."), Some("inc".to_string()));
        assert_eq!(matcher.find("ABC PVT.LTD"), Some("ltd".to_string()));
        assert!(!matcher.is_match("Principal Consultant"));
        assert!(!matcher.is_match("Ltdx"));
    }

    #[test]
    fn test_substring_matching() {
        let matcher = KeywordMatcher::substring(&["industries", "technologies"]).unwrap();

        assert_eq!(matcher.find("ABCINDUSTRIES"), Some("industries".to_string()));
        assert!(matcher.is_match("Sunrise Infotechnologies"));
        assert!(!matcher.is_match("Industrial Estate"));
    }

    #[test]
    fn test_multi_word_keyword_preferred() {
        let matcher = KeywordMatcher::new(&["president", "vice president"]).unwrap();
        assert_eq!(
            matcher.find("Vice  President, Sales"),
            Some("vice  president".to_string())
        );
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        let matcher = KeywordMatcher::new::<&str>(&[]).unwrap();
        assert!(!matcher.is_match("anything"));
        assert_eq!(matcher.find("anything"), None);
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let matcher = KeywordMatcher::new(&["wa.me"]).unwrap();
        assert!(matcher.is_match("wa.me/919876543210"));
        assert!(!matcher.is_match("waxme"));
    }

    #[test]
    fn test_defaults() {
        let keywords = KeywordSet::defaults();
        assert!(keywords.company.is_match("ABC INDUSTRIES PVT LTD"));
        assert!(keywords.company.is_match("ABCPVTLTD"));
        assert!(!keywords.address.is_match("Ford"));
        assert!(keywords.designation.is_match("Sales Manager"));
        assert!(keywords.address.is_match("12 MG Road, Sector 5, India"));
        assert!(keywords.whatsapp.is_match("WhatsApp: 98765 43210"));
    }
}
