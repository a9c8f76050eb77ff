//! Company name detection.
//!
//! A line carrying a legal-entity or industry keyword wins. Failing that,
//! an all-caps line of several words is taken, since cards usually print the
//! company name in capitals. The first line is never assumed to be the
//! company.

use super::keywords::KeywordSet;
use super::{ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Company field recognizer.
pub struct CompanyRecognizer<'a> {
    keywords: &'a KeywordSet,
    min_uppercase_words: usize,
}

impl<'a> CompanyRecognizer<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self {
            keywords,
            min_uppercase_words: 2,
        }
    }

    /// Minimum words for the all-caps fallback.
    pub fn with_min_uppercase_words(mut self, words: usize) -> Self {
        self.min_uppercase_words = words;
        self
    }

    fn is_uppercase_company(&self, line: &TextLine) -> bool {
        line.is_uppercase()
            && line.word_count() >= self.min_uppercase_words
            && !self.keywords.designation.is_match(&line.text)
            && !self.keywords.address.is_match(&line.text)
    }
}

impl FieldRecognizer for CompanyRecognizer<'_> {
    fn kind(&self) -> FieldKind {
        FieldKind::Company
    }

    fn candidates(&self, lines: &[TextLine], claims: &ClaimSet) -> Vec<FieldCandidate> {
        let open: Vec<&TextLine> = lines.iter().filter(|l| !claims.is_claimed(l.index)).collect();

        let by_keyword = open.iter().filter_map(|line| {
            self.keywords.company.find(&line.text).map(|keyword| {
                FieldCandidate::new(
                    FieldKind::Company,
                    line.index,
                    Signal::Keyword(keyword),
                    line.text.clone(),
                )
            })
        });

        let by_style = open
            .iter()
            .filter(|line| !self.keywords.company.is_match(&line.text))
            .filter(|line| self.is_uppercase_company(line))
            .map(|line| {
                FieldCandidate::new(FieldKind::Company, line.index, Signal::Uppercase, line.text.clone())
            });

        by_keyword.chain(by_style).collect()
    }
}
