//! Designation (job title) detection.

use super::keywords::KeywordSet;
use super::{ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Designation field recognizer.
///
/// Title keywords win. Otherwise the first short all-caps line without a
/// company keyword is accepted.
pub struct DesignationRecognizer<'a> {
    keywords: &'a KeywordSet,
    max_uppercase_words: usize,
}

impl<'a> DesignationRecognizer<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self {
            keywords,
            max_uppercase_words: 5,
        }
    }

    /// Maximum words for the all-caps fallback.
    pub fn with_max_uppercase_words(mut self, words: usize) -> Self {
        self.max_uppercase_words = words;
        self
    }

    fn is_uppercase_title(&self, line: &TextLine) -> bool {
        let words = line.word_count();
        line.is_uppercase()
            && (1..=self.max_uppercase_words).contains(&words)
            && !line.has_digit()
            && !self.keywords.company.is_match(&line.text)
            && !self.keywords.address.is_match(&line.text)
    }
}

impl FieldRecognizer for DesignationRecognizer<'_> {
    fn kind(&self) -> FieldKind {
        FieldKind::Designation
    }

    fn candidates(&self, lines: &[TextLine], claims: &ClaimSet) -> Vec<FieldCandidate> {
        let mut results: Vec<FieldCandidate> = lines
            .iter()
            .filter(|l| !claims.is_claimed(l.index))
            .filter_map(|line| {
                self.keywords.designation.find(&line.text).map(|keyword| {
                    FieldCandidate::new(
                        FieldKind::Designation,
                        line.index,
                        Signal::Keyword(keyword),
                        line.text.clone(),
                    )
                })
            })
            .collect();

        // Only one fallback line is ever offered
        let fallback = lines
            .iter()
            .filter(|l| !claims.is_claimed(l.index))
            .filter(|l| !self.keywords.designation.is_match(&l.text))
            .find(|l| self.is_uppercase_title(l));

        if let Some(line) = fallback {
            results.push(FieldCandidate::new(
                FieldKind::Designation,
                line.index,
                Signal::Uppercase,
                line.text.clone(),
            ));
        }

        results
    }
}
