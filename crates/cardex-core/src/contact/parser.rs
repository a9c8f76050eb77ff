//! Contact parser running every field recognizer over one card.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::CardexConfig;
use crate::models::contact::{ContactRecord, FieldCandidate, FieldKind, TextLine};
use crate::text::Preprocessor;
use crate::{CardexError, Result};

use super::rules::{
    join_values, AddressRecognizer, ClaimSet, CompanyRecognizer, DesignationRecognizer,
    EmailRecognizer, FieldRecognizer, KeywordSet, NameRecognizer, PhoneRecognizer,
    WebsiteRecognizer, WhatsappRecognizer,
};
use super::ContactExtractor;

/// Result of contact extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted contact fields.
    pub record: ContactRecord,
    /// Cleaned lines the record was built from.
    pub lines: Vec<TextLine>,
    /// Raw text, kept for manual correction.
    pub raw_text: String,
    /// Candidates that made it into the record.
    pub candidates: Vec<FieldCandidate>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Whether OCR produced no usable line.
    pub fn no_text_detected(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Heuristic contact parser.
///
/// Ambiguity is resolved by document order: the first keyword line wins for
/// company and designation, structural fallbacks are only consulted when no
/// keyword line exists, and multi-value fields keep every distinct match.
#[derive(Debug, Clone)]
pub struct ContactParser {
    keywords: KeywordSet,
    preprocessor: Preprocessor,
    /// Report all phone numbers instead of the first one.
    collect_all: bool,
    /// Normalize noisy-case names.
    title_case_names: bool,
    company_uppercase_min_words: usize,
    designation_uppercase_max_words: usize,
    name_max_words: usize,
    list_separator: String,
}

impl ContactParser {
    /// Create a new parser with the built-in keyword tables.
    pub fn new() -> Self {
        Self {
            keywords: KeywordSet::defaults(),
            preprocessor: Preprocessor::new(),
            collect_all: true,
            title_case_names: true,
            company_uppercase_min_words: 2,
            designation_uppercase_max_words: 5,
            name_max_words: 4,
            list_separator: ", ".to_string(),
        }
    }

    /// Create a parser from configuration, compiling its keyword tables.
    pub fn from_config(config: &CardexConfig) -> Result<Self> {
        let keywords = KeywordSet::from_config(&config.keywords)
            .map_err(|e| CardexError::Config(format!("invalid keyword table: {}", e)))?;
        let extraction = &config.extraction;

        Ok(Self {
            keywords,
            preprocessor: Preprocessor::from_config(&config.preprocess),
            collect_all: extraction.collect_all,
            title_case_names: extraction.title_case_names,
            company_uppercase_min_words: extraction.company_uppercase_min_words,
            designation_uppercase_max_words: extraction.designation_uppercase_max_words,
            name_max_words: extraction.name_max_words,
            list_separator: extraction.list_separator.clone(),
        })
    }

    /// Set phone collection policy.
    pub fn with_collect_all(mut self, collect_all: bool) -> Self {
        self.collect_all = collect_all;
        self
    }

    /// Set name title-casing.
    pub fn with_title_case_names(mut self, enabled: bool) -> Self {
        self.title_case_names = enabled;
        self
    }

    /// Replace the keyword tables.
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.keywords = keywords;
        self
    }

    /// Replace the preprocessor used by [`ContactExtractor::extract_from_text`].
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    fn select<R: FieldRecognizer>(
        &self,
        recognizer: &R,
        lines: &[TextLine],
        claims: &mut ClaimSet,
    ) -> Option<FieldCandidate> {
        let found = recognizer.best(lines, claims)?;
        claims.claim(found.line_index, found.kind);
        Some(found)
    }

    fn collect<R: FieldRecognizer>(
        &self,
        recognizer: &R,
        lines: &[TextLine],
        claims: &mut ClaimSet,
    ) -> Vec<FieldCandidate> {
        let found = recognizer.candidates(lines, claims);
        for candidate in &found {
            claims.claim(candidate.line_index, candidate.kind);
        }
        found
    }

    fn parse_lines(&self, lines: &[TextLine]) -> (ContactRecord, Vec<FieldCandidate>) {
        let mut claims = ClaimSet::new();
        let mut record = ContactRecord::default();
        let mut selected = Vec::new();
        let keywords = &self.keywords;

        // Pattern fields first so their lines are out of reach of the
        // keyword and style classifiers.
        let all_phones = self.collect(&PhoneRecognizer::new(), lines, &mut claims);
        let emails = self.collect(&EmailRecognizer::new(), lines, &mut claims);
        let websites = self.collect(&WebsiteRecognizer::new(), lines, &mut claims);

        // WhatsApp sees every number; collect_all only limits the phone field.
        let whatsapp =
            WhatsappRecognizer::new(&keywords.whatsapp, &all_phones).best(lines, &claims);
        let mut phones = all_phones;
        if !self.collect_all {
            phones.truncate(1);
        }

        let company = self.select(
            &CompanyRecognizer::new(keywords)
                .with_min_uppercase_words(self.company_uppercase_min_words),
            lines,
            &mut claims,
        );

        let designation = self.select(
            &DesignationRecognizer::new(keywords)
                .with_max_uppercase_words(self.designation_uppercase_max_words),
            lines,
            &mut claims,
        );

        let name = self.select(
            &NameRecognizer::new(keywords)
                .with_max_words(self.name_max_words)
                .with_title_case(self.title_case_names)
                .with_phone_line(phones.first().map(|p| p.line_index)),
            lines,
            &mut claims,
        );

        let address = AddressRecognizer::new(keywords).candidates(lines, &claims);

        for (kind, found) in [
            (FieldKind::Phone, phones),
            (FieldKind::Email, emails),
            (FieldKind::Website, websites),
            (FieldKind::Address, address),
        ] {
            record.set(kind, join_values(&found, &self.list_separator));
            selected.extend(found);
        }

        for found in [whatsapp, company, designation, name].into_iter().flatten() {
            record.set(found.kind, found.value.clone());
            selected.push(found);
        }

        selected.sort_by_key(|c| (c.line_index, FieldKind::ALL.iter().position(|k| *k == c.kind)));
        (record, selected)
    }
}

impl Default for ContactParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactExtractor for ContactParser {
    fn extract(&self, lines: &[TextLine]) -> ExtractionResult {
        let start = Instant::now();

        info!("Extracting contact fields from {} lines", lines.len());

        let (record, candidates) = self.parse_lines(lines);

        let mut warnings = Vec::new();
        if lines.is_empty() {
            warnings.push("No text detected".to_string());
        } else {
            for kind in record.missing_fields() {
                warnings.push(format!("Could not extract {}", kind));
            }
        }

        debug!(
            "Extracted {} candidates, {} fields missing",
            candidates.len(),
            record.missing_fields().len()
        );

        ExtractionResult {
            record,
            lines: lines.to_vec(),
            raw_text: lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            candidates,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        let lines = self.preprocessor.clean_text(text);
        let mut result = self.extract(&lines);
        result.raw_text = text.to_string();
        result
    }
}
