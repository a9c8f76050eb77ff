//! Contact field extraction module.

mod parser;
pub mod rules;

pub use parser::{ContactParser, ExtractionResult};

use crate::models::contact::TextLine;

/// Trait for contact field extractors.
///
/// Extraction never fails: missing fields come back as empty strings.
pub trait ContactExtractor {
    /// Extract contact fields from cleaned lines.
    fn extract(&self, lines: &[TextLine]) -> ExtractionResult;

    /// Clean raw OCR text and extract contact fields from it.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
