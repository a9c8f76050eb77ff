//! Contact data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cleaned OCR line with its 1-based position in the card text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    /// 1-based position in the cleaned sequence.
    pub index: usize,

    /// Cleaned text.
    pub text: String,
}

impl TextLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the line contains any ASCII digit.
    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }

    /// Whether the line has letters and none of them are lowercase.
    pub fn is_uppercase(&self) -> bool {
        self.text.chars().any(|c| c.is_alphabetic())
            && !self.text.chars().any(|c| c.is_lowercase())
    }
}

/// Build numbered lines from plain strings, in order.
pub fn numbered<I, S>(lines: I) -> Vec<TextLine>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, s)| TextLine::new(i + 1, s))
        .collect()
}

/// The contact fields a card is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Company,
    Name,
    Phone,
    Whatsapp,
    Email,
    Website,
    Designation,
    Address,
}

impl FieldKind {
    /// All fields, in record key order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Company,
        FieldKind::Name,
        FieldKind::Phone,
        FieldKind::Whatsapp,
        FieldKind::Email,
        FieldKind::Website,
        FieldKind::Designation,
        FieldKind::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Company => "company",
            FieldKind::Name => "name",
            FieldKind::Phone => "phone",
            FieldKind::Whatsapp => "whatsapp",
            FieldKind::Email => "email",
            FieldKind::Website => "website",
            FieldKind::Designation => "designation",
            FieldKind::Address => "address",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What made a recognizer propose a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum Signal {
    /// A field-shaped pattern (phone, email, URL) matched.
    Pattern,
    /// A keyword from the configured table matched.
    Keyword(String),
    /// Structural fallback: the line is rendered in capitals.
    Uppercase,
    /// The line sits directly above the selected phone number.
    PhoneAdjacent,
    /// First line satisfying the structural rules.
    FirstQualifying,
    /// Phone number nearest a WhatsApp marker.
    Marker(String),
    /// No distinguishing signal; copied from the first phone number.
    PhoneFallback,
}

impl Signal {
    /// Heuristic confidence (0.0 - 1.0) attached to the signal.
    pub fn confidence(&self) -> f32 {
        match self {
            Signal::Pattern => 0.95,
            Signal::Keyword(_) | Signal::Marker(_) => 0.85,
            Signal::PhoneAdjacent => 0.75,
            Signal::Uppercase => 0.6,
            Signal::PhoneFallback => 0.5,
            Signal::FirstQualifying => 0.5,
        }
    }
}

/// A proposed value for one field, tied to the line it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCandidate {
    /// Field this candidate is for.
    pub kind: FieldKind,

    /// Index of the source line.
    pub line_index: usize,

    /// Why the recognizer proposed it.
    pub signal: Signal,

    /// Extracted value.
    pub value: String,
}

impl FieldCandidate {
    pub fn new(kind: FieldKind, line_index: usize, signal: Signal, value: impl Into<String>) -> Self {
        Self {
            kind,
            line_index,
            signal,
            value: value.into(),
        }
    }

    pub fn confidence(&self) -> f32 {
        self.signal.confidence()
    }
}

/// Structured contact data parsed from one card.
///
/// Every field is always present; an empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub company: String,
    pub name: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub website: String,
    pub designation: String,
    pub address: String,
}

impl ContactRecord {
    /// Value of a single field.
    pub fn get(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Company => &self.company,
            FieldKind::Name => &self.name,
            FieldKind::Phone => &self.phone,
            FieldKind::Whatsapp => &self.whatsapp,
            FieldKind::Email => &self.email,
            FieldKind::Website => &self.website,
            FieldKind::Designation => &self.designation,
            FieldKind::Address => &self.address,
        }
    }

    pub(crate) fn set(&mut self, kind: FieldKind, value: String) {
        let slot = match kind {
            FieldKind::Company => &mut self.company,
            FieldKind::Name => &mut self.name,
            FieldKind::Phone => &mut self.phone,
            FieldKind::Whatsapp => &mut self.whatsapp,
            FieldKind::Email => &mut self.email,
            FieldKind::Website => &mut self.website,
            FieldKind::Designation => &mut self.designation,
            FieldKind::Address => &mut self.address,
        };
        *slot = value;
    }

    /// All fields with their values, in key order.
    pub fn fields(&self) -> [(FieldKind, &str); 8] {
        FieldKind::ALL.map(|kind| (kind, self.get(kind)))
    }

    /// Fields that were not found.
    pub fn missing_fields(&self) -> Vec<FieldKind> {
        self.fields()
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    /// Check if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_always_has_eight_keys() {
        let record = ContactRecord::default();
        let json = serde_json::to_value(&record).unwrap();
        let map = json.as_object().unwrap();

        assert_eq!(map.len(), 8);
        for kind in FieldKind::ALL {
            assert_eq!(map[kind.as_str()], "");
        }
        assert!(record.is_empty());
        assert_eq!(record.missing_fields().len(), 8);
    }

    #[test]
    fn test_set_and_get() {
        let mut record = ContactRecord::default();
        record.set(FieldKind::Email, "a@b.co".to_string());

        assert_eq!(record.get(FieldKind::Email), "a@b.co");
        assert!(!record.missing_fields().contains(&FieldKind::Email));
    }

    #[test]
    fn test_line_shape_helpers() {
        let line = TextLine::new(1, "ACME TOOLS 24x7");
        assert_eq!(line.word_count(), 3);
        assert!(line.has_digit());
        assert!(!line.is_uppercase());

        assert!(TextLine::new(2, "ACME TOOLS").is_uppercase());
        assert!(!TextLine::new(3, "+91 12345").is_uppercase());
    }
}
