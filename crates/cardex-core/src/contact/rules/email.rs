//! Email address extraction.

use super::patterns::EMAIL;
use super::{dedup_by_key, ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Email field recognizer. Collects every distinct mailbox in line order.
pub struct EmailRecognizer;

impl EmailRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmailRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRecognizer for EmailRecognizer {
    fn kind(&self) -> FieldKind {
        FieldKind::Email
    }

    fn candidates(&self, lines: &[TextLine], _claims: &ClaimSet) -> Vec<FieldCandidate> {
        let results = lines
            .iter()
            .flat_map(|line| {
                EMAIL.find_iter(&line.text).map(move |m| {
                    FieldCandidate::new(FieldKind::Email, line.index, Signal::Pattern, m.as_str())
                })
            })
            .collect();

        dedup_by_key(results, |v| v.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::numbered;

    #[test]
    fn test_extract_emails() {
        let lines = numbered([
            "E: john@abc.com | sales@abc.co.in",
            "JOHN@ABC.COM",
            "not-an-email@host",
        ]);
        let found: Vec<String> = EmailRecognizer::new()
            .candidates(&lines, &ClaimSet::new())
            .into_iter()
            .map(|c| c.value)
            .collect();

        assert_eq!(found, vec!["john@abc.com", "sales@abc.co.in"]);
    }

    #[test]
    fn test_no_email() {
        let lines = numbered(["www.abc.com", "@handle"]);
        assert!(EmailRecognizer::new().best(&lines, &ClaimSet::new()).is_none());
    }
}
