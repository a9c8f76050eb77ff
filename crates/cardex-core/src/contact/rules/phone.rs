//! Phone number extraction.

use super::patterns::{MIN_PHONE_DIGITS, PHONE};
use super::{dedup_by_key, ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Phone field recognizer.
pub struct PhoneRecognizer;

impl PhoneRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhoneRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRecognizer for PhoneRecognizer {
    fn kind(&self) -> FieldKind {
        FieldKind::Phone
    }

    fn candidates(&self, lines: &[TextLine], _claims: &ClaimSet) -> Vec<FieldCandidate> {
        let mut results = Vec::new();

        for line in lines {
            for m in PHONE.find_iter(&line.text) {
                let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
                if digits < MIN_PHONE_DIGITS {
                    continue;
                }
                results.push(FieldCandidate::new(
                    FieldKind::Phone,
                    line.index,
                    Signal::Pattern,
                    m.as_str().trim(),
                ));
            }
        }

        dedup_by_key(results, normalize_phone)
    }
}

/// Digits-only form used to detect repeated numbers.
///
/// Numbers longer than ten digits are keyed on their last ten so a number
/// printed with and without a country code counts once.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::numbered;

    fn phones(lines: &[&str]) -> Vec<String> {
        PhoneRecognizer::new()
            .candidates(&numbered(lines.iter().copied()), &ClaimSet::new())
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn test_extract_phone() {
        assert_eq!(phones(&["Mob: +91 98765 43210"]), vec!["+91 98765 43210"]);
        assert_eq!(phones(&["Tel 022-2345-6789 / 98200 12345"]).len(), 2);
    }

    #[test]
    fn test_requires_nine_digits() {
        assert!(phones(&["Plot 12 34 56", "Pin 411 001"]).is_empty());
        assert!(phones(&["1-2-3-4-5-6-7-8"]).is_empty());
    }

    #[test]
    fn test_duplicate_numbers_collapse() {
        let found = phones(&["98765 43210", "Call: 987 654 3210", "+91-98765-43210"]);
        assert_eq!(found, vec!["98765 43210"]);
    }

    #[test]
    fn test_candidate_line_index() {
        let lines = numbered(["ACME", "Ph 98765 43210"]);
        let best = PhoneRecognizer::new().best(&lines, &ClaimSet::new()).unwrap();
        assert_eq!(best.line_index, 2);
        assert_eq!(best.signal, Signal::Pattern);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+91 98765-43210"), "9876543210");
        assert_eq!(normalize_phone("022 2345 678"), "0222345678");
    }
}
