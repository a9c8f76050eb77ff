//! Rule-based recognizers for business card fields.
//!
//! Recognizers return candidates in priority order; the parser selects the
//! first one for single-value fields and keeps all of them for multi-value
//! fields. A shared [`ClaimSet`] keeps single-value roles from landing on the
//! same line.

pub mod address;
pub mod company;
pub mod designation;
pub mod email;
pub mod keywords;
pub mod name;
pub mod patterns;
pub mod phone;
pub mod website;
pub mod whatsapp;

pub use address::AddressRecognizer;
pub use company::CompanyRecognizer;
pub use designation::DesignationRecognizer;
pub use email::EmailRecognizer;
pub use keywords::{KeywordMatcher, KeywordSet};
pub use name::{title_case, NameRecognizer};
pub use phone::{normalize_phone, PhoneRecognizer};
pub use website::{normalize_url, WebsiteRecognizer};
pub use whatsapp::WhatsappRecognizer;

use std::collections::{HashMap, HashSet};

use crate::models::contact::{FieldCandidate, FieldKind, TextLine};

/// Trait for field recognizers.
pub trait FieldRecognizer {
    /// The field this recognizer produces.
    fn kind(&self) -> FieldKind;

    /// All candidates, best first.
    fn candidates(&self, lines: &[TextLine], claims: &ClaimSet) -> Vec<FieldCandidate>;

    /// The winning candidate, if any.
    fn best(&self, lines: &[TextLine], claims: &ClaimSet) -> Option<FieldCandidate> {
        self.candidates(lines, claims).into_iter().next()
    }
}

/// Lines already assigned to a field.
///
/// Claims are advisory: the first claim on a line sticks, and recognizers
/// decide for themselves which claims they respect.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    claims: HashMap<usize, FieldKind>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a line for a field. Returns false if it was already claimed.
    pub fn claim(&mut self, line_index: usize, kind: FieldKind) -> bool {
        if self.claims.contains_key(&line_index) {
            return false;
        }
        self.claims.insert(line_index, kind);
        true
    }

    pub fn is_claimed(&self, line_index: usize) -> bool {
        self.claims.contains_key(&line_index)
    }

    pub fn claimed_by(&self, line_index: usize) -> Option<FieldKind> {
        self.claims.get(&line_index).copied()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Drop candidates whose key repeats an earlier one, keeping document order.
pub(crate) fn dedup_by_key<F>(candidates: Vec<FieldCandidate>, key: F) -> Vec<FieldCandidate>
where
    F: Fn(&str) -> String,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(key(&c.value)))
        .collect()
}

/// Join candidate values with a separator.
pub fn join_values(candidates: &[FieldCandidate], separator: &str) -> String {
    candidates
        .iter()
        .map(|c| c.value.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::Signal;

    #[test]
    fn test_first_claim_sticks() {
        let mut claims = ClaimSet::new();
        assert!(claims.claim(2, FieldKind::Company));
        assert!(!claims.claim(2, FieldKind::Name));
        assert_eq!(claims.claimed_by(2), Some(FieldKind::Company));
        assert!(!claims.is_claimed(3));
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let candidates = vec![
            FieldCandidate::new(FieldKind::Email, 1, Signal::Pattern, "A@x.com"),
            FieldCandidate::new(FieldKind::Email, 3, Signal::Pattern, "b@x.com"),
            FieldCandidate::new(FieldKind::Email, 4, Signal::Pattern, "a@X.com"),
        ];
        let unique = dedup_by_key(candidates, |v| v.to_lowercase());

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].line_index, 1);
        assert_eq!(join_values(&unique, ", "), "A@x.com, b@x.com");
    }
}
