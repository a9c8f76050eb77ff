//! Address accumulation.

use super::keywords::KeywordSet;
use super::{ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Address field recognizer.
///
/// Trailing separators are trimmed from each fragment. Every line with a locality or structural keyword contributes, in line
/// order, without deduplication. Lines holding a company, name, designation,
/// email or website are skipped; phone lines may still contribute.
pub struct AddressRecognizer<'a> {
    keywords: &'a KeywordSet,
}

impl<'a> AddressRecognizer<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self { keywords }
    }
}

fn blocks_address(kind: FieldKind) -> bool {
    !matches!(kind, FieldKind::Phone | FieldKind::Whatsapp | FieldKind::Address)
}

impl FieldRecognizer for AddressRecognizer<'_> {
    fn kind(&self) -> FieldKind {
        FieldKind::Address
    }

    fn candidates(&self, lines: &[TextLine], claims: &ClaimSet) -> Vec<FieldCandidate> {
        lines
            .iter()
            .filter(|l| !claims.claimed_by(l.index).is_some_and(blocks_address))
            .filter_map(|line| {
                self.keywords.address.find(&line.text).map(|keyword| {
                    FieldCandidate::new(
                        FieldKind::Address,
                        line.index,
                        Signal::Keyword(keyword),
                        line.text.trim_end_matches([',', ';', ' ']),
                    )
                })
            })
            .collect()
    }
}
