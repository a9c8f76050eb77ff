//! WhatsApp number selection.
//!
//! Cards rarely label WhatsApp numbers, so the field falls back to the first
//! phone number. When a marker token is present, the phone number on the
//! nearest line wins.

use super::keywords::KeywordMatcher;
use super::{ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// WhatsApp field recognizer over already-extracted phone candidates.
pub struct WhatsappRecognizer<'a> {
    markers: &'a KeywordMatcher,
    phones: &'a [FieldCandidate],
}

impl<'a> WhatsappRecognizer<'a> {
    pub fn new(markers: &'a KeywordMatcher, phones: &'a [FieldCandidate]) -> Self {
        Self { markers, phones }
    }

    fn nearest_to_marker(&self, lines: &[TextLine]) -> Option<FieldCandidate> {
        let mut best: Option<(usize, &FieldCandidate, String)> = None;

        for line in lines {
            let Some(marker) = self.markers.find(&line.text) else {
                continue;
            };
            for phone in self.phones {
                let distance = phone.line_index.abs_diff(line.index);
                if best.as_ref().is_none_or(|(d, _, _)| distance < *d) {
                    best = Some((distance, phone, marker.clone()));
                }
            }
        }

        best.map(|(_, phone, marker)| {
            FieldCandidate::new(
                FieldKind::Whatsapp,
                phone.line_index,
                Signal::Marker(marker),
                phone.value.clone(),
            )
        })
    }
}

impl FieldRecognizer for WhatsappRecognizer<'_> {
    fn kind(&self) -> FieldKind {
        FieldKind::Whatsapp
    }

    fn candidates(&self, lines: &[TextLine], _claims: &ClaimSet) -> Vec<FieldCandidate> {
        let mut results = Vec::new();

        if let Some(marked) = self.nearest_to_marker(lines) {
            results.push(marked);
        }

        if let Some(first) = self.phones.first() {
            if results.first().is_none_or(|c| c.value != first.value) {
                results.push(FieldCandidate::new(
                    FieldKind::Whatsapp,
                    first.line_index,
                    Signal::PhoneFallback,
                    first.value.clone(),
                ));
            }
        }

        results
    }
}
