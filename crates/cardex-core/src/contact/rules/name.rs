//! Person name detection.
//!
//! A name line has no digits, no `@`, no web token, at most a few words and
//! none of the company, title, address or WhatsApp keywords. The line right
//! above the selected phone number is preferred, then the first qualifying
//! line. No further ranking is attempted when both fail.

use super::keywords::KeywordSet;
use super::patterns::WEB_TOKEN;
use super::{ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Name field recognizer.
pub struct NameRecognizer<'a> {
    keywords: &'a KeywordSet,
    max_words: usize,
    title_case: bool,
    phone_line: Option<usize>,
}

impl<'a> NameRecognizer<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self {
            keywords,
            max_words: 4,
            title_case: true,
            phone_line: None,
        }
    }

    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_words = words;
        self
    }

    pub fn with_title_case(mut self, enabled: bool) -> Self {
        self.title_case = enabled;
        self
    }

    /// Line index of the selected phone number.
    pub fn with_phone_line(mut self, line_index: Option<usize>) -> Self {
        self.phone_line = line_index;
        self
    }

    fn qualifies(&self, line: &TextLine, claims: &ClaimSet) -> bool {
        let text = line.text.as_str();
        let words = line.word_count();

        !claims.is_claimed(line.index)
            && (1..=self.max_words).contains(&words)
            && text.chars().any(|c| c.is_alphabetic())
            && !line.has_digit()
            && !text.contains('@')
            && !text.ends_with(':')
            && !WEB_TOKEN.is_match(text)
            && !self.keywords.company.is_match(text)
            && !self.keywords.designation.is_match(text)
            && !self.keywords.address.is_match(text)
            && !self.keywords.whatsapp.is_match(text)
    }

    fn candidate(&self, line: &TextLine, signal: Signal) -> FieldCandidate {
        let value = if self.title_case {
            title_case(&line.text)
        } else {
            line.text.clone()
        };
        FieldCandidate::new(FieldKind::Name, line.index, signal, value)
    }
}

impl FieldRecognizer for NameRecognizer<'_> {
    fn kind(&self) -> FieldKind {
        FieldKind::Name
    }

    fn candidates(&self, lines: &[TextLine], claims: &ClaimSet) -> Vec<FieldCandidate> {
        let mut results = Vec::new();

        let adjacent = self
            .phone_line
            .and_then(|phone| lines.iter().position(|l| l.index == phone))
            .and_then(|pos| pos.checked_sub(1))
            .map(|pos| &lines[pos])
            .filter(|line| self.qualifies(line, claims));

        if let Some(line) = adjacent {
            results.push(self.candidate(line, Signal::PhoneAdjacent));
        }

        for line in lines {
            if adjacent.is_some_and(|a| a.index == line.index) {
                continue;
            }
            if self.qualifies(line, claims) {
                results.push(self.candidate(line, Signal::FirstQualifying));
            }
        }

        results
    }
}

/// Title-case words that OCR left entirely upper or lower case.
///
/// Mixed-case words such as `McDonald` are kept as printed.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let has_upper = word.chars().any(|c| c.is_uppercase());
            let has_lower = word.chars().any(|c| c.is_lowercase());
            if has_upper && has_lower {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::numbered;

    fn name(lines: &[&str], phone_line: Option<usize>, claims: &ClaimSet) -> Option<FieldCandidate> {
        let keywords = KeywordSet::defaults();
        NameRecognizer::new(&keywords)
            .with_phone_line(phone_line)
            .best(&numbered(lines.iter().copied()), claims)
    }

    #[test]
    fn test_line_above_phone_preferred() {
        let lines = ["Jane Roe", "Ravi Kumar", "+91 98765 43210"];
        let found = name(&lines, Some(3), &ClaimSet::new()).unwrap();

        assert_eq!(found.value, "Ravi Kumar");
        assert_eq!(found.signal, Signal::PhoneAdjacent);
    }

    #[test]
    fn test_falls_back_to_first_unclaimed() {
        let mut claims = ClaimSet::new();
        claims.claim(2, FieldKind::Company);

        let lines = ["JOHN DOE", "ABC INDUSTRIES PVT LTD", "+91 98765 43210"];
        let found = name(&lines, Some(3), &claims).unwrap();

        assert_eq!(found.value, "John Doe");
        assert_eq!(found.signal, Signal::FirstQualifying);
    }

    #[test]
    fn test_disqualified_lines() {
        let lines = [
            "Flat 12B",
            "john@abc.com",
            "visit www abc",
            "Mobile:",
            "One Two Three Four Five",
            "Senior Engineer",
            "Near City Mall",
        ];
        assert!(name(&lines, None, &ClaimSet::new()).is_none());
    }

    #[test]
    fn test_title_case_disabled() {
        let keywords = KeywordSet::defaults();
        let found = NameRecognizer::new(&keywords)
            .with_title_case(false)
            .best(&numbered(["JOHN DOE"]), &ClaimSet::new())
            .unwrap();
        assert_eq!(found.value, "JOHN DOE");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JOHN DOE"), "John Doe");
        assert_eq!(title_case("jane o'neil"), "Jane O'neil");
        assert_eq!(title_case("Ronald McDonald"), "Ronald McDonald");
        assert_eq!(title_case("A. K. SHARMA"), "A. K. Sharma");
    }
}
