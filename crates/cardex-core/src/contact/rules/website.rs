//! Website extraction.

use super::patterns::{URL_SCHEME, WEBSITE};
use super::{dedup_by_key, ClaimSet, FieldRecognizer};
use crate::models::contact::{FieldCandidate, FieldKind, Signal, TextLine};

/// Characters OCR tends to leave glued to the end of a URL.
const TRAILING_NOISE: &[char] = &['.', ',', ';', ':', ')', '(', ']', '['];

/// Website field recognizer.
pub struct WebsiteRecognizer;

impl WebsiteRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebsiteRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRecognizer for WebsiteRecognizer {
    fn kind(&self) -> FieldKind {
        FieldKind::Website
    }

    fn candidates(&self, lines: &[TextLine], _claims: &ClaimSet) -> Vec<FieldCandidate> {
        let mut results = Vec::new();

        for line in lines {
            for m in WEBSITE.find_iter(&line.text) {
                // Domain part of an email address, not a website
                if line.text[..m.start()].ends_with('@') {
                    continue;
                }
                let url = normalize_url(m.as_str());
                if url.is_empty() {
                    continue;
                }
                results.push(FieldCandidate::new(
                    FieldKind::Website,
                    line.index,
                    Signal::Pattern,
                    url,
                ));
            }
        }

        dedup_by_key(results, |v| v.to_lowercase())
    }
}

/// Strip trailing OCR punctuation and add `https://` when no scheme is present.
///
/// Returns an empty string when nothing but a bare prefix remains.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(TRAILING_NOISE);
    let lower = trimmed.to_lowercase();
    if lower == "www" || lower == "www." || lower.ends_with("://") {
        return String::new();
    }

    if URL_SCHEME.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::numbered;

    fn sites(lines: &[&str]) -> Vec<String> {
        WebsiteRecognizer::new()
            .candidates(&numbered(lines.iter().copied()), &ClaimSet::new())
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn test_prefix_scheme() {
        assert_eq!(sites(&["www.abc.com"]), vec!["https://www.abc.com"]);
        assert_eq!(sites(&["http://abc.com/team"]), vec!["http://abc.com/team"]);
    }

    #[test]
    fn test_strip_trailing_noise() {
        assert_eq!(sites(&["Web: www.abc.com., (www.xyz.in)"]), vec![
            "https://www.abc.com",
            "https://www.xyz.in"
        ]);
    }

    #[test]
    fn test_dedup_and_skip_email_domain() {
        assert_eq!(
            sites(&["WWW.ABC.COM", "www.abc.com", "info@www.abc.com"]),
            vec!["https://WWW.ABC.COM"]
        );
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("www.a.io,"), "https://www.a.io");
        assert_eq!(normalize_url("HTTPS://A.IO)"), "HTTPS://A.IO");
        assert_eq!(normalize_url("https://"), "");
    }
}
