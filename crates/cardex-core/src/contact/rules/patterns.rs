//! Common regex patterns for business card extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Phone: 9-16 digits/spaces/hyphens after an optional '+'
    pub static ref PHONE: Regex = Regex::new(
        r"\+?\d[\d \-]{7,14}\d"
    ).unwrap();

    // Email pattern
    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    // Website: scheme or www. prefix up to whitespace and common OCR separators
    pub static ref WEBSITE: Regex = Regex::new(
        r#"(?i)\b(?:https?://|www\.)[^\s,;()<>"']+"#
    ).unwrap();

    // Any web-ish token, used to disqualify lines from name matching
    pub static ref WEB_TOKEN: Regex = Regex::new(
        r"(?i)\bwww\b|\bhttps?\b"
    ).unwrap();

    pub static ref URL_SCHEME: Regex = Regex::new(
        r"(?i)^https?://"
    ).unwrap();
}

/// Minimum digit count for a phone match.
pub const MIN_PHONE_DIGITS: usize = 9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_lengths() {
        assert!(PHONE.is_match("+91 98765 43210"));
        assert!(PHONE.is_match("022-2345-6789"));
        assert!(!PHONE.is_match("12345"));
        assert_eq!(PHONE.find("Tel: 98765-43210.").unwrap().as_str(), "98765-43210");
    }

    #[test]
    fn test_website_stops_at_separators() {
        let m = WEBSITE.find("(www.abc.com), next").unwrap();
        assert_eq!(m.as_str(), "www.abc.com");
        assert!(WEBSITE.is_match("HTTPS://Example.org/path"));
    }

    #[test]
    fn test_web_token() {
        assert!(WEB_TOKEN.is_match("visit www site"));
        assert!(WEB_TOKEN.is_match("http://x"));
        assert!(!WEB_TOKEN.is_match("Dr. Wwwilliam"));
    }
}
