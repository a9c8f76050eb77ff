//! Normalizes raw OCR output into an ordered sequence of clean lines.

use tracing::debug;

use crate::models::config::PreprocessConfig;
use crate::models::contact::TextLine;
use crate::ocr::OcrOutput;

/// OCR text preprocessor.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// Replace characters outside printable ASCII.
    strip_non_ascii: bool,
    /// Minimum characters for a line to be kept.
    min_line_chars: usize,
}

impl Preprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }

    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            strip_non_ascii: config.strip_non_ascii,
            min_line_chars: config.min_line_chars,
        }
    }

    /// Set non-ASCII stripping.
    pub fn with_strip_non_ascii(mut self, strip: bool) -> Self {
        self.strip_non_ascii = strip;
        self
    }

    /// Set the minimum line length.
    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.min_line_chars = chars;
        self
    }

    /// Clean OCR output into numbered lines.
    ///
    /// Relative order is preserved. Empty or all-noise input yields an empty
    /// sequence.
    pub fn clean(&self, output: &OcrOutput) -> Vec<TextLine> {
        match output {
            OcrOutput::Text(text) => self.clean_lines(text.lines()),
            OcrOutput::Fragments(fragments) => {
                self.clean_lines(fragments.iter().flat_map(|f| f.lines()))
            }
        }
    }

    /// Clean a single multi-line string.
    pub fn clean_text(&self, text: &str) -> Vec<TextLine> {
        self.clean_lines(text.lines())
    }

    fn clean_lines<'a>(&self, raw: impl Iterator<Item = &'a str>) -> Vec<TextLine> {
        let mut lines = Vec::new();
        let mut dropped = 0usize;

        for raw_line in raw {
            let line = self.normalize(raw_line);
            if line.chars().count() < self.min_line_chars {
                if !line.is_empty() {
                    dropped += 1;
                }
                continue;
            }
            lines.push(TextLine::new(lines.len() + 1, line));
        }

        debug!("Preprocessed {} lines ({} dropped as noise)", lines.len(), dropped);
        lines
    }

    fn normalize(&self, line: &str) -> String {
        let filtered: String = if self.strip_non_ascii {
            line.chars()
                .map(|c| if is_printable_ascii(c) { c } else { ' ' })
                .collect()
        } else {
            line.to_string()
        };

        collapse_whitespace(&filtered)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Trim and collapse internal whitespace runs to one space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_clean_blob() {
        let output = OcrOutput::Text("  JOHN   DOE \n\n ab\nSales\tManager\n|\n".to_string());
        let lines = Preprocessor::new().clean(&output);

        assert_eq!(texts(&lines), vec!["JOHN DOE", "Sales Manager"]);
        assert_eq!(lines[0].index, 1);
        assert_eq!(lines[1].index, 2);
    }

    #[test]
    fn test_clean_fragments_preserves_order() {
        let output = OcrOutput::Fragments(vec![
            "ACME PVT LTD".to_string(),
            "x".to_string(),
            "Plot 4\nSector 5".to_string(),
        ]);
        let lines = Preprocessor::new().clean(&output);

        assert_eq!(texts(&lines), vec!["ACME PVT LTD", "Plot 4", "Sector 5"]);
        assert_eq!(lines.last().unwrap().index, 3);
    }

    #[test]
    fn test_strip_non_ascii() {
        let lines = Preprocessor::new().clean_text("Café ☎ Road\n€€");
        assert_eq!(texts(&lines), vec!["Caf Road"]);

        let kept = Preprocessor::new()
            .with_strip_non_ascii(false)
            .clean_text("Café ☎ Road");
        assert_eq!(texts(&kept), vec!["Café ☎ Road"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Preprocessor::new().clean_text("").is_empty());
        assert!(Preprocessor::new().clean_text(" \n -- \n..").is_empty());
        assert!(Preprocessor::new().clean(&OcrOutput::Fragments(Vec::new())).is_empty());
    }
}
