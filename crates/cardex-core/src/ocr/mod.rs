//! OCR collaborators: capture loading and text recognition engines.

mod capture;
#[cfg(feature = "native")]
mod pure_engine;
mod rotation;

pub use capture::{RawCapture, SourceKind};
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use rotation::RotatingEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Text returned by an OCR engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum OcrOutput {
    /// One text blob, lines separated by newlines.
    Text(String),
    /// Recognized fragments in reading order.
    Fragments(Vec<String>),
}

impl OcrOutput {
    /// Text with fragments joined by newlines.
    pub fn raw_text(&self) -> String {
        match self {
            OcrOutput::Text(text) => text.clone(),
            OcrOutput::Fragments(fragments) => fragments.join("\n"),
        }
    }

    /// Number of non-whitespace characters recognized.
    pub fn text_len(&self) -> usize {
        let count = |s: &str| s.chars().filter(|c| !c.is_whitespace()).count();
        match self {
            OcrOutput::Text(text) => count(text),
            OcrOutput::Fragments(fragments) => fragments.iter().map(|f| count(f)).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text_len() == 0
    }
}

/// Trait for OCR engines.
///
/// Engines are constructed once and passed to the pipeline; recognition
/// is a blocking call.
pub trait OcrEngine {
    /// Recognize text in an upright image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        (**self).recognize(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        (**self).recognize(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text() {
        let fragments = OcrOutput::Fragments(vec!["ACME".into(), "Pvt Ltd".into()]);
        assert_eq!(fragments.raw_text(), "ACME\nPvt Ltd");
        assert_eq!(fragments.text_len(), 10);

        assert!(OcrOutput::Text(" \n ".into()).is_empty());
        assert!(OcrOutput::Fragments(Vec::new()).is_empty());
    }
}
