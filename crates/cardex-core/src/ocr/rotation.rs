//! Multi-angle OCR: try each right-angle rotation and keep the richest text.

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::OcrError;

use super::{OcrEngine, OcrOutput};

/// Engine wrapper that runs the inner engine at 0, 90, 180 and 270 degrees.
///
/// The output with the most recognized characters wins; ties keep the
/// earlier angle. Attempts run one after another.
pub struct RotatingEngine<E> {
    inner: E,
}

impl<E: OcrEngine> RotatingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

fn rotated(image: &DynamicImage, angle: u16) -> DynamicImage {
    match angle {
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => image.clone(),
    }
}

impl<E: OcrEngine> OcrEngine for RotatingEngine<E> {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        let mut best: Option<(u16, OcrOutput)> = None;
        let mut last_error = None;

        for angle in [0u16, 90, 180, 270] {
            match self.inner.recognize(&rotated(image, angle)) {
                Ok(output) => {
                    let len = output.text_len();
                    debug!("OCR at {} degrees recognized {} characters", angle, len);
                    if best.as_ref().is_none_or(|(_, b)| len > b.text_len()) {
                        best = Some((angle, output));
                    }
                }
                Err(e) => {
                    warn!("OCR at {} degrees failed: {}", angle, e);
                    last_error = Some(e);
                }
            }
        }

        match (best, last_error) {
            (Some((angle, output)), _) => {
                debug!("Keeping OCR output from {} degrees", angle);
                Ok(output)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Ok(OcrOutput::Fragments(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    /// Reads text only when the image is wider than tall.
    struct LandscapeOnly;

    impl OcrEngine for LandscapeOnly {
        fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
            let (w, h) = image.dimensions();
            if w > h {
                Ok(OcrOutput::Text("ACME PVT LTD".to_string()))
            } else {
                Ok(OcrOutput::Text("l1".to_string()))
            }
        }
    }

    struct Broken;

    impl OcrEngine for Broken {
        fn recognize(&self, _image: &DynamicImage) -> Result<OcrOutput, OcrError> {
            Err(OcrError::Recognition("model crashed".to_string()))
        }
    }

    #[test]
    fn test_keeps_longest_output() {
        let portrait = DynamicImage::ImageRgb8(RgbImage::new(10, 30));
        let output = RotatingEngine::new(LandscapeOnly).recognize(&portrait).unwrap();
        assert_eq!(output, OcrOutput::Text("ACME PVT LTD".to_string()));
    }

    #[test]
    fn test_all_failures_propagate() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        assert!(RotatingEngine::new(Broken).recognize(&image).is_err());
    }
}
