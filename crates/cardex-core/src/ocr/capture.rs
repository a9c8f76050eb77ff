//! Card image capture loading.

use std::path::Path;

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageDecoder, ImageReader, metadata::Orientation};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

use crate::error::{CardexError, Result};

/// How the card image was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// An uploaded image file.
    Upload,
    /// A camera capture.
    Camera,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Upload => "upload",
            SourceKind::Camera => "camera",
        }
    }
}

/// A decoded, upright card image together with its original bytes.
#[derive(Debug, Clone)]
pub struct RawCapture {
    /// Decoded image with EXIF orientation applied.
    pub image: DynamicImage,
    /// Orientation read from the file.
    pub orientation: Orientation,
    /// Upload or camera.
    pub source_kind: SourceKind,
    /// Original file name, if the capture had one.
    pub file_name: Option<String>,
    /// Original encoded bytes, for archiving.
    pub bytes: Vec<u8>,
    /// When the capture was taken.
    pub captured_at: DateTime<Local>,
}

impl RawCapture {
    /// Decode an image from memory and rotate it upright.
    pub fn from_bytes(
        bytes: Vec<u8>,
        source_kind: SourceKind,
        file_name: Option<String>,
    ) -> Result<Self> {
        let mut decoder = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()?
            .into_decoder()?;
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);

        debug!(
            "Decoded {}x{} capture ({:?})",
            image.width(),
            image.height(),
            orientation
        );

        Ok(Self {
            image,
            orientation,
            source_kind,
            file_name,
            bytes,
            captured_at: Local::now(),
        })
    }

    /// Load an uploaded image file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Self::from_bytes(bytes, SourceKind::Upload, file_name)
    }

    /// Wrap an already decoded image, e.g. a camera frame.
    pub fn from_image(image: DynamicImage, source_kind: SourceKind) -> Result<Self> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(CardexError::Image)?;
        Ok(Self {
            image,
            orientation: Orientation::NoTransforms,
            source_kind,
            file_name: None,
            bytes,
            captured_at: Local::now(),
        })
    }

    /// File name to record, using `camera_name` for unnamed captures.
    pub fn display_name(&self, camera_name: &str) -> String {
        match (&self.file_name, self.source_kind) {
            (Some(name), SourceKind::Upload) => name.clone(),
            (Some(name), SourceKind::Camera) if !name.is_empty() => name.clone(),
            _ => camera_name.to_string(),
        }
    }
}
