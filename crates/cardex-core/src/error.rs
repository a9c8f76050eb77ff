//! Error types for the cardex-core library.
//!
//! Text cleanup and field extraction are infallible; errors only come from
//! collaborators (OCR engine, row store, object archive) and configuration.

use thiserror::Error;

use crate::record::StoredRow;

/// Main error type for the cardex library.
#[derive(Error, Debug)]
pub enum CardexError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Row store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Image archive error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors from appending rows to a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O failure while writing.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Transient failure reported by a remote store.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the row; retrying will not help.
    #[error("row rejected: {0}")]
    Rejected(String),

    /// Every attempt of a retry policy failed.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<StoreError>,
    },
}

impl StoreError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Csv(_) | StoreError::Unavailable(_)
        )
    }
}

/// Errors from uploading a capture to the object archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O failure while storing the image.
    #[error("upload failed: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not produce a reference URL.
    #[error("no reference URL for {0}")]
    NoReference(String),
}

/// A submission whose store write failed.
///
/// The assembled row, raw text included, is handed back so it can be
/// resubmitted.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("failed to save row: {source}")]
    StoreWrite {
        row: StoredRow,
        #[source]
        source: StoreError,
    },
}

impl SubmitError {
    /// The row that was not saved.
    pub fn row(&self) -> &StoredRow {
        match self {
            SubmitError::StoreWrite { row, .. } => row,
        }
    }

    pub fn into_row(self) -> StoredRow {
        match self {
            SubmitError::StoreWrite { row, .. } => row,
        }
    }
}

/// Result type for the cardex library.
pub type Result<T> = std::result::Result<T, CardexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Unavailable("quota".into()).is_transient());
        assert!(!StoreError::Rejected("bad row".into()).is_transient());

        let exhausted = StoreError::Exhausted {
            attempts: 3,
            last: Box::new(StoreError::Unavailable("timeout".into())),
        };
        assert!(!exhausted.is_transient());
        assert_eq!(
            exhausted.to_string(),
            "gave up after 3 attempts: store unavailable: timeout"
        );
    }
}
