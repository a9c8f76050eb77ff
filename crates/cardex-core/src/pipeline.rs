//! End-to-end card processing: OCR, cleanup, extraction and submission.

use tracing::{info, warn};

use crate::contact::{ContactExtractor, ContactParser, ExtractionResult};
use crate::error::{Result, SubmitError};
use crate::models::config::CardexConfig;
use crate::models::contact::FieldKind;
use crate::ocr::{OcrEngine, OcrOutput, RawCapture, SourceKind};
use crate::record::{
    assemble, CaptureMetadata, Column, ObjectArchive, RetryPolicy, RetryingStore, RowStore,
    StoredRow,
};
use crate::text::Preprocessor;

/// Extraction output for one card, ready for review and submission.
#[derive(Debug, Clone)]
pub struct CardExtraction {
    /// File name, timestamp, raw text and source.
    pub metadata: CaptureMetadata,
    /// Parsed fields and diagnostics.
    pub result: ExtractionResult,
}

impl CardExtraction {
    /// Whether OCR produced no usable text. The caller decides whether to
    /// block submission.
    pub fn no_text_detected(&self) -> bool {
        self.result.no_text_detected()
    }
}

/// Card processing pipeline holding one long-lived OCR engine.
pub struct CardPipeline<E> {
    engine: E,
    preprocessor: Preprocessor,
    parser: ContactParser,
    columns: Vec<Column>,
    timestamp_format: String,
    camera_file_name: String,
    retry: RetryPolicy,
    archive: Option<Box<dyn ObjectArchive>>,
}

impl<E: OcrEngine> CardPipeline<E> {
    /// Create a pipeline from configuration.
    pub fn new(engine: E, config: &CardexConfig) -> Result<Self> {
        Ok(Self {
            engine,
            preprocessor: Preprocessor::from_config(&config.preprocess),
            parser: ContactParser::from_config(config)?,
            columns: config.store.columns.clone(),
            timestamp_format: config.store.timestamp_format.clone(),
            camera_file_name: config.store.camera_file_name.clone(),
            retry: config.retry.clone(),
            archive: None,
        })
    }

    /// Archive source images before storing rows.
    pub fn with_archive(mut self, archive: impl ObjectArchive + 'static) -> Self {
        self.archive = Some(Box::new(archive));
        self
    }

    /// Override the store retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Run OCR on a capture and extract contact fields.
    pub fn extract(&self, capture: &RawCapture) -> Result<CardExtraction> {
        let output = self.engine.recognize(&capture.image)?;
        let file_name = capture.display_name(&self.camera_file_name);
        let mut extraction = self.extract_output(&output, &file_name, capture.source_kind);
        extraction.metadata.timestamp = capture.captured_at;
        Ok(extraction)
    }

    /// Extract contact fields from OCR output obtained elsewhere.
    pub fn extract_output(
        &self,
        output: &OcrOutput,
        file_name: &str,
        source_kind: SourceKind,
    ) -> CardExtraction {
        let lines = self.preprocessor.clean(output);
        let mut result = self.parser.extract(&lines);
        // Noise-only OCR output counts as no text at all.
        result.raw_text = if lines.is_empty() {
            String::new()
        } else {
            output.raw_text()
        };

        if result.no_text_detected() {
            warn!("No text detected in {}", file_name);
        } else {
            info!(
                "Extracted {} of {} fields from {}",
                FieldKind::ALL.len() - result.record.missing_fields().len(),
                FieldKind::ALL.len(),
                file_name
            );
        }

        CardExtraction {
            metadata: CaptureMetadata::new(file_name, result.raw_text.clone(), source_kind),
            result,
        }
    }

    /// Archive the image (if any), assemble the row and append it to the
    /// store under the retry policy.
    ///
    /// Archive failures degrade to an empty link. Store failures return the
    /// assembled row inside the error.
    pub fn submit<S: RowStore>(
        &self,
        extraction: &CardExtraction,
        image_bytes: Option<&[u8]>,
        store: &mut S,
    ) -> std::result::Result<StoredRow, SubmitError> {
        let archive_link = self.archive_image(image_bytes, &extraction.metadata.file_name);

        let row = assemble(
            &extraction.result.record,
            &extraction.metadata,
            &archive_link,
            &self.columns,
            &self.timestamp_format,
        );

        let mut retrying = RetryingStore::new(store, self.retry.clone());
        match retrying.append(&row) {
            Ok(()) => {
                info!("Saved contact row for {}", extraction.metadata.file_name);
                Ok(row)
            }
            Err(source) => {
                warn!("Failed to save row for {}: {}", extraction.metadata.file_name, source);
                Err(SubmitError::StoreWrite { row, source })
            }
        }
    }

    fn archive_image(&self, image_bytes: Option<&[u8]>, file_name: &str) -> String {
        let (Some(archive), Some(bytes)) = (&self.archive, image_bytes) else {
            return String::new();
        };
        match archive.upload(bytes, file_name) {
            Ok(link) => link,
            Err(e) => {
                warn!("Archiving {} failed, continuing without link: {}", file_name, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArchiveError, OcrError, StoreError};
    use crate::record::MemoryStore;
    use image::{DynamicImage, RgbImage};

    struct FixedEngine(OcrOutput);

    impl OcrEngine for FixedEngine {
        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<OcrOutput, OcrError> {
            Ok(self.0.clone())
        }
    }

    struct FailingArchive;

    impl ObjectArchive for FailingArchive {
        fn upload(&self, _bytes: &[u8], _file_name: &str) -> std::result::Result<String, ArchiveError> {
            Err(ArchiveError::NoReference("offline".into()))
        }
    }

    struct StubArchive;

    impl ObjectArchive for StubArchive {
        fn upload(&self, _bytes: &[u8], file_name: &str) -> std::result::Result<String, ArchiveError> {
            Ok(format!("https://archive.example/{}", file_name))
        }
    }

    struct DownStore;

    impl RowStore for DownStore {
        fn append(&mut self, _row: &StoredRow) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("503".into()))
        }
    }

    fn card_output() -> OcrOutput {
        OcrOutput::Fragments(vec![
            "JOHN DOE".into(),
            "Sales Manager".into(),
            "ABC INDUSTRIES PVT LTD".into(),
            "+91 98765 43210".into(),
            "john@abc.com".into(),
        ])
    }

    fn pipeline(output: OcrOutput) -> CardPipeline<FixedEngine> {
        CardPipeline::new(FixedEngine(output), &CardexConfig::default())
            .unwrap()
            .with_retry(RetryPolicy::immediate(3))
    }

    fn camera_capture() -> RawCapture {
        RawCapture::from_image(DynamicImage::ImageRgb8(RgbImage::new(4, 4)), SourceKind::Camera)
            .unwrap()
    }

    #[test]
    fn test_extract_and_submit() {
        let pipeline = pipeline(card_output()).with_archive(StubArchive);
        let capture = camera_capture();

        let extraction = pipeline.extract(&capture).unwrap();
        assert_eq!(extraction.metadata.file_name, "Camera Capture");
        assert_eq!(extraction.result.record.name, "John Doe");
        assert!(extraction.metadata.raw_text.starts_with("JOHN DOE\nSales Manager"));

        let mut store = MemoryStore::new();
        let row = pipeline
            .submit(&extraction, Some(capture.bytes.as_slice()), &mut store)
            .unwrap();

        assert_eq!(row.len(), Column::default_layout().len());
        assert_eq!(
            row.get(Column::ArchiveLink),
            Some("https://archive.example/Camera Capture")
        );
        assert_eq!(row.get(Column::Company), Some("ABC INDUSTRIES PVT LTD"));
        assert_eq!(store.rows().len(), 1);
    }

    #[test]
    fn test_archive_failure_degrades_to_empty_link() {
        let pipeline = pipeline(card_output()).with_archive(FailingArchive);
        let capture = camera_capture();
        let extraction = pipeline.extract(&capture).unwrap();

        let mut store = MemoryStore::new();
        let row = pipeline
            .submit(&extraction, Some(capture.bytes.as_slice()), &mut store)
            .unwrap();
        assert_eq!(row.get(Column::ArchiveLink), Some(""));
    }

    #[test]
    fn test_store_failure_keeps_row() {
        let pipeline = pipeline(card_output());
        let extraction = pipeline.extract_output(&card_output(), "card.jpg", SourceKind::Upload);

        let err = pipeline.submit(&extraction, None, &mut DownStore).unwrap_err();
        assert!(err.to_string().contains("gave up after 3 attempts"));
        assert_eq!(err.row().get(Column::Email), Some("john@abc.com"));
        assert!(err.row().get(Column::RawText).unwrap().contains("JOHN DOE"));
    }

    #[test]
    fn test_no_text_detected() {
        let pipeline = pipeline(OcrOutput::Text(String::new()));
        let extraction = pipeline.extract(&camera_capture()).unwrap();

        assert!(extraction.no_text_detected());
        assert!(extraction.result.record.is_empty());

        let mut store = MemoryStore::new();
        let row = pipeline.submit(&extraction, None, &mut store).unwrap();
        assert_eq!(row.len(), 11);
    }

    #[test]
    fn test_noise_only_output_has_empty_raw_text() {
        let pipeline = pipeline(OcrOutput::Text("  ©  \n|\n".into()));
        let extraction = pipeline.extract(&camera_capture()).unwrap();

        assert!(extraction.no_text_detected());
        assert_eq!(extraction.result.raw_text, "");
        assert_eq!(extraction.metadata.raw_text, "");
    }
}
