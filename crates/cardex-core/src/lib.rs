//! Core library for business card OCR processing.
//!
//! This crate provides:
//! - Capture loading with EXIF orientation correction
//! - An OCR engine abstraction (pure Rust engine behind the `native` feature)
//! - OCR text cleanup into ordered lines
//! - Contact field extraction (company, name, designation, phone, WhatsApp,
//!   email, website, address)
//! - Row assembly, row stores, image archiving and retrying store writes

pub mod error;
pub mod models;
pub mod ocr;
pub mod text;
pub mod contact;
pub mod record;
pub mod pipeline;

pub use error::{ArchiveError, CardexError, OcrError, Result, StoreError, SubmitError};
pub use models::config::CardexConfig;
pub use models::contact::{ContactRecord, FieldKind, TextLine};
pub use ocr::{OcrEngine, OcrOutput, RawCapture, RotatingEngine, SourceKind};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use text::Preprocessor;
pub use contact::{ContactExtractor, ContactParser, ExtractionResult};
pub use record::{
    assemble, CaptureMetadata, Column, CsvRowStore, LocalArchive, MemoryStore, ObjectArchive,
    RetryPolicy, RetryingStore, RowStore, StoredRow,
};
pub use pipeline::{CardExtraction, CardPipeline};
