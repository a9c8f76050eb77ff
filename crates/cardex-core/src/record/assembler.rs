//! Flattens a contact record and capture metadata into a store row.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::contact::{ContactRecord, FieldKind};
use crate::ocr::SourceKind;

/// A column of the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    RawText,
    FileName,
    Timestamp,
    Company,
    Phone,
    Email,
    Name,
    Designation,
    Address,
    Website,
    ArchiveLink,
    Whatsapp,
    SourceKind,
}

impl Column {
    /// The standard layout: raw text, capture metadata, contact fields,
    /// archive link.
    pub fn default_layout() -> Vec<Column> {
        vec![
            Column::RawText,
            Column::FileName,
            Column::Timestamp,
            Column::Company,
            Column::Phone,
            Column::Email,
            Column::Name,
            Column::Designation,
            Column::Address,
            Column::Website,
            Column::ArchiveLink,
        ]
    }

    /// Header label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::RawText => "raw_text",
            Column::FileName => "file_name",
            Column::Timestamp => "timestamp",
            Column::Company => "company",
            Column::Phone => "phone",
            Column::Email => "email",
            Column::Name => "name",
            Column::Designation => "designation",
            Column::Address => "address",
            Column::Website => "website",
            Column::ArchiveLink => "archive_link",
            Column::Whatsapp => "whatsapp",
            Column::SourceKind => "source_kind",
        }
    }

    fn field(&self) -> Option<FieldKind> {
        match self {
            Column::Company => Some(FieldKind::Company),
            Column::Phone => Some(FieldKind::Phone),
            Column::Email => Some(FieldKind::Email),
            Column::Name => Some(FieldKind::Name),
            Column::Designation => Some(FieldKind::Designation),
            Column::Address => Some(FieldKind::Address),
            Column::Website => Some(FieldKind::Website),
            Column::Whatsapp => Some(FieldKind::Whatsapp),
            _ => None,
        }
    }
}

/// Capture details stored next to the contact fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// Uploaded file name, or the camera placeholder.
    pub file_name: String,
    /// Capture time.
    pub timestamp: DateTime<Local>,
    /// Unparsed OCR text.
    pub raw_text: String,
    /// Upload or camera.
    pub source_kind: SourceKind,
}

impl CaptureMetadata {
    pub fn new(file_name: impl Into<String>, raw_text: impl Into<String>, source_kind: SourceKind) -> Self {
        Self {
            file_name: file_name.into(),
            timestamp: Local::now(),
            raw_text: raw_text.into(),
            source_kind,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One row for the persistent store, with its column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow {
    pub columns: Vec<Column>,
    pub values: Vec<String>,
}

impl StoredRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a column, if the layout has it.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i].as_str())
    }

    /// Header labels for the layout.
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::as_str).collect()
    }
}

/// Build a row in the given column order. An empty `archive_link` is kept
/// as an empty cell.
pub fn assemble(
    record: &ContactRecord,
    metadata: &CaptureMetadata,
    archive_link: &str,
    columns: &[Column],
    timestamp_format: &str,
) -> StoredRow {
    let values = columns
        .iter()
        .map(|column| match column {
            Column::RawText => metadata.raw_text.clone(),
            Column::FileName => metadata.file_name.clone(),
            Column::Timestamp => metadata.timestamp.format(timestamp_format).to_string(),
            Column::ArchiveLink => archive_link.to_string(),
            Column::SourceKind => metadata.source_kind.as_str().to_string(),
            other => other
                .field()
                .map(|kind| record.get(kind).to_string())
                .unwrap_or_default(),
        })
        .collect();

    StoredRow {
        columns: columns.to_vec(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample() -> (ContactRecord, CaptureMetadata) {
        let record = ContactRecord {
            company: "ABC PVT LTD".to_string(),
            name: "John Doe".to_string(),
            phone: "98765 43210".to_string(),
            whatsapp: "98765 43210".to_string(),
            email: "john@abc.com".to_string(),
            ..Default::default()
        };
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let metadata = CaptureMetadata::new("card.jpg", "ABC PVT LTD\nJohn Doe", SourceKind::Upload)
            .with_timestamp(timestamp);
        (record, metadata)
    }

    #[test]
    fn test_default_layout() {
        let (record, metadata) = sample();
        let row = assemble(&record, &metadata, "", &Column::default_layout(), "%Y-%m-%d %H:%M:%S");

        assert_eq!(
            row.values,
            vec![
                "ABC PVT LTD\nJohn Doe",
                "card.jpg",
                "2024-03-09 14:05:00",
                "ABC PVT LTD",
                "98765 43210",
                "john@abc.com",
                "John Doe",
                "",
                "",
                "",
                "",
            ]
        );
        assert_eq!(row.len(), Column::default_layout().len());
        assert_eq!(row.header()[10], "archive_link");
    }

    #[test]
    fn test_custom_layout() {
        let (record, metadata) = sample();
        let columns = [Column::Name, Column::Whatsapp, Column::ArchiveLink, Column::SourceKind];
        let row = assemble(&record, &metadata, "file:///cards/1.jpg", &columns, "%d/%m/%Y");

        assert_eq!(row.len(), 4);
        assert_eq!(row.get(Column::Whatsapp), Some("98765 43210"));
        assert_eq!(row.get(Column::ArchiveLink), Some("file:///cards/1.jpg"));
        assert_eq!(row.get(Column::SourceKind), Some("upload"));
        assert_eq!(row.get(Column::Timestamp), None);
    }

    #[test]
    fn test_empty_record_keeps_width() {
        let metadata = CaptureMetadata::new("Camera Capture", "", SourceKind::Camera);
        let row = assemble(
            &ContactRecord::default(),
            &metadata,
            "",
            &Column::default_layout(),
            "%Y",
        );
        assert_eq!(row.len(), 11);
    }
}
