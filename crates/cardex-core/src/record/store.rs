//! Append-only row stores.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

use super::assembler::StoredRow;

/// Trait for persistent stores accepting appended rows.
pub trait RowStore {
    /// Append one row.
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError>;
}

impl<S: RowStore + ?Sized> RowStore for &mut S {
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
        (**self).append(row)
    }
}

impl<S: RowStore + ?Sized> RowStore for Box<S> {
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
        (**self).append(row)
    }
}

/// Appends rows to a CSV file, writing the header when the file is new.
pub struct CsvRowStore {
    path: PathBuf,
}

impl CsvRowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reject rows whose column layout differs from the file's header.
    fn check_header(&self, row: &StoredRow) -> Result<(), StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        let Some(existing) = reader.records().next() else {
            return Ok(());
        };
        let existing = existing?;

        let expected = row.header();
        if existing.iter().ne(expected.iter().copied()) {
            return Err(StoreError::Rejected(format!(
                "store columns [{}] do not match row columns [{}]",
                existing.iter().collect::<Vec<_>>().join(","),
                expected.join(",")
            )));
        }
        Ok(())
    }

    fn needs_header(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true)
    }
}

impl RowStore for CsvRowStore {
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
        if row.columns.len() != row.values.len() {
            return Err(StoreError::Rejected(format!(
                "{} values for {} columns",
                row.values.len(),
                row.columns.len()
            )));
        }

        let write_header = self.needs_header();
        if !write_header {
            self.check_header(row)?;
        }

        // One write per row, so a failed append never leaves half a record.
        let mut writer = csv::Writer::from_writer(Vec::new());
        if write_header {
            writer.write_record(row.header())?;
        }
        writer.write_record(&row.values)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;

        debug!("Appended row to {}", self.path.display());
        Ok(())
    }
}

/// Keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<StoredRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }
}

impl RowStore for MemoryStore {
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
        self.rows.push(row.clone());
        Ok(())
    }
}
