//! Row assembly and the persistence collaborators.

mod archive;
mod assembler;
mod retry;
mod store;

pub use archive::{LocalArchive, ObjectArchive};
pub use assembler::{assemble, CaptureMetadata, Column, StoredRow};
pub use retry::{Backoff, RetryPolicy, RetryingStore};
pub use store::{CsvRowStore, MemoryStore, RowStore};
