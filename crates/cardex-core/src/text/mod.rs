//! OCR text cleanup.

mod preprocess;

pub use preprocess::Preprocessor;
