//! Object archive for source images.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::error::ArchiveError;

/// Trait for archives that store an image and return a reference URL.
pub trait ObjectArchive {
    /// Store the bytes and return a dereferenceable URL.
    fn upload(&self, bytes: &[u8], file_name: &str) -> Result<String, ArchiveError>;
}

/// Archive that copies images into a local directory and returns `file://`
/// URLs.
pub struct LocalArchive {
    dir: PathBuf,
}

impl LocalArchive {
    /// Create an archive rooted at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.canonicalize()?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unique_path(&self, file_name: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        let safe: String = file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
            .collect();

        let mut candidate = self.dir.join(format!("{}-{}", stamp, safe));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!("{}-{}-{}", stamp, n, safe));
            n += 1;
        }
        candidate
    }
}

impl ObjectArchive for LocalArchive {
    fn upload(&self, bytes: &[u8], file_name: &str) -> Result<String, ArchiveError> {
        let path = self.unique_path(file_name);
        std::fs::write(&path, bytes)?;
        debug!("Archived {} bytes to {}", bytes.len(), path.display());

        let path = path
            .to_str()
            .ok_or_else(|| ArchiveError::NoReference(file_name.to_string()))?;
        Ok(format!("file://{}", path))
    }
}
