//! Document text extraction.
//!
//! The analyzer only ever sees plain text. Uploaded documents are spooled to a
//! temp file (`TempUpload`), handed to a `DocumentExtractor`, and the temp file
//! is removed whatever the outcome.

pub mod docx;

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

pub use docx::DocxExtractor;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("document is missing {0}")]
    MissingDocumentPart(&'static str),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Turns a stored document into plain text.
///
/// Carried in `AppState` as `Arc<dyn DocumentExtractor>`.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// A request-owned temp file holding the uploaded document.
/// Deleted by `close()`, or on drop if the request bails out early.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    /// Writes `bytes` into a fresh temp file under `dir`.
    pub fn write(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".docx")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Removes the file now, logging (not failing) if removal goes wrong.
    pub fn close(self) {
        let path: PathBuf = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to remove temp upload {}: {e}", path.display());
        }
    }
}
