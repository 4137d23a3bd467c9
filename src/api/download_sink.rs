use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::{ExportError, ExportResult};

use super::ExportedDocument;

/// Receives the finalized document at the end of a successful run.
#[async_trait]
pub trait DownloadSink: Send {
    /// Persists or hands off `document`. Returns where it went, if anywhere.
    async fn save(&mut self, document: &ExportedDocument) -> ExportResult<Option<String>>;
}

/// Writes documents into a directory under their report filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn save(&mut self, document: &ExportedDocument) -> ExportResult<Option<String>> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ExportError::FinalizationFailed(format!(
                "failed to create {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(&document.filename);
        tokio::fs::write(&path, &document.bytes).await.map_err(|e| {
            ExportError::FinalizationFailed(format!("failed to write {}: {e}", path.display()))
        })?;

        info!(
            path = %path.display(),
            bytes = document.bytes.len(),
            pages = document.page_count,
            "report saved"
        );
        Ok(Some(path.display().to_string()))
    }
}

/// Keeps saved documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDownloadSink {
    documents: Vec<ExportedDocument>,
}

impl MemoryDownloadSink {
    #[must_use]
    pub fn documents(&self) -> &[ExportedDocument] {
        &self.documents
    }

    #[must_use]
    pub fn last(&self) -> Option<&ExportedDocument> {
        self.documents.last()
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloadSink {
    async fn save(&mut self, document: &ExportedDocument) -> ExportResult<Option<String>> {
        self.documents.push(document.clone());
        Ok(None)
    }
}
