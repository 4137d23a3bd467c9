use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::render::{DocumentWriter, PageFrame, PageRole};

/// One page as recorded by `NullDocumentWriter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageManifestEntry {
    pub role: PageRole,
    /// First (largest) text line on the page.
    pub title: Option<String>,
    /// `[x, y, width, height]` of the placed image.
    pub image_box: Option<[f64; 4]>,
    pub image_size: Option<[u32; 2]>,
    pub text_count: usize,
    pub rect_count: usize,
}

/// Headless document backend used by tests and dry runs.
///
/// It still validates every frame so geometry bugs surface before a real
/// backend is involved, and serializes a JSON page manifest on `finish`.
#[derive(Debug, Default)]
pub struct NullDocumentWriter {
    pages: Vec<PageManifestEntry>,
    finished: bool,
}

impl NullDocumentWriter {
    #[must_use]
    pub fn pages(&self) -> &[PageManifestEntry] {
        &self.pages
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn manifest_from_bytes(bytes: &[u8]) -> ExportResult<Vec<PageManifestEntry>> {
        serde_json::from_slice(bytes)
            .map_err(|e| ExportError::InvalidData(format!("failed to parse page manifest: {e}")))
    }
}

impl DocumentWriter for NullDocumentWriter {
    fn reset(&mut self) -> ExportResult<()> {
        self.pages.clear();
        self.finished = false;
        Ok(())
    }

    fn write_page(&mut self, page: PageFrame) -> ExportResult<()> {
        if self.finished {
            return Err(ExportError::FinalizationFailed(
                "document is already finalized".to_owned(),
            ));
        }
        page.validate()?;

        let title = page
            .texts
            .iter()
            .max_by(|a, b| a.font_size_px.total_cmp(&b.font_size_px))
            .map(|text| text.text.clone());
        let image = page.images.first();
        self.pages.push(PageManifestEntry {
            role: page.role.clone(),
            title,
            image_box: image.map(|image| [image.x, image.y, image.width, image.height]),
            image_size: image.map(|image| [image.image.width(), image.image.height()]),
            text_count: page.texts.len(),
            rect_count: page.rects.len(),
        });
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<Vec<u8>> {
        if self.finished {
            return Err(ExportError::FinalizationFailed(
                "document is already finalized".to_owned(),
            ));
        }
        self.finished = true;
        serde_json::to_vec_pretty(&self.pages)
            .map_err(|e| ExportError::FinalizationFailed(format!("failed to serialize manifest: {e}")))
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
