mod frame;
mod image;
mod null_writer;
mod primitives;

pub use frame::{PageFrame, PageRole};
pub use image::CapturedImage;
pub use null_writer::{NullDocumentWriter, PageManifestEntry};
pub use primitives::{Color, ImagePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::ExportResult;

/// Contract implemented by any document backend.
///
/// Backends receive fully materialized, validated `PageFrame`s in document
/// order and serialize them once. Writing after `finish` is an error until
/// `reset` starts a new, empty document.
pub trait DocumentWriter {
    /// Discards any pages written so far, finished or not.
    fn reset(&mut self) -> ExportResult<()>;

    fn write_page(&mut self, page: PageFrame) -> ExportResult<()>;

    fn finish(&mut self) -> ExportResult<Vec<u8>>;

    fn page_count(&self) -> usize;

    fn mime_type(&self) -> &'static str;

    /// File extension used for the report filename.
    fn extension(&self) -> &'static str;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::CairoPdfWriter;
