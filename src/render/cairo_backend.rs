use cairo::{Context, Format, ImageSurface, PdfSurface};
use pango::FontDescription;

use crate::core::PageGeometry;
use crate::error::{ExportError, ExportResult};
use crate::render::{CapturedImage, Color, DocumentWriter, PageFrame, TextHAlign};

/// Cairo + Pango + PangoCairo PDF backend.
///
/// Pages are drawn on a PDF surface that streams into memory; `finish`
/// flushes the surface and returns the document bytes.
pub struct CairoPdfWriter {
    geometry: PageGeometry,
    surface: Option<PdfSurface>,
    context: Option<Context>,
    pages_written: usize,
}

impl CairoPdfWriter {
    pub fn new(geometry: PageGeometry) -> ExportResult<Self> {
        geometry.validate()?;
        let (surface, context) = open_document(geometry)?;
        Ok(Self {
            geometry,
            surface: Some(surface),
            context: Some(context),
            pages_written: 0,
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo-pdf+pango+pangocairo"
    }

    fn draw_page(context: &Context, page: &PageFrame) -> ExportResult<()> {
        for rect in &page.rects {
            apply_color(context, rect.fill_color);
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        }

        for image in &page.images {
            let surface = image_surface(&image.image)?;
            context
                .save()
                .map_err(|err| map_backend_error("failed to save context", err))?;
            context.translate(image.x, image.y);
            context.scale(
                image.width / f64::from(image.image.width()),
                image.height / f64::from(image.image.height()),
            );
            context
                .set_source_surface(&surface, 0.0, 0.0)
                .map_err(|err| map_backend_error("failed to set image source", err))?;
            context
                .paint()
                .map_err(|err| map_backend_error("failed to paint image", err))?;
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore context", err))?;
        }

        for text in &page.texts {
            let layout = pangocairo::functions::create_layout(context);
            let weight = if text.bold { "Bold " } else { "" };
            let font_description =
                FontDescription::from_string(&format!("Sans {weight}{}px", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
        }

        Ok(())
    }
}

fn open_document(geometry: PageGeometry) -> ExportResult<(PdfSurface, Context)> {
    let surface = PdfSurface::for_stream(geometry.width, geometry.height, Vec::<u8>::new())
        .map_err(|err| map_backend_error("failed to create pdf surface", err))?;
    let context = Context::new(&surface)
        .map_err(|err| map_backend_error("failed to create cairo context", err))?;
    Ok((surface, context))
}

impl DocumentWriter for CairoPdfWriter {
    fn reset(&mut self) -> ExportResult<()> {
        drop(self.context.take());
        if let Some(stale) = self.surface.take() {
            stale.finish();
        }
        let (surface, context) = open_document(self.geometry)?;
        self.surface = Some(surface);
        self.context = Some(context);
        self.pages_written = 0;
        Ok(())
    }

    fn write_page(&mut self, page: PageFrame) -> ExportResult<()> {
        let Some(context) = self.context.as_ref() else {
            return Err(ExportError::FinalizationFailed(
                "document is already finalized".to_owned(),
            ));
        };
        page.validate()?;
        if page.geometry != self.geometry {
            return Err(ExportError::InvalidData(format!(
                "page geometry {}x{} differs from document geometry {}x{}",
                page.geometry.width, page.geometry.height, self.geometry.width, self.geometry.height
            )));
        }

        Self::draw_page(context, &page)?;
        context
            .show_page()
            .map_err(|err| map_backend_error("failed to emit page", err))?;
        self.pages_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<Vec<u8>> {
        drop(self.context.take());
        let surface = self.surface.take().ok_or_else(|| {
            ExportError::FinalizationFailed("document is already finalized".to_owned())
        })?;
        let stream = surface.finish_output_stream().map_err(|_| {
            ExportError::FinalizationFailed("cairo pdf stream reported a write error".to_owned())
        })?;
        stream
            .downcast::<Vec<u8>>()
            .map(|bytes| *bytes)
            .map_err(|_| {
                ExportError::FinalizationFailed("unexpected cairo output stream type".to_owned())
            })
    }

    fn page_count(&self) -> usize {
        self.pages_written
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Converts straight-alpha RGBA8 into cairo's premultiplied native-endian ARGB32.
fn image_surface(image: &CapturedImage) -> ExportResult<ImageSurface> {
    let width = i32::try_from(image.width())
        .map_err(|_| ExportError::InvalidData("image too wide for cairo".to_owned()))?;
    let height = i32::try_from(image.height())
        .map_err(|_| ExportError::InvalidData("image too tall for cairo".to_owned()))?;
    let stride = Format::ARgb32
        .stride_for_width(image.width())
        .map_err(|err| map_backend_error("failed to compute image stride", err))?;

    let row_bytes = stride as usize;
    let mut data = vec![0_u8; row_bytes * image.height() as usize];
    for (row_index, row) in image
        .pixels()
        .chunks_exact(image.width() as usize * 4)
        .enumerate()
    {
        let target = &mut data[row_index * row_bytes..];
        for (column, pixel) in row.chunks_exact(4).enumerate() {
            let alpha = u32::from(pixel[3]);
            let premultiply = |channel: u8| (u32::from(channel) * alpha + 127) / 255;
            let argb = (alpha << 24)
                | (premultiply(pixel[0]) << 16)
                | (premultiply(pixel[1]) << 8)
                | premultiply(pixel[2]);
            target[column * 4..column * 4 + 4].copy_from_slice(&argb.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride)
        .map_err(|err| map_backend_error("failed to create image surface", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ExportError {
    ExportError::FinalizationFailed(format!("{prefix}: {err}"))
}
