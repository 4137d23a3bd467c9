use crate::core::RenderId;
use crate::error::{ExportError, ExportResult};
use crate::render::Color;

/// RGBA8 raster of one visual element, as produced by the capture engine.
///
/// The buffer is moved into the page frame that places it and dropped once
/// that page is written.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    render_id: RenderId,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CapturedImage {
    pub fn new(render_id: RenderId, width: u32, height: u32, pixels: Vec<u8>) -> ExportResult<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidData(format!(
                "captured image `{render_id}` has empty size {width}x{height}"
            )));
        }
        let expected = u64::from(width) * u64::from(height) * 4;
        if pixels.len() as u64 != expected {
            return Err(ExportError::InvalidData(format!(
                "captured image `{render_id}` has {} bytes, expected {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            render_id,
            width,
            height,
            pixels,
        })
    }

    /// Uniformly filled raster, used by headless surfaces and placeholders.
    pub fn solid(render_id: RenderId, width: u32, height: u32, color: Color) -> ExportResult<Self> {
        color.validate()?;
        let rgba = color.to_rgba8();
        let len = (width as usize) * (height as usize);
        let pixels = rgba.iter().copied().cycle().take(len * 4).collect();
        Self::new(render_id, width, height, pixels)
    }

    #[must_use]
    pub fn render_id(&self) -> &RenderId {
        &self.render_id
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("render_id", &self.render_id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
