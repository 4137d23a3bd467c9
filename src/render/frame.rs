use serde::{Deserialize, Serialize};

use crate::core::{PageGeometry, RenderId};
use crate::error::ExportResult;
use crate::render::{ImagePrimitive, RectPrimitive, TextPrimitive};

/// What a page holds, recorded so writers and tests can verify page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRole {
    Cover,
    Artifact { render_id: RenderId },
}

/// Backend-agnostic scene for one document page.
///
/// Draw order is rects, then images, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    pub geometry: PageGeometry,
    pub role: PageRole,
    pub rects: Vec<RectPrimitive>,
    pub images: Vec<ImagePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl PageFrame {
    #[must_use]
    pub fn new(geometry: PageGeometry, role: PageRole) -> Self {
        Self {
            geometry,
            role,
            rects: Vec::new(),
            images: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: ImagePrimitive) -> Self {
        self.images.push(image);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn validate(&self) -> ExportResult<()> {
        self.geometry.validate()?;

        for rect in &self.rects {
            rect.validate()?;
        }
        for image in &self.images {
            image.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.images.is_empty() && self.texts.is_empty()
    }
}
