use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

pub const REPORT_PAGE_WIDTH: f64 = 1920.0;
pub const REPORT_PAGE_HEIGHT: f64 = 1080.0;
pub const REPORT_PAGE_MARGIN: f64 = 40.0;
pub const REPORT_HEADER_ALLOWANCE: f64 = 160.0;

/// Fixed landscape page geometry in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Vertical space reserved below the top margin for the page header.
    pub header_allowance: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: REPORT_PAGE_WIDTH,
            height: REPORT_PAGE_HEIGHT,
            margin: REPORT_PAGE_MARGIN,
            header_allowance: REPORT_HEADER_ALLOWANCE,
        }
    }
}

impl PageGeometry {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_header_allowance(mut self, header_allowance: f64) -> Self {
        self.header_allowance = header_allowance;
        self
    }

    /// Width available to a captured image.
    #[must_use]
    pub fn content_width(self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Height available to a captured image once margins and header are removed.
    #[must_use]
    pub fn content_height(self) -> f64 {
        self.height - 2.0 * self.margin - self.header_allowance
    }

    pub fn validate(self) -> ExportResult<()> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ExportError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        if !self.margin.is_finite()
            || !self.header_allowance.is_finite()
            || self.margin < 0.0
            || self.header_allowance < 0.0
        {
            return Err(ExportError::InvalidConfig(
                "page margin and header allowance must be finite and >= 0".to_owned(),
            ));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(ExportError::InvalidConfig(format!(
                "margins leave no room for content on a {}x{} page",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
