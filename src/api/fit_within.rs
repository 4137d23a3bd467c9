use serde::{Deserialize, Serialize};

use crate::core::PageGeometry;
use crate::error::{ExportError, ExportResult};

/// Size of an image after aspect-preserving scale-to-fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedSize {
    pub width: f64,
    pub height: f64,
}

/// Where a fitted image lands on a page, in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scales `(image_width, image_height)` into `(box_width, box_height)` keeping
/// the aspect ratio.
///
/// The result never exceeds either bound and touches at least one of them.
pub fn fit_within(
    image_width: f64,
    image_height: f64,
    box_width: f64,
    box_height: f64,
) -> ExportResult<FittedSize> {
    for (name, value) in [
        ("image width", image_width),
        ("image height", image_height),
        ("box width", box_width),
        ("box height", box_height),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ExportError::InvalidData(format!(
                "{name} must be finite and > 0, got {value}"
            )));
        }
    }

    let ratio = image_width / image_height;
    let mut width = box_width.min(box_height * ratio);
    let mut height = width / ratio;
    if height > box_height {
        height = box_height;
        width = box_height * ratio;
    }

    Ok(FittedSize { width, height })
}

/// Fits the image into the page's content box and centers it.
///
/// Horizontal centering is on the page. Vertical centering is on the page
/// shifted down by half the header allowance, which centers the image in the
/// area below the header.
pub fn place_image(
    geometry: PageGeometry,
    image_width: f64,
    image_height: f64,
) -> ExportResult<ImagePlacement> {
    geometry.validate()?;
    let fitted = fit_within(
        image_width,
        image_height,
        geometry.content_width(),
        geometry.content_height(),
    )?;

    Ok(ImagePlacement {
        x: (geometry.width - fitted.width) / 2.0,
        y: (geometry.height - fitted.height) / 2.0 + geometry.header_allowance / 2.0,
        width: fitted.width,
        height: fitted.height,
    })
}
