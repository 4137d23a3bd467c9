use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::render::{CapturedImage, Color};
use crate::surface::{RasterOptions, VisualElement};

/// Settle delay and rasterization parameters for every capture of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturePolicy {
    /// Extra wait after readiness for late paint commits.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Opaque background as `#RRGGBB`.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            scale: default_scale(),
            background: default_background(),
        }
    }
}

impl CapturePolicy {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn background_color(&self) -> ExportResult<Color> {
        Color::from_hex(&self.background)
    }

    pub fn raster_options(&self) -> ExportResult<RasterOptions> {
        Ok(RasterOptions {
            scale: self.scale,
            background: self.background_color()?,
        })
    }

    pub fn validate(&self) -> ExportResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ExportError::InvalidConfig(format!(
                "capture scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        let background = self.background_color()?;
        if !background.is_opaque() {
            return Err(ExportError::InvalidConfig(format!(
                "capture background `{}` must be opaque",
                self.background
            )));
        }
        Ok(())
    }
}

fn default_settle_delay_ms() -> u64 {
    600
}

fn default_scale() -> f64 {
    2.0
}

fn default_background() -> String {
    "#15151E".to_owned()
}

/// What a rasterization failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFailurePolicy {
    /// The whole run fails.
    #[default]
    Abort,
    /// The artifact's page is written with a notice instead of an image.
    Placeholder,
}

/// Waits out the settle delay, then rasterizes `element`.
///
/// Both steps observe `cancel`. Any rasterization error other than
/// cancellation becomes `ExportError::CaptureFailed` for this element.
pub async fn capture_element(
    element: &dyn VisualElement,
    options: &RasterOptions,
    settle_delay: Duration,
    cancel: &CancellationToken,
) -> ExportResult<CapturedImage> {
    let render_id = element.render_id();

    if !settle_delay.is_zero() {
        tokio::select! {
            () = cancel.cancelled() => return Err(ExportError::Cancelled),
            () = sleep(settle_delay) => {}
        }
    }

    let rasterized = tokio::select! {
        () = cancel.cancelled() => return Err(ExportError::Cancelled),
        result = element.rasterize(options) => result,
    };

    let image = rasterized.map_err(|err| match err {
        ExportError::Cancelled => ExportError::Cancelled,
        ExportError::CaptureFailed { .. } => err,
        other => ExportError::CaptureFailed {
            render_id: render_id.to_string(),
            reason: other.to_string(),
        },
    })?;

    if image.render_id() != render_id {
        return Err(ExportError::CaptureFailed {
            render_id: render_id.to_string(),
            reason: format!("element returned an image for `{}`", image.render_id()),
        });
    }

    debug!(
        render_id = %render_id,
        width = image.width(),
        height = image.height(),
        "captured element"
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::{CaptureFailurePolicy, CapturePolicy};

    #[test]
    fn defaults_match_dashboard_theme() {
        let policy = CapturePolicy::default();
        assert_eq!(policy.settle_delay_ms, 600);
        assert_eq!(policy.scale, 2.0);
        let background = policy.background_color().expect("background");
        assert_eq!(background.to_rgba8(), [0x15, 0x15, 0x1E, 0xFF]);
        assert_eq!(CaptureFailurePolicy::default(), CaptureFailurePolicy::Abort);
    }

    #[test]
    fn translucent_background_is_rejected() {
        let policy = CapturePolicy {
            background: "#15151E80".to_owned(),
            ..CapturePolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
