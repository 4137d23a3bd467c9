//! Contract between the pipeline and the host's off-screen rendering surface.
//!
//! The surface owns the widgets. The pipeline hands it one `WidgetMount` per
//! artifact, then only reads back state from the mounted elements: text
//! content, busy indicator, the optional explicit ready marker or readiness
//! signal, and a rasterization call.

mod props;
mod scripted;

pub use props::{WidgetMount, WidgetProps};
pub use scripted::{ElementScript, ScriptedSurface, SurfaceLog};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::core::RenderId;
use crate::error::ExportResult;
use crate::render::{CapturedImage, Color};

/// Rasterization parameters applied to every capture of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Supersampling factor relative to the element's CSS size.
    pub scale: f64,
    /// Opaque color painted behind the element.
    pub background: Color,
}

/// One widget mounted on the rendering surface.
#[async_trait]
pub trait VisualElement: Send + Sync {
    fn render_id(&self) -> &RenderId;

    /// Rendered text content, used by the loading-text heuristic.
    fn text_content(&self) -> String;

    /// Whether a busy/spinner indicator is currently shown.
    fn has_busy_indicator(&self) -> bool;

    /// Explicit "finished loading" marker, for widgets that set one.
    fn has_ready_marker(&self) -> bool {
        false
    }

    /// Completion signal for widgets that implement the explicit contract.
    ///
    /// The value flips to `true` once the widget has finished loading.
    fn readiness_signal(&self) -> Option<watch::Receiver<bool>> {
        None
    }

    async fn rasterize(&self, options: &RasterOptions) -> ExportResult<CapturedImage>;
}

/// Host-side container that mounts report widgets off-screen.
#[async_trait]
pub trait RenderingSurface: Send {
    /// Mounts one element per entry, returned in the same order.
    async fn mount(&mut self, mounts: &[WidgetMount]) -> ExportResult<Vec<Box<dyn VisualElement>>>;

    /// Releases every mounted element. Safe to call when nothing is mounted.
    async fn unmount(&mut self);
}
