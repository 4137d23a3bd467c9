use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::core::RenderId;
use crate::error::{ExportError, ExportResult};
use crate::render::CapturedImage;

use super::{RasterOptions, RenderingSurface, VisualElement, WidgetMount, WidgetProps};

/// Loading behaviour of one scripted element, relative to its mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementScript {
    /// Sets the explicit ready marker after the delay.
    MarkerAfter(Duration),
    /// Flips the readiness signal after the delay.
    SignalAfter(Duration),
    /// Drops the spinner and loading text after the delay, without a marker.
    QuietAfter(Duration),
    /// Spinner never goes away.
    Stuck,
    /// Ready immediately, but rasterization fails with the given reason.
    FailCapture(String),
}

#[derive(Debug, Default)]
struct SurfaceLogState {
    mounted: Vec<RenderId>,
    props: Vec<WidgetProps>,
    captured: Vec<RenderId>,
    unmount_count: usize,
}

/// Shared record of what a `ScriptedSurface` mounted and captured.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    inner: Arc<Mutex<SurfaceLogState>>,
}

impl SurfaceLog {
    fn with_state<T>(&self, f: impl FnOnce(&mut SurfaceLogState) -> T) -> T {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    #[must_use]
    pub fn mounted(&self) -> Vec<RenderId> {
        self.with_state(|state| state.mounted.clone())
    }

    #[must_use]
    pub fn props(&self) -> Vec<WidgetProps> {
        self.with_state(|state| state.props.clone())
    }

    /// Render ids in the order they were rasterized.
    #[must_use]
    pub fn captured(&self) -> Vec<RenderId> {
        self.with_state(|state| state.captured.clone())
    }

    #[must_use]
    pub fn capture_count(&self, render_id: &RenderId) -> usize {
        self.with_state(|state| state.captured.iter().filter(|id| *id == render_id).count())
    }

    #[must_use]
    pub fn unmount_count(&self) -> usize {
        self.with_state(|state| state.unmount_count)
    }
}

/// Headless rendering surface whose widgets follow scripted loading behaviour.
///
/// Used by tests and dry runs; every element rasterizes to a solid fill of
/// the requested background.
#[derive(Debug)]
pub struct ScriptedSurface {
    default_script: ElementScript,
    scripts: HashMap<RenderId, ElementScript>,
    element_size: (u32, u32),
    mount_failure: Option<String>,
    reverse_mount_order: bool,
    log: SurfaceLog,
}

impl Default for ScriptedSurface {
    fn default() -> Self {
        Self::new(ElementScript::MarkerAfter(Duration::ZERO))
    }
}

impl ScriptedSurface {
    #[must_use]
    pub fn new(default_script: ElementScript) -> Self {
        Self {
            default_script,
            scripts: HashMap::new(),
            element_size: (160, 90),
            mount_failure: None,
            reverse_mount_order: false,
            log: SurfaceLog::default(),
        }
    }

    #[must_use]
    pub fn with_script(mut self, render_id: impl Into<RenderId>, script: ElementScript) -> Self {
        self.scripts.insert(render_id.into(), script);
        self
    }

    /// CSS size of every element; captures are this size times the raster scale.
    #[must_use]
    pub fn with_element_size(mut self, width: u32, height: u32) -> Self {
        self.element_size = (width, height);
        self
    }

    #[must_use]
    pub fn with_mount_failure(mut self, reason: impl Into<String>) -> Self {
        self.mount_failure = Some(reason.into());
        self
    }

    /// Returns mounted elements in reverse order, simulating a misbehaving host.
    #[must_use]
    pub fn with_reversed_mount_order(mut self) -> Self {
        self.reverse_mount_order = true;
        self
    }

    #[must_use]
    pub fn log(&self) -> SurfaceLog {
        self.log.clone()
    }
}

#[async_trait]
impl RenderingSurface for ScriptedSurface {
    async fn mount(&mut self, mounts: &[WidgetMount]) -> ExportResult<Vec<Box<dyn VisualElement>>> {
        if let Some(reason) = &self.mount_failure {
            return Err(ExportError::MountFailed(reason.clone()));
        }

        let mounted_at = Instant::now();
        let mut elements: Vec<Box<dyn VisualElement>> = Vec::with_capacity(mounts.len());
        for mount in mounts {
            let render_id = mount.artifact.render_id.clone();
            let script = self
                .scripts
                .get(&render_id)
                .cloned()
                .unwrap_or_else(|| self.default_script.clone());

            let signal = match script {
                ElementScript::SignalAfter(delay) => {
                    let (sender, receiver) = watch::channel(false);
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = sender.send(true);
                    });
                    Some(receiver)
                }
                _ => None,
            };

            self.log.with_state(|state| {
                state.mounted.push(render_id.clone());
                state.props.push(mount.props.clone());
            });
            elements.push(Box::new(ScriptedElement {
                render_id,
                script,
                mounted_at,
                css_size: self.element_size,
                signal,
                log: self.log.clone(),
            }));
        }

        if self.reverse_mount_order {
            elements.reverse();
        }
        Ok(elements)
    }

    async fn unmount(&mut self) {
        self.log.with_state(|state| state.unmount_count += 1);
    }
}

struct ScriptedElement {
    render_id: RenderId,
    script: ElementScript,
    mounted_at: Instant,
    css_size: (u32, u32),
    signal: Option<watch::Receiver<bool>>,
    log: SurfaceLog,
}

impl ScriptedElement {
    fn loading(&self) -> bool {
        let elapsed = self.mounted_at.elapsed();
        match &self.script {
            ElementScript::MarkerAfter(delay) | ElementScript::QuietAfter(delay) => {
                elapsed < *delay
            }
            ElementScript::SignalAfter(_) => !self
                .signal
                .as_ref()
                .is_some_and(|receiver| *receiver.borrow()),
            ElementScript::Stuck => true,
            ElementScript::FailCapture(_) => false,
        }
    }
}

#[async_trait]
impl VisualElement for ScriptedElement {
    fn render_id(&self) -> &RenderId {
        &self.render_id
    }

    fn text_content(&self) -> String {
        if self.loading() {
            "Calculating telemetry...".to_owned()
        } else {
            format!("{} rendered", self.render_id)
        }
    }

    fn has_busy_indicator(&self) -> bool {
        self.loading()
    }

    fn has_ready_marker(&self) -> bool {
        match &self.script {
            ElementScript::MarkerAfter(_) | ElementScript::FailCapture(_) => !self.loading(),
            _ => false,
        }
    }

    fn readiness_signal(&self) -> Option<watch::Receiver<bool>> {
        self.signal.clone()
    }

    async fn rasterize(&self, options: &RasterOptions) -> ExportResult<CapturedImage> {
        self.log
            .with_state(|state| state.captured.push(self.render_id.clone()));
        if let ElementScript::FailCapture(reason) = &self.script {
            return Err(ExportError::InvalidData(reason.clone()));
        }

        let scale = |value: u32| ((f64::from(value) * options.scale).round() as u32).max(1);
        CapturedImage::solid(
            self.render_id.clone(),
            scale(self.css_size.0),
            scale(self.css_size.1),
            options.background,
        )
    }
}
