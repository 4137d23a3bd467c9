use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{ChartRegistry, ExportConfig, RenderId, SessionMetadata};
use crate::error::{ExportError, ExportResult};
use crate::render::DocumentWriter;
use crate::surface::{RenderingSurface, VisualElement, WidgetMount};

use super::{
    ArtifactPlan, CaptureFailurePolicy, DocumentAssembler, DownloadSink, ExportEvent,
    ExportObserver, ExportPipelineConfig, ProgressTracker, ReadinessOutcome, RunGuard, RunSlot,
    Truncation, capture_element, expand_artifacts, progress_percent, resolve_enabled_charts,
    wait_until_ready,
};

/// Read-only inputs of one run, snapshotted when the run is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportContext {
    pub registry: ChartRegistry,
    pub config: ExportConfig,
    pub session: SessionMetadata,
    pub generated_at: DateTime<Utc>,
}

impl ExportContext {
    #[must_use]
    pub fn new(registry: ChartRegistry, config: ExportConfig, session: SessionMetadata) -> Self {
        Self {
            registry,
            config,
            session,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// Finalized report bytes. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Cover included.
    pub page_count: usize,
}

/// How one artifact ended up in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactOutcome {
    pub render_id: RenderId,
    pub page_number: usize,
    pub readiness: ReadinessOutcome,
    /// Set when a placeholder page replaced a failed capture.
    pub placeholder_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub document: ExportedDocument,
    pub artifacts: Vec<ArtifactOutcome>,
    pub truncations: Vec<Truncation>,
    pub saved_to: Option<String>,
}

/// Collaborators a run writes into.
pub struct ExportTargets<'a, S: ?Sized, W: ?Sized, D: ?Sized> {
    pub surface: &'a mut S,
    pub writer: &'a mut W,
    pub sink: &'a mut D,
    pub observer: &'a mut dyn ExportObserver,
}

impl<'a, S, W, D> ExportTargets<'a, S, W, D>
where
    S: RenderingSurface + ?Sized,
    W: DocumentWriter + ?Sized,
    D: DownloadSink + ?Sized,
{
    pub fn new(
        surface: &'a mut S,
        writer: &'a mut W,
        sink: &'a mut D,
        observer: &'a mut dyn ExportObserver,
    ) -> Self {
        Self {
            surface,
            writer,
            sink,
            observer,
        }
    }
}

/// Progress, events and the run slot for the run in flight.
struct ActiveRun<'a> {
    observer: &'a mut dyn ExportObserver,
    progress: ProgressTracker,
    guard: RunGuard,
}

impl ActiveRun<'_> {
    fn emit(&mut self, event: ExportEvent) {
        self.observer.on_event(&event);
    }

    fn advance(&mut self, percent: u8) {
        if let Some(percent) = self.progress.advance(percent) {
            self.emit(ExportEvent::Progress { percent });
        }
    }
}

/// Runs the export pipeline: select, expand, mount, then poll, capture and
/// append one page per artifact, strictly in plan order.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    config: ExportPipelineConfig,
    slot: RunSlot,
}

impl ReportExporter {
    pub fn new(config: ExportPipelineConfig) -> ExportResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            slot: RunSlot::default(),
        })
    }

    /// Shares `slot` with other exporters so they exclude each other.
    #[must_use]
    pub fn with_run_slot(mut self, slot: RunSlot) -> Self {
        self.slot = slot;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ExportPipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn run_slot(&self) -> RunSlot {
        self.slot.clone()
    }

    /// Selected charts expanded into artifacts, in authoritative order.
    pub fn plan(&self, ctx: &ExportContext) -> ExportResult<ArtifactPlan> {
        let charts = resolve_enabled_charts(&ctx.registry, &ctx.config);
        let plan = expand_artifacts(&charts, &ctx.config, &self.config.pagination, &ctx.session);
        if plan.is_empty() {
            return Err(ExportError::NoArtifactsSelected);
        }
        Ok(plan)
    }

    /// Produces and saves one report.
    ///
    /// Returns `RunInProgress` without touching any target when another run
    /// holds the slot. Every other failure unmounts the surface, emits
    /// `Failed` and resets progress.
    pub async fn export<S, W, D>(
        &self,
        ctx: &ExportContext,
        targets: ExportTargets<'_, S, W, D>,
        cancel: &CancellationToken,
    ) -> ExportResult<ExportReport>
    where
        S: RenderingSurface + ?Sized,
        W: DocumentWriter + ?Sized,
        D: DownloadSink + ?Sized,
    {
        let guard = self.slot.try_begin(0)?;
        let ExportTargets {
            surface,
            writer,
            sink,
            observer,
        } = targets;
        let mut active = ActiveRun {
            observer,
            progress: ProgressTracker::default(),
            guard,
        };

        let result = self.run(ctx, surface, writer, sink, &mut active, cancel).await;
        let ActiveRun {
            observer,
            mut progress,
            guard,
        } = active;

        match result {
            Ok(report) => {
                if let Some(percent) = progress.advance(100) {
                    observer.on_event(&ExportEvent::Progress { percent });
                }
                info!(
                    filename = %report.document.filename,
                    pages = report.document.page_count,
                    "report export completed"
                );
                observer.on_event(&ExportEvent::Completed {
                    page_count: report.document.page_count,
                    filename: report.document.filename.clone(),
                });
                guard.complete();
                progress.reset();
                observer.on_event(&ExportEvent::ProgressReset);
                Ok(report)
            }
            Err(err) => {
                warn!(error = %err, "report export failed");
                observer.on_event(&ExportEvent::Failed {
                    reason: err.to_string(),
                });
                guard.fail();
                progress.reset();
                observer.on_event(&ExportEvent::ProgressReset);
                Err(err)
            }
        }
    }

    async fn run<S, W, D>(
        &self,
        ctx: &ExportContext,
        surface: &mut S,
        writer: &mut W,
        sink: &mut D,
        active: &mut ActiveRun<'_>,
        cancel: &CancellationToken,
    ) -> ExportResult<ExportReport>
    where
        S: RenderingSurface + ?Sized,
        W: DocumentWriter + ?Sized,
        D: DownloadSink + ?Sized,
    {
        let plan = self.plan(ctx)?;
        writer.reset()?;
        active.guard.set_total(plan.len());
        info!(
            artifacts = plan.len(),
            truncations = plan.truncations.len(),
            session = %ctx.session.session_line(),
            "report export started"
        );
        active.emit(ExportEvent::Started { total: plan.len() });
        active.emit(ExportEvent::Progress { percent: 0 });

        let mounts: Vec<WidgetMount> = plan.artifacts.iter().map(WidgetMount::for_artifact).collect();
        let mounted = tokio::select! {
            () = cancel.cancelled() => Err(ExportError::Cancelled),
            result = surface.mount(&mounts) => result,
        };
        let captured = match mounted {
            Ok(elements) => {
                self.write_pages(ctx, &plan, &elements, writer, active, cancel)
                    .await
            }
            Err(err) => Err(err),
        };
        surface.unmount().await;
        let artifacts = captured?;

        let bytes = writer.finish()?;
        let document = ExportedDocument {
            filename: ctx.session.report_filename(writer.extension()),
            mime_type: writer.mime_type().to_owned(),
            bytes,
            page_count: writer.page_count(),
        };
        debug!(
            bytes = document.bytes.len(),
            pages = document.page_count,
            "document finalized"
        );

        let saved_to = tokio::select! {
            () = cancel.cancelled() => return Err(ExportError::Cancelled),
            saved = sink.save(&document) => saved?,
        };

        Ok(ExportReport {
            document,
            artifacts,
            truncations: plan.truncations,
            saved_to,
        })
    }

    async fn write_pages<W>(
        &self,
        ctx: &ExportContext,
        plan: &ArtifactPlan,
        elements: &[Box<dyn VisualElement>],
        writer: &mut W,
        active: &mut ActiveRun<'_>,
        cancel: &CancellationToken,
    ) -> ExportResult<Vec<ArtifactOutcome>>
    where
        W: DocumentWriter + ?Sized,
    {
        verify_mount_order(plan, elements)?;
        active.advance(self.config.progress.base);

        let assembler = DocumentAssembler::new(
            self.config.geometry,
            self.config.capture.background_color()?,
        )?
        .with_title(self.config.report_title.as_str());
        let raster = self.config.capture.raster_options()?;
        let settle_delay = self.config.capture.settle_delay();
        let total = plan.len();
        let page_total = total + 1;

        writer.write_page(assembler.cover_page(&ctx.session, ctx.generated_at, total))?;

        let mut outcomes = Vec::with_capacity(total);
        for (index, (artifact, element)) in plan.artifacts.iter().zip(elements).enumerate() {
            let page_number = index + 2;
            let render_id = artifact.render_id.clone();

            let readiness =
                wait_until_ready(&**element, &self.config.readiness, cancel).await?;
            match readiness {
                ReadinessOutcome::Ready { source, .. } => active.emit(ExportEvent::ArtifactReady {
                    render_id: render_id.clone(),
                    source,
                }),
                ReadinessOutcome::TimedOut { waited } => active.emit(ExportEvent::ArtifactTimedOut {
                    render_id: render_id.clone(),
                    waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                }),
            }

            let mut placeholder_reason = None;
            let page = match capture_element(&**element, &raster, settle_delay, cancel).await
            {
                Ok(image) => assembler.artifact_page(artifact, page_number, page_total, image)?,
                Err(err)
                    if !err.is_cancellation()
                        && self.config.capture_failure == CaptureFailurePolicy::Placeholder =>
                {
                    warn!(
                        render_id = %render_id,
                        error = %err,
                        "capture failed; writing placeholder page"
                    );
                    let reason = err.to_string();
                    active.emit(ExportEvent::CaptureSkipped {
                        render_id: render_id.clone(),
                        reason: reason.clone(),
                    });
                    let page = assembler.placeholder_page(artifact, page_number, page_total, &reason);
                    placeholder_reason = Some(reason);
                    page
                }
                Err(err) => return Err(err),
            };
            writer.write_page(page)?;

            if placeholder_reason.is_none() {
                active.emit(ExportEvent::ArtifactCaptured {
                    render_id: render_id.clone(),
                    page_number,
                });
            }
            outcomes.push(ArtifactOutcome {
                render_id,
                page_number,
                readiness,
                placeholder_reason,
            });
            active.guard.record_processed(index + 1);
            active.advance(progress_percent(self.config.progress, index + 1, total));

            tokio::task::yield_now().await;
        }

        Ok(outcomes)
    }
}

fn verify_mount_order(plan: &ArtifactPlan, elements: &[Box<dyn VisualElement>]) -> ExportResult<()> {
    for index in 0..plan.len().max(elements.len()) {
        let expected = plan.artifacts.get(index).map(|artifact| &artifact.render_id);
        let found = elements.get(index).map(|element| element.render_id());
        if expected != found {
            let describe =
                |id: Option<&RenderId>| id.map_or_else(|| "<none>".to_owned(), ToString::to_string);
            return Err(ExportError::MountOrderMismatch {
                index,
                expected: describe(expected),
                found: describe(found),
            });
        }
    }
    Ok(())
}
