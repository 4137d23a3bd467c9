mod capture_engine;
mod document_assembler;
mod download_sink;
mod fit_within;
mod pagination_expander;
mod pipeline;
mod pipeline_config;
mod progress;
mod readiness_poller;
mod run_state;
mod selection_resolver;

pub use capture_engine::{CaptureFailurePolicy, CapturePolicy, capture_element};
pub use document_assembler::{
    DEFAULT_REPORT_TITLE, DocumentAssembler, annotation_text, header_text,
};
pub use download_sink::{DownloadSink, FileDownloadSink, MemoryDownloadSink};
pub use fit_within::{FittedSize, ImagePlacement, fit_within, place_image};
pub use pagination_expander::{
    ArtifactDescriptor, ArtifactPlan, PageCap, PageWindow, PaginationPolicy, ResolvedChartConfig,
    Truncation, expand_artifacts,
};
pub use pipeline::{
    ArtifactOutcome, ExportContext, ExportReport, ExportTargets, ExportedDocument, ReportExporter,
};
pub use pipeline_config::{
    EXPORT_PIPELINE_CONFIG_JSON_SCHEMA_V1, ExportPipelineConfig,
    ExportPipelineConfigJsonContractV1,
};
pub use progress::{
    EventLog, ExportEvent, ExportObserver, ProgressPolicy, ProgressTracker, progress_percent,
};
pub use readiness_poller::{
    ReadinessOutcome, ReadinessPolicy, ReadySource, probe_readiness, wait_until_ready,
};
pub use run_state::{RunGuard, RunSlot, RunState, RunStatus};
pub use selection_resolver::resolve_enabled_charts;
