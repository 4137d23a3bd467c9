//! overcut-report: report-export pipeline for the Overcut F1 telemetry dashboard.
//!
//! The crate turns a set of asynchronously loading chart widgets into a
//! paginated, fixed-geometry document. Widgets live on a host-provided
//! rendering surface; the pipeline selects and expands charts, waits for each
//! widget to finish loading, captures it and lays it out on its own page.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod surface;
pub mod telemetry;

pub use api::{ExportContext, ExportPipelineConfig, ReportExporter};
pub use error::{ExportError, ExportResult};
