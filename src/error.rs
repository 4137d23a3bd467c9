use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no charts are enabled for export")]
    NoArtifactsSelected,

    #[error("an export run is already in progress")]
    RunInProgress,

    #[error("export run was cancelled")]
    Cancelled,

    #[error("failed to mount report widgets: {0}")]
    MountFailed(String),

    #[error("mounted element {index} has render id `{found}`, expected `{expected}`")]
    MountOrderMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("failed to capture `{render_id}`: {reason}")]
    CaptureFailed { render_id: String, reason: String },

    #[error("failed to finalize document: {0}")]
    FinalizationFailed(String),

    #[error("invalid page geometry: width={width}, height={height}")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ExportError {
    /// Returns `true` when the run ended because its cancellation token fired.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
