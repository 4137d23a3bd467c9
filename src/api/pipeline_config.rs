use serde::{Deserialize, Serialize};

use crate::core::PageGeometry;
use crate::error::{ExportError, ExportResult};

use super::{
    CaptureFailurePolicy, CapturePolicy, DEFAULT_REPORT_TITLE, PaginationPolicy, ProgressPolicy,
    ReadinessPolicy,
};

pub const EXPORT_PIPELINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Every tunable of an export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPipelineConfig {
    #[serde(default)]
    pub geometry: PageGeometry,
    #[serde(default)]
    pub readiness: ReadinessPolicy,
    #[serde(default)]
    pub capture: CapturePolicy,
    #[serde(default)]
    pub progress: ProgressPolicy,
    #[serde(default)]
    pub pagination: PaginationPolicy,
    #[serde(default)]
    pub capture_failure: CaptureFailurePolicy,
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

impl Default for ExportPipelineConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            readiness: ReadinessPolicy::default(),
            capture: CapturePolicy::default(),
            progress: ProgressPolicy::default(),
            pagination: PaginationPolicy::default(),
            capture_failure: CaptureFailurePolicy::default(),
            report_title: default_report_title(),
        }
    }
}

fn default_report_title() -> String {
    DEFAULT_REPORT_TITLE.to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPipelineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ExportPipelineConfig,
}

impl ExportPipelineConfig {
    #[must_use]
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    #[must_use]
    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }

    #[must_use]
    pub fn with_capture(mut self, capture: CapturePolicy) -> Self {
        self.capture = capture;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressPolicy) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationPolicy) -> Self {
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn with_capture_failure(mut self, policy: CaptureFailurePolicy) -> Self {
        self.capture_failure = policy;
        self
    }

    #[must_use]
    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }

    pub fn validate(&self) -> ExportResult<()> {
        self.geometry.validate()?;
        self.readiness.validate()?;
        self.capture.validate()?;
        self.progress.validate()?;
        self.pagination.validate()?;
        if self.report_title.trim().is_empty() {
            return Err(ExportError::InvalidConfig(
                "report title must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_contract_v1_pretty(&self) -> ExportResult<String> {
        let payload = ExportPipelineConfigJsonContractV1 {
            schema_version: EXPORT_PIPELINE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ExportError::InvalidData(format!(
                "failed to serialize pipeline config contract v1: {e}"
            ))
        })
    }

    /// Accepts either a bare config object or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ExportResult<Self> {
        let config = match serde_json::from_str::<ExportPipelineConfigJsonContractV1>(input) {
            Ok(payload) => {
                if payload.schema_version != EXPORT_PIPELINE_CONFIG_JSON_SCHEMA_V1 {
                    return Err(ExportError::InvalidData(format!(
                        "unsupported pipeline config schema version: {}",
                        payload.schema_version
                    )));
                }
                payload.config
            }
            Err(_) => serde_json::from_str::<Self>(input).map_err(|e| {
                ExportError::InvalidData(format!("failed to parse pipeline config json: {e}"))
            })?,
        };
        config.validate()?;
        Ok(config)
    }
}
