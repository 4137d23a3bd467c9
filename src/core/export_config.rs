use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{ChartId, DriverId};
use crate::error::{ExportError, ExportResult};

/// Per-chart export switch plus optional driver overrides.
///
/// Missing entries and `enabled == false` both exclude the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportConfigEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_override: Option<DriverId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_override: Option<DriverId>,
}

impl ExportConfigEntry {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_focus(mut self, driver: impl Into<DriverId>) -> Self {
        self.focus_override = Some(driver.into());
        self
    }

    #[must_use]
    pub fn with_comparison(mut self, driver: impl Into<DriverId>) -> Self {
        self.comparison_override = Some(driver.into());
        self
    }
}

/// Export configuration keyed by chart id, owned by the configuration UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportConfig {
    entries: IndexMap<ChartId, ExportConfigEntry>,
}

impl ExportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, id: impl Into<ChartId>, entry: ExportConfigEntry) -> Self {
        self.entries.insert(id.into(), entry);
        self
    }

    pub fn set_entry(&mut self, id: impl Into<ChartId>, entry: ExportConfigEntry) {
        self.entries.insert(id.into(), entry);
    }

    #[must_use]
    pub fn entry(&self, id: &ChartId) -> Option<&ExportConfigEntry> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn is_enabled(&self, id: &ChartId) -> bool {
        self.entries.get(id).is_some_and(|entry| entry.enabled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(input: &str) -> ExportResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ExportError::InvalidConfig(format!("failed to parse export configuration: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> ExportResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExportError::InvalidConfig(format!("failed to serialize export configuration: {e}"))
        })
    }
}
