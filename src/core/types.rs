use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a chart in the registry (for example `"leaderboard"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Three-letter driver code. Codes are normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DriverId(String);

impl DriverId {
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for DriverId {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<DriverId> for String {
    fn from(id: DriverId) -> Self {
        id.0
    }
}

/// Identity of one mounted artifact, unique within an export run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderId(String);

impl RenderId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Render id for an artifact of `chart`, suffixed with `-p{page}` when paginated.
    #[must_use]
    pub fn for_artifact(chart: &ChartId, page: Option<u32>) -> Self {
        match page {
            Some(page) => Self(format!("{chart}-p{page}")),
            None => Self(chart.as_str().to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RenderId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
