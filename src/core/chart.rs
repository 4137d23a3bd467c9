use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::ChartId;
use crate::error::{ExportError, ExportResult};

/// Sidebar grouping of a chart. Only used for presentation and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartCategory {
    Session,
    Driver,
    Comparison,
    Standings,
}

/// Closed set of chart widgets the dashboard can mount.
///
/// Each kind owns its prop adapter (see `surface::WidgetProps`), so the
/// pipeline switches on this tag instead of passing loosely shaped props.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// Gap-to-leader evolution per lap ("worm" chart).
    RaceGaps,
    PitStrategy,
    TyreDegradation,
    FuelCorrectedPace,
    LapTelemetry,
    /// Distance-aligned delta between two drivers' fastest laps.
    GhostDelta,
    SectorDeltas,
    Leaderboard,
    TopSpeed,
}

/// Immutable build-time description of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub id: ChartId,
    pub label: String,
    pub category: ChartCategory,
    pub kind: ChartKind,
    /// Preferred widget height in CSS pixels on the off-screen surface.
    pub height_hint: u32,
    pub description: String,
    #[serde(default)]
    pub needs_focus: bool,
    #[serde(default)]
    pub needs_comparison: bool,
}

impl ChartDescriptor {
    #[must_use]
    pub fn new(id: impl Into<ChartId>, label: impl Into<String>, kind: ChartKind) -> Self {
        let category = match kind {
            ChartKind::RaceGaps | ChartKind::PitStrategy | ChartKind::TyreDegradation => {
                ChartCategory::Session
            }
            ChartKind::FuelCorrectedPace | ChartKind::LapTelemetry => ChartCategory::Driver,
            ChartKind::GhostDelta | ChartKind::SectorDeltas => ChartCategory::Comparison,
            ChartKind::Leaderboard | ChartKind::TopSpeed => ChartCategory::Standings,
        };
        Self {
            id: id.into(),
            label: label.into(),
            category,
            kind,
            height_hint: 480,
            description: String::new(),
            needs_focus: false,
            needs_comparison: false,
        }
    }

    #[must_use]
    pub fn with_height_hint(mut self, height_hint: u32) -> Self {
        self.height_hint = height_hint;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_focus(mut self) -> Self {
        self.needs_focus = true;
        self
    }

    #[must_use]
    pub fn with_comparison(mut self) -> Self {
        self.needs_comparison = true;
        self
    }
}

/// Ordered, id-unique list of chart descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRegistry {
    charts: Vec<ChartDescriptor>,
}

impl ChartRegistry {
    pub fn new(charts: Vec<ChartDescriptor>) -> ExportResult<Self> {
        let mut seen = HashSet::with_capacity(charts.len());
        for chart in &charts {
            if !seen.insert(chart.id.clone()) {
                return Err(ExportError::InvalidData(format!(
                    "duplicate chart id `{}` in registry",
                    chart.id
                )));
            }
        }
        Ok(Self { charts })
    }

    /// Chart set shipped with the dashboard, in sidebar order.
    #[must_use]
    pub fn f1_default() -> Self {
        let charts = vec![
            ChartDescriptor::new("race-gaps", "Race Gap Evolution", ChartKind::RaceGaps)
                .with_height_hint(520)
                .with_description("Gap to the race leader for every driver, lap by lap."),
            ChartDescriptor::new("pit-strategy", "Pit Stop Strategy", ChartKind::PitStrategy)
                .with_description("Stint lengths and compounds per driver."),
            ChartDescriptor::new(
                "tyre-degradation",
                "Tyre Degradation",
                ChartKind::TyreDegradation,
            )
            .with_description("Lap time trend per stint, grouped by compound."),
            ChartDescriptor::new(
                "fuel-corrected-pace",
                "Fuel-Corrected Pace",
                ChartKind::FuelCorrectedPace,
            )
            .with_description("Lap times normalized to an empty tank.")
            .with_focus(),
            ChartDescriptor::new("lap-telemetry", "Fastest Lap Telemetry", ChartKind::LapTelemetry)
                .with_height_hint(640)
                .with_description("Speed, throttle, brake and gear over lap distance.")
                .with_focus(),
            ChartDescriptor::new("ghost-delta", "Ghost Car Delta", ChartKind::GhostDelta)
                .with_description("Running time delta between two fastest laps.")
                .with_focus()
                .with_comparison(),
            ChartDescriptor::new("sector-deltas", "Sector Deltas", ChartKind::SectorDeltas)
                .with_description("Mini-sector time deltas against the session best.")
                .with_focus()
                .with_comparison(),
            ChartDescriptor::new("leaderboard", "Leaderboard", ChartKind::Leaderboard)
                .with_height_hint(720)
                .with_description("Classification with best laps and gaps."),
            ChartDescriptor::new("top-speed", "Top Speed Trap", ChartKind::TopSpeed)
                .with_height_hint(720)
                .with_description("Highest recorded speed trap value per driver."),
        ];
        Self { charts }
    }

    #[must_use]
    pub fn charts(&self) -> &[ChartDescriptor] {
        &self.charts
    }

    #[must_use]
    pub fn get(&self, id: &ChartId) -> Option<&ChartDescriptor> {
        self.charts.iter().find(|chart| &chart.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl<'de> Deserialize<'de> for ChartRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            charts: Vec<ChartDescriptor>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.charts).map_err(serde::de::Error::custom)
    }
}
