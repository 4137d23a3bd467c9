use serde::{Deserialize, Serialize};

use crate::api::{ArtifactDescriptor, PageWindow};
use crate::core::{ChartKind, DriverId};

/// Props a mounted widget receives, shaped per chart kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetProps {
    /// Session-wide chart driven only by the selection store.
    SessionOverview,
    /// Single-driver chart. `None` falls back to the store's selected driver.
    DriverFocus { driver: Option<DriverId> },
    DriverComparison {
        focus: Option<DriverId>,
        comparison: Option<DriverId>,
    },
    /// Per-driver table; `None` shows every row.
    Roster { window: Option<PageWindow> },
}

impl ChartKind {
    /// Prop adapter owned by each chart kind.
    #[must_use]
    pub fn adapt_props(self, artifact: &ArtifactDescriptor) -> WidgetProps {
        match self {
            Self::RaceGaps | Self::PitStrategy | Self::TyreDegradation => {
                WidgetProps::SessionOverview
            }
            Self::FuelCorrectedPace | Self::LapTelemetry => WidgetProps::DriverFocus {
                driver: artifact.config.focus.clone(),
            },
            Self::GhostDelta | Self::SectorDeltas => WidgetProps::DriverComparison {
                focus: artifact.config.focus.clone(),
                comparison: artifact.config.comparison.clone(),
            },
            Self::Leaderboard | Self::TopSpeed => WidgetProps::Roster {
                window: artifact.window,
            },
        }
    }
}

/// Everything the rendering surface needs to mount one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMount {
    pub artifact: ArtifactDescriptor,
    pub props: WidgetProps,
}

impl WidgetMount {
    #[must_use]
    pub fn for_artifact(artifact: &ArtifactDescriptor) -> Self {
        Self {
            props: artifact.kind.adapt_props(artifact),
            artifact: artifact.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{WidgetMount, WidgetProps};
    use crate::api::{PaginationPolicy, expand_artifacts};
    use crate::core::{
        ChartRegistry, DriverId, ExportConfig, ExportConfigEntry, SessionMetadata,
    };

    #[test]
    fn each_kind_adapts_its_own_props() {
        let registry = ChartRegistry::f1_default();
        let config = ExportConfig::new()
            .with_entry("race-gaps", ExportConfigEntry::enabled())
            .with_entry(
                "ghost-delta",
                ExportConfigEntry::enabled()
                    .with_focus("VER")
                    .with_comparison("LEC"),
            )
            .with_entry("top-speed", ExportConfigEntry::enabled());
        let charts = crate::api::resolve_enabled_charts(&registry, &config);
        let session = SessionMetadata::new(2024, "Monaco", "Q", "Monaco Grand Prix");
        let plan = expand_artifacts(&charts, &config, &PaginationPolicy::default(), &session);

        let props: Vec<WidgetProps> = plan
            .artifacts
            .iter()
            .map(|artifact| WidgetMount::for_artifact(artifact).props)
            .collect();

        assert_eq!(props[0], WidgetProps::SessionOverview);
        assert_eq!(
            props[1],
            WidgetProps::DriverComparison {
                focus: Some(DriverId::new("VER")),
                comparison: Some(DriverId::new("LEC")),
            }
        );
        assert!(matches!(
            props[3],
            WidgetProps::Roster {
                window: Some(window)
            } if window.page == 2 && window.limit == 10
        ));
    }
}
