use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    ChartDescriptor, ChartId, ChartKind, DriverId, ExportConfig, RenderId, SessionMetadata,
};
use crate::error::{ExportError, ExportResult};

/// Fixed page count and rows per page for one paginated chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCap {
    pub pages: u32,
    pub limit: u32,
}

impl PageCap {
    #[must_use]
    pub const fn new(pages: u32, limit: u32) -> Self {
        Self { pages, limit }
    }

    /// Rows the capped pages can show in total.
    #[must_use]
    pub fn capacity(self) -> usize {
        self.pages as usize * self.limit as usize
    }
}

/// Page parameters handed to a paginated widget. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    /// Index of the first row shown on this page.
    #[must_use]
    pub fn offset(self) -> usize {
        (self.page.saturating_sub(1)) as usize * self.limit as usize
    }
}

/// Per-kind page caps. Kinds without a cap emit a single artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationPolicy {
    caps: IndexMap<ChartKind, PageCap>,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::unpaginated()
            .with_cap(ChartKind::Leaderboard, PageCap::new(2, 10))
            .with_cap(ChartKind::TopSpeed, PageCap::new(2, 10))
    }
}

impl PaginationPolicy {
    #[must_use]
    pub fn unpaginated() -> Self {
        Self {
            caps: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_cap(mut self, kind: ChartKind, cap: PageCap) -> Self {
        self.caps.insert(kind, cap);
        self
    }

    #[must_use]
    pub fn without_cap(mut self, kind: ChartKind) -> Self {
        self.caps.shift_remove(&kind);
        self
    }

    #[must_use]
    pub fn cap_for(&self, kind: ChartKind) -> Option<PageCap> {
        self.caps.get(&kind).copied()
    }

    pub fn validate(&self) -> ExportResult<()> {
        for (kind, cap) in &self.caps {
            if cap.pages == 0 || cap.limit == 0 {
                return Err(ExportError::InvalidConfig(format!(
                    "page cap for {kind:?} must have pages >= 1 and limit >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// Driver overrides resolved for one artifact.
///
/// Overrides only survive for charts that declare the matching capability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedChartConfig {
    pub focus: Option<DriverId>,
    pub comparison: Option<DriverId>,
}

/// One physical output page's worth of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub render_id: RenderId,
    pub source_chart_id: ChartId,
    pub kind: ChartKind,
    pub label: String,
    pub height_hint: u32,
    pub window: Option<PageWindow>,
    pub config: ResolvedChartConfig,
}

/// Roster larger than the fixed pages can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    pub chart_id: ChartId,
    pub capacity: usize,
    pub roster_size: usize,
}

/// Authoritative artifact order for mounting, capture and page assembly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactPlan {
    pub artifacts: Vec<ArtifactDescriptor>,
    pub truncations: Vec<Truncation>,
}

impl ArtifactPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }
}

/// Expands resolved charts into artifacts: charts in input order, pages ascending.
///
/// Page counts come from `policy`, never from the data. When the session
/// roster exceeds a cap's capacity the extra rows are not exported; this is
/// logged and recorded in the plan.
#[must_use]
pub fn expand_artifacts(
    charts: &[&ChartDescriptor],
    config: &ExportConfig,
    policy: &PaginationPolicy,
    session: &SessionMetadata,
) -> ArtifactPlan {
    let mut plan = ArtifactPlan::default();

    for chart in charts {
        let resolved = resolve_chart_config(chart, config);
        match policy.cap_for(chart.kind) {
            Some(cap) => {
                if let Some(roster_size) = session.roster_size.filter(|size| *size > cap.capacity())
                {
                    warn!(
                        chart = %chart.id,
                        roster_size,
                        capacity = cap.capacity(),
                        pages = cap.pages,
                        limit = cap.limit,
                        "roster exceeds fixed page cap; trailing rows will not be exported"
                    );
                    plan.truncations.push(Truncation {
                        chart_id: chart.id.clone(),
                        capacity: cap.capacity(),
                        roster_size,
                    });
                }
                for page in 1..=cap.pages {
                    plan.artifacts.push(artifact_for(
                        chart,
                        Some(PageWindow {
                            page,
                            limit: cap.limit,
                        }),
                        resolved.clone(),
                    ));
                }
            }
            None => plan.artifacts.push(artifact_for(chart, None, resolved)),
        }
    }

    debug!(
        charts = charts.len(),
        artifacts = plan.artifacts.len(),
        truncations = plan.truncations.len(),
        "expanded export artifacts"
    );
    plan
}

fn resolve_chart_config(chart: &ChartDescriptor, config: &ExportConfig) -> ResolvedChartConfig {
    let Some(entry) = config.entry(&chart.id) else {
        return ResolvedChartConfig::default();
    };
    ResolvedChartConfig {
        focus: entry
            .focus_override
            .clone()
            .filter(|_| chart.needs_focus),
        comparison: entry
            .comparison_override
            .clone()
            .filter(|_| chart.needs_comparison),
    }
}

fn artifact_for(
    chart: &ChartDescriptor,
    window: Option<PageWindow>,
    config: ResolvedChartConfig,
) -> ArtifactDescriptor {
    ArtifactDescriptor {
        render_id: RenderId::for_artifact(&chart.id, window.map(|window| window.page)),
        source_chart_id: chart.id.clone(),
        kind: chart.kind,
        label: chart.label.clone(),
        height_hint: chart.height_hint,
        window,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::{PageWindow, resolve_chart_config};
    use crate::core::{ChartDescriptor, ChartKind, DriverId, ExportConfig, ExportConfigEntry};

    #[test]
    fn page_window_offset_is_zero_based() {
        assert_eq!(PageWindow { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(PageWindow { page: 3, limit: 10 }.offset(), 20);
    }

    #[test]
    fn overrides_are_dropped_for_charts_without_capability() {
        let chart = ChartDescriptor::new("gaps", "Gaps", ChartKind::RaceGaps);
        let config = ExportConfig::new().with_entry(
            "gaps",
            ExportConfigEntry::enabled()
                .with_focus("VER")
                .with_comparison("NOR"),
        );
        let resolved = resolve_chart_config(&chart, &config);
        assert_eq!(resolved.focus, None);
        assert_eq!(resolved.comparison, None);

        let chart = ChartDescriptor::new("gaps", "Gaps", ChartKind::GhostDelta)
            .with_focus()
            .with_comparison();
        let resolved = resolve_chart_config(&chart, &config);
        assert_eq!(resolved.focus, Some(DriverId::new("VER")));
        assert_eq!(resolved.comparison, Some(DriverId::new("NOR")));
    }
}
