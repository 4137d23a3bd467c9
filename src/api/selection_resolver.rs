use tracing::debug;

use crate::core::{ChartDescriptor, ChartRegistry, ExportConfig};

/// Filters the registry down to charts explicitly enabled for export.
///
/// Default-deny: a chart without a configuration entry, or with
/// `enabled == false`, is excluded. Registry order is preserved.
#[must_use]
pub fn resolve_enabled_charts<'a>(
    registry: &'a ChartRegistry,
    config: &ExportConfig,
) -> Vec<&'a ChartDescriptor> {
    let selected: Vec<&ChartDescriptor> = registry
        .charts()
        .iter()
        .filter(|chart| config.is_enabled(&chart.id))
        .collect();
    debug!(
        registry_len = registry.len(),
        config_entries = config.len(),
        selected = selected.len(),
        "resolved export selection"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::resolve_enabled_charts;
    use crate::core::{ChartDescriptor, ChartKind, ChartRegistry, ExportConfig, ExportConfigEntry};

    #[test]
    fn empty_configuration_selects_nothing() {
        let registry = ChartRegistry::f1_default();
        assert!(resolve_enabled_charts(&registry, &ExportConfig::new()).is_empty());
    }

    #[test]
    fn selection_follows_registry_order_not_config_order() {
        let registry = ChartRegistry::new(vec![
            ChartDescriptor::new("a", "A", ChartKind::RaceGaps),
            ChartDescriptor::new("b", "B", ChartKind::PitStrategy),
        ])
        .expect("registry");
        let config = ExportConfig::new()
            .with_entry("b", ExportConfigEntry::enabled())
            .with_entry("a", ExportConfigEntry::enabled());

        let ids: Vec<&str> = resolve_enabled_charts(&registry, &config)
            .into_iter()
            .map(|chart| chart.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
