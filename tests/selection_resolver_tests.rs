use overcut_report::api::resolve_enabled_charts;
use overcut_report::core::{
    ChartDescriptor, ChartId, ChartKind, ChartRegistry, ExportConfig, ExportConfigEntry,
};

fn ids(charts: &[&ChartDescriptor]) -> Vec<String> {
    charts.iter().map(|chart| chart.id.to_string()).collect()
}

#[test]
fn only_explicitly_enabled_charts_are_selected() {
    let registry = ChartRegistry::new(vec![
        ChartDescriptor::new("a", "A", ChartKind::RaceGaps),
        ChartDescriptor::new("b", "B", ChartKind::PitStrategy),
        ChartDescriptor::new("c", "C", ChartKind::TyreDegradation),
    ])
    .expect("registry");
    let config = ExportConfig::new()
        .with_entry("a", ExportConfigEntry::enabled())
        .with_entry("b", ExportConfigEntry::disabled());

    let selected = resolve_enabled_charts(&registry, &config);
    assert_eq!(ids(&selected), vec!["a"]);
}

#[test]
fn selection_follows_registry_order_not_config_order() {
    let registry = ChartRegistry::f1_default();
    let config = ExportConfig::new()
        .with_entry("top-speed", ExportConfigEntry::enabled())
        .with_entry("race-gaps", ExportConfigEntry::enabled())
        .with_entry("lap-telemetry", ExportConfigEntry::enabled());

    let selected = resolve_enabled_charts(&registry, &config);
    assert_eq!(ids(&selected), vec!["race-gaps", "lap-telemetry", "top-speed"]);
}

#[test]
fn empty_config_selects_nothing() {
    let registry = ChartRegistry::f1_default();
    let selected = resolve_enabled_charts(&registry, &ExportConfig::new());
    assert!(selected.is_empty());
}

#[test]
fn entries_for_unknown_charts_are_ignored() {
    let registry = ChartRegistry::f1_default();
    let config = ExportConfig::new()
        .with_entry("not-a-chart", ExportConfigEntry::enabled())
        .with_entry("leaderboard", ExportConfigEntry::enabled());

    let selected = resolve_enabled_charts(&registry, &config);
    assert_eq!(ids(&selected), vec!["leaderboard"]);
    assert!(config.is_enabled(&ChartId::new("not-a-chart")));
}

#[test]
fn config_loaded_from_json_keeps_default_deny() {
    let registry = ChartRegistry::f1_default();
    let config = ExportConfig::from_json_str(
        r#"{
            "ghost-delta": { "enabled": true, "focus_override": "ver", "comparison_override": "nor" },
            "sector-deltas": { "enabled": false }
        }"#,
    )
    .expect("config json");

    let selected = resolve_enabled_charts(&registry, &config);
    assert_eq!(ids(&selected), vec!["ghost-delta"]);
}
