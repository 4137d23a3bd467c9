use criterion::{Criterion, criterion_group, criterion_main};
use overcut_report::api::{
    PageCap, PaginationPolicy, expand_artifacts, fit_within, place_image, resolve_enabled_charts,
};
use overcut_report::core::{
    ChartDescriptor, ChartKind, ChartRegistry, ExportConfig, ExportConfigEntry, PageGeometry,
    SessionMetadata,
};
use std::hint::black_box;

fn bench_fit_within(c: &mut Criterion) {
    c.bench_function("fit_within_wide_capture", |b| {
        b.iter(|| {
            let _ = fit_within(
                black_box(3200.0),
                black_box(1800.0),
                black_box(1840.0),
                black_box(840.0),
            )
            .expect("fit");
        })
    });

    let geometry = PageGeometry::default();
    c.bench_function("place_image_tall_capture", |b| {
        b.iter(|| {
            let _ = place_image(black_box(geometry), black_box(900.0), black_box(2400.0))
                .expect("place");
        })
    });
}

fn bench_expand_artifacts_200(c: &mut Criterion) {
    let kinds = [
        ChartKind::RaceGaps,
        ChartKind::LapTelemetry,
        ChartKind::GhostDelta,
        ChartKind::Leaderboard,
        ChartKind::TopSpeed,
    ];
    let mut config = ExportConfig::new();
    let charts: Vec<ChartDescriptor> = (0..200)
        .map(|index| {
            let id = format!("chart-{index}");
            if index % 3 != 0 {
                config.set_entry(
                    id.as_str(),
                    ExportConfigEntry::enabled()
                        .with_focus("VER")
                        .with_comparison("NOR"),
                );
            }
            ChartDescriptor::new(id.as_str(), format!("Chart {index}"), kinds[index % kinds.len()])
        })
        .collect();
    let registry = ChartRegistry::new(charts).expect("registry");
    let policy = PaginationPolicy::default().with_cap(ChartKind::Leaderboard, PageCap::new(3, 10));
    let session = SessionMetadata::new(2024, "Interlagos", "S", "Sao Paulo Grand Prix");

    c.bench_function("select_and_expand_200_charts", |b| {
        b.iter(|| {
            let selected = resolve_enabled_charts(black_box(&registry), black_box(&config));
            let plan = expand_artifacts(&selected, &config, &policy, &session);
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_fit_within, bench_expand_artifacts_200);
criterion_main!(benches);
