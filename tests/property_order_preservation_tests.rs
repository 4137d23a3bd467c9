use std::time::Duration;

use overcut_report::api::{
    EventLog, ExportContext, ExportPipelineConfig, ExportTargets, MemoryDownloadSink, PageCap,
    PaginationPolicy, ReadinessPolicy, ReportExporter,
};
use overcut_report::core::{
    ChartDescriptor, ChartKind, ChartRegistry, ExportConfig, ExportConfigEntry, RenderId,
    SessionMetadata,
};
use overcut_report::render::{NullDocumentWriter, PageRole};
use overcut_report::surface::{ElementScript, ScriptedSurface};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

const KINDS: [ChartKind; 9] = [
    ChartKind::RaceGaps,
    ChartKind::PitStrategy,
    ChartKind::TyreDegradation,
    ChartKind::FuelCorrectedPace,
    ChartKind::LapTelemetry,
    ChartKind::GhostDelta,
    ChartKind::SectorDeltas,
    ChartKind::Leaderboard,
    ChartKind::TopSpeed,
];

fn script_for(choice: u8) -> ElementScript {
    match choice % 4 {
        0 => ElementScript::MarkerAfter(Duration::from_millis(u64::from(choice) * 40)),
        1 => ElementScript::SignalAfter(Duration::from_millis(u64::from(choice) * 30)),
        2 => ElementScript::QuietAfter(Duration::from_millis(100)),
        _ => ElementScript::Stuck,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn plan_mount_capture_and_page_order_are_identical(
        charts in prop::collection::vec((0usize..KINDS.len(), any::<bool>(), any::<u8>()), 1..10),
        leaderboard_pages in 1u32..4
    ) {
        prop_assume!(charts.iter().any(|(_, enabled, _)| *enabled));

        let mut config = ExportConfig::new();
        let mut descriptors = Vec::with_capacity(charts.len());
        let mut surface = ScriptedSurface::new(ElementScript::MarkerAfter(Duration::ZERO));
        for (index, (kind, enabled, script)) in charts.iter().enumerate() {
            let id = format!("chart-{index}");
            if *enabled {
                config.set_entry(id.as_str(), ExportConfigEntry::enabled());
            }
            descriptors.push(ChartDescriptor::new(id.as_str(), format!("Chart {index}"), KINDS[*kind]));
            surface = surface.with_script(id.as_str(), script_for(*script));
        }
        let registry = ChartRegistry::new(descriptors).expect("unique ids");
        let ctx = ExportContext::new(
            registry,
            config,
            SessionMetadata::new(2025, "Suzuka", "Q", "Japanese Grand Prix"),
        );

        let pipeline_config = ExportPipelineConfig::default()
            .with_readiness(ReadinessPolicy {
                max_wait_ms: 2_000,
                ..ReadinessPolicy::default()
            })
            .with_pagination(
                PaginationPolicy::default()
                    .with_cap(ChartKind::Leaderboard, PageCap::new(leaderboard_pages, 10)),
            );
        let exporter = ReportExporter::new(pipeline_config).expect("config");
        let plan = exporter.plan(&ctx).expect("at least one chart enabled");
        let planned: Vec<RenderId> = plan
            .artifacts
            .iter()
            .map(|artifact| artifact.render_id.clone())
            .collect();

        let log = surface.log();
        let mut writer = NullDocumentWriter::default();
        let mut sink = MemoryDownloadSink::default();
        let mut events = EventLog::default();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .expect("runtime");
        let report = runtime
            .block_on(exporter.export(
                &ctx,
                ExportTargets::new(&mut surface, &mut writer, &mut sink, &mut events),
                &CancellationToken::new(),
            ))
            .expect("export");

        let manifest = NullDocumentWriter::manifest_from_bytes(&report.document.bytes)
            .expect("manifest");
        let paged: Vec<RenderId> = manifest
            .iter()
            .skip(1)
            .filter_map(|page| match &page.role {
                PageRole::Artifact { render_id } => Some(render_id.clone()),
                PageRole::Cover => None,
            })
            .collect();

        prop_assert_eq!(&manifest[0].role, &PageRole::Cover);
        prop_assert_eq!(&log.mounted(), &planned);
        prop_assert_eq!(&log.captured(), &planned);
        prop_assert_eq!(&paged, &planned);
        prop_assert_eq!(report.document.page_count, planned.len() + 1);
        let reported: Vec<RenderId> = report
            .artifacts
            .iter()
            .map(|outcome| outcome.render_id.clone())
            .collect();
        prop_assert_eq!(reported, planned);
    }
}
