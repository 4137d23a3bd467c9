#![cfg(feature = "cairo-backend")]

use chrono::{TimeZone, Utc};
use overcut_report::api::{
    ArtifactDescriptor, DocumentAssembler, EventLog, ExportContext, ExportPipelineConfig,
    ExportTargets, MemoryDownloadSink, ReportExporter, ResolvedChartConfig,
};
use overcut_report::core::{
    ChartId, ChartKind, ChartRegistry, ExportConfig, ExportConfigEntry, PageGeometry, RenderId,
    SessionMetadata,
};
use overcut_report::error::ExportError;
use overcut_report::render::{CairoPdfWriter, CapturedImage, Color, DocumentWriter};
use overcut_report::surface::ScriptedSurface;
use tokio_util::sync::CancellationToken;

fn session() -> SessionMetadata {
    SessionMetadata::new(2024, "Spa-Francorchamps", "R", "Belgian Grand Prix")
}

#[test]
fn cairo_writer_rejects_invalid_geometry() {
    let err = CairoPdfWriter::new(PageGeometry::new(0.0, 1080.0)).expect_err("zero width");
    assert!(matches!(err, ExportError::InvalidGeometry { .. }));
}

#[test]
fn cairo_writer_emits_a_pdf_with_one_page_per_frame() {
    let geometry = PageGeometry::default();
    let background = Color::from_hex("#15151E").expect("color");
    let assembler = DocumentAssembler::new(geometry, background).expect("assembler");
    let mut writer = CairoPdfWriter::new(geometry).expect("writer");

    let generated_at = Utc
        .with_ymd_and_hms(2024, 7, 28, 15, 0, 0)
        .single()
        .expect("timestamp");
    writer
        .write_page(assembler.cover_page(&session(), generated_at, 1))
        .expect("cover");

    let artifact = ArtifactDescriptor {
        render_id: RenderId::new("race-gaps"),
        source_chart_id: ChartId::new("race-gaps"),
        kind: ChartKind::RaceGaps,
        label: "Race Gap Evolution".to_owned(),
        height_hint: 520,
        window: None,
        config: ResolvedChartConfig::default(),
    };
    let image = CapturedImage::solid(
        RenderId::new("race-gaps"),
        64,
        36,
        Color::rgba(0.88, 0.02, 0.0, 0.5),
    )
    .expect("image");
    writer
        .write_page(assembler.artifact_page(&artifact, 2, 2, image).expect("page"))
        .expect("artifact page");

    assert_eq!(writer.page_count(), 2);
    let bytes = writer.finish().expect("pdf bytes");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(matches!(
        writer.finish(),
        Err(ExportError::FinalizationFailed(_))
    ));
}

#[test]
fn cairo_writer_rejects_pages_of_another_geometry() {
    let geometry = PageGeometry::default();
    let other = PageGeometry::new(1280.0, 720.0);
    let assembler =
        DocumentAssembler::new(other, Color::rgb(0.0, 0.0, 0.0)).expect("assembler");
    let mut writer = CairoPdfWriter::new(geometry).expect("writer");

    let err = writer
        .write_page(assembler.cover_page(&session(), Utc::now(), 0))
        .expect_err("geometry mismatch");
    assert!(matches!(err, ExportError::InvalidData(_)));
}

#[tokio::test(start_paused = true)]
async fn pipeline_exports_pdf_with_cairo_writer() {
    let ctx = ExportContext::new(
        ChartRegistry::f1_default(),
        ExportConfig::new()
            .with_entry("race-gaps", ExportConfigEntry::enabled())
            .with_entry("top-speed", ExportConfigEntry::enabled()),
        session(),
    );
    let exporter = ReportExporter::new(ExportPipelineConfig::default()).expect("exporter");
    let mut surface = ScriptedSurface::default();
    let mut writer = CairoPdfWriter::new(exporter.config().geometry).expect("writer");
    let mut sink = MemoryDownloadSink::default();
    let mut events = EventLog::default();

    let report = exporter
        .export(
            &ctx,
            ExportTargets::new(&mut surface, &mut writer, &mut sink, &mut events),
            &CancellationToken::new(),
        )
        .await
        .expect("export");

    assert_eq!(report.document.filename, "F1_Report_Spa-Francorchamps_R.pdf");
    assert_eq!(report.document.mime_type, "application/pdf");
    assert_eq!(report.document.page_count, 4);
    assert!(report.document.bytes.starts_with(b"%PDF-"));
}

#[test]
fn cairo_writer_reset_starts_a_new_document() {
    let geometry = PageGeometry::default();
    let assembler =
        DocumentAssembler::new(geometry, Color::rgb(0.0, 0.0, 0.0)).expect("assembler");
    let mut writer = CairoPdfWriter::new(geometry).expect("writer");
    writer
        .write_page(assembler.cover_page(&session(), Utc::now(), 0))
        .expect("cover");
    writer.finish().expect("first document");

    writer.reset().expect("reset");
    assert_eq!(writer.page_count(), 0);
    writer
        .write_page(assembler.cover_page(&session(), Utc::now(), 0))
        .expect("cover after reset");
    assert_eq!(writer.page_count(), 1);
    assert!(writer.finish().expect("second document").starts_with(b"%PDF-"));
}
