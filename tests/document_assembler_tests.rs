use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use overcut_report::api::{
    ArtifactDescriptor, DocumentAssembler, PageWindow, ResolvedChartConfig, annotation_text,
    header_text,
};
use overcut_report::core::{ChartId, ChartKind, DriverId, PageGeometry, RenderId, SessionMetadata};
use overcut_report::render::{CapturedImage, Color, PageRole, TextHAlign};

fn background() -> Color {
    Color::from_hex("#15151E").expect("background")
}

fn artifact(
    id: &str,
    label: &str,
    window: Option<PageWindow>,
    config: ResolvedChartConfig,
) -> ArtifactDescriptor {
    ArtifactDescriptor {
        render_id: RenderId::new(id),
        source_chart_id: ChartId::new(id),
        kind: ChartKind::GhostDelta,
        label: label.to_owned(),
        height_hint: 500,
        window,
        config,
    }
}

#[test]
fn wide_capture_is_height_bound_and_centered_below_header() {
    let geometry = PageGeometry::default();
    let assembler = DocumentAssembler::new(geometry, background()).expect("assembler");
    let image = CapturedImage::solid(RenderId::new("race-gaps"), 1600, 900, background())
        .expect("image");

    let page = assembler
        .artifact_page(
            &artifact("race-gaps", "Race Gap Evolution", None, ResolvedChartConfig::default()),
            2,
            2,
            image,
        )
        .expect("page");

    assert_eq!(page.images.len(), 1);
    let placed = &page.images[0];
    assert_relative_eq!(placed.height, 840.0);
    assert_relative_eq!(placed.width, 1493.333_333_333_333_3, epsilon = 1e-9);
    assert_relative_eq!(placed.x, (1920.0 - placed.width) / 2.0);
    assert_relative_eq!(placed.y, 200.0);
    assert!(page.validate().is_ok());
}

#[test]
fn header_carries_page_number_and_driver_annotations() {
    let paged = artifact(
        "leaderboard-p2",
        "Leaderboard",
        Some(PageWindow { page: 2, limit: 10 }),
        ResolvedChartConfig::default(),
    );
    assert_eq!(header_text(&paged), "Leaderboard (Page 2)");
    assert_eq!(annotation_text(&paged), None);

    let compared = artifact(
        "ghost-delta",
        "Ghost Car Delta",
        None,
        ResolvedChartConfig {
            focus: Some(DriverId::new("VER")),
            comparison: Some(DriverId::new("LEC")),
        },
    );
    assert_eq!(header_text(&compared), "Ghost Car Delta");
    assert_eq!(
        annotation_text(&compared).as_deref(),
        Some("Focus: VER  |  Comparison: LEC")
    );

    let focus_only = artifact(
        "lap-telemetry",
        "Fastest Lap Telemetry",
        None,
        ResolvedChartConfig {
            focus: Some(DriverId::new("NOR")),
            comparison: None,
        },
    );
    assert_eq!(annotation_text(&focus_only).as_deref(), Some("Focus: NOR"));
}

#[test]
fn artifact_page_texts_include_header_annotation_and_page_footer() {
    let assembler =
        DocumentAssembler::new(PageGeometry::default(), background()).expect("assembler");
    let image = CapturedImage::solid(RenderId::new("ghost-delta"), 320, 180, background())
        .expect("image");
    let page = assembler
        .artifact_page(
            &artifact(
                "ghost-delta",
                "Ghost Car Delta",
                None,
                ResolvedChartConfig {
                    focus: Some(DriverId::new("VER")),
                    comparison: Some(DriverId::new("LEC")),
                },
            ),
            3,
            5,
            image,
        )
        .expect("page");

    let texts: Vec<&str> = page.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Ghost Car Delta", "Focus: VER  |  Comparison: LEC", "3 / 5"]
    );
    assert!(page.texts[0].bold);
    assert_eq!(page.texts[2].h_align, TextHAlign::Right);
    assert_eq!(
        page.role,
        PageRole::Artifact {
            render_id: RenderId::new("ghost-delta")
        }
    );
    // background plus one accent bar per driver
    assert_eq!(page.rects.len(), 3);
}

#[test]
fn cover_page_lists_session_and_generation_time() {
    let assembler = DocumentAssembler::new(PageGeometry::default(), background())
        .expect("assembler")
        .with_title("Overcut Race Pack");
    let session = SessionMetadata::new(2024, "Silverstone", "Q", "British Grand Prix");
    let generated_at = Utc
        .with_ymd_and_hms(2024, 7, 6, 15, 4, 59)
        .single()
        .expect("timestamp");

    let page = assembler.cover_page(&session, generated_at, 7);
    let texts: Vec<&str> = page.texts.iter().map(|text| text.text.as_str()).collect();

    assert_eq!(page.role, PageRole::Cover);
    assert_eq!(
        texts,
        vec![
            "Overcut Race Pack",
            "2024 Silverstone | Q",
            "British Grand Prix",
            "Generated 2024-07-06 15:04 UTC",
            "7 chart pages",
        ]
    );
    assert!(page.images.is_empty());
    assert!(page.texts.iter().all(|text| text.h_align == TextHAlign::Center));
}

#[test]
fn placeholder_page_has_no_image() {
    let assembler =
        DocumentAssembler::new(PageGeometry::default(), background()).expect("assembler");
    let page = assembler.placeholder_page(
        &artifact("top-speed-p1", "Top Speed Trap", Some(PageWindow { page: 1, limit: 10 }), ResolvedChartConfig::default()),
        4,
        6,
        "capture failed",
    );
    assert!(page.images.is_empty());
    assert_eq!(page.texts[0].text, "Top Speed Trap (Page 1)");
    assert!(page.texts.iter().any(|text| text.text == "capture failed"));
    assert!(page.validate().is_ok());
}

#[test]
fn invalid_geometry_is_rejected() {
    let result = DocumentAssembler::new(PageGeometry::new(0.0, 1080.0), background());
    assert!(result.is_err());
}
