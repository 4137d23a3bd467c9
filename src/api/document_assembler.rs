use chrono::{DateTime, Utc};
use tracing::trace;

use crate::core::team::driver_color_hex;
use crate::core::{DriverId, PageGeometry, SessionMetadata};
use crate::error::ExportResult;
use crate::render::{
    CapturedImage, Color, ImagePrimitive, PageFrame, PageRole, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use super::{ArtifactDescriptor, place_image};

pub const DEFAULT_REPORT_TITLE: &str = "F1 Telemetry Report";

const F1_RED: Color = Color::rgb(225.0 / 255.0, 6.0 / 255.0, 0.0);
const TEXT_PRIMARY: Color = Color::rgb(1.0, 1.0, 1.0);
const TEXT_MUTED: Color = Color::rgb(0.62, 0.62, 0.68);

const HEADER_FONT_PX: f64 = 48.0;
const ANNOTATION_FONT_PX: f64 = 28.0;
const FOOTER_FONT_PX: f64 = 18.0;
const ACCENT_WIDTH: f64 = 8.0;
const ACCENT_GAP: f64 = 4.0;
const ACCENT_HEIGHT: f64 = 96.0;

/// Builds cover and artifact pages for one fixed page geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAssembler {
    geometry: PageGeometry,
    background: Color,
    title: String,
}

impl DocumentAssembler {
    pub fn new(geometry: PageGeometry, background: Color) -> ExportResult<Self> {
        geometry.validate()?;
        background.validate()?;
        Ok(Self {
            geometry,
            background,
            title: DEFAULT_REPORT_TITLE.to_owned(),
        })
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Page 1: title, session line, event name and generation time.
    #[must_use]
    pub fn cover_page(
        &self,
        session: &SessionMetadata,
        generated_at: DateTime<Utc>,
        artifact_count: usize,
    ) -> PageFrame {
        let center_x = self.geometry.width / 2.0;
        let title_y = self.geometry.height * 0.3;

        let mut page = self
            .blank_page(PageRole::Cover)
            .with_rect(RectPrimitive::new(
                center_x - 120.0,
                title_y - 40.0,
                240.0,
                ACCENT_WIDTH,
                F1_RED,
            ))
            .with_text(
                TextPrimitive::new(
                    self.title.as_str(),
                    center_x,
                    title_y,
                    96.0,
                    TEXT_PRIMARY,
                    TextHAlign::Center,
                )
                .bold(),
            )
            .with_text(TextPrimitive::new(
                session.session_line(),
                center_x,
                title_y + 150.0,
                48.0,
                TEXT_PRIMARY,
                TextHAlign::Center,
            ));

        if !session.event_name.trim().is_empty() {
            page = page.with_text(TextPrimitive::new(
                session.event_name.as_str(),
                center_x,
                title_y + 220.0,
                36.0,
                TEXT_MUTED,
                TextHAlign::Center,
            ));
        }

        page.with_text(TextPrimitive::new(
            generated_at.format("Generated %Y-%m-%d %H:%M UTC").to_string(),
            center_x,
            title_y + 300.0,
            24.0,
            TEXT_MUTED,
            TextHAlign::Center,
        ))
        .with_text(TextPrimitive::new(
            format!("{artifact_count} chart pages"),
            center_x,
            title_y + 340.0,
            24.0,
            TEXT_MUTED,
            TextHAlign::Center,
        ))
    }

    /// Header, accent strip and the fitted capture for one artifact.
    ///
    /// `page_number` counts the cover, so the first artifact is page 2.
    pub fn artifact_page(
        &self,
        artifact: &ArtifactDescriptor,
        page_number: usize,
        page_total: usize,
        image: CapturedImage,
    ) -> ExportResult<PageFrame> {
        let placement = place_image(
            self.geometry,
            f64::from(image.width()),
            f64::from(image.height()),
        )?;
        trace!(
            render_id = %artifact.render_id,
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "placed capture"
        );

        Ok(self
            .decorated_page(artifact, page_number, page_total)
            .with_image(ImagePrimitive::new(
                image,
                placement.x,
                placement.y,
                placement.width,
                placement.height,
            )))
    }

    /// Artifact page without an image, used when capture failed and the run
    /// keeps going.
    #[must_use]
    pub fn placeholder_page(
        &self,
        artifact: &ArtifactDescriptor,
        page_number: usize,
        page_total: usize,
        reason: &str,
    ) -> PageFrame {
        let center_y = self.geometry.margin
            + self.geometry.header_allowance
            + self.geometry.content_height() / 2.0;
        self.decorated_page(artifact, page_number, page_total)
            .with_text(TextPrimitive::new(
                "Capture unavailable",
                self.geometry.width / 2.0,
                center_y - 30.0,
                36.0,
                TEXT_MUTED,
                TextHAlign::Center,
            ))
            .with_text(TextPrimitive::new(
                if reason.trim().is_empty() { "unknown error" } else { reason },
                self.geometry.width / 2.0,
                center_y + 20.0,
                20.0,
                TEXT_MUTED,
                TextHAlign::Center,
            ))
    }

    fn blank_page(&self, role: PageRole) -> PageFrame {
        PageFrame::new(self.geometry, role).with_rect(RectPrimitive::new(
            0.0,
            0.0,
            self.geometry.width,
            self.geometry.height,
            self.background,
        ))
    }

    fn decorated_page(
        &self,
        artifact: &ArtifactDescriptor,
        page_number: usize,
        page_total: usize,
    ) -> PageFrame {
        let margin = self.geometry.margin;
        let text_x = margin + 2.0 * (ACCENT_WIDTH + ACCENT_GAP) + 12.0;

        let mut page = self.blank_page(PageRole::Artifact {
            render_id: artifact.render_id.clone(),
        });
        for (index, color) in accent_colors(artifact).into_iter().enumerate() {
            page = page.with_rect(RectPrimitive::new(
                margin + index as f64 * (ACCENT_WIDTH + ACCENT_GAP),
                margin,
                ACCENT_WIDTH,
                ACCENT_HEIGHT,
                color,
            ));
        }

        page = page.with_text(
            TextPrimitive::new(
                header_text(artifact),
                text_x,
                margin,
                HEADER_FONT_PX,
                TEXT_PRIMARY,
                TextHAlign::Left,
            )
            .bold(),
        );
        if let Some(annotation) = annotation_text(artifact) {
            page = page.with_text(TextPrimitive::new(
                annotation,
                text_x,
                margin + HEADER_FONT_PX + 16.0,
                ANNOTATION_FONT_PX,
                TEXT_MUTED,
                TextHAlign::Left,
            ));
        }

        page.with_text(TextPrimitive::new(
            format!("{page_number} / {page_total}"),
            self.geometry.width - margin,
            self.geometry.height - margin + 8.0,
            FOOTER_FONT_PX,
            TEXT_MUTED,
            TextHAlign::Right,
        ))
    }
}

/// Chart label, suffixed with the page number for paginated artifacts.
#[must_use]
pub fn header_text(artifact: &ArtifactDescriptor) -> String {
    match artifact.window {
        Some(window) => format!("{} (Page {})", artifact.label, window.page),
        None => artifact.label.clone(),
    }
}

/// `Focus: X  |  Comparison: Y`, or whichever half is present.
#[must_use]
pub fn annotation_text(artifact: &ArtifactDescriptor) -> Option<String> {
    let parts: Vec<String> = [
        ("Focus", artifact.config.focus.as_ref()),
        ("Comparison", artifact.config.comparison.as_ref()),
    ]
    .into_iter()
    .filter_map(|(name, driver)| driver.map(|driver| format!("{name}: {driver}")))
    .collect();

    (!parts.is_empty()).then(|| parts.join("  |  "))
}

fn accent_colors(artifact: &ArtifactDescriptor) -> Vec<Color> {
    let drivers: Vec<&DriverId> = [
        artifact.config.focus.as_ref(),
        artifact.config.comparison.as_ref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if drivers.is_empty() {
        return vec![F1_RED];
    }
    drivers
        .into_iter()
        .map(|driver| Color::from_hex(driver_color_hex(driver)).unwrap_or(TEXT_PRIMARY))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{F1_RED, accent_colors};
    use crate::api::{ArtifactDescriptor, ResolvedChartConfig};
    use crate::core::{ChartId, ChartKind, DriverId, RenderId};
    use crate::render::Color;

    fn artifact(config: ResolvedChartConfig) -> ArtifactDescriptor {
        ArtifactDescriptor {
            render_id: RenderId::new("ghost-delta"),
            source_chart_id: ChartId::new("ghost-delta"),
            kind: ChartKind::GhostDelta,
            label: "Ghost Delta".to_owned(),
            height_hint: 500,
            window: None,
            config,
        }
    }

    #[test]
    fn accent_uses_team_colours_or_brand_red() {
        assert_eq!(accent_colors(&artifact(ResolvedChartConfig::default())), vec![F1_RED]);

        let colors = accent_colors(&artifact(ResolvedChartConfig {
            focus: Some(DriverId::new("NOR")),
            comparison: Some(DriverId::new("XXX")),
        }));
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].to_rgba8(), [0xFF, 0x80, 0x00, 0xFF]);
        assert_eq!(colors[1], Color::rgb(1.0, 1.0, 1.0));
    }
}
