//! # Page-Aware Layout Engine
//!
//! Turns a [`Report`] into a sequence of fixed-size pages holding absolutely
//! positioned primitives: text runs, rectangles and lines. There is no flow
//! layout underneath. Every wrap, column position and page break is decided
//! here, with the page boundary as a hard constraint:
//!
//! 1. The [`PageCursor`] holds the current page and a vertical offset that
//!    only moves down.
//! 2. Before drawing a block with a known minimum height (a section title with
//!    its first line, a KPI row, a status card) the renderer asks the cursor to
//!    `ensure` that height, so headings are never stranded at a page bottom.
//! 3. Variable-height content (wrapped text, table rows) ensures per line or
//!    per row, and may straddle a page boundary.
//! 4. Once every page is final, the watermark pass stamps each one, including
//!    pages opened purely by overflow.
//!
//! Nothing is drawn below the bottom margin: pages are opened *before* that
//! would happen, never fixed up afterwards.

pub mod blocks;
pub mod cursor;
pub mod table;
pub mod watermark;

pub use cursor::PageCursor;

use crate::config::LayoutConfig;
use crate::error::FolioError;
use crate::font::{FontContext, FontWeight, CAP_HEIGHT_RATIO, DESCENT_RATIO};
use crate::format;
use crate::model::{Block, Report, Section};
use crate::style::{palette, Color};
use crate::text::truncate_to_width;

/// A finished page.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Append-only, in drawing order.
    pub primitives: Vec<Primitive>,
}

impl Page {
    fn new(config: &LayoutConfig) -> Self {
        Self {
            width: config.page_width,
            height: config.page_height,
            margin: config.margin,
            primitives: Vec::new(),
        }
    }

    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(run) => Some(run),
            _ => None,
        })
    }
}

/// An atomic drawn element placed at an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(TextRun),
    Rect(Rect),
    Line(Line),
}

/// Which pass produced a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Content,
    Watermark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Already sanitized.
    pub text: String,
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub size: f64,
    pub weight: FontWeight,
    pub color: Color,
    /// Measured advance width.
    pub width: f64,
    pub opacity: f64,
    /// Counter-clockwise rotation about (x, y), in degrees.
    pub rotation: f64,
    pub layer: Layer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub thickness: f64,
    pub color: Color,
}

impl Primitive {
    /// Lowest point on the page this primitive paints, strokes included.
    pub fn lowest_extent(&self) -> f64 {
        match self {
            Primitive::Text(run) => {
                let descent = run.size * DESCENT_RATIO;
                if run.rotation == 0.0 {
                    return run.y - descent;
                }
                let (sin, cos) = run.rotation.to_radians().sin_cos();
                let cap = run.size * CAP_HEIGHT_RATIO;
                [(0.0, -descent), (run.width, -descent), (0.0, cap), (run.width, cap)]
                    .iter()
                    .map(|(px, py)| run.y + px * sin + py * cos)
                    .fold(f64::INFINITY, f64::min)
            }
            Primitive::Rect(rect) => {
                let half = rect.stroke.map_or(0.0, |s| s.width / 2.0);
                rect.y.min(rect.y + rect.height) - half
            }
            Primitive::Line(line) => line.y1.min(line.y2) - line.thickness / 2.0,
        }
    }
}

// Masthead: brand band, then a muted locator line.
const MASTHEAD_BAND: f64 = 56.0;
const MASTHEAD_HEIGHT: f64 = 80.0;
const TITLE_SIZE: f64 = 18.0;
const SMALL_SIZE: f64 = 8.0;
const INSET: f64 = 14.0;

const BLOCK_GAP: f64 = 10.0;
const SECTION_GAP: f64 = 8.0;
/// Gap between the rule and the first footer line.
const FOOTER_RULE_GAP: f64 = 8.0;

/// Height of the tallest block that is never split across pages. A page
/// whose printable height is below this cannot lay out every report.
pub fn tallest_unsplit_block(line_height: f64) -> f64 {
    [
        MASTHEAD_HEIGHT,
        blocks::KPI_CARD_HEIGHT,
        blocks::STATUS_CARD_HEIGHT,
        blocks::TITLE_HEIGHT + line_height,
        line_height + blocks::TRACK_GAP + blocks::TRACK_HEIGHT,
        FOOTER_RULE_GAP + 2.0 * line_height,
        // Table header with one row.
        2.0 * line_height,
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Composes the masthead, sections and footer, then watermarks every page.
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Main entry point: lay out a report into pages.
    pub fn layout(&self, report: &Report, fonts: &FontContext) -> Result<Vec<Page>, FolioError> {
        self.config.validate()?;
        let mut cursor = PageCursor::new(fonts, self.config);

        self.masthead(&mut cursor, report)?;
        for section in &report.sections {
            self.section(&mut cursor, section)?;
        }
        self.footer(&mut cursor, report)?;

        let mut pages = cursor.finish();
        watermark::stamp(&mut pages, &self.config.watermark, fonts);
        Ok(pages)
    }

    fn masthead(&self, cursor: &mut PageCursor, report: &Report) -> Result<(), FolioError> {
        let cfg = self.config;
        let fmt = &cfg.format;
        cursor.ensure(MASTHEAD_HEIGHT)?;

        let left = cursor.left();
        let width = cursor.content_width();
        let text_width = width - 2.0 * INSET;
        cursor.rect(left, 0.0, width, MASTHEAD_BAND, Some(cfg.brand_color), None);

        let title = report.meta.title.as_deref().unwrap_or("Report");
        let title = truncate_to_width(cursor.fonts(), title, text_width, TITLE_SIZE, FontWeight::Bold);
        cursor.text(left + INSET, 26.0, &title, TITLE_SIZE, FontWeight::Bold, Color::WHITE);

        let subtitle = format!(
            "{}  \u{00B7}  {}",
            format::or_placeholder(report.meta.id.as_deref(), fmt),
            format::datetime(report.meta.generated_at.as_deref().unwrap_or(""), fmt),
        );
        let subtitle = truncate_to_width(cursor.fonts(), &subtitle, text_width, 9.0, FontWeight::Regular);
        cursor.text(left + INSET, 44.0, &subtitle, 9.0, FontWeight::Regular, cfg.brand_color.tint(0.8));

        let locator = format::or_placeholder(report.meta.url.as_deref(), fmt);
        let locator = truncate_to_width(cursor.fonts(), &locator, width, SMALL_SIZE, FontWeight::Regular);
        cursor.text(left, MASTHEAD_BAND + 12.0, &locator, SMALL_SIZE, FontWeight::Regular, palette::MUTED);

        cursor.advance(MASTHEAD_HEIGHT);
        Ok(())
    }

    fn section(&self, cursor: &mut PageCursor, section: &Section) -> Result<(), FolioError> {
        let lead = match section.blocks.first() {
            Some(block) => blocks::lead_height(cursor, block),
            None => cursor.line_height(),
        };
        blocks::section_title(cursor, section.number, &section.title, lead)?;
        for block in &section.blocks {
            match block {
                Block::DataGrid { columns, items } => blocks::data_grid(cursor, *columns, items)?,
                Block::EventList { items, empty_text } => {
                    blocks::event_list(cursor, items, empty_text)?
                }
                Block::KpiRow { cards } => blocks::kpi_row(cursor, cards)?,
                Block::ProgressBar {
                    label,
                    percent,
                    thresholds,
                } => blocks::progress_bar(cursor, label, *percent, thresholds)?,
                Block::StatusCard {
                    status,
                    label,
                    detail,
                } => blocks::status_card(cursor, status, label.as_deref(), detail.as_deref())?,
                Block::Table(t) => table::table(cursor, t)?,
                Block::Paragraph { text } => blocks::paragraph(cursor, text)?,
                Block::TwoColumn { left, right } => {
                    let gutter = self.config.kpi_gutter;
                    let half = (cursor.content_width() - gutter) / 2.0;
                    let x = cursor.left();
                    blocks::two_column_text(
                        cursor,
                        &blocks::ColumnText::body(left, x, half),
                        &blocks::ColumnText::body(right, x + half + gutter, half),
                    )?;
                }
            }
            cursor.space(BLOCK_GAP);
        }
        cursor.space(SECTION_GAP);
        Ok(())
    }

    /// Rule, attribution, identifier and timestamp. Ensured whole so it is
    /// never split across pages.
    fn footer(&self, cursor: &mut PageCursor, report: &Report) -> Result<(), FolioError> {
        let cfg = self.config;
        let lh = cfg.line_height;
        cursor.ensure(FOOTER_RULE_GAP + 2.0 * lh)?;

        let left = cursor.left();
        let right = cursor.right();
        let width = cursor.content_width();
        let baseline = cursor.baseline_in(lh, SMALL_SIZE);
        cursor.line(left, 0.0, right, 0.0, 0.5, palette::RULE);

        let attribution =
            truncate_to_width(cursor.fonts(), &cfg.attribution, width, SMALL_SIZE, FontWeight::Regular);
        cursor.text(left, FOOTER_RULE_GAP + baseline, &attribution, SMALL_SIZE, FontWeight::Regular, palette::MUTED);

        let ident = format!(
            "Report {}  \u{00B7}  generated {}",
            format::or_placeholder(report.meta.id.as_deref(), &cfg.format),
            format::datetime(report.meta.generated_at.as_deref().unwrap_or(""), &cfg.format),
        );
        let ident = truncate_to_width(cursor.fonts(), &ident, width, SMALL_SIZE, FontWeight::Regular);
        cursor.text(left, FOOTER_RULE_GAP + lh + baseline, &ident, SMALL_SIZE, FontWeight::Regular, palette::MUTED);

        cursor.advance(FOOTER_RULE_GAP + 2.0 * lh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridItem, ReportMeta};

    fn report(sections: Vec<Section>) -> Report {
        Report {
            meta: ReportMeta {
                id: Some("RPT-7".into()),
                title: Some("Quarterly review".into()),
                generated_at: Some("2024-03-07T15:04:05Z".into()),
                url: Some("https://reports.example.com/r/RPT-7".into()),
            },
            sections,
        }
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn empty_report_is_one_page_with_masthead_and_footer() {
        let config = LayoutConfig::default();
        let pages = LayoutEngine::new(&config)
            .layout(&report(vec![]), &FontContext::new())
            .unwrap();
        assert_eq!(pages.len(), 1);
        let text = all_text(&pages);
        assert!(text.iter().any(|t| t == "Quarterly review"));
        assert!(text.iter().any(|t| t.contains("07/03/2024 15:04")));
        assert!(text.iter().any(|t| t == "Generated automatically"));
    }

    #[test]
    fn missing_meta_renders_placeholders() {
        let config = LayoutConfig::default();
        let pages = LayoutEngine::new(&config)
            .layout(&Report::default(), &FontContext::new())
            .unwrap();
        let text = all_text(&pages);
        assert!(text.iter().any(|t| t == "Report"));
        assert!(text.iter().any(|t| t.starts_with("\u{2014}")));
    }

    #[test]
    fn sections_render_in_order() {
        let section = |n: u32, title: &str| Section {
            number: n,
            title: title.into(),
            blocks: vec![Block::DataGrid {
                columns: 1,
                items: vec![GridItem {
                    label: "Owner".into(),
                    value: None,
                }],
            }],
        };
        let config = LayoutConfig::default();
        let pages = LayoutEngine::new(&config)
            .layout(
                &report(vec![section(1, "Alpha"), section(2, "Beta")]),
                &FontContext::new(),
            )
            .unwrap();
        let text = all_text(&pages);
        let alpha = text.iter().position(|t| t == "Alpha").unwrap();
        let beta = text.iter().position(|t| t == "Beta").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn invalid_config_fails_before_layout() {
        let config = LayoutConfig {
            line_height: 0.0,
            ..Default::default()
        };
        let result = LayoutEngine::new(&config).layout(&Report::default(), &FontContext::new());
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn rotated_text_extent_uses_the_rotated_box() {
        let run = TextRun {
            text: "X".into(),
            x: 100.0,
            y: 100.0,
            size: 10.0,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            width: 100.0,
            opacity: 1.0,
            rotation: -90.0,
            layer: Layer::Content,
        };
        // Rotated clockwise a quarter turn the run hangs straight down.
        let low = Primitive::Text(run).lowest_extent();
        assert!((low - 0.0).abs() < 1e-9);
    }

    #[test]
    fn smallest_valid_page_still_lays_out() {
        let config = LayoutConfig {
            page_height: 2.0 * 50.0 + tallest_unsplit_block(10.0),
            line_height: 10.0,
            body_size: 8.0,
            ..Default::default()
        };
        let sections = vec![Section {
            number: 1,
            title: "Indicators".into(),
            blocks: vec![
                Block::StatusCard {
                    status: "paid".into(),
                    label: None,
                    detail: None,
                },
                Block::Paragraph {
                    text: "One line.".into(),
                },
            ],
        }];
        let pages = LayoutEngine::new(&config)
            .layout(&report(sections), &FontContext::new())
            .unwrap();
        assert!(pages.len() >= 2);
    }
}
