//! Section content blocks.
//!
//! Each renderer draws through the [`PageCursor`] and leaves the cursor just
//! below what it drew. Fixed-height blocks ensure their whole height up front;
//! wrapped text ensures line by line.

use crate::config::FormatConfig;
use crate::error::FolioError;
use crate::font::FontWeight;
use crate::format::{self, status::progress_color, StatusTable};
use crate::model::{Block, CellValue, Event, GridItem, KpiCard, Thresholds, ValueFormat};
use crate::style::{palette, Color};
use crate::text::{truncate_to_width, wrap};

use super::{table, PageCursor, Stroke};

/// Height of a section heading, divider included.
pub const TITLE_HEIGHT: f64 = 28.0;
const BADGE_SIZE: f64 = 18.0;
const TITLE_SIZE: f64 = 13.0;
const DIVIDER_OFFSET: f64 = 22.0;

pub const KPI_CARD_HEIGHT: f64 = 52.0;
/// Cards beyond this count start a new row.
pub const KPI_MAX_PER_ROW: usize = 4;
const KPI_VALUE_SIZE: f64 = 16.0;

pub const TRACK_HEIGHT: f64 = 8.0;
pub const TRACK_GAP: f64 = 4.0;

pub const STATUS_CARD_HEIGHT: f64 = 46.0;

const SMALL_SIZE: f64 = 8.0;
const BORDER: f64 = 0.75;
const CARD_PADDING: f64 = 8.0;
/// Width reserved for an event's urgency glyph.
const GLYPH_WIDTH: f64 = 12.0;
/// Widest an event date may get, as a share of the line after the glyph.
const DATE_SHARE: f64 = 0.4;

/// One column of a [`two_column_text`] pair.
#[derive(Debug, Clone)]
pub struct ColumnText<'t> {
    pub text: &'t str,
    pub x: f64,
    pub width: f64,
    pub weight: FontWeight,
    pub color: Color,
}

impl<'t> ColumnText<'t> {
    pub fn body(text: &'t str, x: f64, width: f64) -> Self {
        Self {
            text,
            x,
            width,
            weight: FontWeight::Regular,
            color: palette::TEXT,
        }
    }
}

/// Stroked box whose border stays inside `width` x `height`.
fn framed_box(
    cursor: &mut PageCursor,
    x: f64,
    width: f64,
    height: f64,
    fill: Option<Color>,
    border: Color,
) {
    let half = BORDER / 2.0;
    cursor.rect(
        x + half,
        half,
        width - BORDER,
        height - BORDER,
        fill,
        Some(Stroke {
            color: border,
            width: BORDER,
        }),
    );
}

/// Height of the first unsplittable piece of `block`: what a heading above
/// it must keep on the same page.
pub fn lead_height(cursor: &PageCursor, block: &Block) -> f64 {
    let lh = cursor.line_height();
    match block {
        Block::KpiRow { cards } if !cards.is_empty() => KPI_CARD_HEIGHT,
        Block::StatusCard { .. } => STATUS_CARD_HEIGHT,
        Block::ProgressBar { .. } => lh + TRACK_GAP + TRACK_HEIGHT,
        Block::Table(t) => table::lead_height(cursor, t),
        _ => lh,
    }
}

/// Numbered badge, heading and a full-width divider in the brand color.
///
/// Ensures room for the heading plus `lead` (see [`lead_height`]) so a title
/// never ends a page on its own.
pub fn section_title(
    cursor: &mut PageCursor,
    number: u32,
    title: &str,
    lead: f64,
) -> Result<(), FolioError> {
    let lead = lead.min(cursor.config().content_height() - TITLE_HEIGHT);
    cursor.ensure(TITLE_HEIGHT + lead)?;

    let brand = cursor.config().brand_color;
    let left = cursor.left();
    let size = cursor.config().body_size;

    cursor.rect(left, 0.0, BADGE_SIZE, BADGE_SIZE, Some(brand), None);
    let label = number.to_string();
    let w = cursor.measure(&label, FontWeight::Bold, size);
    let dy = cursor.baseline_in(BADGE_SIZE, size);
    cursor.text(left + (BADGE_SIZE - w) / 2.0, dy, &label, size, FontWeight::Bold, Color::WHITE);

    let text_x = left + BADGE_SIZE + 8.0;
    let title = truncate_to_width(
        cursor.fonts(),
        title,
        cursor.right() - text_x,
        TITLE_SIZE,
        FontWeight::Bold,
    );
    let dy = cursor.baseline_in(BADGE_SIZE, TITLE_SIZE);
    cursor.text(text_x, dy, &title, TITLE_SIZE, FontWeight::Bold, palette::TEXT);

    let right = cursor.right();
    cursor.line(left, DIVIDER_OFFSET, right, DIVIDER_OFFSET, 1.0, brand);
    cursor.advance(TITLE_HEIGHT);
    Ok(())
}

/// Wrap two texts independently and draw them side by side from the same
/// offset. The shorter column simply stops early.
///
/// Returns the height consumed: `max(left lines, right lines) x line height`.
pub fn two_column_text(
    cursor: &mut PageCursor,
    left: &ColumnText,
    right: &ColumnText,
) -> Result<f64, FolioError> {
    let size = cursor.config().body_size;
    let lh = cursor.line_height();
    let baseline = cursor.baseline_in(lh, size);

    let left_lines = wrap(cursor.fonts(), left.text, left.width, size, left.weight);
    let right_lines = wrap(cursor.fonts(), right.text, right.width, size, right.weight);
    let rows = left_lines.len().max(right_lines.len());

    for k in 0..rows {
        cursor.ensure(lh)?;
        if let Some(line) = left_lines.get(k) {
            cursor.text(left.x, baseline, line, size, left.weight, left.color);
        }
        if let Some(line) = right_lines.get(k) {
            cursor.text(right.x, baseline, line, size, right.weight, right.color);
        }
        cursor.advance(lh);
    }
    Ok(rows as f64 * lh)
}

/// Label/value pairs. One column puts muted labels in a narrow left column;
/// two columns pack `label: value` pairs side by side.
pub fn data_grid(cursor: &mut PageCursor, columns: u8, items: &[GridItem]) -> Result<(), FolioError> {
    let fmt = &cursor.config().format;
    let left = cursor.left();
    let width = cursor.content_width();
    let gutter = cursor.config().kpi_gutter;

    if columns > 2 {
        log::warn!("data grid with {columns} columns drawn as two");
    }

    if columns <= 1 {
        let label_width = width * 0.35;
        let value_x = left + label_width + CARD_PADDING;
        for item in items {
            let value = format::or_placeholder(item.value.as_deref(), fmt);
            let label = ColumnText {
                color: palette::MUTED,
                ..ColumnText::body(&item.label, left, label_width)
            };
            let value = ColumnText::body(&value, value_x, left + width - value_x);
            two_column_text(cursor, &label, &value)?;
        }
        return Ok(());
    }

    let half = (width - gutter) / 2.0;
    let pair = |item: &GridItem| {
        format!(
            "{}: {}",
            item.label,
            format::or_placeholder(item.value.as_deref(), fmt)
        )
    };
    for chunk in items.chunks(2) {
        let first = pair(&chunk[0]);
        let second = chunk.get(1).map(pair).unwrap_or_default();
        two_column_text(
            cursor,
            &ColumnText::body(&first, left, half),
            &ColumnText::body(&second, left + half + gutter, half),
        )?;
    }
    Ok(())
}

/// One line per event: urgency glyph, truncated text and an optional
/// right-aligned date. An empty list draws a single muted placeholder line.
pub fn event_list(cursor: &mut PageCursor, items: &[Event], empty_text: &str) -> Result<(), FolioError> {
    let fmt = &cursor.config().format;
    let size = cursor.config().body_size;
    let lh = cursor.line_height();
    let baseline = cursor.baseline_in(lh, size);
    let left = cursor.left();
    let right = cursor.right();

    if items.is_empty() {
        cursor.ensure(lh)?;
        let text = format::or_placeholder(Some(empty_text), fmt);
        let text = truncate_to_width(cursor.fonts(), &text, right - left, size, FontWeight::Regular);
        cursor.text(left, baseline, &text, size, FontWeight::Regular, palette::MUTED);
        cursor.advance(lh);
        return Ok(());
    }

    for event in items {
        cursor.ensure(lh)?;
        let color = event.urgency.color();
        cursor.text(left, baseline, event.urgency.glyph(), size, FontWeight::Bold, color);

        let date_width = match event.date.as_deref() {
            Some(raw) => {
                let date = format::date(raw, fmt);
                let date = truncate_to_width(
                    cursor.fonts(),
                    &date,
                    (right - left - GLYPH_WIDTH) * DATE_SHARE,
                    size,
                    FontWeight::Regular,
                );
                cursor.text_right(right, baseline, &date, size, FontWeight::Regular, palette::MUTED)
                    + CARD_PADDING
            }
            None => 0.0,
        };

        let text_x = left + GLYPH_WIDTH;
        let text = truncate_to_width(
            cursor.fonts(),
            &event.text,
            right - date_width - text_x,
            size,
            FontWeight::Regular,
        );
        cursor.text(text_x, baseline, &text, size, FontWeight::Regular, palette::TEXT);
        cursor.advance(lh);
    }
    Ok(())
}

/// Width of each of `count` equal cards separated by `gutter`, spanning
/// `content_width` exactly.
pub fn kpi_card_width(content_width: f64, gutter: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    (content_width - (n - 1.0) * gutter) / n
}

fn kpi_value(card: &KpiCard, fmt: &FormatConfig) -> String {
    match &card.value {
        Some(CellValue::Number(n)) => match card.format {
            ValueFormat::Currency => format::currency(*n, fmt),
            ValueFormat::Percent => format::percent(*n, fmt),
            ValueFormat::Plain => format::plain(*n, fmt),
        },
        Some(CellValue::Text(s)) => format::or_placeholder(Some(s.as_str()), fmt),
        None => fmt.placeholder.clone(),
    }
}

/// Equal-width bordered cards with a large value and a small label, up to
/// [`KPI_MAX_PER_ROW`] per row.
pub fn kpi_row(cursor: &mut PageCursor, cards: &[KpiCard]) -> Result<(), FolioError> {
    let cfg = cursor.config();
    let gutter = cfg.kpi_gutter;

    for (row_index, row) in cards.chunks(KPI_MAX_PER_ROW).enumerate() {
        if row_index > 0 {
            cursor.space(gutter);
        }
        cursor.ensure(KPI_CARD_HEIGHT)?;
        let width = kpi_card_width(cursor.content_width(), gutter, row.len());
        let inner = width - 2.0 * CARD_PADDING;

        for (i, card) in row.iter().enumerate() {
            let x = cursor.left() + i as f64 * (width + gutter);
            let accent = card.accent.unwrap_or(cfg.brand_color);
            framed_box(cursor, x, width, KPI_CARD_HEIGHT, Some(Color::WHITE), palette::RULE);
            cursor.rect(x, 0.0, width, 3.0, Some(accent), None);

            let value = kpi_value(card, &cfg.format);
            let value = truncate_to_width(cursor.fonts(), &value, inner, KPI_VALUE_SIZE, FontWeight::Bold);
            cursor.text(x + CARD_PADDING, 27.0, &value, KPI_VALUE_SIZE, FontWeight::Bold, accent);

            let label = truncate_to_width(cursor.fonts(), &card.label, inner, SMALL_SIZE, FontWeight::Regular);
            cursor.text(x + CARD_PADDING, 42.0, &label, SMALL_SIZE, FontWeight::Regular, palette::MUTED);
        }
        cursor.advance(KPI_CARD_HEIGHT);
    }
    Ok(())
}

/// Fill width of a progress track: `track_width x clamp(percent, 0, 100) / 100`.
/// NaN counts as zero.
pub fn fill_width(track_width: f64, percent: f64) -> f64 {
    let p = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    track_width * p / 100.0
}

/// Label and percentage on one line, then a track with a threshold-colored
/// fill. A missing percentage draws an empty fill and a placeholder value.
pub fn progress_bar(
    cursor: &mut PageCursor,
    label: &str,
    percent: Option<f64>,
    thresholds: &Thresholds,
) -> Result<(), FolioError> {
    let fmt = &cursor.config().format;
    let size = cursor.config().body_size;
    let lh = cursor.line_height();
    let baseline = cursor.baseline_in(lh, size);
    let needed = lh + TRACK_GAP + TRACK_HEIGHT;
    cursor.ensure(needed)?;

    let left = cursor.left();
    let right = cursor.right();
    let width = cursor.content_width();

    let value = match percent {
        Some(p) => format::percent(p, fmt),
        None => fmt.placeholder.clone(),
    };
    let value_width = cursor.text_right(right, baseline, &value, size, FontWeight::Bold, palette::TEXT);
    let label = truncate_to_width(
        cursor.fonts(),
        label,
        width - value_width - CARD_PADDING,
        size,
        FontWeight::Regular,
    );
    cursor.text(left, baseline, &label, size, FontWeight::Regular, palette::TEXT);

    let color = match percent {
        Some(p) => progress_color(p, thresholds),
        None => palette::NEUTRAL,
    };
    let fill = fill_width(width, percent.unwrap_or(0.0));
    cursor.rect(left, lh + TRACK_GAP, width, TRACK_HEIGHT, Some(palette::TRACK), None);
    cursor.rect(left, lh + TRACK_GAP, fill, TRACK_HEIGHT, Some(color), None);

    cursor.advance(needed);
    Ok(())
}

/// Tinted, bordered card for a status key: icon, label and one detail line.
/// Unknown keys fall back to a neutral style.
pub fn status_card(
    cursor: &mut PageCursor,
    status: &str,
    label: Option<&str>,
    detail: Option<&str>,
) -> Result<(), FolioError> {
    let cfg = cursor.config();
    let style = StatusTable::new(&cfg.statuses).style(status);
    cursor.ensure(STATUS_CARD_HEIGHT)?;

    let left = cursor.left();
    let width = cursor.content_width();
    framed_box(
        cursor,
        left,
        width,
        STATUS_CARD_HEIGHT,
        Some(style.color.tint(0.88)),
        style.color,
    );
    cursor.rect(left, 0.0, 4.0, STATUS_CARD_HEIGHT, Some(style.color), None);

    let icon_dy = cursor.baseline_in(STATUS_CARD_HEIGHT, KPI_VALUE_SIZE);
    cursor.text(left + 14.0, icon_dy, &style.icon, KPI_VALUE_SIZE, FontWeight::Bold, style.color);

    let text_x = left + 36.0;
    let text_width = width - 36.0 - CARD_PADDING;
    let mut x = text_x;
    if let Some(caption) = label.filter(|c| !c.trim().is_empty()) {
        let caption = truncate_to_width(cursor.fonts(), caption, text_width / 2.0, 11.0, FontWeight::Bold);
        x += cursor.text(x, 19.0, &format!("{caption}: "), 11.0, FontWeight::Bold, palette::TEXT);
    }
    let name = truncate_to_width(cursor.fonts(), &style.label, text_x + text_width - x, 11.0, FontWeight::Bold);
    cursor.text(x, 19.0, &name, 11.0, FontWeight::Bold, style.color);

    let detail = format::or_placeholder(detail, &cfg.format);
    let detail = truncate_to_width(cursor.fonts(), &detail, text_width, 9.0, FontWeight::Regular);
    cursor.text(text_x, 35.0, &detail, 9.0, FontWeight::Regular, palette::MUTED);

    cursor.advance(STATUS_CARD_HEIGHT);
    Ok(())
}

/// Free text wrapped to the content width, one ensured line at a time.
pub fn paragraph(cursor: &mut PageCursor, text: &str) -> Result<(), FolioError> {
    let size = cursor.config().body_size;
    let lh = cursor.line_height();
    let baseline = cursor.baseline_in(lh, size);
    let left = cursor.left();
    for line in wrap(cursor.fonts(), text, cursor.content_width(), size, FontWeight::Regular) {
        cursor.ensure(lh)?;
        cursor.text(left, baseline, &line, size, FontWeight::Regular, palette::TEXT);
        cursor.advance(lh);
    }
    Ok(())
}
