//! Data tables.
//!
//! A brand-colored header row, then body rows whose height is set by their
//! most-wrapped cell, then an optional total row under a rule. Rows are
//! ensured one at a time so a table may run across any number of pages; the
//! header is redrawn at the top of each continuation page when
//! `repeat_header` is set.
//!
//! A row taller than an empty page can hold is drawn line band by line band,
//! each band ensured on its own, so pathological cells still make progress.

use crate::config::FormatConfig;
use crate::error::FolioError;
use crate::font::FontWeight;
use crate::format;
use crate::model::{Align, CellValue, Column, Table};
use crate::style::{palette, Color};
use crate::text::{truncate_to_width, wrap};

use super::PageCursor;

/// Horizontal padding inside each cell.
pub const CELL_PADDING: f64 = 4.0;

/// Split `total` among columns by relative weight. Non-positive or non-finite
/// weights count as 1.
pub fn column_widths(columns: &[Column], total: f64) -> Vec<f64> {
    let weights: Vec<f64> = columns
        .iter()
        .map(|c| {
            if c.weight.is_finite() && c.weight > 0.0 {
                c.weight
            } else {
                1.0
            }
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| total * w / sum).collect()
}

fn align(column: &Column) -> Align {
    if column.currency {
        Align::Right
    } else {
        column.align
    }
}

fn cell_text(cell: Option<&CellValue>, column: &Column, fmt: &FormatConfig) -> String {
    match cell {
        Some(CellValue::Number(n)) if column.currency => format::currency(*n, fmt),
        Some(CellValue::Number(n)) => format::plain(*n, fmt),
        Some(CellValue::Text(s)) => format::or_placeholder(Some(s.as_str()), fmt),
        None => fmt.placeholder.clone(),
    }
}

/// Resolved column geometry shared by every row of one table.
struct Grid<'t> {
    columns: &'t [Column],
    xs: Vec<f64>,
    widths: Vec<f64>,
    size: f64,
    baseline: f64,
    repeat_header: bool,
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
}

impl Grid<'_> {
    fn draw_cell(
        &self,
        cursor: &mut PageCursor,
        index: usize,
        dy: f64,
        text: &str,
        weight: FontWeight,
        color: Color,
    ) {
        match align(&self.columns[index]) {
            Align::Left => {
                cursor.text(self.xs[index] + CELL_PADDING, dy, text, self.size, weight, color);
            }
            Align::Right => {
                let right = self.xs[index] + self.widths[index] - CELL_PADDING;
                cursor.text_right(right, dy, text, self.size, weight, color);
            }
        }
    }

    fn header(&self, cursor: &mut PageCursor) {
        let lh = cursor.line_height();
        let brand = cursor.config().brand_color;
        cursor.rect(cursor.left(), 0.0, cursor.content_width(), lh, Some(brand), None);
        for (i, column) in self.columns.iter().enumerate() {
            let label = truncate_to_width(
                cursor.fonts(),
                &column.header,
                self.widths[i] - 2.0 * CELL_PADDING,
                self.size,
                FontWeight::Bold,
            );
            self.draw_cell(cursor, i, self.baseline, &label, FontWeight::Bold, Color::WHITE);
        }
        cursor.advance(lh);
    }

    /// Called after a page break in the middle of the table.
    fn continuation(&self, cursor: &mut PageCursor) {
        if self.repeat_header {
            self.header(cursor);
        }
    }

    /// Draw lines `first..first + count` of every cell in one row.
    fn band(&self, cursor: &mut PageCursor, cells: &[Vec<String>], first: usize, count: usize, shade: bool) {
        let lh = cursor.line_height();
        if shade {
            cursor.rect(
                cursor.left(),
                0.0,
                cursor.content_width(),
                count as f64 * lh,
                Some(palette::ZEBRA),
                None,
            );
        }
        for (i, lines) in cells.iter().enumerate() {
            for (j, line) in lines.iter().skip(first).take(count).enumerate() {
                let dy = j as f64 * lh + self.baseline;
                self.draw_cell(cursor, i, dy, line, FontWeight::Regular, palette::TEXT);
            }
        }
    }
}

fn wrap_row(
    cursor: &PageCursor,
    columns: &[Column],
    widths: &[f64],
    row: &[Option<CellValue>],
) -> Vec<Vec<String>> {
    let cfg = cursor.config();
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let text = cell_text(row.get(i).and_then(Option::as_ref), column, &cfg.format);
            let width = widths[i] - 2.0 * CELL_PADDING;
            wrap(cursor.fonts(), &text, width, cfg.body_size, FontWeight::Regular)
        })
        .collect()
}

/// Header plus the first row (or the empty-state line). The header never
/// ends a page without it. A first row too tall for one page is split, so
/// only its first line counts.
fn lead(line_height: f64, under_header: f64, first: Option<&[Vec<String>]>) -> f64 {
    let row = first
        .map(|cells| line_count(cells) as f64 * line_height)
        .filter(|h| *h <= under_header)
        .unwrap_or(line_height);
    line_height + row
}

/// Height `table` needs before it draws anything.
pub fn lead_height(cursor: &PageCursor, table: &Table) -> f64 {
    let lh = cursor.line_height();
    if table.columns.is_empty() {
        return lh;
    }
    let widths = column_widths(&table.columns, cursor.content_width());
    let first = table
        .rows
        .first()
        .map(|row| wrap_row(cursor, &table.columns, &widths, row));
    lead(lh, cursor.config().content_height() - lh, first.as_deref())
}

/// Draw `table` at the cursor.
pub fn table(cursor: &mut PageCursor, table: &Table) -> Result<(), FolioError> {
    if table.columns.is_empty() {
        log::warn!("table without columns skipped ({} rows)", table.rows.len());
        return Ok(());
    }

    let cfg = cursor.config();
    let fmt = &cfg.format;
    let lh = cursor.line_height();
    let size = cfg.body_size;

    let widths = column_widths(&table.columns, cursor.content_width());
    let mut xs = Vec::with_capacity(widths.len());
    let mut x = cursor.left();
    for w in &widths {
        xs.push(x);
        x += w;
    }
    let grid = Grid {
        columns: &table.columns,
        xs,
        widths,
        size,
        baseline: cursor.baseline_in(lh, size),
        repeat_header: table.repeat_header,
    };

    let view: &PageCursor = cursor;
    let rows: Vec<Vec<Vec<String>>> = table
        .rows
        .iter()
        .map(|row| wrap_row(view, &table.columns, &grid.widths, row))
        .collect();

    let header_height = lh;
    let under_header = cfg.content_height() - header_height;
    // Tallest row that can be drawn whole on a fresh page.
    let row_limit = if table.repeat_header {
        under_header
    } else {
        cfg.content_height()
    };

    cursor.ensure(lead(lh, under_header, rows.first().map(Vec::as_slice)))?;
    grid.header(cursor);

    if rows.is_empty() {
        let text = format::or_placeholder(Some(table.empty_text.as_str()), fmt);
        cursor.text(cursor.left() + CELL_PADDING, grid.baseline, &text, size, FontWeight::Regular, palette::MUTED);
        cursor.advance(lh);
        return Ok(());
    }

    for (index, cells) in rows.iter().enumerate() {
        let lines = line_count(cells);
        let height = lines as f64 * lh;
        let shade = index % 2 == 1;
        if height <= row_limit {
            if cursor.ensure(height)? {
                grid.continuation(cursor);
            }
            log::debug!(
                "table row {} on page {} at y={:.2} ({} lines)",
                index,
                cursor.page_index() + 1,
                cursor.y(),
                lines
            );
            grid.band(cursor, cells, 0, lines, shade);
            cursor.advance(height);
        } else {
            log::debug!("table row {index} is {height:.2}pt tall, drawing it line by line");
            for k in 0..lines {
                if cursor.ensure(lh)? {
                    grid.continuation(cursor);
                }
                grid.band(cursor, cells, k, 1, shade);
                cursor.advance(lh);
            }
        }
    }

    if let Some(total) = &table.total {
        if cursor.ensure(lh)? {
            grid.continuation(cursor);
        }
        let (left, right) = (cursor.left(), cursor.right());
        cursor.line(left, 0.0, right, 0.0, 0.75, palette::TEXT);

        let value = table.columns.get(total.column).map(|column| {
            let sum = table.column_sum(total.column);
            if column.currency {
                format::currency(sum, fmt)
            } else {
                format::number(sum, fmt)
            }
        });
        if value.is_none() {
            log::warn!(
                "total column {} out of range for a {}-column table",
                total.column,
                table.columns.len()
            );
        }

        let label_width = grid.widths[0] - 2.0 * CELL_PADDING;
        match value {
            // Label and sum share the first cell.
            Some(value) if total.column == 0 => {
                let suffix = format!(": {value}");
                let room = label_width - cursor.measure(&suffix, FontWeight::Bold, size);
                let label = truncate_to_width(cursor.fonts(), &total.label, room, size, FontWeight::Bold);
                let text = if label.is_empty() { value } else { format!("{label}{suffix}") };
                grid.draw_cell(cursor, 0, grid.baseline, &text, FontWeight::Bold, palette::TEXT);
            }
            value => {
                let label = truncate_to_width(cursor.fonts(), &total.label, label_width, size, FontWeight::Bold);
                grid.draw_cell(cursor, 0, grid.baseline, &label, FontWeight::Bold, palette::TEXT);
                if let Some(value) = value {
                    grid.draw_cell(cursor, total.column, grid.baseline, &value, FontWeight::Bold, palette::TEXT);
                }
            }
        }
        cursor.advance(lh);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::font::FontContext;
    use crate::layout::{Page, Primitive};
    use crate::model::TotalRow;

    fn columns() -> Vec<Column> {
        vec![
            Column {
                header: "Customer".into(),
                weight: 3.0,
                align: Align::Left,
                currency: false,
            },
            Column {
                header: "Amount".into(),
                weight: 1.0,
                align: Align::Left,
                currency: true,
            },
        ]
    }

    fn draw(config: &LayoutConfig, t: &Table) -> Vec<Page> {
        let fonts = FontContext::new();
        let mut cursor = PageCursor::new(&fonts, config);
        table(&mut cursor, t).unwrap();
        cursor.finish()
    }

    fn page_texts(page: &Page) -> Vec<String> {
        page.texts().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn widths_follow_weights() {
        let w = column_widths(&columns(), 400.0);
        assert_eq!(w, vec![300.0, 100.0]);
    }

    #[test]
    fn empty_table_has_header_and_empty_state_but_no_total() {
        let t = Table {
            columns: columns(),
            rows: vec![],
            total: Some(TotalRow {
                label: "Total".into(),
                column: 1,
            }),
            repeat_header: true,
            empty_text: "No invoices".into(),
        };
        let pages = draw(&LayoutConfig::default(), &t);
        assert_eq!(pages.len(), 1);
        assert_eq!(page_texts(&pages[0]), vec!["Customer", "Amount", "No invoices"]);
        assert!(!pages[0].primitives.iter().any(|p| matches!(p, Primitive::Line(_))));
    }

    #[test]
    fn total_row_sums_the_designated_column() {
        let amounts = [1250.40, -75.25, 19.99, 3000.0, 0.01];
        let t = Table {
            columns: columns(),
            rows: amounts
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    vec![
                        Some(CellValue::Text(format!("Customer {i}"))),
                        Some(CellValue::Number(*a)),
                    ]
                })
                .collect(),
            total: Some(TotalRow {
                label: "Total".into(),
                column: 1,
            }),
            repeat_header: true,
            empty_text: String::new(),
        };
        let mut expected = 0.0;
        for a in amounts {
            expected += a;
        }
        let pages = draw(&LayoutConfig::default(), &t);
        let texts = page_texts(&pages[0]);
        let fmt = FormatConfig::default();
        assert_eq!(texts.last().unwrap(), &format::currency(expected, &fmt));
        assert_eq!(texts[texts.len() - 2], "Total");
        assert_eq!(format::currency(expected, &fmt), "R$ 4.195,15");
    }

    #[test]
    fn currency_cells_are_right_aligned() {
        let t = Table {
            columns: columns(),
            rows: vec![vec![None, Some(CellValue::Number(12.5))]],
            total: None,
            repeat_header: true,
            empty_text: String::new(),
        };
        let pages = draw(&LayoutConfig::default(), &t);
        let config = LayoutConfig::default();
        let amount = pages[0].texts().find(|t| t.text == "R$ 12,50").unwrap();
        let right_edge = config.page_width - config.margin - CELL_PADDING;
        assert!((amount.x + amount.width - right_edge).abs() < 1e-9);
        assert!(page_texts(&pages[0]).contains(&"\u{2014}".to_string()));
    }

    fn long_table(repeat_header: bool) -> Table {
        Table {
            columns: columns(),
            rows: (0..120)
                .map(|i| {
                    vec![
                        Some(CellValue::Text(format!("Row {i}"))),
                        Some(CellValue::Number(i as f64)),
                    ]
                })
                .collect(),
            total: None,
            repeat_header,
            empty_text: String::new(),
        }
    }

    #[test]
    fn header_repeats_on_continuation_pages() {
        let pages = draw(&LayoutConfig::default(), &long_table(true));
        assert!(pages.len() >= 3);
        for page in &pages {
            assert_eq!(page.texts().filter(|t| t.text == "Customer").count(), 1);
        }
    }

    #[test]
    fn header_can_be_drawn_once() {
        let pages = draw(&LayoutConfig::default(), &long_table(false));
        assert!(pages.len() >= 2);
        let headers: usize = pages
            .iter()
            .map(|p| p.texts().filter(|t| t.text == "Customer").count())
            .sum();
        assert_eq!(headers, 1);
    }

    #[test]
    fn oversized_row_is_drawn_in_bands() {
        let essay = "word ".repeat(4000);
        let t = Table {
            columns: columns(),
            rows: vec![vec![Some(CellValue::Text(essay)), Some(CellValue::Number(1.0))]],
            total: None,
            repeat_header: true,
            empty_text: String::new(),
        };
        let config = LayoutConfig::default();
        let pages = draw(&config, &t);
        assert!(pages.len() > 1);
        for page in &pages {
            for p in &page.primitives {
                assert!(p.lowest_extent() >= config.bottom() - 1e-9);
            }
        }
    }

    #[test]
    fn out_of_range_total_column_is_absorbed() {
        let t = Table {
            columns: columns(),
            rows: vec![vec![None, Some(CellValue::Number(1.0))]],
            total: Some(TotalRow {
                label: "Total".into(),
                column: 9,
            }),
            repeat_header: true,
            empty_text: String::new(),
        };
        let pages = draw(&LayoutConfig::default(), &t);
        assert_eq!(page_texts(&pages[0]).last().unwrap(), "Total");
    }

    #[test]
    fn long_total_label_stays_in_its_cell() {
        let t = Table {
            columns: columns(),
            rows: vec![vec![None, Some(CellValue::Number(10.0))]],
            total: Some(TotalRow {
                label: "Grand total of every outstanding receivable ".repeat(3),
                column: 1,
            }),
            repeat_header: true,
            empty_text: String::new(),
        };
        let config = LayoutConfig::default();
        let widths = column_widths(&t.columns, config.content_width());
        let pages = draw(&config, &t);
        let label = pages[0]
            .texts()
            .find(|r| r.text.starts_with("Grand total"))
            .unwrap();
        assert!(label.text.ends_with(crate::text::ELLIPSIS));
        assert!(label.x + label.width <= config.margin + widths[0] - CELL_PADDING + 1e-9);
        assert!(page_texts(&pages[0]).contains(&"R$ 10,00".to_string()));
    }

    #[test]
    fn total_in_the_first_column_shares_the_cell() {
        let t = Table {
            columns: vec![Column {
                header: "Amount".into(),
                weight: 1.0,
                align: Align::Left,
                currency: true,
            }],
            rows: vec![
                vec![Some(CellValue::Number(2.5))],
                vec![Some(CellValue::Number(4.0))],
            ],
            total: Some(TotalRow {
                label: "Total".into(),
                column: 0,
            }),
            repeat_header: true,
            empty_text: String::new(),
        };
        let pages = draw(&LayoutConfig::default(), &t);
        let texts = page_texts(&pages[0]);
        assert_eq!(texts.last().unwrap(), "Total: R$ 6,50");
        assert!(!texts.contains(&"Total".to_string()));
    }

    #[test]
    fn lead_covers_the_header_and_the_wrapped_first_row() {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let cursor = PageCursor::new(&fonts, &config);
        let t = Table {
            columns: columns(),
            rows: vec![vec![
                Some(CellValue::Text("word ".repeat(120))),
                Some(CellValue::Number(1.0)),
            ]],
            total: None,
            repeat_header: true,
            empty_text: String::new(),
        };
        let widths = column_widths(&t.columns, config.content_width());
        let lines = wrap_row(&cursor, &t.columns, &widths, &t.rows[0])[0].len();
        assert!(lines > 1);
        let expected = (1 + lines) as f64 * config.line_height;
        assert!((lead_height(&cursor, &t) - expected).abs() < 1e-9);
    }
}
