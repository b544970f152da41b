//! # Report Model
//!
//! The input to the layout engine: a fully assembled, immutable report. The
//! data layer denormalizes everything before handing it over; the engine never
//! resolves references or validates business rules.
//!
//! In JSON, field names are camelCase and content blocks are tagged by
//! `"type"`:
//!
//! ```json
//! {
//!   "meta": { "id": "RPT-0042", "generatedAt": "2024-03-07T15:04:05Z" },
//!   "sections": [{
//!     "number": 1,
//!     "title": "Overview",
//!     "blocks": [{ "type": "statusCard", "status": "paid" }]
//!   }]
//! }
//! ```
//!
//! Every business field that might be missing is an `Option`; the layout
//! renders a placeholder glyph for it rather than failing.

use serde::{Deserialize, Serialize};

use crate::style::Color;

/// A complete report ready for layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub meta: ReportMeta,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Identification printed in the masthead and footer, and written to the PDF
/// info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub id: Option<String>,
    pub title: Option<String>,
    /// ISO 8601 date or timestamp.
    pub generated_at: Option<String>,
    /// Canonical locator of the report resource.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A typed content block inside a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Ordered label/value pairs in one or two columns.
    DataGrid {
        #[serde(default = "default_columns")]
        columns: u8,
        items: Vec<GridItem>,
    },
    EventList {
        items: Vec<Event>,
        /// Placeholder line when `items` is empty.
        #[serde(default = "default_no_events", rename = "emptyText")]
        empty_text: String,
    },
    KpiRow { cards: Vec<KpiCard> },
    ProgressBar {
        label: String,
        percent: Option<f64>,
        #[serde(default)]
        thresholds: Thresholds,
    },
    StatusCard {
        status: String,
        label: Option<String>,
        detail: Option<String>,
    },
    Table(Table),
    /// Free text wrapped to the content width.
    Paragraph { text: String },
    /// Two independently wrapped columns drawn side by side.
    TwoColumn { left: String, right: String },
}

fn default_columns() -> u8 {
    1
}

fn default_no_events() -> String {
    "No events recorded".to_string()
}

fn default_no_rows() -> String {
    "No records".to_string()
}

fn default_true() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridItem {
    pub label: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub text: String,
    #[serde(default)]
    pub urgency: Urgency,
    pub date: Option<String>,
}

/// A number or a preformatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Plain,
    Currency,
    Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiCard {
    pub value: Option<CellValue>,
    pub label: String,
    /// Color of the value and the card's top accent. Brand color when absent.
    pub accent: Option<Color>,
    #[serde(default)]
    pub format: ValueFormat,
}

/// Progress bar color bands, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 75.0,
            medium: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub header: String,
    /// Relative share of the content width.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub align: Align,
    /// Format numeric cells as money.
    #[serde(default)]
    pub currency: bool,
}

/// Trailing row summing one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalRow {
    pub label: String,
    /// Index of the column to sum.
    pub column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<CellValue>>>,
    pub total: Option<TotalRow>,
    /// Redraw the header at the top of each continuation page.
    #[serde(default = "default_true")]
    pub repeat_header: bool,
    #[serde(default = "default_no_rows")]
    pub empty_text: String,
}

impl Table {
    /// Sum of the numeric cells in `column`. Text and missing cells count as
    /// zero.
    pub fn column_sum(&self, column: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(|cell| cell.as_ref().and_then(CellValue::as_number))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_tagged_by_type() {
        let json = r##"{
            "meta": { "id": "RPT-1" },
            "sections": [{
                "number": 1,
                "title": "Overview",
                "blocks": [
                    { "type": "statusCard", "status": "paid" },
                    { "type": "kpiRow", "cards": [
                        { "value": 1200.5, "label": "Revenue", "format": "currency", "accent": "#2E7D32" },
                        { "value": "n/a", "label": "Churn" }
                    ]},
                    { "type": "eventList", "items": [] },
                    { "type": "table", "columns": [{ "header": "Name", "weight": 3 }] }
                ]
            }]
        }"##;
        let report: Report = serde_json::from_str(json).unwrap();
        let blocks = &report.sections[0].blocks;
        assert!(matches!(blocks[0], Block::StatusCard { .. }));
        match &blocks[1] {
            Block::KpiRow { cards } => {
                assert_eq!(cards[0].value, Some(CellValue::Number(1200.5)));
                assert_eq!(cards[0].format, ValueFormat::Currency);
                assert_eq!(cards[1].value, Some(CellValue::Text("n/a".into())));
            }
            other => panic!("unexpected block {other:?}"),
        }
        match &blocks[2] {
            Block::EventList { empty_text, .. } => assert_eq!(empty_text, "No events recorded"),
            other => panic!("unexpected block {other:?}"),
        }
        match &blocks[3] {
            Block::Table(t) => {
                assert!(t.repeat_header);
                assert!(t.rows.is_empty());
                assert_eq!(t.columns[0].weight, 3.0);
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn column_sum_ignores_text_and_missing_cells() {
        let table = Table {
            columns: vec![],
            rows: vec![
                vec![Some(CellValue::Text("a".into())), Some(CellValue::Number(10.25))],
                vec![None, Some(CellValue::Number(-3.0))],
                vec![None, None],
                vec![None, Some(CellValue::Text("x".into()))],
                vec![None],
            ],
            total: None,
            repeat_header: true,
            empty_text: String::new(),
        };
        assert_eq!(table.column_sum(1), 7.25);
    }
}
