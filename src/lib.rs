//! # Folio
//!
//! A page-native report renderer.
//!
//! Folio takes a fully assembled report (sections of data grids, event lists,
//! KPI cards, progress bars, status cards and tables) and lays it out *into*
//! fixed-size pages of absolutely positioned primitives. There is no flow
//! layout: every wrap, column position and page break is computed here, with
//! one hard guarantee: nothing is ever drawn below the bottom margin.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    — Report: meta + ordered sections of typed blocks
//!       ↓
//!   [format]   — Money, dates, status styles; [text] sanitize/wrap/truncate
//!       ↓
//!   [layout]   — PageCursor + block renderers + watermark pass
//!       ↓
//!   [pdf]      — Serialize pages of primitives to PDF bytes
//! ```
//!
//! A render owns all of its state (cursor, pages, primitives); concurrent
//! renders share nothing.

pub mod config;
pub mod error;
pub mod font;
pub mod format;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

use std::time::Instant;

pub use config::LayoutConfig;
pub use error::FolioError;
use font::FontContext;
use layout::{LayoutEngine, Page};
use model::Report;
use pdf::PdfWriter;

/// A serialized document plus what the caller needs for bookkeeping.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub byte_len: usize,
    pub page_count: usize,
}

/// Lay out a report into finished, watermarked pages without serializing.
pub fn layout(report: &Report, config: &LayoutConfig) -> Result<Vec<Page>, FolioError> {
    let fonts = FontContext::new();
    LayoutEngine::new(config).layout(report, &fonts)
}

/// Render a report to PDF bytes with the default configuration.
pub fn render(report: &Report) -> Result<RenderedDocument, FolioError> {
    render_with(report, &LayoutConfig::default())
}

/// Render a report to PDF bytes.
///
/// Fails only on an impossible configuration or when the document would need
/// more than `config.max_pages` pages.
pub fn render_with(report: &Report, config: &LayoutConfig) -> Result<RenderedDocument, FolioError> {
    let t0 = Instant::now();

    let pages = layout(report, config)?;
    let t_layout = t0.elapsed();

    let bytes = PdfWriter::new().write(&pages, &report.meta);
    let t_total = t0.elapsed();

    let primitives: usize = pages.iter().map(|p| p.primitives.len()).sum();
    log::info!(
        "Timing: layout={:.1}ms, serialize={:.1}ms, total={:.1}ms ({} pages, {} primitives, output {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        primitives,
        bytes.len(),
    );

    Ok(RenderedDocument {
        byte_len: bytes.len(),
        page_count: pages.len(),
        bytes,
    })
}

/// Render a report described as JSON with the default configuration.
pub fn render_json(json: &str) -> Result<RenderedDocument, FolioError> {
    render_json_with(json, &LayoutConfig::default())
}

/// Render a report described as JSON.
pub fn render_json_with(json: &str, config: &LayoutConfig) -> Result<RenderedDocument, FolioError> {
    let report: Report = serde_json::from_str(json)?;
    render_with(&report, config)
}
