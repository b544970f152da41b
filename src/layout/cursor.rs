//! # Page Cursor
//!
//! The single piece of mutable state during a render: the page being drawn
//! and a vertical offset that only moves down it. Renderers receive the
//! cursor explicitly; nothing about a render lives outside it.
//!
//! Offsets are in PDF space (y grows upward), so the cursor starts at the top
//! margin and decreases. Draw calls take a `dy` measured *below* the cursor
//! and never move it: the caller advances once it knows how much it used.

use crate::config::LayoutConfig;
use crate::error::FolioError;
use crate::font::{FontContext, FontWeight};
use crate::style::Color;
use crate::text::sanitize;

use super::{Layer, Line, Page, Primitive, Rect, Stroke, TextRun};

/// Slack for float noise when comparing offsets against the bottom margin.
const EPSILON: f64 = 1e-6;

pub struct PageCursor<'a> {
    fonts: &'a FontContext,
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    current: Page,
    y: f64,
}

impl<'a> PageCursor<'a> {
    /// Open the first page with the cursor at the top margin.
    pub fn new(fonts: &'a FontContext, config: &'a LayoutConfig) -> Self {
        Self {
            fonts,
            config,
            pages: Vec::new(),
            current: Page::new(config),
            y: config.top(),
        }
    }

    pub fn fonts(&self) -> &'a FontContext {
        self.fonts
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    /// Current vertical offset.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Left edge of the content area.
    pub fn left(&self) -> f64 {
        self.config.margin
    }

    /// Right edge of the content area.
    pub fn right(&self) -> f64 {
        self.config.page_width - self.config.margin
    }

    pub fn content_width(&self) -> f64 {
        self.config.content_width()
    }

    pub fn line_height(&self) -> f64 {
        self.config.line_height
    }

    /// Space left between the cursor and the bottom margin.
    pub fn remaining(&self) -> f64 {
        (self.y - self.config.bottom()).max(0.0)
    }

    /// Zero-based index of the page being drawn.
    pub fn page_index(&self) -> usize {
        self.pages.len()
    }

    /// Pages opened so far, including the current one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Make room for a block of `needed` height.
    ///
    /// Starts a new page when drawing `needed` from the current offset would
    /// cross the bottom margin, and returns whether it did. A request taller
    /// than an empty page can never be satisfied and fails with
    /// [`FolioError::BlockTooTall`].
    pub fn ensure(&mut self, needed: f64) -> Result<bool, FolioError> {
        let available = self.config.content_height();
        if needed > available + EPSILON {
            return Err(FolioError::BlockTooTall { needed, available });
        }
        if self.y - needed < self.config.bottom() - EPSILON {
            log::debug!(
                "page break after page {}: {:.2}pt needed at y={:.2}",
                self.page_index() + 1,
                needed,
                self.y
            );
            self.new_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Commit the current page and open a fresh one with the cursor at the top
    /// margin. Fails once the configured page ceiling would be exceeded.
    pub fn new_page(&mut self) -> Result<(), FolioError> {
        let limit = self.config.max_pages;
        if self.page_count() >= limit {
            return Err(FolioError::PageLimitExceeded { limit });
        }
        let finished = std::mem::replace(&mut self.current, Page::new(self.config));
        self.pages.push(finished);
        self.y = self.config.top();
        Ok(())
    }

    /// Move the cursor down by `dy`.
    pub fn advance(&mut self, dy: f64) {
        debug_assert!(dy >= 0.0, "cursor can only move down");
        self.y -= dy.max(0.0);
    }

    /// Vertical gap between blocks. Never moves past the bottom margin; the
    /// next `ensure` decides whether a new page is needed.
    pub fn space(&mut self, dy: f64) {
        self.y = (self.y - dy.max(0.0)).max(self.config.bottom());
    }

    /// Baseline offset that vertically centers cap-height text of `size` in a
    /// box of `box_height`.
    pub fn baseline_in(&self, box_height: f64, size: f64) -> f64 {
        (box_height + self.fonts.cap_height(size)) / 2.0
    }

    /// Sanitized width of `text` as it would be drawn.
    pub fn measure(&self, text: &str, weight: FontWeight, size: f64) -> f64 {
        self.fonts.measure(&sanitize(text), weight, size)
    }

    /// Draw a text run with its baseline `dy` below the cursor. Returns the
    /// drawn width; empty text draws nothing.
    pub fn text(
        &mut self,
        x: f64,
        dy: f64,
        text: &str,
        size: f64,
        weight: FontWeight,
        color: Color,
    ) -> f64 {
        let text = sanitize(text);
        if text.is_empty() {
            return 0.0;
        }
        let width = self.fonts.measure(&text, weight, size);
        self.current.primitives.push(Primitive::Text(TextRun {
            text,
            x,
            y: self.y - dy,
            size,
            weight,
            color,
            width,
            opacity: 1.0,
            rotation: 0.0,
            layer: Layer::Content,
        }));
        width
    }

    /// Draw a text run whose right edge sits at `right`.
    pub fn text_right(
        &mut self,
        right: f64,
        dy: f64,
        text: &str,
        size: f64,
        weight: FontWeight,
        color: Color,
    ) -> f64 {
        let width = self.measure(text, weight, size);
        self.text(right - width, dy, text, size, weight, color)
    }

    /// Draw a rectangle whose top edge is `dy` below the cursor.
    pub fn rect(
        &mut self,
        x: f64,
        dy: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.current.primitives.push(Primitive::Rect(Rect {
            x,
            y: self.y - dy - height,
            width,
            height,
            fill,
            stroke,
        }));
    }

    /// Draw a straight line between two points given relative to the cursor.
    pub fn line(&mut self, x1: f64, dy1: f64, x2: f64, dy2: f64, thickness: f64, color: Color) {
        self.current.primitives.push(Primitive::Line(Line {
            x1,
            y1: self.y - dy1,
            x2,
            y2: self.y - dy2,
            thickness,
            color,
        }));
    }

    /// Commit the current page and return every page in order.
    pub fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}
