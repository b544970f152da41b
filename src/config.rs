//! # Layout Configuration
//!
//! Geometry, watermark and locale settings for a render. The defaults are the
//! fixed geometry contract: A4 portrait (595.28 x 841.89 pt), a uniform 50 pt
//! margin and a 15 pt baseline line height. A deployment may override any
//! field from a JSON file; every field falls back to its default when absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::font::{CAP_HEIGHT_RATIO, DESCENT_RATIO};
use crate::layout::tallest_unsplit_block;
use crate::style::{palette, Color};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    /// Uniform margin on all four sides.
    pub margin: f64,
    /// Baseline line height used by every text-bearing block.
    pub line_height: f64,
    /// Body text size.
    pub body_size: f64,
    /// Horizontal gap between KPI cards.
    pub kpi_gutter: f64,
    /// Hard page-count ceiling. Layout fails instead of opening page
    /// `max_pages + 1`.
    pub max_pages: usize,
    pub brand_color: Color,
    /// Attribution line printed in the footer block.
    pub attribution: String,
    pub watermark: WatermarkConfig,
    pub format: FormatConfig,
    /// Extra or replacement status styles, keyed by lowercase status key.
    pub statuses: BTreeMap<String, StatusOverride>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 50.0,
            line_height: 15.0,
            body_size: 10.0,
            kpi_gutter: 10.0,
            max_pages: 500,
            brand_color: palette::BRAND,
            attribution: "Generated automatically".to_string(),
            watermark: WatermarkConfig::default(),
            format: FormatConfig::default(),
            statuses: BTreeMap::new(),
        }
    }
}

impl LayoutConfig {
    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Height between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Vertical offset of the top margin (PDF space, y grows upward).
    pub fn top(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Vertical offset of the bottom margin.
    pub fn bottom(&self) -> f64 {
        self.margin
    }

    /// Reject geometry that leaves no room to draw anything.
    pub fn validate(&self) -> Result<(), FolioError> {
        let finite = [
            self.page_width,
            self.page_height,
            self.margin,
            self.line_height,
            self.body_size,
            self.kpi_gutter,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(FolioError::Config("geometry values must be finite".into()));
        }
        if self.margin < 0.0 || self.kpi_gutter < 0.0 {
            return Err(FolioError::Config("margin and gutter must not be negative".into()));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(FolioError::Config(format!(
                "margins of {} leave no printable area on a {} x {} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if self.line_height <= 0.0 || self.body_size <= 0.0 {
            return Err(FolioError::Config("line height and body size must be positive".into()));
        }
        // Centered body text must keep its descenders inside one line box.
        let glyph_box = self.body_size * (CAP_HEIGHT_RATIO + 2.0 * DESCENT_RATIO);
        if glyph_box > self.line_height {
            return Err(FolioError::Config(format!(
                "{} pt body text does not fit a {} pt line height",
                self.body_size, self.line_height
            )));
        }
        let tallest = tallest_unsplit_block(self.line_height);
        if self.content_height() < tallest {
            return Err(FolioError::Config(format!(
                "printable height {:.2} cannot hold a {:.2} pt block",
                self.content_height(),
                tallest
            )));
        }
        if self.max_pages == 0 {
            return Err(FolioError::Config("maxPages must be at least 1".into()));
        }
        Ok(())
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, FolioError> {
        let raw = std::fs::read_to_string(path)?;
        let config: LayoutConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

/// The rotated, low-opacity label stamped at the center of every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub text: String,
    pub size: f64,
    /// Counter-clockwise rotation in degrees.
    pub angle: f64,
    pub opacity: f64,
    pub color: Color,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "CONFIDENTIAL".to_string(),
            size: 60.0,
            angle: 45.0,
            opacity: 0.08,
            color: palette::WATERMARK,
        }
    }
}

/// The one fixed locale used for money and dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatConfig {
    pub currency_symbol: String,
    pub group_separator: String,
    pub decimal_separator: String,
    /// Rendered in place of any missing optional value.
    pub placeholder: String,
    /// chrono pattern for dates.
    pub date_pattern: String,
    /// chrono pattern for timestamps.
    pub datetime_pattern: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            group_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            placeholder: "\u{2014}".to_string(),
            date_pattern: "%d/%m/%Y".to_string(),
            datetime_pattern: "%d/%m/%Y %H:%M".to_string(),
        }
    }
}

/// A deployment-specific status style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverride {
    pub label: String,
    pub color: Color,
    #[serde(default)]
    pub icon: Option<String>,
}
