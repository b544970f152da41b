//! # Font Management
//!
//! The engine draws with the standard PDF Helvetica faces, which never need
//! embedding. [`FontContext`] is the single metrics source shared by text
//! wrapping and drawing: every width the layout relies on is computed here,
//! and the PDF writer references the exact faces measured here.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::{Deserialize, Serialize};

/// Cap height of Helvetica, as a fraction of the font size.
pub const CAP_HEIGHT_RATIO: f64 = 0.718;
/// Descender depth of Helvetica, as a fraction of the font size.
pub const DESCENT_RATIO: f64 = 0.207;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// The standard PDF fonts this engine draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub const ALL: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }

    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => Self::Helvetica,
            FontWeight::Bold => Self::HelveticaBold,
        }
    }
}

/// Shared font context used by wrapping, drawing, and PDF serialization.
#[derive(Debug, Clone, Default)]
pub struct FontContext {
    _private: (),
}

impl FontContext {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Resolve a weight to the face that will be drawn.
    pub fn face(&self, weight: FontWeight) -> StandardFont {
        StandardFont::for_weight(weight)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, weight: FontWeight, font_size: f64) -> f64 {
        self.face(weight).metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure(&self, text: &str, weight: FontWeight, font_size: f64) -> f64 {
        self.face(weight).metrics().measure_string(text, font_size)
    }

    /// Distance from the baseline down to the lowest descender.
    pub fn descent(&self, font_size: f64) -> f64 {
        font_size * DESCENT_RATIO
    }

    /// Distance from the baseline up to the top of capital letters.
    pub fn cap_height(&self, font_size: f64) -> f64 {
        font_size * CAP_HEIGHT_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', FontWeight::Regular, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.char_width('A', FontWeight::Regular, 12.0);
        let bold = ctx.char_width('A', FontWeight::Bold, 12.0);
        assert!(bold > regular, "Bold A should be wider than regular A");
    }

    #[test]
    fn test_font_context_measure_string() {
        let ctx = FontContext::new();
        let w = ctx.measure("Hello", FontWeight::Regular, 12.0);
        // H e l l o = 722 + 556 + 222 + 222 + 556
        assert!((w - 2278.0 * 12.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_faces_have_distinct_resources() {
        assert_eq!(StandardFont::Helvetica.resource_name(), "F1");
        assert_eq!(StandardFont::HelveticaBold.pdf_name(), "Helvetica-Bold");
        assert_eq!(FontContext::new().face(FontWeight::Bold), StandardFont::HelveticaBold);
    }
}
