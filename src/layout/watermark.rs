//! Watermark pass.
//!
//! Runs once every page's content is final and appends exactly one rotated,
//! low-opacity label to each page, centered on the page. The label shrinks
//! when its rotated box would not fit inside the margins.

use crate::config::WatermarkConfig;
use crate::font::{FontContext, FontWeight, CAP_HEIGHT_RATIO, DESCENT_RATIO};
use crate::text::sanitize;

use super::{Layer, Page, Primitive, TextRun};

/// Stamp every page in `pages`.
pub fn stamp(pages: &mut [Page], config: &WatermarkConfig, fonts: &FontContext) {
    if !config.enabled {
        return;
    }
    let text = sanitize(&config.text).trim().to_string();
    if text.is_empty() {
        log::warn!("watermark enabled with no drawable text; skipped");
        return;
    }
    for page in pages.iter_mut() {
        let run = centered(page, &text, config, fonts);
        page.primitives.push(Primitive::Text(run));
    }
    log::debug!("watermarked {} pages", pages.len());
}

fn centered(page: &Page, text: &str, config: &WatermarkConfig, fonts: &FontContext) -> TextRun {
    let (sin, cos) = config.angle.to_radians().sin_cos();
    let extent = CAP_HEIGHT_RATIO + DESCENT_RATIO;

    // Rotated bounding box at the configured size; it scales linearly.
    let width = fonts.measure(text, FontWeight::Bold, config.size);
    let box_w = width * cos.abs() + config.size * extent * sin.abs();
    let box_h = width * sin.abs() + config.size * extent * cos.abs();
    let avail_w = page.width - 2.0 * page.margin;
    let avail_h = page.height - 2.0 * page.margin;
    let mut scale = 1.0_f64;
    if box_w > avail_w {
        scale = scale.min(avail_w / box_w);
    }
    if box_h > avail_h {
        scale = scale.min(avail_h / box_h);
    }
    let size = config.size * scale;
    let width = width * scale;

    // Rotate about the text's own center so that center lands on the page's.
    let local_x = width / 2.0;
    let local_y = size * (CAP_HEIGHT_RATIO - DESCENT_RATIO) / 2.0;
    let x = page.width / 2.0 - (local_x * cos - local_y * sin);
    let y = page.height / 2.0 - (local_x * sin + local_y * cos);

    TextRun {
        text: text.to_string(),
        x,
        y,
        size,
        weight: FontWeight::Bold,
        color: config.color,
        width,
        opacity: config.opacity.clamp(0.0, 1.0),
        rotation: config.angle,
        layer: Layer::Watermark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;

    fn blank_pages(n: usize) -> Vec<Page> {
        let config = LayoutConfig::default();
        (0..n).map(|_| Page::new(&config)).collect()
    }

    fn watermarks(page: &Page) -> Vec<&TextRun> {
        page.texts().filter(|t| t.layer == Layer::Watermark).collect()
    }

    #[test]
    fn one_identical_watermark_per_page() {
        let mut pages = blank_pages(4);
        stamp(&mut pages, &WatermarkConfig::default(), &FontContext::new());
        let first = watermarks(&pages[0])[0].clone();
        for page in &pages {
            let marks = watermarks(page);
            assert_eq!(marks.len(), 1);
            assert_eq!(marks[0], &first);
        }
        assert_eq!(first.text, "CONFIDENTIAL");
        assert_eq!(first.rotation, 45.0);
        assert_eq!(first.opacity, 0.08);
    }

    #[test]
    fn watermark_is_centered_on_the_page() {
        let mut pages = blank_pages(1);
        stamp(&mut pages, &WatermarkConfig::default(), &FontContext::new());
        let run = watermarks(&pages[0])[0];
        let (sin, cos) = run.rotation.to_radians().sin_cos();
        let lx = run.width / 2.0;
        let ly = run.size * (CAP_HEIGHT_RATIO - DESCENT_RATIO) / 2.0;
        let cx = run.x + lx * cos - ly * sin;
        let cy = run.y + lx * sin + ly * cos;
        assert!((cx - pages[0].width / 2.0).abs() < 1e-9);
        assert!((cy - pages[0].height / 2.0).abs() < 1e-9);
    }

    #[test]
    fn long_watermark_shrinks_inside_the_margins() {
        let mut pages = blank_pages(1);
        let config = WatermarkConfig {
            text: "INTERNAL DISTRIBUTION ONLY - DO NOT FORWARD".into(),
            ..Default::default()
        };
        stamp(&mut pages, &config, &FontContext::new());
        let run = watermarks(&pages[0])[0];
        assert!(run.size < config.size);
        assert!(Primitive::Text(run.clone()).lowest_extent() >= pages[0].margin - 1e-9);
    }

    #[test]
    fn disabled_or_blank_watermark_draws_nothing() {
        let mut pages = blank_pages(2);
        let off = WatermarkConfig {
            enabled: false,
            ..Default::default()
        };
        stamp(&mut pages, &off, &FontContext::new());
        let blank = WatermarkConfig {
            text: " \u{1F512} ".into(),
            ..Default::default()
        };
        stamp(&mut pages, &blank, &FontContext::new());
        assert!(pages.iter().all(|p| p.primitives.is_empty()));
    }
}
