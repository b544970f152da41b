//! # Text Layout
//!
//! Greedy word wrapping and single-line truncation.
//!
//! Both run on sanitized text and measure with the [`FontContext`] that the
//! canvas later draws with, so a line that wraps here is exactly as wide on
//! the page.

pub mod sanitize;

pub use sanitize::{is_renderable, sanitize};

use crate::font::{FontContext, FontWeight};

/// Marker appended to truncated single-line text.
pub const ELLIPSIS: &str = "...";

/// Average glyph width as a fraction of the font size. Used as the first
/// budget estimate in [`truncate_to_width`].
pub const AVERAGE_GLYPH_RATIO: f64 = 0.5;

/// Break `text` into lines no wider than `max_width`.
///
/// Words are appended to the current line while the line, measured with the
/// drawing font, stays within `max_width`; otherwise the line is flushed and
/// the word starts the next one. A single word wider than `max_width` is
/// split between characters. Always returns at least one line (an empty one
/// for empty input). A non-positive or non-finite `max_width` disables
/// wrapping.
pub fn wrap(
    fonts: &FontContext,
    text: &str,
    max_width: f64,
    font_size: f64,
    weight: FontWeight,
) -> Vec<String> {
    let clean = sanitize(text);

    if !(max_width > 0.0 && max_width.is_finite()) {
        return vec![clean.split_whitespace().collect::<Vec<_>>().join(" ")];
    }

    let fits = |s: &str| fonts.measure(s, weight, font_size) <= max_width;

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in clean.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current.push_str(word);
        } else {
            let mut pieces = split_word(fonts, word, max_width, font_size, weight);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Force-break a word with no break opportunity at character boundaries.
/// A glyph wider than `max_width` on its own still gets a line of its own.
fn split_word(
    fonts: &FontContext,
    word: &str,
    max_width: f64,
    font_size: f64,
    weight: FontWeight,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if fonts.measure(&piece, weight, font_size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Fit `text` on one line of `max_width`, appending [`ELLIPSIS`] when cut.
///
/// The character budget comes from an average glyph width of
/// `font_size * AVERAGE_GLYPH_RATIO`. That estimate can still overflow for
/// wide glyphs, so the result is then checked with real metrics and trimmed
/// further until it fits.
pub fn truncate_to_width(
    fonts: &FontContext,
    text: &str,
    max_width: f64,
    font_size: f64,
    weight: FontWeight,
) -> String {
    let clean = sanitize(text).split_whitespace().collect::<Vec<_>>().join(" ");
    let fits = |s: &str| fonts.measure(s, weight, font_size) <= max_width;

    if !(max_width > 0.0) || font_size <= 0.0 {
        return String::new();
    }

    let budget = (max_width / (font_size * AVERAGE_GLYPH_RATIO)).floor() as usize;
    let chars: Vec<char> = clean.chars().collect();

    if chars.len() <= budget && fits(&clean) {
        return clean;
    }

    let keep = chars.len().min(budget.saturating_sub(ELLIPSIS.len()));
    let mut kept: String = chars[..keep].iter().collect();
    loop {
        let candidate = format!("{}{}", kept.trim_end(), ELLIPSIS);
        if fits(&candidate) {
            log::debug!("truncated {:?} to {:?} for width {:.2}", clean, candidate, max_width);
            return candidate;
        }
        if kept.pop().is_none() {
            return String::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f64 = 10.0;

    fn fonts() -> FontContext {
        FontContext::new()
    }

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        assert_eq!(wrap(&fonts(), "", 100.0, SIZE, FontWeight::Regular), vec![String::new()]);
        assert_eq!(wrap(&fonts(), "   \n ", 100.0, SIZE, FontWeight::Regular), vec![String::new()]);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap(&fonts(), "Hello world", 200.0, SIZE, FontWeight::Regular);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn every_line_fits_and_words_are_preserved() {
        let text = "The quick brown fox jumps over the lazy dog while the \
                    accountant reconciles forty-two outstanding invoices \
                    before the quarterly close on Friday afternoon";
        let f = fonts();
        for max_width in [60.0, 95.5, 140.0, 250.0, 495.28] {
            for weight in [FontWeight::Regular, FontWeight::Bold] {
                let lines = wrap(&f, text, max_width, SIZE, weight);
                for line in &lines {
                    assert!(
                        f.measure(line, weight, SIZE) <= max_width,
                        "{line:?} wider than {max_width}"
                    );
                }
                assert_eq!(words(&lines.join(" ")), words(&sanitize(text)));
            }
        }
    }

    #[test]
    fn greedy_packs_as_much_as_fits() {
        let f = fonts();
        let lines = wrap(&f, "aaa bbb ccc ddd eee", 60.0, SIZE, FontWeight::Regular);
        // Every line except the last would overflow with the next word added.
        for pair in lines.windows(2) {
            let next_word = pair[1].split_whitespace().next().unwrap();
            let joined = format!("{} {}", pair[0], next_word);
            assert!(f.measure(&joined, FontWeight::Regular, SIZE) > 60.0);
        }
    }

    #[test]
    fn overlong_word_is_split_between_characters() {
        let f = fonts();
        let word = "Supercalifragilisticexpialidocious";
        let lines = wrap(&f, word, 50.0, SIZE, FontWeight::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(f.measure(line, FontWeight::Regular, SIZE) <= 50.0);
        }
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn wrap_sanitizes_before_measuring() {
        let lines = wrap(&fonts(), "a \u{2192} b", 500.0, SIZE, FontWeight::Regular);
        assert_eq!(lines, vec!["a -> b".to_string()]);
    }

    #[test]
    fn non_positive_width_disables_wrapping() {
        let lines = wrap(&fonts(), "one two  three", 0.0, SIZE, FontWeight::Regular);
        assert_eq!(lines, vec!["one two three".to_string()]);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(
            truncate_to_width(&fonts(), "Revenue", 100.0, SIZE, FontWeight::Regular),
            "Revenue"
        );
    }

    #[test]
    fn truncate_appends_ellipsis_and_fits() {
        let f = fonts();
        let out = truncate_to_width(
            &f,
            "A considerably longer label than the card can hold",
            80.0,
            SIZE,
            FontWeight::Regular,
        );
        assert!(out.ends_with(ELLIPSIS));
        assert!(f.measure(&out, FontWeight::Regular, SIZE) <= 80.0);
    }

    #[test]
    fn truncate_corrects_the_average_width_estimate() {
        // 'W' is far wider than the average glyph, so the character budget
        // alone would overflow.
        let f = fonts();
        let out = truncate_to_width(&f, "WWWWWWWWWW", 50.0, SIZE, FontWeight::Bold);
        assert!(f.measure(&out, FontWeight::Bold, SIZE) <= 50.0);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncate_to_nothing_when_even_the_ellipsis_overflows() {
        assert_eq!(truncate_to_width(&fonts(), "abc", 2.0, SIZE, FontWeight::Regular), "");
    }
}
