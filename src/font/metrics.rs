//! Advance widths for the standard Helvetica faces, in 1/1000 em.
//!
//! Values come from the Adobe Core14 AFM files. Only the WinAnsi repertoire
//! is covered, which is everything `text::sanitize` lets through. Accented
//! Latin letters share their base letter's advance, so they are resolved by
//! canonical decomposition instead of being listed one by one.

use unicode_normalization::UnicodeNormalization;

pub struct StandardFontMetrics {
    /// Widths for U+0020..=U+007E.
    ascii: &'static [u16; 95],
    /// Widths for the non-ASCII glyphs that do not fold to an ASCII letter.
    extras: &'static [(char, u16)],
    /// Width used for anything outside the table.
    missing: u16,
}

impl StandardFontMetrics {
    /// Advance width of `ch` in font units (1000 per em).
    pub fn glyph_units(&self, ch: char) -> u16 {
        self.lookup(ch).unwrap_or(self.missing)
    }

    fn lookup(&self, ch: char) -> Option<u16> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return Some(self.ascii[(cp - 0x20) as usize]);
        }
        if let Some(&(_, w)) = self.extras.iter().find(|(c, _)| *c == ch) {
            return Some(w);
        }
        // Accented letters: measure the base letter.
        let base = std::iter::once(ch).nfd().next()?;
        if base != ch && base.is_ascii_alphabetic() {
            return Some(self.ascii[(base as u32 - 0x20) as usize]);
        }
        None
    }

    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.glyph_units(ch) as f64 * font_size / 1000.0
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| self.glyph_units(c) as u32).sum();
        units as f64 * font_size / 1000.0
    }
}

#[rustfmt::skip]
static HELVETICA_ASCII: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

static HELVETICA_EXTRAS: &[(char, u16)] = &[
    ('\u{20AC}', 556), ('\u{201A}', 222), ('\u{0192}', 556), ('\u{201E}', 333),
    ('\u{2026}', 1000), ('\u{2020}', 556), ('\u{2021}', 556), ('\u{02C6}', 333),
    ('\u{2030}', 1000), ('\u{2039}', 333), ('\u{0152}', 1000), ('\u{2018}', 222),
    ('\u{2019}', 222), ('\u{201C}', 333), ('\u{201D}', 333), ('\u{2022}', 350),
    ('\u{2013}', 556), ('\u{2014}', 1000), ('\u{02DC}', 333), ('\u{2122}', 1000),
    ('\u{203A}', 333), ('\u{0153}', 944), ('\u{00A0}', 278), ('\u{00A1}', 333),
    ('\u{00A2}', 556), ('\u{00A3}', 556), ('\u{00A4}', 556), ('\u{00A5}', 556),
    ('\u{00A6}', 260), ('\u{00A7}', 556), ('\u{00A8}', 333), ('\u{00A9}', 737),
    ('\u{00AA}', 370), ('\u{00AB}', 556), ('\u{00AC}', 584), ('\u{00AE}', 737),
    ('\u{00AF}', 333), ('\u{00B0}', 400), ('\u{00B1}', 584), ('\u{00B4}', 333),
    ('\u{00B5}', 556), ('\u{00B6}', 537), ('\u{00B7}', 278), ('\u{00B8}', 333),
    ('\u{00BA}', 365), ('\u{00BB}', 556), ('\u{00BF}', 611), ('\u{00C6}', 1000),
    ('\u{00D7}', 584), ('\u{00D8}', 778), ('\u{00DF}', 611), ('\u{00E6}', 889),
    ('\u{00F8}', 611), ('\u{00EC}', 278), ('\u{00ED}', 278), ('\u{00EE}', 278),
    ('\u{00EF}', 278), ('\u{00B2}', 333), ('\u{00B3}', 333), ('\u{00B9}', 333),
    ('\u{00BC}', 834), ('\u{00BD}', 834), ('\u{00BE}', 834), ('\u{00D0}', 722),
    ('\u{00DE}', 667), ('\u{00F0}', 556), ('\u{00FE}', 556), ('\u{00F7}', 584),
];

static HELVETICA_BOLD_EXTRAS: &[(char, u16)] = &[
    ('\u{20AC}', 556), ('\u{201A}', 278), ('\u{0192}', 556), ('\u{201E}', 500),
    ('\u{2026}', 1000), ('\u{2020}', 556), ('\u{2021}', 556), ('\u{02C6}', 333),
    ('\u{2030}', 1000), ('\u{2039}', 333), ('\u{0152}', 1000), ('\u{2018}', 278),
    ('\u{2019}', 278), ('\u{201C}', 500), ('\u{201D}', 500), ('\u{2022}', 350),
    ('\u{2013}', 556), ('\u{2014}', 1000), ('\u{02DC}', 333), ('\u{2122}', 1000),
    ('\u{203A}', 333), ('\u{0153}', 944), ('\u{00A0}', 278), ('\u{00A1}', 333),
    ('\u{00A2}', 556), ('\u{00A3}', 556), ('\u{00A4}', 556), ('\u{00A5}', 556),
    ('\u{00A6}', 280), ('\u{00A7}', 556), ('\u{00A8}', 333), ('\u{00A9}', 737),
    ('\u{00AA}', 370), ('\u{00AB}', 556), ('\u{00AC}', 584), ('\u{00AE}', 737),
    ('\u{00AF}', 333), ('\u{00B0}', 400), ('\u{00B1}', 584), ('\u{00B4}', 333),
    ('\u{00B5}', 611), ('\u{00B6}', 556), ('\u{00B7}', 278), ('\u{00B8}', 333),
    ('\u{00BA}', 365), ('\u{00BB}', 556), ('\u{00BF}', 611), ('\u{00C6}', 1000),
    ('\u{00D7}', 584), ('\u{00D8}', 778), ('\u{00DF}', 611), ('\u{00E6}', 889),
    ('\u{00F8}', 611), ('\u{00EC}', 278), ('\u{00ED}', 278), ('\u{00EE}', 278),
    ('\u{00EF}', 278), ('\u{00B2}', 333), ('\u{00B3}', 333), ('\u{00B9}', 333),
    ('\u{00BC}', 834), ('\u{00BD}', 834), ('\u{00BE}', 834), ('\u{00D0}', 722),
    ('\u{00DE}', 667), ('\u{00F0}', 611), ('\u{00FE}', 611), ('\u{00F7}', 584),
];

pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii: &HELVETICA_ASCII,
    extras: HELVETICA_EXTRAS,
    missing: 556,
};

pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: &HELVETICA_BOLD_ASCII,
    extras: HELVETICA_BOLD_EXTRAS,
    missing: 611,
};
