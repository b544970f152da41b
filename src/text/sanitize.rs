//! Character sanitizer.
//!
//! The standard Helvetica faces are drawn with WinAnsiEncoding, so only
//! printable ASCII, the Latin-1 supplement and a handful of Windows-1252
//! typographic glyphs can reach a page. Everything else is mapped to a close
//! plain-ASCII stand-in or dropped. Wrapping and drawing both run on the
//! sanitized string, so measured widths and drawn glyphs always agree.

use unicode_normalization::UnicodeNormalization;

/// Windows-1252 glyphs outside Latin-1 that the standard fonts can draw.
const WINANSI_EXTRAS: &[char] = &[
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// True when `ch` can be drawn as-is.
pub fn is_renderable(ch: char) -> bool {
    matches!(ch as u32, 0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF) || WINANSI_EXTRAS.contains(&ch)
}

/// Map `text` onto the renderable subset.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_renderable(ch) {
            out.push(ch);
        } else if let Some(rep) = substitute(ch) {
            out.push_str(rep);
        } else if ch.is_whitespace() {
            out.push(' ');
        } else {
            // Compatibility decomposition strips diacritics and unpacks
            // ligatures, full-width forms and circled digits.
            out.extend(std::iter::once(ch).nfkd().filter(|c| is_renderable(*c)));
        }
    }
    out
}

fn substitute(ch: char) -> Option<&'static str> {
    let rep = match ch {
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => " ",
        '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => "",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2212}' => "-",
        '\u{2015}' => "\u{2014}",
        '\u{2032}' | '\u{201B}' => "'",
        '\u{2033}' | '\u{201F}' => "\"",
        '\u{2190}' => "<-",
        '\u{2192}' => "->",
        '\u{2194}' => "<->",
        '\u{2264}' => "<=",
        '\u{2265}' => ">=",
        '\u{2260}' => "!=",
        '\u{2248}' => "~",
        '\u{2713}' | '\u{2714}' | '\u{2705}' => "OK",
        '\u{2717}' | '\u{2718}' | '\u{274C}' => "X",
        '\u{25CF}' | '\u{25AA}' | '\u{25E6}' => "\u{2022}",
        '\u{0131}' => "i",
        '\u{0141}' => "L",
        '\u{0142}' => "l",
        '\u{0110}' => "D",
        '\u{0111}' => "d",
        '\u{0126}' => "H",
        '\u{0127}' => "h",
        _ => return None,
    };
    Some(rep)
}
