//! # PDF Serializer
//!
//! Takes the finished pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Every page is a flat list of text
//! runs, rectangles and lines, so the subset of PDF needed is small: the two
//! standard Helvetica faces (never embedded), one content stream per page and,
//! for translucent text, a handful of `/ExtGState` entries.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- Catalog
//! 2 0 obj ... endobj  <- Pages tree
//! 3 0 obj ... endobj  <- fonts, graphics states, page content, pages, info
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Output is deterministic: no wall-clock values are written, and the
//! creation date comes from the report's own timestamp.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::format;
use crate::layout::{Page, Primitive, Rect, TextRun};
use crate::model::ReportMeta;
use crate::style::Color;
use crate::text::sanitize;

const PRODUCER: &str = concat!("folio ", env!("CARGO_PKG_VERSION"));

/// Opacity in thousandths; one `/ExtGState` per distinct value below 1000.
type OpacityKey = u16;

fn opacity_key(opacity: f64) -> OpacityKey {
    ((opacity * 1000.0).round() as i32).clamp(0, 1000) as OpacityKey
}

#[derive(Default)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    /// Append an object and return its id.
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(PdfObject { data });
        self.objects.len() - 1
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write finished pages to a PDF byte vector.
    pub fn write(&self, pages: &[Page], meta: &ReportMeta) -> Vec<u8> {
        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages.
        let mut builder = PdfBuilder {
            objects: vec![
                PdfObject { data: vec![] },
                PdfObject { data: vec![] },
                PdfObject { data: vec![] },
            ],
        };

        let mut font_resources = String::new();
        for font in StandardFont::ALL {
            let id = builder.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                     /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                )
                .into_bytes(),
            );
            let _ = write!(font_resources, "/{} {} 0 R ", font.resource_name(), id);
        }

        let graphics_states = self.register_graphics_states(&mut builder, pages);
        let mut resources = format!("/Font << {}>>", font_resources);
        if !graphics_states.is_empty() {
            let entries: String = graphics_states
                .values()
                .map(|(name, id)| format!("/{} {} 0 R ", name, id))
                .collect();
            let _ = write!(resources, " /ExtGState << {}>>", entries);
        }

        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = self.build_content_stream(page, &graphics_states);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(Self::info_dict(meta).into_bytes());
        self.serialize(&builder, info_obj_id)
    }

    /// One `/ExtGState` object per distinct translucent opacity, in a stable
    /// order. Maps the opacity key to its resource name and object id.
    fn register_graphics_states(
        &self,
        builder: &mut PdfBuilder,
        pages: &[Page],
    ) -> BTreeMap<OpacityKey, (String, usize)> {
        let mut keys: Vec<OpacityKey> = pages
            .iter()
            .flat_map(|p| p.texts())
            .map(|t| opacity_key(t.opacity))
            .filter(|k| *k < 1000)
            .collect();
        keys.sort_unstable();
        keys.dedup();

        keys.into_iter()
            .enumerate()
            .map(|(i, key)| {
                let alpha = key as f64 / 1000.0;
                let id = builder.push(
                    format!("<< /Type /ExtGState /ca {:.3} /CA {:.3} >>", alpha, alpha).into_bytes(),
                );
                (key, (format!("GS{}", i + 1), id))
            })
            .collect()
    }

    fn info_dict(meta: &ReportMeta) -> String {
        let mut info = String::from("<< ");
        if let Some(title) = meta.title.as_deref().or(meta.id.as_deref()) {
            let _ = write!(info, "/Title ({}) ", encode_text(title));
        }
        if let Some(url) = meta.url.as_deref() {
            let _ = write!(info, "/Subject ({}) ", encode_text(url));
        }
        if let Some(date) = meta.generated_at.as_deref().and_then(format::pdf_date) {
            let _ = write!(info, "/CreationDate ({}) ", date);
        }
        let _ = write!(info, "/Producer ({}) >>", PRODUCER);
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &Page,
        graphics_states: &BTreeMap<OpacityKey, (String, usize)>,
    ) -> String {
        let mut stream = String::new();
        for primitive in &page.primitives {
            match primitive {
                Primitive::Rect(rect) => self.write_rect(&mut stream, rect),
                Primitive::Line(line) => {
                    let _ = writeln!(stream, "q\n{} RG\n{:.2} w", color_ops(line.color), line.thickness);
                    let _ = writeln!(
                        stream,
                        "{:.2} {:.2} m {:.2} {:.2} l S\nQ",
                        line.x1, line.y1, line.x2, line.y2
                    );
                }
                Primitive::Text(run) => self.write_text(&mut stream, run, graphics_states),
            }
        }
        stream
    }

    fn write_rect(&self, stream: &mut String, rect: &Rect) {
        // Zero-area fills (an empty progress bar) paint nothing.
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let op = match (rect.fill, rect.stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return,
        };
        let _ = writeln!(stream, "q");
        if let Some(fill) = rect.fill {
            let _ = writeln!(stream, "{} rg", color_ops(fill));
        }
        if let Some(stroke) = rect.stroke {
            let _ = writeln!(stream, "{} RG\n{:.2} w", color_ops(stroke.color), stroke.width);
        }
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} re\n{}\nQ",
            rect.x, rect.y, rect.width, rect.height, op
        );
    }

    fn write_text(
        &self,
        stream: &mut String,
        run: &TextRun,
        graphics_states: &BTreeMap<OpacityKey, (String, usize)>,
    ) {
        let font = StandardFont::for_weight(run.weight);
        let _ = writeln!(stream, "q");
        if let Some((name, _)) = graphics_states.get(&opacity_key(run.opacity)) {
            let _ = writeln!(stream, "/{} gs", name);
        }
        let _ = writeln!(stream, "{} rg", color_ops(run.color));
        if run.rotation != 0.0 {
            let (sin, cos) = run.rotation.to_radians().sin_cos();
            let _ = writeln!(
                stream,
                "{:.4} {:.4} {:.4} {:.4} {:.2} {:.2} cm",
                cos, sin, -sin, cos, run.x, run.y
            );
            let _ = writeln!(stream, "BT\n/{} {:.2} Tf\n0 0 Td", font.resource_name(), run.size);
        } else {
            let _ = writeln!(
                stream,
                "BT\n/{} {:.2} Tf\n{:.2} {:.2} Td",
                font.resource_name(),
                run.size,
                run.x,
                run.y
            );
        }
        let _ = writeln!(stream, "({}) Tj\nET\nQ", encode_text(&run.text));
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

fn color_ops(c: Color) -> String {
    format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// WinAnsiEncoding is based on Windows-1252. Most codepoints in Latin-1 map
/// directly; the 0x80-0x9F range holds typographic extras.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}

/// Encode text as the body of a PDF literal string: WinAnsi bytes, with
/// delimiters escaped and non-ASCII bytes written as octal escapes.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in sanitize(text).chars() {
        let b = unicode_to_winansi(ch).unwrap_or(b'?');
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}
