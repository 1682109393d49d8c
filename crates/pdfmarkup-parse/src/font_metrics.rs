//! Font loading: glyph widths, code-to-Unicode decoding and style flags.
//!
//! Simple fonts decode one byte per glyph through the font's encoding (with
//! `/Differences` glyph names overlaid); Type0 fonts decode two-byte codes
//! through their ToUnicode map. Metrics fall back to built-in Helvetica and
//! Courier widths when the font dictionary carries none.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Encoding, Object};
use pdfmarkup_core::{FLAG_BOLD, FLAG_ITALIC, FLAG_MONOSPACE, FLAG_SERIF};

use crate::lopdf_backend::{object_to_f64, resolve_ref};

/// Default ascent/descent in em units when the descriptor has none.
const DEFAULT_ASCENT: f64 = 0.75;
const DEFAULT_DESCENT: f64 = -0.25;

/// Width used when nothing better is known, in glyph units.
const DEFAULT_WIDTH: f64 = 600.0;

// PDF font descriptor flag bits.
const PDF_FIXED_PITCH: i64 = 1;
const PDF_SERIF: i64 = 1 << 1;
const PDF_ITALIC: i64 = 1 << 6;
const PDF_FORCE_BOLD: i64 = 1 << 18;

/// Helvetica widths for codes 32..=126.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for codes 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy)]
enum BuiltinWidths {
    Table(&'static [u16; 95]),
    Monospace,
}

impl BuiltinWidths {
    fn for_font(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("courier") || lower.contains("mono") {
            BuiltinWidths::Monospace
        } else if lower.contains("bold") {
            BuiltinWidths::Table(&HELVETICA_BOLD_ASCII)
        } else {
            BuiltinWidths::Table(&HELVETICA_ASCII)
        }
    }

    fn width(&self, code: u32) -> f64 {
        match self {
            BuiltinWidths::Monospace => DEFAULT_WIDTH,
            BuiltinWidths::Table(table) => match code {
                32..=126 => f64::from(table[(code - 32) as usize]),
                _ => DEFAULT_WIDTH,
            },
        }
    }
}

enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: Option<f64>,
        builtin: BuiltinWidths,
    },
    Composite {
        default: f64,
        individual: HashMap<u32, f64>,
        ranges: Vec<(u32, u32, f64)>,
    },
}

impl Widths {
    fn width(&self, code: u32) -> f64 {
        match self {
            Widths::Simple {
                first_char,
                widths,
                missing,
                builtin,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .or(*missing)
                .unwrap_or_else(|| builtin.width(code)),
            Widths::Composite {
                default,
                individual,
                ranges,
            } => individual
                .get(&code)
                .copied()
                .or_else(|| {
                    ranges
                        .iter()
                        .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
                        .map(|(_, _, w)| *w)
                })
                .unwrap_or(*default),
        }
    }
}

/// A font resolved from page resources, ready for glyph decoding.
pub struct LoadedFont<'a> {
    /// Base font name with any subset prefix removed.
    pub name: String,
    /// Span style flags (`FLAG_*` bits).
    pub flags: u32,
    /// Ascent in em units.
    pub ascent: f64,
    /// Descent in em units (negative).
    pub descent: f64,
    composite: bool,
    widths: Widths,
    encoding: Option<Encoding<'a>>,
    differences: HashMap<u32, String>,
}

impl<'a> LoadedFont<'a> {
    /// Font used when the resource cannot be found.
    pub fn fallback(name: &str) -> Self {
        let name = strip_subset_prefix(name).to_string();
        Self {
            flags: flags_from_name(&name),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: None,
                builtin: BuiltinWidths::for_font(&name),
            },
            name,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            composite: false,
            encoding: None,
            differences: HashMap::new(),
        }
    }

    /// Load a font dictionary. Never fails; unreadable parts use defaults.
    pub fn load(doc: &'a Document, dict: &'a Dictionary, resource_name: &str) -> Self {
        let base = dict
            .get(b"BaseFont")
            .and_then(Object::as_name)
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|_| resource_name.to_string());
        let name = strip_subset_prefix(&base).to_string();
        let composite = matches!(
            dict.get(b"Subtype").and_then(Object::as_name),
            Ok(b"Type0")
        );

        let descendant = if composite {
            dict.get(b"DescendantFonts")
                .ok()
                .map(|o| resolve_ref(doc, o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .map(|o| resolve_ref(doc, o))
                .and_then(|o| o.as_dict().ok())
        } else {
            None
        };

        let descriptor = descendant
            .unwrap_or(dict)
            .get(b"FontDescriptor")
            .ok()
            .map(|o| resolve_ref(doc, o))
            .and_then(|o| o.as_dict().ok());

        let widths = match descendant {
            Some(cid) => composite_widths(doc, cid),
            None => simple_widths(doc, dict, descriptor, &name),
        };

        let (ascent, descent) = descriptor
            .map(|d| {
                let ascent = number(doc, d, b"Ascent").filter(|v| *v > 0.0);
                let descent = number(doc, d, b"Descent").filter(|v| *v < 0.0);
                (
                    ascent.map_or(DEFAULT_ASCENT, |v| v / 1000.0),
                    descent.map_or(DEFAULT_DESCENT, |v| v / 1000.0),
                )
            })
            .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));

        let mut flags = flags_from_name(&name);
        if let Some(pdf_flags) = descriptor
            .and_then(|d| d.get(b"Flags").ok())
            .and_then(|o| resolve_ref(doc, o).as_i64().ok())
        {
            flags |= flags_from_descriptor(pdf_flags);
        }

        let encoding = dict.get_font_encoding(doc).ok();
        let differences = if composite {
            HashMap::new()
        } else {
            differences(doc, dict)
        };

        Self {
            name,
            flags,
            ascent,
            descent,
            composite,
            widths,
            encoding,
            differences,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.composite {
            bytes
                .chunks_exact(2)
                .map(|pair| (u32::from(pair[0]) << 8) | u32::from(pair[1]))
                .collect()
        } else {
            bytes.iter().map(|b| u32::from(*b)).collect()
        }
    }

    /// Glyph advance in em units.
    pub fn width(&self, code: u32) -> f64 {
        self.widths.width(code) / 1000.0
    }

    /// Unicode text for one character code. May be empty.
    pub fn decode(&self, code: u32) -> String {
        if let Some(s) = self.differences.get(&code) {
            return s.clone();
        }
        let bytes: Vec<u8> = if self.composite {
            vec![(code >> 8) as u8, code as u8]
        } else {
            vec![code as u8]
        };
        match self.encoding.as_ref().map(|e| e.bytes_to_string(&bytes)) {
            Some(Ok(s)) if !s.is_empty() => s,
            _ if self.composite => String::from('\u{FFFD}'),
            _ => latin1(code),
        }
    }
}

fn latin1(code: u32) -> String {
    match char::from_u32(code) {
        Some(c) if !c.is_control() => c.to_string(),
        _ => String::new(),
    }
}

/// Remove a `ABCDEF+` subset tag.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn flags_from_name(name: &str) -> u32 {
    let lower = name.to_ascii_lowercase();
    let mut flags = 0;
    if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
        flags |= FLAG_BOLD;
    }
    if lower.contains("italic") || lower.contains("oblique") {
        flags |= FLAG_ITALIC;
    }
    if lower.contains("courier") || lower.contains("mono") {
        flags |= FLAG_MONOSPACE;
    }
    if (lower.contains("times") || lower.contains("serif")) && !lower.contains("sans") {
        flags |= FLAG_SERIF;
    }
    flags
}

fn flags_from_descriptor(pdf_flags: i64) -> u32 {
    let mut flags = 0;
    if pdf_flags & PDF_FIXED_PITCH != 0 {
        flags |= FLAG_MONOSPACE;
    }
    if pdf_flags & PDF_SERIF != 0 {
        flags |= FLAG_SERIF;
    }
    if pdf_flags & PDF_ITALIC != 0 {
        flags |= FLAG_ITALIC;
    }
    if pdf_flags & PDF_FORCE_BOLD != 0 {
        flags |= FLAG_BOLD;
    }
    flags
}

fn number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f64> {
    dict.get(key)
        .ok()
        .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
}

fn simple_widths(
    doc: &Document,
    dict: &Dictionary,
    descriptor: Option<&Dictionary>,
    name: &str,
) -> Widths {
    let first_char = number(doc, dict, b"FirstChar").map_or(0, |v| v.max(0.0) as u32);
    let widths = dict
        .get(b"Widths")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64(resolve_ref(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();
    let missing = descriptor.and_then(|d| number(doc, d, b"MissingWidth"));
    Widths::Simple {
        first_char,
        widths,
        missing,
        builtin: BuiltinWidths::for_font(name),
    }
}

fn composite_widths(doc: &Document, cid_font: &Dictionary) -> Widths {
    let default = number(doc, cid_font, b"DW").unwrap_or(1000.0);
    let mut individual = HashMap::new();
    let mut ranges = Vec::new();

    let entries = cid_font
        .get(b"W")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok());
    if let Some(entries) = entries {
        let mut i = 0;
        while i < entries.len() {
            let Some(start) = cid_number(doc, &entries[i]) else {
                i += 1;
                continue;
            };
            let Some(next) = entries.get(i + 1).map(|o| resolve_ref(doc, o)) else {
                break;
            };
            if let Ok(list) = next.as_array() {
                // c [w1 w2 ...]
                for (j, w) in list.iter().enumerate() {
                    if let Ok(w) = object_to_f64(resolve_ref(doc, w)) {
                        individual.insert(start + j as u32, w);
                    }
                }
                i += 2;
            } else if let Some(end) = cid_number(doc, next) {
                // c_first c_last w
                if let Some(w) = entries
                    .get(i + 2)
                    .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
                {
                    ranges.push((start, end, w));
                }
                i += 3;
            } else {
                i += 2;
            }
        }
    }

    Widths::Composite {
        default,
        individual,
        ranges,
    }
}

fn cid_number(doc: &Document, obj: &Object) -> Option<u32> {
    object_to_f64(resolve_ref(doc, obj))
        .ok()
        .filter(|v| *v >= 0.0)
        .map(|v| v as u32)
}

/// Glyph names from an `/Encoding << /Differences [...] >>` dictionary.
fn differences(doc: &Document, dict: &Dictionary) -> HashMap<u32, String> {
    let mut out = HashMap::new();
    let Some(array) = dict
        .get(b"Encoding")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|enc| enc.get(b"Differences").ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok())
    else {
        return out;
    };

    let mut code = 0u32;
    for item in array {
        match resolve_ref(doc, item) {
            Object::Integer(n) => code = (*n).clamp(0, 255) as u32,
            Object::Name(glyph) => {
                if let Some(text) = glyph_name_to_text(&String::from_utf8_lossy(glyph)) {
                    out.insert(code, text);
                }
                code += 1;
            }
            _ => {}
        }
    }
    out
}

/// Resolve a glyph name to text: `uniXXXX`, `uXXXX`, single characters and
/// a handful of common names.
fn glyph_name_to_text(name: &str) -> Option<String> {
    let base = name.split('.').next().unwrap_or(name);
    if base.chars().count() == 1 {
        return Some(base.to_string());
    }
    if let Some(hex) = base.strip_prefix("uni") {
        if hex.len() >= 4 {
            let text: Option<String> = hex
                .as_bytes()
                .chunks(4)
                .map(|c| {
                    std::str::from_utf8(c)
                        .ok()
                        .and_then(|h| u32::from_str_radix(h, 16).ok())
                        .and_then(char::from_u32)
                })
                .collect();
            return text;
        }
    }
    if let Some(hex) = base.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
    }
    let text = match base {
        "space" | "nbspace" => " ",
        "period" => ".",
        "comma" => ",",
        "colon" => ":",
        "semicolon" => ";",
        "hyphen" | "minus" => "-",
        "exclam" => "!",
        "question" => "?",
        "parenleft" => "(",
        "parenright" => ")",
        "quotesingle" => "'",
        "quotedbl" => "\"",
        "quoteright" => "\u{2019}",
        "quoteleft" => "\u{2018}",
        "quotedblleft" => "\u{201C}",
        "quotedblright" => "\u{201D}",
        "endash" => "\u{2013}",
        "emdash" => "\u{2014}",
        "bullet" => "\u{2022}",
        "slash" => "/",
        "ampersand" => "&",
        "percent" => "%",
        "zero" => "0",
        "one" => "1",
        "two" => "2",
        "three" => "3",
        "four" => "4",
        "five" => "5",
        "six" => "6",
        "seven" => "7",
        "eight" => "8",
        "nine" => "9",
        "fi" => "fi",
        "fl" => "fl",
        "ff" => "ff",
        "ffi" => "ffi",
        "ffl" => "ffl",
        _ => return None,
    };
    Some(text.to_string())
}
