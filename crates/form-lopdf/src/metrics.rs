//! Glyph advance widths for laying out overlay text.
//!
//! Widths are indexed by WinAnsiEncoding byte and expressed in 1/1000 em.

use crate::encoding::{win_ansi_byte, win_ansi_char};

/// Helvetica and Helvetica-Oblique, bytes 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, //
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, //
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, //
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, //
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500, //
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, //
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500, //
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, //
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Advance widths and vertical extents of one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: Vec<u16>,
    /// Above the baseline, in 1/1000 em.
    pub ascent: f32,
    /// Below the baseline, in 1/1000 em; negative.
    pub descent: f32,
}

impl FontMetrics {
    /// Metrics for one of the standard 14 fonts, by PostScript name.
    /// Italic faces share the widths of their upright counterparts.
    pub fn standard(base_font: &str) -> Self {
        let name = base_font.to_ascii_lowercase();
        let bold = name.contains("bold");
        if name.starts_with("courier") {
            return Self::fixed(600, 629.0, -157.0);
        }
        if name.starts_with("times") {
            let table = if bold { &TIMES_BOLD } else { &TIMES_ROMAN };
            return Self::from_ascii_table(table, 500, 683.0, -217.0);
        }
        if name == "symbol" || name == "zapfdingbats" {
            return Self::fixed(600, 700.0, -200.0);
        }
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        Self::from_ascii_table(table, 556, 718.0, -207.0)
    }

    fn fixed(width: u16, ascent: f32, descent: f32) -> Self {
        Self {
            widths: vec![width; 256],
            ascent,
            descent,
        }
    }

    /// Fills bytes outside the printable ASCII range from the width of the
    /// unaccented base letter, or `default` when there is none.
    fn from_ascii_table(table: &[u16; 95], default: u16, ascent: f32, descent: f32) -> Self {
        let ascii = |c: char| table[(c as usize) - 32];
        let widths = (0u16..256)
            .map(|b| match b {
                32..=126 => table[(b - 32) as usize],
                _ => win_ansi_char(b as u8)
                    .and_then(base_letter)
                    .map(ascii)
                    .unwrap_or(default),
            })
            .collect();
        Self {
            widths,
            ascent,
            descent,
        }
    }

    /// Metrics from a simple font's `/FirstChar` + `/Widths` entries.
    pub fn from_widths(first_char: u8, widths: &[f32], missing: f32) -> Self {
        let missing = if missing > 0.0 { missing } else { 500.0 };
        let table = (0usize..256)
            .map(|b| {
                b.checked_sub(first_char as usize)
                    .and_then(|i| widths.get(i))
                    .copied()
                    .filter(|w| *w > 0.0)
                    .unwrap_or(missing) as u16
            })
            .collect();
        Self {
            widths: table,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    /// Metrics from a TrueType/OpenType program, indexed through WinAnsiEncoding.
    pub fn from_truetype(data: &[u8]) -> Result<Self, ttf_parser::FaceParsingError> {
        let face = ttf_parser::Face::parse(data, 0)?;
        let scale = 1000.0 / face.units_per_em() as f32;
        let missing = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|a| a as f32 * scale)
            .unwrap_or(500.0);
        let widths = (0u16..256)
            .map(|b| {
                win_ansi_char(b as u8)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|g| face.glyph_hor_advance(g))
                    .map(|a| a as f32 * scale)
                    .unwrap_or(missing)
                    .round() as u16
            })
            .collect();
        Ok(Self {
            widths,
            ascent: face.ascender() as f32 * scale,
            descent: face.descender() as f32 * scale,
        })
    }

    /// Width of one WinAnsi byte in 1/1000 em.
    pub fn byte_width(&self, b: u8) -> u16 {
        self.widths.get(b as usize).copied().unwrap_or(0)
    }

    /// Advance widths for bytes `first..=last`, as written into `/Widths`.
    pub fn width_range(&self, first: u8, last: u8) -> Vec<u16> {
        (first..=last).map(|b| self.byte_width(b)).collect()
    }

    /// Width of `text` set at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.byte_width(win_ansi_byte(c).unwrap_or(b'?')) as u32)
            .sum();
        units as f32 * size / 1000.0
    }
}

fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        '\u{2013}' => '-',
        '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
        '\u{00A0}' => ' ',
        _ => return None,
    };
    Some(base)
}
