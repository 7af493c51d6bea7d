//! Fonts the engine can draw with: the standard 14, embedded TrueType
//! programs, name-only Type 1 references and fonts already in the document.

use crate::acroform::{name_of, resolve, resolve_dict};
use crate::error::LopdfError;
use crate::metrics::FontMetrics;
use acrofill_traits::{DocumentFont, FontError, FontProgram, FontProvider};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// PostScript names of the standard 14 fonts.
pub const STANDARD_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Symbol",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "ZapfDingbats",
];

/// The fonts every conforming viewer provides without embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFontProvider;

impl StandardFontProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FontProvider for StandardFontProvider {
    fn font_names(&self) -> Vec<String> {
        STANDARD_FONTS.iter().map(|n| n.to_lowercase()).collect()
    }

    fn load_font(&self, name: &str) -> Result<FontProgram, FontError> {
        STANDARD_FONTS
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(|n| FontProgram::standard(*n))
            .ok_or_else(|| FontError::NotFound(name.to_string()))
    }

    fn name(&self) -> &'static str {
        "StandardFontProvider"
    }
}

fn is_symbolic(base_font: &str) -> bool {
    base_font.eq_ignore_ascii_case("Symbol") || base_font.eq_ignore_ascii_case("ZapfDingbats")
}

/// Adds the font dictionary for `program` to the document.
pub(crate) fn register_font(
    doc: &mut Document,
    program: &FontProgram,
) -> Result<(ObjectId, FontMetrics), LopdfError> {
    match program {
        FontProgram::Standard { base_font } => {
            let id = doc.add_object(simple_type1(base_font));
            Ok((id, FontMetrics::standard(base_font)))
        }
        FontProgram::Type1 { font_name } => {
            // Not embedded; viewers substitute, so widths follow Helvetica.
            let id = doc.add_object(simple_type1(font_name));
            Ok((id, FontMetrics::standard("Helvetica")))
        }
        FontProgram::TrueType {
            postscript_name,
            data,
        } => embed_truetype(doc, postscript_name, data),
        FontProgram::Document { base_font, id } => {
            let id = id.ok_or_else(|| {
                LopdfError::Other(format!("document font '{base_font}' has no object"))
            })?;
            let font = doc.get_dictionary(id)?;
            Ok((id, document_font_metrics(doc, font, base_font)?))
        }
    }
}

fn simple_type1(base_font: &str) -> Dictionary {
    let mut font = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
    };
    if !is_symbolic(base_font) {
        font.set("Encoding", "WinAnsiEncoding");
    }
    font
}

/// How a font program is carried in the PDF: glyf outlines go in
/// `/FontFile2` under a TrueType font, CFF outlines in an OpenType
/// `/FontFile3` under a Type 1 font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Embedding {
    file_key: &'static str,
    font_subtype: &'static str,
    cff: bool,
}

impl Embedding {
    const TRUETYPE: Self = Self {
        file_key: "FontFile2",
        font_subtype: "TrueType",
        cff: false,
    };
    const CFF: Self = Self {
        file_key: "FontFile3",
        font_subtype: "Type1",
        cff: true,
    };

    fn for_face(face: &ttf_parser::Face) -> Self {
        if face.tables().cff.is_some() {
            Self::CFF
        } else {
            Self::TRUETYPE
        }
    }

    fn file_dict(&self, len: usize) -> Dictionary {
        if self.cff {
            dictionary! { "Subtype" => "OpenType" }
        } else {
            dictionary! { "Length1" => len as i64 }
        }
    }
}

/// Embeds a whole sfnt program as a simple WinAnsi-encoded font.
fn embed_truetype(
    doc: &mut Document,
    postscript_name: &str,
    data: &[u8],
) -> Result<(ObjectId, FontMetrics), LopdfError> {
    let invalid = |message: String| LopdfError::InvalidFont {
        name: postscript_name.to_string(),
        message,
    };
    let face = ttf_parser::Face::parse(data, 0).map_err(|e| invalid(e.to_string()))?;
    let metrics = FontMetrics::from_truetype(data).map_err(|e| invalid(e.to_string()))?;
    let scale = 1000.0 / face.units_per_em() as f32;
    let bbox = face.global_bounding_box();
    let cap_height = face.capital_height().unwrap_or(face.ascender()) as f32 * scale;
    let mut flags = 32;
    if face.is_italic() {
        flags |= 64;
    }

    let embedding = Embedding::for_face(&face);

    let mut file = Stream::new(embedding.file_dict(data.len()), data.to_vec());
    if let Err(e) = file.compress() {
        log::debug!("Font program '{}' left uncompressed: {}", postscript_name, e);
    }
    let file_id = doc.add_object(file);

    let base_font = Object::Name(postscript_name.as_bytes().to_vec());
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => flags,
        "FontBBox" => vec![
            (bbox.x_min as f32 * scale).into(),
            (bbox.y_min as f32 * scale).into(),
            (bbox.x_max as f32 * scale).into(),
            (bbox.y_max as f32 * scale).into(),
        ],
        "ItalicAngle" => if face.is_italic() { -12 } else { 0 },
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => cap_height,
        "StemV" => if face.is_bold() { 120 } else { 80 },
        embedding.file_key => file_id,
    });

    let widths: Vec<Object> = metrics
        .width_range(32, 255)
        .into_iter()
        .map(|w| Object::Integer(w as i64))
        .collect();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => embedding.font_subtype,
        "BaseFont" => base_font,
        "FirstChar" => 32,
        "LastChar" => 255,
        "Widths" => widths,
        "Encoding" => "WinAnsiEncoding",
        "FontDescriptor" => descriptor_id,
    });
    log::debug!(
        "Embedded {} font '{}' ({} bytes)",
        if embedding.cff { "CFF" } else { "TrueType" },
        postscript_name,
        data.len()
    );
    Ok((font_id, metrics))
}

fn is_composite(font: &Dictionary) -> bool {
    font.get(b"Subtype").ok().and_then(name_of).as_deref() == Some("Type0")
}

fn document_font_metrics(
    doc: &Document,
    font: &Dictionary,
    base_font: &str,
) -> Result<FontMetrics, LopdfError> {
    if is_composite(font) {
        return Err(LopdfError::CompositeFont(base_font.to_string()));
    }
    let number = |obj: &Object| obj.as_float().ok().or_else(|| obj.as_i64().ok().map(|i| i as f32));
    let widths: Option<Vec<f32>> = font
        .get(b"Widths")
        .ok()
        .and_then(|w| resolve(doc, w))
        .and_then(|w| w.as_array().ok())
        .map(|w| {
            w.iter()
                .map(|v| resolve(doc, v).and_then(number).unwrap_or(0.0))
                .collect()
        });
    match widths {
        Some(widths) => {
            let first_char = font
                .get(b"FirstChar")
                .ok()
                .and_then(|f| f.as_i64().ok())
                .unwrap_or(0)
                .clamp(0, 255) as u8;
            let missing = font
                .get(b"FontDescriptor")
                .ok()
                .and_then(|d| resolve_dict(doc, d))
                .and_then(|d| d.get(b"MissingWidth").ok())
                .and_then(number)
                .unwrap_or(0.0);
            Ok(FontMetrics::from_widths(first_char, &widths, missing))
        }
        None => Ok(FontMetrics::standard(base_font)),
    }
}

/// Every `/BaseFont` in page font resources, first occurrence per
/// lower-cased name.
pub(crate) fn document_fonts(doc: &Document) -> Vec<DocumentFont> {
    let mut fonts: Vec<DocumentFont> = Vec::new();
    for page_id in doc.get_pages().values() {
        let Some(resources) = crate::overlay::inherited_resources(doc, *page_id) else {
            continue;
        };
        let Some(font_dict) = resources.get(b"Font").ok().and_then(|f| resolve_dict(doc, f)) else {
            continue;
        };
        for (_, entry) in font_dict.iter() {
            let id = entry.as_reference().ok();
            let Some(font) = resolve_dict(doc, entry) else {
                continue;
            };
            let Some(base_font) = font.get(b"BaseFont").ok().and_then(name_of) else {
                continue;
            };
            let lower = base_font.to_lowercase();
            if fonts.iter().any(|f| f.base_font.to_lowercase() == lower) {
                continue;
            }
            fonts.push(DocumentFont {
                base_font,
                id,
                composite: is_composite(font),
            });
        }
    }
    fonts
}
