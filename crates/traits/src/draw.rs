//! Drawing requests handed to the document engine.

use crate::font::FontProgram;
use acrofill_types::{Color, HorizontalAlignment, Rect, VerticalAlignment};

/// A run of text laid out inside a fixed box.
#[derive(Debug, Clone)]
pub struct StyledText {
    pub text: String,
    /// Bottom-left anchored box the text is confined to.
    pub area: Rect,
    pub font: FontProgram,
    pub font_size: f32,
    /// Line height as a multiple of the font size.
    pub leading: f32,
    pub color: Color,
    pub simulate_bold: bool,
    pub simulate_italic: bool,
    pub underline: bool,
    pub horizontal_alignment: Option<HorizontalAlignment>,
    pub vertical_alignment: Option<VerticalAlignment>,
}

impl StyledText {
    pub const DEFAULT_FONT_SIZE: f32 = 12.0;

    /// Plain Helvetica text, black, default size.
    pub fn new(text: impl Into<String>, area: Rect) -> Self {
        Self {
            text: text.into(),
            area,
            font: FontProgram::default(),
            font_size: Self::DEFAULT_FONT_SIZE,
            leading: 1.0,
            color: Color::default(),
            simulate_bold: false,
            simulate_italic: false,
            underline: false,
            horizontal_alignment: None,
            vertical_alignment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    /// Baseline JPEG bytes embedded without re-encoding.
    Jpeg { data: Vec<u8>, components: u8 },
    /// 8-bit RGB samples with an optional 8-bit alpha plane.
    Rgb { pixels: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A decoded raster image. `width`/`height` are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: RasterData,
}
