//! Content stream generation for overlay text boxes and images.

use crate::encoding::to_win_ansi;
use crate::metrics::FontMetrics;
use acrofill_traits::{RasterData, RasterImage, StyledText};
use acrofill_types::{HorizontalAlignment, Rect, VerticalAlignment};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream, StringFormat};

/// tan(12°), the shear used for simulated italics.
const ITALIC_SKEW: f32 = 0.21256;

/// Resource names the text operations refer to.
pub(crate) struct TextResources<'a> {
    pub font: &'a str,
    pub graphics_state: Option<&'a str>,
}

/// Splits `text` into lines no wider than `max_width`. Explicit line breaks
/// are kept; words wider than a whole line are broken between characters.
pub(crate) fn wrap_lines(text: &str, metrics: &FontMetrics, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n').map(|p| p.trim_end_matches('\r')) {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if metrics.text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if metrics.text_width(word, size) <= max_width {
                current = word.to_string();
                continue;
            }
            for c in word.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty() && metrics.text_width(&next, size) > max_width {
                    lines.push(std::mem::replace(&mut current, c.to_string()));
                } else {
                    current = next;
                }
            }
        }
        lines.push(current);
    }
    lines
}

fn number(v: f32) -> Object {
    Object::Real(v)
}

/// Lays `text` out inside its box and returns the drawing operations.
pub(crate) fn text_content(text: &StyledText, metrics: &FontMetrics, resources: &TextResources<'_>) -> Content {
    let size = text.font_size;
    let area: Rect = text.area;
    let line_height = size * text.leading;
    let mut lines = wrap_lines(&text.text, metrics, size, area.width);

    let fitting = if line_height > 0.0 {
        (area.height / line_height + 1e-3).floor().max(0.0) as usize
    } else {
        lines.len()
    };
    if lines.len() > fitting {
        log::debug!(
            "Dropping {} of {} lines that overflow a {}x{} box",
            lines.len() - fitting,
            lines.len(),
            area.width,
            area.height
        );
        lines.truncate(fitting);
    }

    let block_height = lines.len() as f32 * line_height;
    let block_top = match text.vertical_alignment.unwrap_or_default() {
        VerticalAlignment::Top => area.top(),
        VerticalAlignment::Middle => area.top() - (area.height - block_height) / 2.0,
        VerticalAlignment::Bottom => area.y + block_height,
    };
    let ascent = size * metrics.ascent / 1000.0;
    let (r, g, b) = text.color.to_unit_rgb();
    let skew = if text.simulate_italic { ITALIC_SKEW } else { 0.0 };

    let mut ops = vec![Operation::new("q", vec![])];
    if let Some(gs) = resources.graphics_state {
        ops.push(Operation::new("gs", vec![Object::Name(gs.as_bytes().to_vec())]));
    }
    ops.push(Operation::new("rg", vec![number(r), number(g), number(b)]));
    if text.simulate_bold {
        ops.push(Operation::new("RG", vec![number(r), number(g), number(b)]));
        ops.push(Operation::new("w", vec![number(size / 30.0)]));
    }
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(resources.font.as_bytes().to_vec()), number(size)],
    ));
    if text.simulate_bold {
        ops.push(Operation::new("Tr", vec![2.into()]));
    }

    let mut placed = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let width = metrics.text_width(line, size);
        let x = match text.horizontal_alignment.unwrap_or_default() {
            HorizontalAlignment::Left => area.x,
            HorizontalAlignment::Center => area.x + (area.width - width) / 2.0,
            HorizontalAlignment::Right => area.right() - width,
        };
        let baseline = block_top - i as f32 * line_height - ascent;
        ops.push(Operation::new(
            "Tm",
            vec![number(1.0), number(0.0), number(skew), number(1.0), number(x), number(baseline)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(line), StringFormat::Literal)],
        ));
        placed.push((x, baseline, width));
    }
    ops.push(Operation::new("ET", vec![]));

    if text.underline {
        let thickness = size / 15.0;
        for (x, baseline, width) in placed.into_iter().filter(|(_, _, w)| *w > 0.0) {
            let y = baseline - size * 0.1 - thickness / 2.0;
            ops.push(Operation::new(
                "re",
                vec![number(x), number(y), number(width), number(thickness)],
            ));
            ops.push(Operation::new("f", vec![]));
        }
    }
    ops.push(Operation::new("Q", vec![]));
    Content { operations: ops }
}

/// Image XObject for `image`, plus its soft mask when it has alpha.
pub(crate) fn image_streams(image: &RasterImage) -> (Stream, Option<Stream>) {
    let width = image.width as i64;
    let height = image.height as i64;
    match &image.data {
        RasterData::Jpeg { data, components } => {
            let color_space = match components {
                1 => "DeviceGray",
                4 => "DeviceCMYK",
                _ => "DeviceRGB",
            };
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                data.clone(),
            );
            (stream, None)
        }
        RasterData::Rgb { pixels, alpha } => {
            let mut stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                pixels.clone(),
            );
            if let Err(e) = stream.compress() {
                log::debug!("Image stream left uncompressed: {}", e);
            }
            let mask = alpha.as_ref().map(|alpha| {
                let mut mask = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width,
                        "Height" => height,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    alpha.clone(),
                );
                if let Err(e) = mask.compress() {
                    log::debug!("Soft mask left uncompressed: {}", e);
                }
                mask
            });
            (stream, mask)
        }
    }
}

/// Paints the named image XObject into `area`.
pub(crate) fn image_content(name: &str, area: Rect) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    number(area.width),
                    number(0.0),
                    number(0.0),
                    number(area.height),
                    number(area.x),
                    number(area.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}
