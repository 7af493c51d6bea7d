//! Recognising and decoding image payloads of free content.

use crate::error::ValidationError;
use acrofill_traits::{RasterData, RasterImage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Decodes `value` when it is strictly base64: non-empty, a multiple of four
/// characters, only the standard alphabet with at most two trailing `=`.
pub fn sniff_base64(value: &str) -> Option<Vec<u8>> {
    if value.is_empty() || value.len() % 4 != 0 {
        return None;
    }
    let body = value.trim_end_matches('=');
    if value.len() - body.len() > 2 {
        return None;
    }
    if !body
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return None;
    }
    STANDARD.decode(value).ok()
}

/// Number of colour components declared in a JPEG frame header.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut i = 2;
    while i + 4 <= data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        // SOF0..SOF15, excluding DHT, JPG and DAC.
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return data.get(i + 9).copied();
        }
        i += 2 + length;
    }
    None
}

/// Decodes an image for drawing. Grey and RGB JPEGs are kept compressed;
/// everything else becomes 8-bit RGB plus an alpha mask when it has one.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, ValidationError> {
    let invalid = |e: image::ImageError| ValidationError::InvalidImage(e.to_string());
    let format = image::guess_format(bytes).map_err(invalid)?;
    let decoded = image::load_from_memory_with_format(bytes, format).map_err(invalid)?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ValidationError::InvalidImage("image has no pixels".into()));
    }

    if format == ImageFormat::Jpeg
        && let Some(components @ (1 | 3)) = jpeg_components(bytes)
    {
        return Ok(RasterImage {
            width,
            height,
            data: RasterData::Jpeg {
                data: bytes.to_vec(),
                components,
            },
        });
    }

    let alpha = decoded.color().has_alpha().then(|| alpha_channel(&decoded));
    Ok(RasterImage {
        width,
        height,
        data: RasterData::Rgb {
            pixels: decoded.to_rgb8().into_raw(),
            alpha,
        },
    })
}

fn alpha_channel(image: &DynamicImage) -> Vec<u8> {
    image.to_rgba8().pixels().map(|p| p.0[3]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_sniff_requires_strict_base64() {
        assert_eq!(sniff_base64("aGk="), Some(b"hi".to_vec()));
        assert!(sniff_base64("").is_none());
        assert!(sniff_base64("Hello world").is_none());
        assert!(sniff_base64("abc").is_none());
        assert!(sniff_base64("ab==c===").is_none());
        assert!(sniff_base64("a===").is_none());
    }

    #[test]
    fn test_plain_words_of_four_letters_still_sniff() {
        // Text that happens to be valid base64 is treated as an image payload.
        assert!(sniff_base64("Test").is_some());
    }

    #[test]
    fn test_png_with_alpha_gets_mask() {
        let img = ImageBuffer::from_pixel(3, 2, Rgba([10u8, 20, 30, 128]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let raster = decode_image(&bytes).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        match raster.data {
            RasterData::Rgb { pixels, alpha } => {
                assert_eq!(pixels.len(), 18);
                assert_eq!(alpha.unwrap(), vec![128; 6]);
            }
            other => panic!("expected RGB data, got {other:?}"),
        }
    }

    #[test]
    fn test_jpeg_is_passed_through() {
        let img = DynamicImage::new_rgb8(4, 4);
        let bytes = encode(img, ImageFormat::Jpeg);
        let raster = decode_image(&bytes).unwrap();
        assert!(matches!(raster.data, RasterData::Jpeg { components: 3, .. }));
    }

    #[test]
    fn test_garbage_is_invalid_image() {
        let err = decode_image(b"hi").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidImage(_)));
    }
}
