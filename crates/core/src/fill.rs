//! Applying fill instructions to an open document.

use crate::color::ColorResolver;
use crate::error::{FillError, Result, ValidationError};
use crate::fields::FieldIndex;
use crate::fonts::FontResolver;
use crate::raster::{decode_image, sniff_base64};
use acrofill_traits::{FormDocument, StyledText};
use acrofill_types::{
    FillInstruction, HorizontalAlignment, Rect, Size, TextStyle, Value, VerticalAlignment,
};

/// True for `0 < value <= max`; false for NaN.
fn within(value: f32, max: f32) -> bool {
    value > 0.0 && value <= max
}

/// Fills one document. Instructions are applied in order and the first
/// failure aborts the fill; nothing is produced unless every instruction
/// succeeds.
pub struct DocumentFillEngine<'a, D: FormDocument + ?Sized> {
    doc: &'a mut D,
    fonts: FontResolver,
    colors: ColorResolver,
    default_font_size: f32,
}

impl<'a, D: FormDocument + ?Sized> DocumentFillEngine<'a, D> {
    pub fn new(doc: &'a mut D, fonts: FontResolver) -> Self {
        Self {
            doc,
            fonts,
            colors: ColorResolver::new(),
            default_font_size: StyledText::DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.default_font_size = size;
        self
    }

    /// Applies `instructions`, asks viewers to recompute calculated fields,
    /// and returns the serialised document.
    pub fn fill(mut self, instructions: &[FillInstruction]) -> Result<Vec<u8>> {
        let index = FieldIndex::build(&mut *self.doc, true)?;
        for (i, instruction) in instructions.iter().enumerate() {
            self.apply(&index, instruction).inspect_err(|e| {
                log::debug!("Instruction {} rejected: {}", i, e);
            })?;
        }
        self.doc.recompute()?;
        let output = self.doc.finalize()?;
        if output.is_empty() {
            return Err(FillError::Fatal("the document engine produced no output".into()));
        }
        Ok(output)
    }

    fn apply(&mut self, index: &FieldIndex, instruction: &FillInstruction) -> Result<()> {
        if let Some(name) = &instruction.name {
            log::debug!("Setting field '{}'", name);
            let field = index
                .get(name)
                .ok_or_else(|| ValidationError::FieldNotFound(name.clone()))?;
            return field.set_value(&mut *self.doc, instruction.value.as_ref());
        }
        match &instruction.value {
            Some(Value::String(content)) => self.place_content(instruction, content),
            other => {
                log::debug!(
                    "Skipping free content of type {}",
                    other.as_ref().map_or("null", Value::type_name)
                );
                Ok(())
            }
        }
    }

    fn place_content(&mut self, instruction: &FillInstruction, content: &str) -> Result<()> {
        let page = instruction.page.unwrap_or(1);
        let count = self.doc.page_count();
        if page < 1 || page as usize > count {
            return Err(ValidationError::PageOutOfRange { page, count }.into());
        }
        let page = page as usize;
        let page_size = self.doc.page_size(page)?;

        match sniff_base64(content) {
            Some(bytes) => self.place_image(instruction, page, page_size, &bytes),
            None => self.place_text(instruction, page, page_size, content),
        }
    }

    fn place_image(&mut self, instruction: &FillInstruction, page: usize, page_size: Size, bytes: &[u8]) -> Result<()> {
        let image = decode_image(bytes)?;
        let natural = Size::new(image.width as f32, image.height as f32);
        let requested = Size::new(
            instruction.width.unwrap_or(natural.width),
            instruction.height.unwrap_or(natural.height),
        );

        let size = match instruction.scale {
            Some(scale) if !within(scale, f32::INFINITY) => {
                return Err(ValidationError::InvalidScale(scale).into());
            }
            Some(scale) => natural.scaled(scale),
            None if requested != natural => natural.scale_to_fit(requested),
            None => natural,
        };
        if !within(size.width, page_size.width) {
            return Err(ValidationError::InvalidImageWidth {
                width: size.width,
                page_width: page_size.width,
            }
            .into());
        }
        if !within(size.height, page_size.height) {
            return Err(ValidationError::InvalidImageHeight {
                height: size.height,
                page_height: page_size.height,
            }
            .into());
        }

        let x = instruction.x.unwrap_or(0.0);
        let y = instruction.y.unwrap_or(0.0);
        let area = Rect::new(x, page_size.height - y - size.height, size.width, size.height);
        log::debug!("Placing {}x{} image on page {} at {:?}", image.width, image.height, page, area);
        self.doc.draw_image(page, area, &image)?;
        Ok(())
    }

    fn place_text(&mut self, instruction: &FillInstruction, page: usize, page_size: Size, content: &str) -> Result<()> {
        let x = instruction.x.unwrap_or(0.0);
        let y = instruction.y.unwrap_or(0.0);
        if !(0.0..=page_size.width).contains(&x) {
            return Err(ValidationError::InvalidTextX {
                x,
                page_width: page_size.width,
            }
            .into());
        }
        if !(0.0..=page_size.height).contains(&y) {
            return Err(ValidationError::InvalidTextY {
                y,
                page_height: page_size.height,
            }
            .into());
        }

        let max_width = page_size.width - x;
        let width = match instruction.width {
            Some(width) if !within(width, max_width) => {
                return Err(ValidationError::InvalidTextWidth { width, max: max_width }.into());
            }
            Some(width) => width,
            None => max_width,
        };
        let height = match instruction.height {
            Some(height) if !within(height, page_size.height) => {
                return Err(ValidationError::InvalidTextHeight {
                    height,
                    max: page_size.height,
                }
                .into());
            }
            Some(height) => height,
            None => page_size.height - y,
        };

        let area = Rect::new(x, page_size.height - y - height, width, height);
        let mut text = StyledText::new(content, area);
        text.font_size = self.default_font_size;
        if let Some(style) = &instruction.text_style {
            self.apply_style(&mut text, style)?;
        }
        log::debug!("Placing text box on page {} at {:?}", page, area);
        self.doc.draw_text(page, &text)?;
        Ok(())
    }

    fn apply_style(&self, text: &mut StyledText, style: &TextStyle) -> Result<()> {
        text.leading = style.leading.unwrap_or(1.0);

        if let Some(font) = &style.font {
            if let Some(size) = font.size {
                text.font_size = size;
            }
            if let Some(name) = &font.name {
                if !self.fonts.font_exists(name) {
                    return Err(ValidationError::FontNotFound(name.clone()).into());
                }
                text.font = self.fonts.create_font(name)?;
            }
            let name = font.name.as_deref();
            text.simulate_bold =
                font.bold.unwrap_or(false) && !name.is_some_and(FontResolver::is_bold);
            text.simulate_italic =
                font.italic.unwrap_or(false) && !name.is_some_and(FontResolver::is_italic);
            text.underline = font.underline.unwrap_or(false);
        }

        if let Some(value) = &style.horizontal_alignment {
            match value.parse::<HorizontalAlignment>() {
                Ok(alignment) => text.horizontal_alignment = Some(alignment),
                Err(e) => log::warn!("Ignoring horizontal alignment: {}", e),
            }
        }
        if let Some(value) = &style.vertical_alignment {
            match value.parse::<VerticalAlignment>() {
                Ok(alignment) => text.vertical_alignment = Some(alignment),
                Err(e) => log::warn!("Ignoring vertical alignment: {}", e),
            }
        }

        if let Some(color) = &style.color {
            text.color = self.colors.convert(color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{checkbox, form_with, text_field};
    use acrofill_lopdf::{LopdfFormDocument, StandardFontProvider};
    use acrofill_types::FontStyle;
    use std::sync::Arc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn document() -> LopdfFormDocument {
        form_with(&[&text_field("Name", None, 0), &checkbox("Agree", "Yes")])
    }

    fn fill(doc: &mut LopdfFormDocument, instructions: &[FillInstruction]) -> Result<Vec<u8>> {
        init_logger();
        let fonts = FontResolver::for_document(vec![Arc::new(StandardFontProvider::new())], &*doc);
        DocumentFillEngine::new(doc, fonts).fill(instructions)
    }

    fn validation(result: Result<Vec<u8>>) -> ValidationError {
        match result {
            Err(FillError::Validation(v)) => v,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_fills_fields_by_case_insensitive_name() {
        let mut doc = document();
        let bytes = fill(
            &mut doc,
            &[FillInstruction::field("name", "Ann"), FillInstruction::field("AGREE", "Yes")],
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_unknown_field_aborts() {
        let mut doc = document();
        let err = validation(fill(&mut doc, &[FillInstruction::field("Nope", "x")]));
        assert_eq!(err, ValidationError::FieldNotFound("Nope".into()));
    }

    #[test]
    fn test_page_must_exist() {
        let mut doc = document();
        for page in [0, 2, -3] {
            let err = validation(fill(&mut doc, &[FillInstruction::content("Hi", 10.0, 10.0).on_page(page)]));
            assert!(err.to_string().contains(&format!("incorrect page number: '{page}'")));
            assert!(err.to_string().contains("[1, 1]"));
        }
    }

    #[test]
    fn test_text_coordinates_and_box_are_checked() {
        let mut doc = document();
        let err = validation(fill(&mut doc, &[FillInstruction::content("Hi", 613.0, 10.0)]));
        assert!(matches!(err, ValidationError::InvalidTextX { .. }));
        let err = validation(fill(&mut doc, &[FillInstruction::content("Hi", 10.0, -1.0)]));
        assert!(matches!(err, ValidationError::InvalidTextY { .. }));

        let too_wide = FillInstruction::content("Hi", 500.0, 10.0).with_size(Some(200.0), None);
        let err = validation(fill(&mut doc, &[too_wide]));
        assert_eq!(err, ValidationError::InvalidTextWidth { width: 200.0, max: 112.0 });

        let too_tall = FillInstruction::content("Hi", 0.0, 10.0).with_size(None, Some(800.0));
        let err = validation(fill(&mut doc, &[too_tall]));
        assert!(err.to_string().contains("invalid text height value"));
    }

    #[test]
    fn test_font_and_color_are_validated() {
        let mut doc = document();
        let style = TextStyle {
            font: Some(FontStyle {
                name: Some("Papyrus".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validation(fill(&mut doc, &[FillInstruction::content("Hi", 1.0, 1.0).with_text_style(style)]));
        assert_eq!(err.to_string(), "font 'Papyrus' not found");

        let style = TextStyle {
            color: Some("blurple".into()),
            ..Default::default()
        };
        let err = validation(fill(&mut doc, &[FillInstruction::content("Hi", 1.0, 1.0).with_text_style(style)]));
        assert_eq!(err.to_string(), "unknown color value 'blurple'");
    }

    #[test]
    fn test_bad_alignment_is_not_fatal() {
        let mut doc = document();
        let style = TextStyle {
            horizontal_alignment: Some("JUSTIFIED".into()),
            vertical_alignment: Some("middle".into()),
            font: Some(FontStyle {
                name: Some("Times-Bold".into()),
                bold: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = fill(&mut doc, &[FillInstruction::content("Hello", 50.0, 50.0).with_text_style(style)]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_string_free_content_is_ignored() {
        let mut doc = document();
        let result = fill(
            &mut doc,
            &[FillInstruction::content(42.0, 10.0, 10.0), FillInstruction::default()],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_image_payload() {
        let mut doc = document();
        let err = validation(fill(&mut doc, &[FillInstruction::content("AAAA", 0.0, 0.0)]));
        assert!(err.to_string().contains("invalid image data"));
    }

    #[test]
    fn test_first_failure_stops_processing() {
        let mut doc = document();
        let err = validation(fill(
            &mut doc,
            &[
                FillInstruction::field("Agree", "Maybe"),
                FillInstruction::field("Missing", "x"),
            ],
        ));
        assert!(matches!(err, ValidationError::ValueNotAllowed { .. }));
    }
}
