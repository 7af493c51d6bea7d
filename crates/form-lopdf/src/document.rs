use crate::acroform::{self, text_object};
use crate::draw::{image_content, image_streams, text_content, TextResources};
use crate::error::LopdfError;
use crate::fonts::{document_fonts, register_font};
use crate::metrics::FontMetrics;
use crate::overlay::{add_resource, append_content, page_id, page_size};
use acrofill_traits::{
    DocumentFont, EngineError, FontProgram, FormDocument, NativeField, NativeFieldType, RasterImage,
    RawFieldValue, StyledText,
};
use acrofill_types::{Rect, Size};
use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// An open PDF document with an interactive form, backed by `lopdf`.
pub struct LopdfFormDocument {
    doc: Document,
    /// Font dictionaries added during this session, by PostScript name.
    fonts: HashMap<String, (ObjectId, FontMetrics)>,
    /// Graphics states added for fill alpha, by alpha in thousandths.
    alpha_states: HashMap<u16, ObjectId>,
    /// Pages whose original content is already wrapped in `q`/`Q`.
    isolated_pages: HashSet<ObjectId>,
}

impl LopdfFormDocument {
    /// Parses a document from memory.
    pub fn load(bytes: &[u8]) -> Result<Self, EngineError> {
        let doc = Document::load_mem(bytes).map_err(LopdfError::from)?;
        Ok(Self::from_document(doc)?)
    }

    pub fn from_document(doc: Document) -> Result<Self, LopdfError> {
        if doc.is_encrypted() {
            return Err(LopdfError::Encrypted);
        }
        Ok(Self {
            doc,
            fonts: HashMap::new(),
            alpha_states: HashMap::new(),
            isolated_pages: HashSet::new(),
        })
    }

    /// The underlying `lopdf` document.
    pub fn inner(&self) -> &Document {
        &self.doc
    }

    fn font(&mut self, program: &FontProgram) -> Result<(ObjectId, FontMetrics), LopdfError> {
        if let Some(found) = self.fonts.get(program.name()) {
            return Ok(found.clone());
        }
        let registered = register_font(&mut self.doc, program)?;
        self.fonts.insert(program.name().to_string(), registered.clone());
        Ok(registered)
    }

    fn alpha_state(&mut self, alpha: f32) -> ObjectId {
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
        *self.alpha_states.entry(key).or_insert_with(|| {
            let value = Object::Real(key as f32 / 1000.0);
            self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => value.clone(),
                "CA" => value,
            })
        })
    }

    fn overlay(&mut self, page: ObjectId, content: lopdf::content::Content) -> Result<(), LopdfError> {
        let bytes = content.encode()?;
        let isolate = self.isolated_pages.insert(page);
        append_content(&mut self.doc, page, bytes, isolate)
    }

    fn page_object(&self, page: usize) -> Result<ObjectId, LopdfError> {
        page_id(&self.doc, page)
    }
}

impl FormDocument for LopdfFormDocument {
    fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn page_size(&self, page: usize) -> Result<Size, EngineError> {
        let (width, height) = page_size(&self.doc, self.page_object(page)?)?;
        Ok(Size::new(width, height))
    }

    fn form_fields(&mut self, create_if_absent: bool) -> Result<Vec<NativeField>, EngineError> {
        if create_if_absent && !acroform::has_acroform(&self.doc) {
            acroform::create_acroform(&mut self.doc)?;
        }
        Ok(acroform::collect_fields(&self.doc))
    }

    fn field_value(&self, field: &NativeField) -> Option<RawFieldValue> {
        acroform::field_value(&self.doc, field)
    }

    fn set_field_value(&mut self, field: &NativeField, value: Option<&str>) -> Result<(), EngineError> {
        let object = value.map(|v| match field.field_type {
            NativeFieldType::Button => Object::Name(v.as_bytes().to_vec()),
            _ => text_object(v),
        });
        acroform::set_value(&mut self.doc, field, object)?;
        Ok(())
    }

    fn display_value(&self, field: &NativeField) -> Option<String> {
        if field.field_type != NativeFieldType::Choice {
            return None;
        }
        let RawFieldValue::Text(value) = acroform::field_value(&self.doc, field)? else {
            return None;
        };
        acroform::choice_options(&self.doc, field)
            .into_iter()
            .find(|o| o.export == value)
            .and_then(|o| o.label)
            .filter(|label| *label != value)
    }

    fn appearance_states(&self, field: &NativeField) -> Vec<String> {
        acroform::appearance_states(&self.doc, field)
    }

    fn appearance_state(&self, widget: &NativeField) -> Option<String> {
        acroform::appearance_state(&self.doc, widget.id)
    }

    fn set_appearance_state(&mut self, field: &NativeField, state: Option<&str>) -> Result<(), EngineError> {
        acroform::set_button_state(&mut self.doc, field, state)?;
        Ok(())
    }

    fn choice_options(&self, field: &NativeField) -> Vec<Option<String>> {
        acroform::choice_options(&self.doc, field)
            .into_iter()
            .map(|o| o.label)
            .collect()
    }

    fn choice_exports(&self, field: &NativeField) -> Vec<String> {
        acroform::choice_options(&self.doc, field)
            .into_iter()
            .map(|o| o.export)
            .collect()
    }

    fn selected_indices(&self, field: &NativeField) -> Vec<usize> {
        acroform::selected_indices(&self.doc, field)
    }

    fn select_indices(&mut self, field: &NativeField, indices: &[usize]) -> Result<(), EngineError> {
        let options = acroform::choice_options(&self.doc, field);
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let values: Vec<String> = sorted
            .iter()
            .filter_map(|&i| options.get(i).map(|o| o.export.clone()))
            .collect();
        acroform::set_choice(&mut self.doc, field, &values, &sorted)?;
        Ok(())
    }

    fn select_values(&mut self, field: &NativeField, values: &[String]) -> Result<(), EngineError> {
        let options = acroform::choice_options(&self.doc, field);
        let mut exports = Vec::with_capacity(values.len());
        let mut indices = Vec::new();
        for value in values {
            match options
                .iter()
                .position(|o| o.label.as_deref() == Some(value.as_str()) || o.export == *value)
            {
                Some(i) => {
                    exports.push(options[i].export.clone());
                    indices.push(i);
                }
                None => exports.push(value.clone()),
            }
        }
        acroform::set_choice(&mut self.doc, field, &exports, &indices)?;
        Ok(())
    }

    fn field_page(&self, field: &NativeField) -> Option<usize> {
        acroform::page_of_annotation(&self.doc, field.id).or_else(|| {
            acroform::widgets(&self.doc, field)
                .into_iter()
                .find_map(|w| acroform::page_of_annotation(&self.doc, w))
        })
    }

    fn child_fields(&self, field: &NativeField) -> Vec<NativeField> {
        acroform::child_fields(&self.doc, field)
    }

    fn document_fonts(&self) -> Vec<DocumentFont> {
        document_fonts(&self.doc)
    }

    fn draw_text(&mut self, page: usize, text: &StyledText) -> Result<(), EngineError> {
        let page_id = self.page_object(page)?;
        let (font_id, metrics) = self.font(&text.font)?;
        let font_name = add_resource(&mut self.doc, page_id, "Font", "AF", font_id)?;
        let gs_name = if text.color.is_opaque() {
            None
        } else {
            let gs_id = self.alpha_state(text.color.a);
            Some(add_resource(&mut self.doc, page_id, "ExtGState", "AGS", gs_id)?)
        };
        let resources = TextResources {
            font: &font_name,
            graphics_state: gs_name.as_deref(),
        };
        let content = text_content(text, &metrics, &resources);
        self.overlay(page_id, content)?;
        Ok(())
    }

    fn draw_image(&mut self, page: usize, area: Rect, image: &RasterImage) -> Result<(), EngineError> {
        let page_id = self.page_object(page)?;
        let (mut stream, mask) = image_streams(image);
        if let Some(mask) = mask {
            let mask_id = self.doc.add_object(mask);
            stream.dict.set("SMask", mask_id);
        }
        let image_id = self.doc.add_object(stream);
        let name = add_resource(&mut self.doc, page_id, "XObject", "AIm", image_id)?;
        self.overlay(page_id, image_content(&name, area))?;
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), EngineError> {
        let catalog_id = acroform::catalog_id(&self.doc)?;
        let action = dictionary! {
            "S" => "JavaScript",
            "JS" => Object::string_literal("this.calculateNow();"),
        };
        self.doc
            .get_object_mut(catalog_id)
            .and_then(Object::as_dict_mut)
            .map_err(LopdfError::from)?
            .set("OpenAction", action);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, EngineError> {
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer).map_err(|e| EngineError::Pdf(e.to_string()))?;
        if buffer.is_empty() {
            return Err(EngineError::Other("document serialisation produced no output".into()));
        }
        log::info!("Finalized document ({} bytes)", buffer.len());
        Ok(buffer)
    }
}
