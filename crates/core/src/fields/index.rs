use super::Field;
use crate::error::Result;
use acrofill_traits::FormDocument;
use std::collections::HashMap;

/// The fields of one document, in document order, addressable by name
/// regardless of case.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl FieldIndex {
    /// Indexes every field of `doc`. With `create_if_absent`, a document
    /// without a form gets an empty one.
    pub fn build<D: FormDocument + ?Sized>(doc: &mut D, create_if_absent: bool) -> Result<Self> {
        let mut index = Self::default();
        for native in doc.form_fields(create_if_absent)? {
            index.insert(Field::from_native(native));
        }
        log::debug!("Indexed {} form fields", index.len());
        Ok(index)
    }

    fn insert(&mut self, field: Field) {
        let key = field.name().to_lowercase();
        if self.by_name.contains_key(&key) {
            log::warn!("Duplicate field name '{}' ignored; the first one wins", field.name());
            return;
        }
        self.by_name.insert(key, self.fields.len());
        self.fields.push(field);
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.fields[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
