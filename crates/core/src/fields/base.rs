use crate::error::{Result, ValidationError};
use acrofill_traits::{FormDocument, NativeField};
use acrofill_types::Value;

/// A field of no recognised kind: its value is the raw stored text.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseField {
    pub(crate) native: NativeField,
}

impl BaseField {
    pub fn new(native: NativeField) -> Self {
        Self { native }
    }

    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        raw_text(doc, &self.native).map(Value::String)
    }

    pub fn set_value<D: FormDocument + ?Sized>(&self, doc: &mut D, value: Option<&Value>) -> Result<()> {
        write_text(doc, &self.native, value)
    }
}

/// The stored value flattened to text, `None` when absent or empty.
pub(crate) fn raw_text<D: FormDocument + ?Sized>(doc: &D, native: &NativeField) -> Option<String> {
    doc.field_value(native)
        .map(|v| v.to_text())
        .filter(|v| !v.is_empty())
}

pub(crate) fn write_text<D: FormDocument + ?Sized>(
    doc: &mut D,
    native: &NativeField,
    value: Option<&Value>,
) -> Result<()> {
    match value {
        None => doc.set_field_value(native, None)?,
        Some(Value::String(text)) => doc.set_field_value(native, Some(text.as_str()))?,
        Some(other) => return Err(unsupported(native, other)),
    }
    Ok(())
}

pub(crate) fn unsupported(native: &NativeField, value: &Value) -> crate::error::FillError {
    ValidationError::UnsupportedType {
        field: native.name.clone(),
        type_name: value.type_name(),
    }
    .into()
}
