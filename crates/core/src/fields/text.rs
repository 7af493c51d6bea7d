use super::base::{raw_text, write_text};
use crate::error::Result;
use acrofill_traits::{FormDocument, NativeField};
use acrofill_types::Value;

/// A free-text field.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub(crate) native: NativeField,
}

impl TextField {
    pub fn new(native: NativeField) -> Self {
        Self { native }
    }

    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        raw_text(doc, &self.native).map(Value::String)
    }

    pub fn set_value<D: FormDocument + ?Sized>(&self, doc: &mut D, value: Option<&Value>) -> Result<()> {
        log::debug!("Setting text field '{}'", self.native.name);
        write_text(doc, &self.native, value)
    }
}
