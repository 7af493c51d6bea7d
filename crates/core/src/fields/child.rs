use crate::error::{Result, ValidationError};
use acrofill_traits::{FormDocument, NativeField};
use acrofill_types::Value;

/// One member of a button group. Readable, never directly writable: the
/// group decides which member is on.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonChildField {
    pub(crate) native: NativeField,
}

impl ButtonChildField {
    pub fn new(native: NativeField) -> Self {
        Self { native }
    }

    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        doc.appearance_state(&self.native).map(Value::String)
    }

    pub fn set_value<D: FormDocument + ?Sized>(&self, _doc: &mut D, _value: Option<&Value>) -> Result<()> {
        Err(ValidationError::GroupMember {
            field: self.native.name.clone(),
        }
        .into())
    }

    pub fn states<D: FormDocument + ?Sized>(&self, doc: &D) -> Vec<String> {
        doc.appearance_states(&self.native)
    }
}
