//! The document engine contract consumed by the fill engine.
//!
//! An engine owns an open document. Native fields are plain descriptors; all
//! reads and writes go back through the engine, so a descriptor stays valid
//! for as long as the document it came from is open.

use crate::draw::{RasterImage, StyledText};
use crate::error::EngineError;
use acrofill_types::{Rect, Size};

/// Object number and generation of an indirect object.
pub type ObjectRef = (u32, u16);

/// Field flag bits (`/Ff`), 0-based.
pub mod flags {
    pub const READ_ONLY: u32 = 1;
    pub const RADIO: u32 = 1 << 15;
    pub const PUSH_BUTTON: u32 = 1 << 16;
    pub const COMBO: u32 = 1 << 17;
    pub const EDIT: u32 = 1 << 18;
    pub const MULTI_SELECT: u32 = 1 << 21;
}

/// The underlying field type (`/FT`), inherited through the field tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeFieldType {
    Text,
    Button,
    Choice,
    Signature,
    /// No `/FT` anywhere in the ancestry, or an unrecognised one.
    Unknown,
}

impl NativeFieldType {
    pub fn from_pdf_name(name: &[u8]) -> Self {
        match name {
            b"Tx" => Self::Text,
            b"Btn" => Self::Button,
            b"Ch" => Self::Choice,
            b"Sig" => Self::Signature,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    pub id: ObjectRef,
    /// Fully qualified name. Widgets carry the name of the field they belong to.
    pub name: String,
    pub field_type: NativeFieldType,
    pub flags: u32,
    /// Direct kids: child fields or widget annotations.
    pub kids: Vec<ObjectRef>,
}

impl NativeField {
    fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn is_read_only(&self) -> bool {
        self.has_flag(flags::READ_ONLY)
    }

    pub fn is_push_button(&self) -> bool {
        self.has_flag(flags::PUSH_BUTTON)
    }

    pub fn is_radio(&self) -> bool {
        self.has_flag(flags::RADIO)
    }

    pub fn is_combo(&self) -> bool {
        self.has_flag(flags::COMBO)
    }

    pub fn is_edit(&self) -> bool {
        self.has_flag(flags::EDIT)
    }

    pub fn is_multi_select(&self) -> bool {
        self.has_flag(flags::MULTI_SELECT)
    }
}

/// A field's stored `/V`, decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFieldValue {
    Text(String),
    Name(String),
    List(Vec<String>),
}

impl RawFieldValue {
    /// Flattens the value to one string; lists are comma-joined.
    pub fn to_text(&self) -> String {
        match self {
            RawFieldValue::Text(s) | RawFieldValue::Name(s) => s.clone(),
            RawFieldValue::List(items) => items.join(","),
        }
    }
}

/// A font program referenced from the document's own page resources.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFont {
    /// `/BaseFont` as written in the document.
    pub base_font: String,
    pub id: Option<ObjectRef>,
    /// Composite (`Type0`) fonts cannot be drawn with simple-font encoding.
    pub composite: bool,
}

pub trait FormDocument {
    fn page_count(&self) -> usize;

    /// Size of the 1-based `page`.
    fn page_size(&self, page: usize) -> Result<Size, EngineError>;

    /// All named fields in document order. With `create_if_absent`, a
    /// document without a form gets an empty one.
    fn form_fields(&mut self, create_if_absent: bool) -> Result<Vec<NativeField>, EngineError>;

    fn field_value(&self, field: &NativeField) -> Option<RawFieldValue>;

    /// Stores a raw string value, or clears it with `None`.
    fn set_field_value(&mut self, field: &NativeField, value: Option<&str>)
    -> Result<(), EngineError>;

    /// Human label for the stored value, when the document defines one.
    fn display_value(&self, field: &NativeField) -> Option<String>;

    /// Appearance state names of the field and all of its widgets.
    fn appearance_states(&self, field: &NativeField) -> Vec<String>;

    /// The current `/AS` of a widget.
    fn appearance_state(&self, widget: &NativeField) -> Option<String>;

    /// Switches a button to `state`, or turns it off with `None`.
    fn set_appearance_state(
        &mut self,
        field: &NativeField,
        state: Option<&str>,
    ) -> Result<(), EngineError>;

    /// Display labels of a choice field's options, in order.
    fn choice_options(&self, field: &NativeField) -> Vec<Option<String>>;

    /// Export values of a choice field's options, aligned with `choice_options`.
    fn choice_exports(&self, field: &NativeField) -> Vec<String>;

    fn selected_indices(&self, field: &NativeField) -> Vec<usize>;

    fn select_indices(&mut self, field: &NativeField, indices: &[usize])
    -> Result<(), EngineError>;

    /// Selects options by label; labels that match no option are stored verbatim.
    fn select_values(&mut self, field: &NativeField, values: &[String])
    -> Result<(), EngineError>;

    /// 1-based page the field's first widget sits on.
    fn field_page(&self, field: &NativeField) -> Option<usize>;

    fn child_fields(&self, field: &NativeField) -> Vec<NativeField>;

    fn document_fonts(&self) -> Vec<DocumentFont>;

    fn draw_text(&mut self, page: usize, text: &StyledText) -> Result<(), EngineError>;

    fn draw_image(&mut self, page: usize, area: Rect, image: &RasterImage)
    -> Result<(), EngineError>;

    /// Asks viewers to recompute calculated fields when the document opens.
    fn recompute(&mut self) -> Result<(), EngineError>;

    /// Commits all pending writes and serialises the document.
    fn finalize(&mut self) -> Result<Vec<u8>, EngineError>;
}
