//! The form field model.
//!
//! A [`Field`] wraps one native field of an open document and gives it the
//! value semantics of its kind. Fields hold no document state of their own:
//! every read and write goes through the [`FormDocument`] they came from.

mod base;
mod button;
mod child;
mod choice;
mod factory;
mod index;
mod text;

pub use base::BaseField;
pub use button::ButtonField;
pub use child::ButtonChildField;
pub use choice::ChoiceField;
pub use index::FieldIndex;
pub use text::TextField;

use crate::error::Result;
use acrofill_traits::{FormDocument, NativeField};
use acrofill_types::{FieldInfo, FieldKind, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Base(BaseField),
    Text(TextField),
    Choice(ChoiceField),
    Button(ButtonField),
    ButtonChild(ButtonChildField),
}

impl Field {
    pub fn native(&self) -> &NativeField {
        match self {
            Field::Base(f) => &f.native,
            Field::Text(f) => &f.native,
            Field::Choice(f) => &f.native,
            Field::Button(f) => &f.native,
            Field::ButtonChild(f) => &f.native,
        }
    }

    pub fn name(&self) -> &str {
        &self.native().name
    }

    pub fn kind<D: FormDocument + ?Sized>(&self, doc: &D) -> FieldKind {
        match self {
            Field::Base(_) => FieldKind::Undefined,
            Field::Text(_) => FieldKind::Text,
            Field::Choice(f) => f.kind(),
            Field::Button(f) => f.kind(doc),
            Field::ButtonChild(_) => FieldKind::Undefined,
        }
    }

    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        match self {
            Field::Base(f) => f.value(doc),
            Field::Text(f) => f.value(doc),
            Field::Choice(f) => f.value(doc),
            Field::Button(f) => f.value(doc),
            Field::ButtonChild(f) => f.value(doc),
        }
    }

    /// Writes `value`, validated against the field's kind. `None` clears the
    /// field where the kind allows it.
    pub fn set_value<D: FormDocument + ?Sized>(&self, doc: &mut D, value: Option<&Value>) -> Result<()> {
        match self {
            Field::Base(f) => f.set_value(doc, value),
            Field::Text(f) => f.set_value(doc, value),
            Field::Choice(f) => f.set_value(doc, value),
            Field::Button(f) => f.set_value(doc, value),
            Field::ButtonChild(f) => f.set_value(doc, value),
        }
    }

    pub fn value_options<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Vec<String>> {
        match self {
            Field::Base(_) | Field::Text(_) => None,
            Field::Choice(f) => Some(f.labels(doc)),
            Field::Button(f) => Some(f.states(doc)),
            Field::ButtonChild(f) => Some(f.states(doc)),
        }
    }

    /// The human label of the stored value, when it differs from the value.
    pub fn display_value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<String> {
        if let Field::ButtonChild(_) = self {
            return None;
        }
        let display = doc.display_value(self.native()).filter(|d| !d.is_empty())?;
        match self.value(doc) {
            Some(Value::String(value)) if value == display => None,
            _ => Some(display),
        }
    }

    /// `Some(true)` for read-only fields, `None` otherwise.
    pub fn is_read_only(&self) -> Option<bool> {
        self.native().is_read_only().then_some(true)
    }

    pub fn page<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<usize> {
        doc.field_page(self.native())
    }

    pub fn child_fields<D: FormDocument + ?Sized>(&self, doc: &D) -> Vec<Field> {
        match self {
            Field::Button(f) => f.child_fields(doc),
            _ => Vec::new(),
        }
    }

    /// Describes the field, its children included, for a field listing.
    pub fn info<D: FormDocument + ?Sized>(&self, doc: &D) -> FieldInfo {
        let children: Vec<FieldInfo> = self
            .child_fields(doc)
            .iter()
            .map(|child| child.info(doc))
            .collect();
        FieldInfo {
            name: self.name().to_string(),
            kind: self.kind(doc),
            value: self.value(doc),
            display_value: self.display_value(doc),
            page: self.page(doc),
            is_read_only: self.is_read_only(),
            value_options: self.value_options(doc),
            child_fields: (!children.is_empty()).then_some(children),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use acrofill_lopdf::LopdfFormDocument;
    use lopdf::{dictionary, Document, Object, ObjectId, Stream};

    /// Builds a one-page document around the given field dictionaries. Each
    /// entry is a closure receiving the document and the page id and
    /// returning the root field's object id.
    pub fn form_with(builders: &[&dyn Fn(&mut Document, ObjectId) -> ObjectId]) -> LopdfFormDocument {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        let fields: Vec<Object> = builders
            .iter()
            .map(|build| Object::Reference(build(&mut doc, page_id)))
            .collect();
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Annots" => fields.clone(),
            }),
        );
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let form_id = doc.add_object(dictionary! { "Fields" => fields });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => form_id,
        });
        doc.trailer.set("Root", catalog_id);
        match LopdfFormDocument::from_document(doc) {
            Ok(doc) => doc,
            Err(e) => panic!("fixture document rejected: {e}"),
        }
    }

    pub fn text_field(name: &'static str, value: Option<&'static str>, flags: i64) -> impl Fn(&mut Document, ObjectId) -> ObjectId {
        move |doc, page| {
            let mut field = dictionary! {
                "T" => Object::string_literal(name),
                "FT" => "Tx",
                "Ff" => flags,
                "Subtype" => "Widget",
                "P" => page,
            };
            if let Some(v) = value {
                field.set("V", Object::string_literal(v));
            }
            doc.add_object(field)
        }
    }

    /// A choice field with `[export, label]` options.
    pub fn choice_field(
        name: &'static str,
        options: &'static [(&'static str, &'static str)],
        flags: i64,
    ) -> impl Fn(&mut Document, ObjectId) -> ObjectId {
        move |doc, page| {
            let opt: Vec<Object> = options
                .iter()
                .map(|(export, label)| {
                    Object::Array(vec![Object::string_literal(*export), Object::string_literal(*label)])
                })
                .collect();
            doc.add_object(dictionary! {
                "T" => Object::string_literal(name),
                "FT" => "Ch",
                "Ff" => flags,
                "Opt" => opt,
                "Subtype" => "Widget",
                "P" => page,
            })
        }
    }

    fn appearance(doc: &mut Document, on: &str) -> Object {
        let on_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
        let off_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
        Object::Dictionary(dictionary! {
            "N" => dictionary! { on => on_id, "Off" => off_id },
        })
    }

    pub fn checkbox(name: &'static str, on: &'static str) -> impl Fn(&mut Document, ObjectId) -> ObjectId {
        move |doc, page| {
            let ap = appearance(doc, on);
            doc.add_object(dictionary! {
                "T" => Object::string_literal(name),
                "FT" => "Btn",
                "Subtype" => "Widget",
                "V" => "Off",
                "AS" => "Off",
                "AP" => ap,
                "P" => page,
            })
        }
    }

    pub fn radio_group(name: &'static str, states: &'static [&'static str]) -> impl Fn(&mut Document, ObjectId) -> ObjectId {
        move |doc, page| {
            let group_id = doc.new_object_id();
            let kids: Vec<Object> = states
                .iter()
                .map(|state| {
                    let ap = appearance(doc, state);
                    Object::Reference(doc.add_object(dictionary! {
                        "Parent" => group_id,
                        "Subtype" => "Widget",
                        "AS" => "Off",
                        "AP" => ap,
                        "P" => page,
                    }))
                })
                .collect();
            doc.objects.insert(
                group_id,
                Object::Dictionary(dictionary! {
                    "T" => Object::string_literal(name),
                    "FT" => "Btn",
                    "Ff" => (1 << 15),
                    "Kids" => kids,
                }),
            );
            group_id
        }
    }

    pub fn push_button(name: &'static str) -> impl Fn(&mut Document, ObjectId) -> ObjectId {
        move |doc, page| {
            doc.add_object(dictionary! {
                "T" => Object::string_literal(name),
                "FT" => "Btn",
                "Ff" => (1 << 16),
                "Subtype" => "Widget",
                "P" => page,
            })
        }
    }
}
