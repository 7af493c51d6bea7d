//! Walking and editing the interactive form (`/AcroForm`) of a document.

use crate::encoding::{decode_text_string, encode_text_string};
use crate::error::LopdfError;
use acrofill_traits::{NativeField, NativeFieldType, RawFieldValue};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::HashSet;

/// Upper bound on `/Parent` hops, so malformed cyclic trees terminate.
const MAX_DEPTH: usize = 32;

pub(crate) fn catalog_id(doc: &Document) -> Result<ObjectId, LopdfError> {
    Ok(doc.trailer.get(b"Root")?.as_reference()?)
}

/// Follows a reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

pub(crate) fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, obj).and_then(|o| o.as_dict().ok())
}

pub(crate) fn resolve_array<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Vec<Object>> {
    resolve(doc, obj).and_then(|o| o.as_array().ok())
}

pub(crate) fn name_of(obj: &Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn text_of(doc: &Document, obj: &Object) -> Option<String> {
    match resolve(doc, obj)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

pub(crate) fn text_object(text: &str) -> Object {
    Object::String(encode_text_string(text), StringFormat::Literal)
}

fn acroform(doc: &Document) -> Option<&Dictionary> {
    let catalog = doc.get_dictionary(catalog_id(doc).ok()?).ok()?;
    resolve_dict(doc, catalog.get(b"AcroForm").ok()?)
}

/// Mutable access to the form dictionary, wherever it lives.
fn acroform_mut(doc: &mut Document) -> Result<&mut Dictionary, LopdfError> {
    let catalog_id = catalog_id(doc)?;
    let form_ref = doc
        .get_dictionary(catalog_id)?
        .get(b"AcroForm")?
        .as_reference()
        .ok();
    match form_ref {
        Some(id) => Ok(doc.get_object_mut(id)?.as_dict_mut()?),
        None => Ok(doc
            .get_object_mut(catalog_id)?
            .as_dict_mut()?
            .get_mut(b"AcroForm")?
            .as_dict_mut()?),
    }
}

pub(crate) fn has_acroform(doc: &Document) -> bool {
    acroform(doc).is_some()
}

/// Inserts an empty form into the catalog.
pub(crate) fn create_acroform(doc: &mut Document) -> Result<(), LopdfError> {
    let catalog_id = catalog_id(doc)?;
    let form_id = doc.add_object(lopdf::dictionary! {
        "Fields" => Vec::<Object>::new(),
    });
    doc.get_object_mut(catalog_id)?
        .as_dict_mut()?
        .set("AcroForm", form_id);
    log::debug!("Created empty AcroForm {:?}", form_id);
    Ok(())
}

/// Asks viewers to regenerate field appearances from the stored values.
pub(crate) fn set_need_appearances(doc: &mut Document) -> Result<(), LopdfError> {
    acroform_mut(doc)?.set("NeedAppearances", true);
    Ok(())
}

/// Looks `key` up on the field and then on each of its ancestors.
pub(crate) fn inherited<'a>(doc: &'a Document, id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(id).ok()?;
    for _ in 0..MAX_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        current = resolve_dict(doc, current.get(b"Parent").ok()?)?;
    }
    None
}

fn has_partial_name(doc: &Document, id: ObjectId) -> bool {
    doc.get_dictionary(id)
        .map(|d| d.has(b"T"))
        .unwrap_or(false)
}

fn kids_of(doc: &Document, id: ObjectId) -> Vec<ObjectId> {
    doc.get_dictionary(id)
        .ok()
        .and_then(|d| d.get(b"Kids").ok())
        .and_then(|k| resolve_array(doc, k))
        .map(|kids| kids.iter().filter_map(|k| k.as_reference().ok()).collect())
        .unwrap_or_default()
}

fn describe(doc: &Document, id: ObjectId, name: String) -> NativeField {
    let field_type = inherited(doc, id, b"FT")
        .and_then(|ft| ft.as_name().ok())
        .map(NativeFieldType::from_pdf_name)
        .unwrap_or(NativeFieldType::Unknown);
    let flags = inherited(doc, id, b"Ff")
        .and_then(|ff| ff.as_i64().ok())
        .unwrap_or(0) as u32;
    NativeField {
        id,
        name,
        field_type,
        flags,
        kids: kids_of(doc, id),
    }
}

/// All named fields in document order, parents before their children.
pub(crate) fn collect_fields(doc: &Document) -> Vec<NativeField> {
    let Some(form) = acroform(doc) else {
        return Vec::new();
    };
    let roots: Vec<ObjectId> = form
        .get(b"Fields")
        .ok()
        .and_then(|f| resolve_array(doc, f))
        .map(|f| f.iter().filter_map(|o| o.as_reference().ok()).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    let mut seen = HashSet::new();
    for id in roots {
        visit(doc, id, None, 0, &mut seen, &mut fields);
    }
    fields
}

fn visit(
    doc: &Document,
    id: ObjectId,
    parent: Option<&str>,
    depth: usize,
    seen: &mut HashSet<ObjectId>,
    out: &mut Vec<NativeField>,
) {
    if depth > MAX_DEPTH || !seen.insert(id) {
        return;
    }
    let Some(partial) = doc
        .get_dictionary(id)
        .ok()
        .and_then(|d| d.get(b"T").ok())
        .and_then(|t| text_of(doc, t))
    else {
        return;
    };
    let name = match parent {
        Some(p) => format!("{p}.{partial}"),
        None => partial,
    };
    let field = describe(doc, id, name.clone());
    let kids = field.kids.clone();
    out.push(field);
    for kid in kids {
        if has_partial_name(doc, kid) {
            visit(doc, kid, Some(&name), depth + 1, seen, out);
        }
    }
}

/// Direct kids as fields. Widgets without a partial name carry the name of
/// the field they belong to.
pub(crate) fn child_fields(doc: &Document, field: &NativeField) -> Vec<NativeField> {
    field
        .kids
        .iter()
        .filter_map(|&kid| {
            let dict = doc.get_dictionary(kid).ok()?;
            let name = match dict.get(b"T").ok().and_then(|t| text_of(doc, t)) {
                Some(partial) => format!("{}.{}", field.name, partial),
                None => field.name.clone(),
            };
            Some(describe(doc, kid, name))
        })
        .collect()
}

/// The widget annotations of a field: the field itself when it is merged
/// with its widget, plus every unnamed kid.
pub(crate) fn widgets(doc: &Document, field: &NativeField) -> Vec<ObjectId> {
    let mut out = Vec::new();
    let is_widget = doc
        .get_dictionary(field.id)
        .map(|d| d.get(b"Subtype").ok().and_then(name_of).as_deref() == Some("Widget") || d.has(b"AP"))
        .unwrap_or(false);
    if is_widget || field.kids.is_empty() {
        out.push(field.id);
    }
    out.extend(field.kids.iter().copied().filter(|&k| !has_partial_name(doc, k)));
    out
}

/// State names of a widget's normal and down appearances, in order.
fn widget_states(doc: &Document, widget: ObjectId) -> Vec<String> {
    let Some(ap) = doc
        .get_dictionary(widget)
        .ok()
        .and_then(|d| d.get(b"AP").ok())
        .and_then(|ap| resolve_dict(doc, ap))
    else {
        return Vec::new();
    };
    let mut states = Vec::new();
    for key in [b"N".as_slice(), b"D".as_slice()] {
        if let Some(appearances) = ap.get(key).ok().and_then(|a| resolve_dict(doc, a)) {
            for (state, _) in appearances.iter() {
                let state = String::from_utf8_lossy(state).into_owned();
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
    }
    states
}

pub(crate) fn appearance_states(doc: &Document, field: &NativeField) -> Vec<String> {
    let mut states = Vec::new();
    let mut targets = vec![field.id];
    targets.extend(widgets(doc, field));
    for widget in targets {
        for state in widget_states(doc, widget) {
            if !states.contains(&state) {
                states.push(state);
            }
        }
    }
    states
}

pub(crate) fn appearance_state(doc: &Document, widget: ObjectId) -> Option<String> {
    doc.get_dictionary(widget)
        .ok()?
        .get(b"AS")
        .ok()
        .and_then(name_of)
}

pub(crate) fn field_value(doc: &Document, field: &NativeField) -> Option<RawFieldValue> {
    match inherited(doc, field.id, b"V")? {
        Object::String(bytes, _) => Some(RawFieldValue::Text(decode_text_string(bytes))),
        Object::Name(name) => Some(RawFieldValue::Name(String::from_utf8_lossy(name).into_owned())),
        Object::Array(items) => Some(RawFieldValue::List(
            items.iter().filter_map(|i| text_of(doc, i)).collect(),
        )),
        _ => None,
    }
}

pub(crate) fn set_value(doc: &mut Document, field: &NativeField, value: Option<Object>) -> Result<(), LopdfError> {
    let dict = doc.get_object_mut(field.id)?.as_dict_mut()?;
    match value {
        Some(v) => dict.set("V", v),
        None => {
            dict.remove(b"V");
        }
    }
    set_need_appearances(doc)
}

/// Sets `/V` to the state name and switches every widget to it; widgets that
/// lack the state are turned off.
pub(crate) fn set_button_state(
    doc: &mut Document,
    field: &NativeField,
    state: Option<&str>,
) -> Result<(), LopdfError> {
    let targets: Vec<(ObjectId, bool)> = widgets(doc, field)
        .into_iter()
        .map(|w| {
            let has_state = state.is_some_and(|s| widget_states(doc, w).iter().any(|ws| ws == s));
            (w, has_state)
        })
        .collect();

    set_value(doc, field, state.map(|s| Object::Name(s.as_bytes().to_vec())))?;
    for (widget, has_state) in targets {
        let as_name = match state {
            Some(s) if has_state => s,
            _ => "Off",
        };
        doc.get_object_mut(widget)?
            .as_dict_mut()?
            .set("AS", Object::Name(as_name.as_bytes().to_vec()));
    }
    Ok(())
}

/// A choice option: export value and display label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChoiceOption {
    pub export: String,
    pub label: Option<String>,
}

pub(crate) fn choice_options(doc: &Document, field: &NativeField) -> Vec<ChoiceOption> {
    let Some(options) = inherited(doc, field.id, b"Opt").and_then(|o| o.as_array().ok()) else {
        return Vec::new();
    };
    options
        .iter()
        .map(|opt| match resolve(doc, opt) {
            Some(Object::Array(pair)) => {
                let export = pair.first().and_then(|e| text_of(doc, e)).unwrap_or_default();
                let label = if pair.len() > 1 { text_of(doc, &pair[1]) } else { None };
                ChoiceOption { export, label }
            }
            Some(other) => {
                let text = text_of(doc, other);
                ChoiceOption {
                    export: text.clone().unwrap_or_default(),
                    label: text,
                }
            }
            None => ChoiceOption {
                export: String::new(),
                label: None,
            },
        })
        .collect()
}

pub(crate) fn selected_indices(doc: &Document, field: &NativeField) -> Vec<usize> {
    let Some(indices) = inherited(doc, field.id, b"I").and_then(|i| i.as_array().ok()) else {
        return Vec::new();
    };
    let mut out: Vec<usize> = indices
        .iter()
        .filter_map(|i| i.as_i64().ok())
        .filter(|i| *i >= 0)
        .map(|i| i as usize)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Writes `/V` from `values` and `/I` from `indices`; either may be empty.
pub(crate) fn set_choice(
    doc: &mut Document,
    field: &NativeField,
    values: &[String],
    indices: &[usize],
) -> Result<(), LopdfError> {
    let value = match values {
        [] => None,
        [single] => Some(text_object(single)),
        many => Some(Object::Array(many.iter().map(|v| text_object(v)).collect())),
    };
    set_value(doc, field, value)?;

    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let dict = doc.get_object_mut(field.id)?.as_dict_mut()?;
    if sorted.is_empty() {
        dict.remove(b"I");
    } else {
        dict.set(
            "I",
            Object::Array(sorted.into_iter().map(|i| Object::Integer(i as i64)).collect()),
        );
    }
    Ok(())
}

/// 1-based page holding the annotation `id`: its `/P` entry, else the first
/// page whose `/Annots` lists it.
pub(crate) fn page_of_annotation(doc: &Document, id: ObjectId) -> Option<usize> {
    let pages = doc.get_pages();
    if let Some(page_ref) = doc
        .get_dictionary(id)
        .ok()
        .and_then(|d| d.get(b"P").ok())
        .and_then(|p| p.as_reference().ok())
    {
        if let Some((number, _)) = pages.iter().find(|(_, pid)| **pid == page_ref) {
            return Some(*number as usize);
        }
    }
    pages.iter().find_map(|(number, page_id)| {
        let annots = doc
            .get_dictionary(*page_id)
            .ok()?
            .get(b"Annots")
            .ok()
            .and_then(|a| resolve_array(doc, a))?;
        annots
            .iter()
            .any(|a| a.as_reference().ok() == Some(id))
            .then_some(*number as usize)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// A one-page document with a text field `person.name`, a checkbox and
    /// a two-widget radio group.
    fn form_document() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        let on = doc.add_object(lopdf::Stream::new(dictionary! {}, vec![]));
        let off = doc.add_object(lopdf::Stream::new(dictionary! {}, vec![]));

        let person_id = doc.new_object_id();
        let name_id = doc.add_object(dictionary! {
            "T" => Object::string_literal("name"),
            "Parent" => person_id,
            "Subtype" => "Widget",
            "V" => Object::string_literal("Ann"),
            "P" => page_id,
        });
        doc.objects.insert(
            person_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal("person"),
                "FT" => "Tx",
                "Ff" => 1,
                "Kids" => vec![name_id.into()],
            }),
        );

        let check_id = doc.add_object(dictionary! {
            "T" => Object::string_literal("agree"),
            "FT" => "Btn",
            "Subtype" => "Widget",
            "V" => "Off",
            "AS" => "Off",
            "AP" => dictionary! { "N" => dictionary! { "Yes" => on, "Off" => off } },
        });

        let radio_id = doc.new_object_id();
        let mut radio_kids = vec![];
        for state in ["A", "B"] {
            let kid = doc.add_object(dictionary! {
                "Parent" => radio_id,
                "Subtype" => "Widget",
                "AS" => "Off",
                "AP" => dictionary! { "N" => dictionary! { state => on, "Off" => off } },
            });
            radio_kids.push(Object::Reference(kid));
        }
        doc.objects.insert(
            radio_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal("pick"),
                "FT" => "Btn",
                "Ff" => (1 << 15),
                "Kids" => radio_kids.clone(),
            }),
        );

        let mut annots = vec![Object::Reference(name_id), Object::Reference(check_id)];
        annots.extend(radio_kids);
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Annots" => annots,
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
        let form_id = doc.add_object(dictionary! {
            "Fields" => vec![person_id.into(), check_id.into(), radio_id.into()],
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => form_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, radio_id)
    }

    fn field<'a>(fields: &'a [NativeField], name: &str) -> &'a NativeField {
        fields.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_collect_fields_qualifies_names() {
        let (doc, _) = form_document();
        let fields = collect_fields(&doc);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["person", "person.name", "agree", "pick"]);
    }

    #[test]
    fn test_type_and_flags_are_inherited() {
        let (doc, _) = form_document();
        let fields = collect_fields(&doc);
        let name = field(&fields, "person.name");
        assert_eq!(name.field_type, NativeFieldType::Text);
        assert!(name.is_read_only());
        assert!(field(&fields, "pick").is_radio());
    }

    #[test]
    fn test_appearance_states_cover_all_widgets() {
        let (doc, _) = form_document();
        let fields = collect_fields(&doc);
        assert_eq!(appearance_states(&doc, field(&fields, "agree")), vec!["Yes", "Off"]);
        assert_eq!(appearance_states(&doc, field(&fields, "pick")), vec!["A", "Off", "B"]);
    }

    #[test]
    fn test_radio_children_are_widgets_named_after_group() {
        let (doc, _) = form_document();
        let fields = collect_fields(&doc);
        let children = child_fields(&doc, field(&fields, "pick"));
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.name == "pick"));
        assert_eq!(children[0].field_type, NativeFieldType::Button);
    }

    #[test]
    fn test_set_button_state_switches_widgets() {
        let (mut doc, radio_id) = form_document();
        let fields = collect_fields(&doc);
        let pick = field(&fields, "pick").clone();
        set_button_state(&mut doc, &pick, Some("B")).unwrap();

        let widgets = widgets(&doc, &pick);
        assert_eq!(appearance_state(&doc, widgets[0]).as_deref(), Some("Off"));
        assert_eq!(appearance_state(&doc, widgets[1]).as_deref(), Some("B"));
        assert_eq!(
            doc.get_dictionary(radio_id).unwrap().get(b"V").unwrap().as_name().unwrap(),
            b"B"
        );
        assert!(acroform(&doc).unwrap().get(b"NeedAppearances").unwrap().as_bool().unwrap());
    }

    #[test]
    fn test_page_lookup() {
        let (doc, _) = form_document();
        let fields = collect_fields(&doc);
        let name = field(&fields, "person.name");
        assert_eq!(page_of_annotation(&doc, name.id), Some(1));
        let agree = field(&fields, "agree");
        assert_eq!(page_of_annotation(&doc, agree.id), Some(1));
        let person = field(&fields, "person");
        assert_eq!(page_of_annotation(&doc, person.id), None);
    }

    #[test]
    fn test_field_value_and_clear() {
        let (mut doc, _) = form_document();
        let fields = collect_fields(&doc);
        let name = field(&fields, "person.name").clone();
        assert_eq!(field_value(&doc, &name), Some(RawFieldValue::Text("Ann".into())));
        set_value(&mut doc, &name, None).unwrap();
        assert_eq!(field_value(&doc, &name), None);
    }

    #[test]
    fn test_create_acroform() {
        let mut doc = Document::with_version("1.7");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog_id);
        assert!(!has_acroform(&doc));
        create_acroform(&mut doc).unwrap();
        assert!(has_acroform(&doc));
        assert!(collect_fields(&doc).is_empty());
    }
}
