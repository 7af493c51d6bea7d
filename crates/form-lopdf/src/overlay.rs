//! Page geometry, page resources and appending overlay content streams.

use crate::acroform::{resolve, resolve_dict};
use crate::error::LopdfError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

const MAX_DEPTH: usize = 32;

/// Looks `key` up on the page and then up the page tree.
fn inherited_page_entry<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        current = resolve_dict(doc, current.get(b"Parent").ok()?)?;
    }
    None
}

pub(crate) fn inherited_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    inherited_page_entry(doc, page_id, b"Resources").and_then(|r| r.as_dict().ok())
}

/// Width and height of the page's media box.
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32), LopdfError> {
    let media_box = inherited_page_entry(doc, page_id, b"MediaBox")
        .and_then(|m| m.as_array().ok())
        .ok_or_else(|| LopdfError::Other(format!("page {:?} has no MediaBox", page_id)))?;
    let coords: Vec<f32> = media_box
        .iter()
        .filter_map(|v| resolve(doc, v))
        .filter_map(|v| v.as_float().ok().or_else(|| v.as_i64().ok().map(|i| i as f32)))
        .collect();
    match coords.as_slice() {
        [llx, lly, urx, ury] => Ok(((urx - llx).abs(), (ury - lly).abs())),
        _ => Err(LopdfError::Other(format!("page {:?} has a malformed MediaBox", page_id))),
    }
}

pub(crate) fn page_id(doc: &Document, page: usize) -> Result<ObjectId, LopdfError> {
    u32::try_from(page)
        .ok()
        .and_then(|n| doc.get_pages().get(&n).copied())
        .ok_or(LopdfError::PageNotFound(page))
}

/// Copies inherited resources onto the page itself, resolving the category
/// dictionaries so they can be extended in place.
fn materialize_resources(doc: &mut Document, page_id: ObjectId) -> Result<(), LopdfError> {
    let mut resources = inherited_resources(doc, page_id).cloned().unwrap_or_default();
    for category in [b"Font".as_slice(), b"XObject", b"ExtGState"] {
        let resolved = resources
            .get(category)
            .ok()
            .and_then(|c| resolve_dict(doc, c))
            .cloned();
        if let Some(dict) = resolved {
            resources.set(category.to_vec(), Object::Dictionary(dict));
        }
    }
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Registers `object` under a fresh name in the page's `category` resources.
pub(crate) fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    prefix: &str,
    object: ObjectId,
) -> Result<String, LopdfError> {
    materialize_resources(doc, page_id)?;
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let resources = page.get_mut(b"Resources")?.as_dict_mut()?;
    if !resources.has(category.as_bytes()) {
        resources.set(category, Dictionary::new());
    }
    let entries = resources.get_mut(category.as_bytes())?.as_dict_mut()?;

    if let Some((existing, _)) = entries
        .iter()
        .find(|(_, v)| v.as_reference().ok() == Some(object))
    {
        return Ok(String::from_utf8_lossy(existing).into_owned());
    }
    let name = (1..)
        .map(|i| format!("{prefix}{i}"))
        .find(|n| !entries.has(n.as_bytes()))
        .unwrap_or_else(|| prefix.to_string());
    entries.set(name.clone(), object);
    Ok(name)
}

fn content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, LopdfError> {
    let page = doc.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    Ok(match contents {
        Object::Array(items) => items.clone(),
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(items) => items.clone(),
            _ => vec![contents.clone()],
        },
        other => vec![other.clone()],
    })
}

/// Appends `content` on top of the page. With `isolate_existing`, the
/// current contents are first wrapped in `q`/`Q` so their graphics state
/// cannot leak into the overlay.
pub(crate) fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
    isolate_existing: bool,
) -> Result<(), LopdfError> {
    let mut contents = content_refs(doc, page_id)?;
    let mut overlay = Vec::with_capacity(content.len() + 2);
    if isolate_existing && !contents.is_empty() {
        let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        contents.insert(0, Object::Reference(save_id));
        overlay.extend_from_slice(b"Q\n");
    }
    overlay.extend_from_slice(&content);

    let mut stream = Stream::new(dictionary! {}, overlay);
    if let Err(e) = stream.compress() {
        log::debug!("Overlay content left uncompressed: {}", e);
    }
    let overlay_id = doc.add_object(stream);
    contents.push(Object::Reference(overlay_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}
