//! Listing the fields, pages and fonts of a document.

use crate::error::Result;
use crate::fields::FieldIndex;
use crate::fonts::FontResolver;
use acrofill_traits::FormDocument;
use acrofill_types::{FieldsResponse, PageInfo};

/// Describes every field of `doc`, its page geometry, and the fonts
/// `fonts` can resolve. The document is not modified.
pub fn read_fields<D: FormDocument + ?Sized>(doc: &mut D, fonts: &FontResolver) -> Result<FieldsResponse> {
    let index = FieldIndex::build(&mut *doc, false)?;
    let fields = index.iter().map(|field| field.info(&*doc)).collect();

    let mut pages = Vec::with_capacity(doc.page_count());
    for number in 1..=doc.page_count() {
        let size = doc.page_size(number)?;
        pages.push(PageInfo::new(number, size.width, size.height));
    }
    Ok(FieldsResponse::new(fields, pages, fonts.font_names()))
}
