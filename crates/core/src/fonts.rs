//! Resolving font names to drawable fonts.
//!
//! Names are trimmed and lower-cased before every lookup. Sources are tried
//! in order: the providers given at construction (fonts the engine knows
//! natively, then fonts from resource directories), then fonts already used
//! by the document's pages.

use crate::error::{FillError, Result, ValidationError};
use acrofill_traits::{DocumentFont, FontError, FontProgram, FontProvider, FormDocument};
use std::sync::Arc;

/// Font lookup for one document. Document fonts are read once at
/// construction and never refreshed.
#[derive(Debug, Clone)]
pub struct FontResolver {
    providers: Vec<Arc<dyn FontProvider>>,
    document_fonts: Vec<DocumentFont>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FontResolver {
    pub fn new(providers: Vec<Arc<dyn FontProvider>>) -> Self {
        Self {
            providers,
            document_fonts: Vec::new(),
        }
    }

    pub fn for_document<D: FormDocument + ?Sized>(providers: Vec<Arc<dyn FontProvider>>, doc: &D) -> Self {
        Self::new(providers).with_document_fonts(doc.document_fonts())
    }

    pub fn with_document_fonts(mut self, fonts: Vec<DocumentFont>) -> Self {
        self.document_fonts = fonts;
        self
    }

    fn document_font(&self, key: &str) -> Option<&DocumentFont> {
        self.document_fonts
            .iter()
            .find(|f| f.base_font.to_lowercase() == key)
    }

    pub fn font_exists(&self, name: &str) -> bool {
        let key = normalize(name);
        self.providers.iter().any(|p| p.has_font(&key)) || self.document_font(&key).is_some()
    }

    /// Every resolvable name, lower-cased, without duplicates.
    pub fn font_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let all = self
            .providers
            .iter()
            .flat_map(|p| p.font_names())
            .chain(self.document_fonts.iter().map(|f| f.base_font.to_lowercase()));
        for name in all {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Loads the font called `name` from the first source that has it.
    pub fn create_font(&self, name: &str) -> Result<FontProgram> {
        let key = normalize(name);
        if let Some(provider) = self.providers.iter().find(|p| p.has_font(&key)) {
            log::debug!("Font '{}' resolved by {}", key, provider.name());
            return provider.load_font(&key).map_err(|e| match e {
                FontError::NotFound(_) => ValidationError::FontNotFound(name.to_string()).into(),
                other => FillError::Fatal(other.to_string()),
            });
        }
        match self.document_font(&key) {
            Some(font) => Ok(FontProgram::Document {
                base_font: font.base_font.clone(),
                id: font.id,
            }),
            None => Err(ValidationError::FontNotFound(name.to_string()).into()),
        }
    }

    pub fn is_bold(name: &str) -> bool {
        name.to_lowercase().contains("bold")
    }

    pub fn is_italic(name: &str) -> bool {
        let name = name.to_lowercase();
        name.contains("italic") || name.contains("oblique")
    }
}
