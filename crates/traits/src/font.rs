//! FontProvider trait for abstracting where drawable fonts come from.
//!
//! The fill engine consults several providers in order (fonts the document
//! engine knows natively, fonts found on resource paths, fonts already used
//! by the document) without knowing how any of them is backed.

use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::form::ObjectRef;

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),
}

/// Shared font data type (reference-counted bytes).
pub type SharedFontData = Arc<Vec<u8>>;

/// A font the document engine can draw with.
#[derive(Debug, Clone, PartialEq)]
pub enum FontProgram {
    /// One of the 14 standard PDF fonts, by its PostScript name.
    Standard { base_font: String },
    /// A TrueType/OpenType program to embed.
    TrueType {
        postscript_name: String,
        data: SharedFontData,
    },
    /// A Type 1 font located on disk, referenced by name only.
    Type1 { font_name: String },
    /// A font already present in the document's resources.
    Document {
        base_font: String,
        id: Option<ObjectRef>,
    },
}

impl FontProgram {
    pub fn standard(base_font: impl Into<String>) -> Self {
        FontProgram::Standard {
            base_font: base_font.into(),
        }
    }

    /// The font's PostScript name as it will appear in `/BaseFont`.
    pub fn name(&self) -> &str {
        match self {
            FontProgram::Standard { base_font } => base_font,
            FontProgram::TrueType { postscript_name, .. } => postscript_name,
            FontProgram::Type1 { font_name } => font_name,
            FontProgram::Document { base_font, .. } => base_font,
        }
    }
}

impl Default for FontProgram {
    fn default() -> Self {
        FontProgram::standard("Helvetica")
    }
}

/// A source of fonts addressed by lower-cased name.
pub trait FontProvider: Send + Sync + Debug {
    /// Every name this provider can resolve, lower-cased.
    fn font_names(&self) -> Vec<String>;

    /// Resolve `name` (already trimmed and lower-cased) to a drawable font.
    fn load_font(&self, name: &str) -> Result<FontProgram, FontError>;

    fn has_font(&self, name: &str) -> bool {
        self.font_names().iter().any(|n| n == name)
    }

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory font provider.
///
/// Fonts must be registered before use; later registrations of the same name
/// are ignored.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    fonts: RwLock<Vec<(String, FontProgram)>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `program` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `FontError::LoadFailed` if the internal lock is poisoned.
    pub fn add_font(&self, name: &str, program: FontProgram) -> Result<(), FontError> {
        let key = name.trim().to_lowercase();
        let mut fonts = self.fonts.write().map_err(|_| FontError::LoadFailed {
            path: key.clone(),
            message: "font store lock poisoned".to_string(),
        })?;
        if !fonts.iter().any(|(n, _)| *n == key) {
            fonts.push((key, program));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FontProvider for InMemoryFontProvider {
    fn font_names(&self) -> Vec<String> {
        self.fonts
            .read()
            .map(|f| f.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    fn load_font(&self, name: &str) -> Result<FontProgram, FontError> {
        let fonts = self.fonts.read().map_err(|_| FontError::LoadFailed {
            path: name.to_string(),
            message: "font store lock poisoned".to_string(),
        })?;
        fonts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| FontError::NotFound(name.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryFontProvider"
    }
}
