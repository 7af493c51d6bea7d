//! # acrofill
//!
//! Reads and fills the interactive form fields of PDF documents, and places
//! free text and images on their pages.
//!
//! ```no_run
//! use acrofill::{FillInstruction, PdfServiceBuilder};
//!
//! # fn main() -> Result<(), acrofill::ServiceError> {
//! let service = PdfServiceBuilder::new().with_font_dir("fonts").build()?;
//! let pdf = std::fs::read("form.pdf")?;
//! let listing = service.read_fields(&pdf)?;
//! println!("{} fields", listing.fields_count);
//!
//! let filled = service.fill(&pdf, &[FillInstruction::field("Name", "Ann")])?;
//! std::fs::write("filled.pdf", filled)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;

pub use acrofill_core::{FillError, ValidationError};
pub use acrofill_types::{
    FieldInfo, FieldKind, FieldsData, FieldsResponse, FillInstruction, FontStyle, PageInfo, TextStyle, Value,
};
pub use config::ServiceConfig;
pub use error::ServiceError;

use acrofill_core::{DocumentFillEngine, FontResolver};
use acrofill_lopdf::{LopdfFormDocument, StandardFontProvider};
use acrofill_resource::DirectoryFontProvider;
use acrofill_traits::{FontProvider, StyledText};
use std::path::Path;
use std::sync::Arc;

/// Reads and fills documents. Cheap to clone; the font directory scan is
/// shared by every clone and done at most once.
#[derive(Debug, Clone)]
pub struct PdfService {
    standard_fonts: Arc<StandardFontProvider>,
    directory_fonts: Arc<DirectoryFontProvider>,
    default_font_size: f32,
}

impl PdfService {
    fn font_resolver(&self, doc: &LopdfFormDocument) -> FontResolver {
        let providers = vec![
            self.standard_fonts.clone() as Arc<dyn FontProvider>,
            self.directory_fonts.clone(),
        ];
        FontResolver::for_document(providers, doc)
    }

    /// Lists the fields, pages and resolvable fonts of `pdf`.
    pub fn read_fields(&self, pdf: &[u8]) -> Result<FieldsResponse, ServiceError> {
        let mut doc = LopdfFormDocument::load(pdf).map_err(FillError::from)?;
        let fonts = self.font_resolver(&doc);
        let listing = acrofill_core::read_fields(&mut doc, &fonts)?;
        log::debug!(
            "Read {} fields over {} pages",
            listing.fields_count,
            listing.pages.len()
        );
        Ok(listing)
    }

    /// Applies `instructions` in order to `pdf` and returns the filled document.
    /// Stops at the first instruction that fails.
    pub fn fill(&self, pdf: &[u8], instructions: &[FillInstruction]) -> Result<Vec<u8>, ServiceError> {
        let mut doc = LopdfFormDocument::load(pdf).map_err(FillError::from)?;
        let fonts = self.font_resolver(&doc);
        let output = DocumentFillEngine::new(&mut doc, fonts)
            .with_default_font_size(self.default_font_size)
            .fill(instructions)?;
        Ok(output)
    }

    /// Like [`fill`](Self::fill), for a request payload. An absent or empty
    /// field list is rejected before the document is opened.
    pub fn fill_data(&self, pdf: &[u8], data: &FieldsData) -> Result<Vec<u8>, ServiceError> {
        match data.fields.as_deref() {
            Some(instructions) if !instructions.is_empty() => self.fill(pdf, instructions),
            _ => Err(ServiceError::InvalidRequest("no fields to fill".to_string())),
        }
    }
}

/// A builder for creating a [`PdfService`].
#[derive(Debug, Clone, Default)]
pub struct PdfServiceBuilder {
    config: ServiceConfig,
}

impl PdfServiceBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the configuration gathered so far.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a directory to scan for font files.
    pub fn with_font_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.resources.fonts.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.config.default_font_size = Some(size);
        self
    }

    pub fn build(self) -> Result<PdfService, ServiceError> {
        let default_font_size = match self.config.default_font_size {
            None => StyledText::DEFAULT_FONT_SIZE,
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(size) => {
                return Err(ServiceError::Config(format!(
                    "defaultFontSize must be a positive number, got {}",
                    size
                )));
            }
        };
        log::info!(
            "Building PDF service with {} font directories",
            self.config.resources.fonts.len()
        );
        Ok(PdfService {
            standard_fonts: Arc::new(StandardFontProvider::new()),
            directory_fonts: Arc::new(DirectoryFontProvider::new(&self.config.resources.fonts)),
            default_font_size,
        })
    }
}
