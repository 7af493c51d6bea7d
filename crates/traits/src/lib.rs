//! Seams between the fill engine and its collaborators.
//!
//! - [`FormDocument`]: the document engine (pages, native form fields, drawing, finalize)
//! - [`FontProvider`]: one source of drawable fonts

pub mod draw;
pub mod error;
pub mod font;
pub mod form;

pub use draw::{RasterData, RasterImage, StyledText};
pub use error::EngineError;
pub use font::{
    FontError, FontProgram, FontProvider, InMemoryFontProvider, SharedFontData,
};
pub use form::{DocumentFont, FormDocument, NativeField, NativeFieldType, ObjectRef, RawFieldValue};
