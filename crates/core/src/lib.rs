//! # acrofill-core
//!
//! The form model and fill engine, independent of any document backend:
//! - **fields**: field variants over native form fields, the factory and the name index
//! - **fonts** / **color**: resolving text styling
//! - **fill**: applying fill instructions and finalizing the document
//! - **reader**: listing fields, pages and fonts
//!
//! Everything talks to the document through [`acrofill_traits::FormDocument`].

pub use acrofill_traits as traits;
pub use acrofill_types as types;

pub mod color;
pub mod error;
pub mod fields;
pub mod fill;
pub mod fonts;
pub mod raster;
pub mod reader;

pub use color::ColorResolver;
pub use error::{FillError, ValidationError};
pub use fields::{Field, FieldIndex};
pub use fill::DocumentFillEngine;
pub use fonts::FontResolver;
pub use reader::read_fields;
