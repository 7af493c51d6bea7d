//! `lopdf`-backed implementation of the form document engine.
//!
//! [`LopdfFormDocument`] reads and writes AcroForm fields, draws overlay
//! text and images on pages, and serialises the result.

mod acroform;
mod document;
mod draw;
mod encoding;
mod error;
mod fonts;
mod metrics;
mod overlay;

pub use document::LopdfFormDocument;
pub use error::LopdfError;
pub use fonts::{StandardFontProvider, STANDARD_FONTS};
pub use metrics::FontMetrics;
