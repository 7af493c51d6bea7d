//! Shared data types for form filling: values, colors, field kinds,
//! page geometry, fill instructions and field listings.

pub mod color;
pub mod geometry;
pub mod kind;
pub mod listing;
pub mod page;
pub mod request;
pub mod value;

pub use color::{Color, ColorParseError};
pub use geometry::{Rect, Size};
pub use kind::{FieldKind, UnknownFieldKind};
pub use listing::{FieldInfo, FieldsResponse};
pub use page::PageInfo;
pub use request::{
    FieldsData, FillInstruction, FontStyle, HorizontalAlignment, TextStyle, UnknownAlignment,
    VerticalAlignment,
};
pub use value::Value;
