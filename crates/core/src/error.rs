//! The two error tiers of a fill: caller-correctable validation failures and
//! fatal processing failures.

use acrofill_traits::EngineError;
use thiserror::Error;

/// A fill instruction the caller can correct. Carries the offending name or
/// value so the instruction can be pinpointed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{0}' not found")]
    FieldNotFound(String),

    #[error("incorrect page number: '{page}'. The expected value is in the range [1, {count}]")]
    PageOutOfRange { page: i64, count: usize },

    #[error("invalid image scale value: '{0}'. The scale must be greater than 0")]
    InvalidScale(f32),

    #[error("invalid image width value: '{width}'. It must be greater than 0 and at most the page width '{page_width}'")]
    InvalidImageWidth { width: f32, page_width: f32 },

    #[error("invalid image height value: '{height}'. It must be greater than 0 and at most the page height '{page_height}'")]
    InvalidImageHeight { height: f32, page_height: f32 },

    #[error("invalid image data: {0}")]
    InvalidImage(String),

    #[error("invalid text coordinate X value: '{x}'. It must be in the range [0, {page_width}]")]
    InvalidTextX { x: f32, page_width: f32 },

    #[error("invalid text coordinate Y value: '{y}'. It must be in the range [0, {page_height}]")]
    InvalidTextY { y: f32, page_height: f32 },

    #[error("invalid text width value: '{width}'. It must be greater than 0 and at most '{max}'")]
    InvalidTextWidth { width: f32, max: f32 },

    #[error("invalid text height value: '{height}'. It must be greater than 0 and at most '{max}'")]
    InvalidTextHeight { height: f32, max: f32 },

    #[error("font '{0}' not found")]
    FontNotFound(String),

    #[error("unknown color value '{0}'")]
    InvalidColor(String),

    #[error("field '{field}': value cannot be empty")]
    EmptyValue { field: String },

    #[error("value cannot be set for field '{field}': '{value}'")]
    ValueNotAllowed { field: String, value: String },

    #[error("cannot set value directly for a group member of '{field}'")]
    GroupMember { field: String },

    #[error("field '{field}': index is out of range: '{index}'")]
    IndexOutOfRange { field: String, index: f64 },

    #[error("field '{field}': multiple values for single-select field")]
    MultipleValues { field: String },

    #[error("field '{field}': unsupported value type '{type_name}'")]
    UnsupportedType { field: String, type_name: &'static str },

    #[error("value 'null' cannot be set for checkbox '{field}'")]
    NullCheckbox { field: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FillError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The engine failed or produced no output. Not caller-correctable.
    #[error("document processing failed: {0}")]
    Fatal(String),
}

impl FillError {
    pub fn is_validation(&self) -> bool {
        matches!(self, FillError::Validation(_))
    }
}

impl From<EngineError> for FillError {
    fn from(err: EngineError) -> Self {
        FillError::Fatal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_offending_values() {
        let err = ValidationError::PageOutOfRange { page: 7, count: 2 };
        assert_eq!(
            err.to_string(),
            "incorrect page number: '7'. The expected value is in the range [1, 2]"
        );
        assert!(ValidationError::InvalidScale(-1.5).to_string().contains("'-1.5'"));
        assert_eq!(
            ValidationError::FieldNotFound("Missing".into()).to_string(),
            "field 'Missing' not found"
        );
    }

    #[test]
    fn test_engine_errors_are_fatal() {
        let err: FillError = EngineError::UnsupportedFont("NotoSans".into()).into();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("NotoSans"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: FillError = ValidationError::InvalidColor("blurple".into()).into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "unknown color value 'blurple'");
    }
}
