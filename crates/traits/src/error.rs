use thiserror::Error;

/// Failures raised by a document engine. None of these are caller-correctable.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Unsupported document: {0}")]
    Unsupported(String),

    #[error("Unsupported font '{0}'")]
    UnsupportedFont(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}
