use acrofill_traits::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LopdfError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("encrypted documents are not supported")]
    Encrypted,

    #[error("page {0} does not exist")]
    PageNotFound(usize),

    #[error("unsupported font '{0}': composite fonts cannot be drawn")]
    CompositeFont(String),

    #[error("invalid font program '{name}': {message}")]
    InvalidFont { name: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl From<LopdfError> for EngineError {
    fn from(err: LopdfError) -> Self {
        match err {
            LopdfError::Pdf(e) => EngineError::Pdf(e.to_string()),
            e @ LopdfError::Encrypted => EngineError::Unsupported(e.to_string()),
            LopdfError::PageNotFound(n) => EngineError::NotFound(format!("page {n}")),
            LopdfError::CompositeFont(name) => EngineError::UnsupportedFont(name),
            LopdfError::InvalidFont { name, message } => {
                EngineError::UnsupportedFont(format!("{name}: {message}"))
            }
            LopdfError::Other(msg) => EngineError::Other(msg),
        }
    }
}
