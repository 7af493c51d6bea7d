// src/error.rs
use acrofill_core::FillError;
use thiserror::Error;

/// Errors surfaced by the service facade and the command line.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("Request is invalid: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fill(#[from] FillError),
}

impl ServiceError {
    /// True when the caller can fix the request and retry.
    pub fn is_validation(&self) -> bool {
        match self {
            ServiceError::Fill(e) => e.is_validation(),
            ServiceError::InvalidRequest(_) | ServiceError::Json(_) => true,
            ServiceError::Config(_) => false,
            ServiceError::Io(_) => false,
        }
    }
}
