//! Error types for rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown colour map: {0}")]
    UnknownColorMap(String),

    #[error("Invalid colour scale: {0}")]
    InvalidScale(String),

    #[error("Invalid figure layout: {0}")]
    InvalidLayout(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
