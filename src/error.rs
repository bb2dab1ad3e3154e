//! Error types for pagechunk library.

use std::io;
use thiserror::Error;

/// Result type alias for pagechunk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while consolidating and chunking pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing JSON page/chunk data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page Extractor output is malformed (bad bbox, ragged table grid).
    #[error("Structural error on page {page}: {message}")]
    Structural {
        /// Page the malformed primitive belongs to
        page: u32,
        /// What was wrong with it
        message: String,
    },

    /// Invalid chunking or splitter configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A placeholder token in a chunk has no registered rendering.
    #[error("Rendering inconsistency: placeholder {0} is not registered")]
    RenderingInconsistency(String),

    /// A chunk could not be mapped back to its source text or page.
    #[error("Provenance error: {0}")]
    Provenance(String),

    /// Error during rendering (Markdown, HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn structural(page: u32, message: impl Into<String>) -> Self {
        Error::Structural {
            page,
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::structural(3, "table 1 has ragged rows");
        assert_eq!(
            err.to_string(),
            "Structural error on page 3: table 1 has ragged rows"
        );

        let err = Error::RenderingInconsistency("@page_1_element_2_table@".to_string());
        assert_eq!(
            err.to_string(),
            "Rendering inconsistency: placeholder @page_1_element_2_table@ is not registered"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
