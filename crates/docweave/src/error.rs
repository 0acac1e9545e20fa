//! Error types for docweave operations.
//!
//! This module provides the main error type [`DocweaveError`] which wraps
//! the error conditions of loading, building and exporting documentation.

use std::io;

use thiserror::Error;

use docweave_parser::error::ParseError;

/// The main error type for docweave operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the text of the failing source unit, so that the
/// labels of its diagnostics can be rendered against it.
#[derive(Debug, Error)]
pub enum DocweaveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for DocweaveError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl DocweaveError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
