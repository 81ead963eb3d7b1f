//! Error types for siteplan operations.
//!
//! This module provides the main error type [`SiteplanError`] which wraps
//! the error conditions that can occur during diagram processing.

use std::io;

use thiserror::Error;

use siteplan_parser::error::ParseError;

/// The main error type for siteplan operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source
/// code spans. This provides detailed error information that can be used
/// for rich error reporting.
#[derive(Debug, Error)]
pub enum SiteplanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl SiteplanError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
