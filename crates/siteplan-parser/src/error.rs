//! Error and diagnostic system for the siteplan parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans with 1-based line/column locations
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which
//! represents a single error or warning with an optional error code,
//! source locations, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from the parsing lifecycle.
//!
//! Syntax errors fail on the first mismatch and produce a single
//! diagnostic; semantic validation (link-target checking) accumulates
//! every violation through a collector before reporting them together.
//!
//! # Example
//!
//! ```
//! # use siteplan_parser::error::{Diagnostic, ErrorCode};
//! # use siteplan_parser::{LineCol, Span};
//!
//! let diag = Diagnostic::error("node `home` links to unknown target `nowhere`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(20..27), "unknown target")
//!     .with_location(LineCol::new(2, 7))
//!     .with_help("declare a node named `nowhere` or fix the link");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
