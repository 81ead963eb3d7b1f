//! Error codes for the siteplan diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Line grammar errors
//! - `E1xx` - Entry-level errors
//! - `E2xx` - Semantic validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Line grammar errors (E0xx)
    // =========================================================================
    /// Missing or malformed `site` declaration.
    ///
    /// Every diagram must begin with a `site <name>` line at column 1.
    E001,

    /// Unexpected character or unrecognized entry.
    ///
    /// A body line did not match any entry form (node declaration,
    /// `-->` link, `--->` external link, or `[component]`).
    E002,

    /// Tab character in indentation.
    ///
    /// Nesting depth is counted in leading space characters; tabs are
    /// not allowed before an entry.
    E003,

    /// Missing link target.
    ///
    /// A `-->` arrow must be followed by a node identifier, and a
    /// `--->` arrow by a URL.
    E004,

    /// Unterminated component.
    ///
    /// A `[` was opened without a label or a closing `]` on the same line.
    E005,

    /// Unterminated annotation.
    ///
    /// A `(` was opened without text or a closing `)` on the same line.
    E006,

    // =========================================================================
    // Entry-level errors (E1xx)
    // =========================================================================
    /// Trailing characters after a valid entry.
    ///
    /// The entry parsed successfully but the rest of the line is not
    /// whitespace.
    E100,

    // =========================================================================
    // Semantic validation errors (E2xx)
    // =========================================================================
    /// Unknown internal link target.
    ///
    /// A `--> target` references a name that no node in the diagram
    /// declares. All violations are collected and reported together.
    E200,
}

impl ErrorCode {
    /// A short description of the error condition.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "missing `site` declaration",
            ErrorCode::E002 => "unrecognized entry",
            ErrorCode::E003 => "tab in indentation",
            ErrorCode::E004 => "missing link target",
            ErrorCode::E005 => "unterminated component",
            ErrorCode::E006 => "unterminated annotation",
            ErrorCode::E100 => "trailing characters",
            ErrorCode::E200 => "unknown link target",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_variant_name() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_descriptions_are_nonempty() {
        for code in [
            ErrorCode::E001,
            ErrorCode::E002,
            ErrorCode::E003,
            ErrorCode::E004,
            ErrorCode::E005,
            ErrorCode::E006,
            ErrorCode::E100,
            ErrorCode::E200,
        ] {
            assert!(!code.description().is_empty());
        }
    }
}
