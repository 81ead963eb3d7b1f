//! Collector for accumulating diagnostics during a processing phase.
//!
//! The [`DiagnosticCollector`] allows semantic validation to report every
//! unresolved link instead of failing on the first one encountered.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a processing phase.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.has_errors |= diagnostic.severity().is_error();
        self.diagnostics.push(diagnostic);
    }

    /// Finish the phase, failing with every collected diagnostic if any
    /// of them was an error.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_empty_collector_finishes_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_batches_all_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::error("first").with_code(ErrorCode::E200));
        collector.emit(Diagnostic::error("second").with_code(ErrorCode::E200));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn test_warnings_alone_do_not_fail() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("advisory"));
        assert!(collector.finish().is_ok());
    }
}
