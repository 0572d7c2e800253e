// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Diagnostics sink for validation events
//!
//! Validators and lenient readers emit two kinds of events: errors that
//! invalidate a submission and warnings that do not block scoring. Both flow
//! through a [`Reporter`] supplied by the caller, so binaries route them to
//! the log while tests capture them in memory.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Tolerable irregularity; scoring proceeds
    Warning,
    /// The submission cannot be scored
    Error,
}

/// A single event emitted during validation or reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Sink for diagnostic events
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);

    fn warning(&mut self, message: String) {
        self.report(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    fn error(&mut self, message: String) {
        self.report(Diagnostic {
            severity: Severity::Error,
            message,
        });
    }
}

/// Forwards diagnostics to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!("{}", diagnostic.message),
            Severity::Error => tracing::error!("{}", diagnostic.message),
        }
    }
}

/// Collects diagnostics in memory, in emission order
#[derive(Debug, Clone, Default)]
pub struct CaptureReporter {
    pub events: Vec<Diagnostic>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter(|d| d.severity == Severity::Error)
    }
}

impl Reporter for CaptureReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_preserves_order_and_severity() {
        let mut reporter = CaptureReporter::new();
        reporter.warning("first".to_string());
        reporter.error("second".to_string());
        reporter.warning("third".to_string());

        assert_eq!(reporter.events.len(), 3);
        assert_eq!(reporter.warnings().count(), 2);
        assert_eq!(reporter.errors().count(), 1);
        assert_eq!(reporter.events[1].message, "second");
        assert_eq!(reporter.events[1].severity, Severity::Error);
    }
}
