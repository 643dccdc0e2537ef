//! Severity levels for diagnostics.
//!
//! This module defines the severity of diagnostic messages,
//! distinguishing between fatal errors, repair warnings and informational
//! notes.

use std::fmt;

/// The severity level of a diagnostic.
///
/// Severity determines how the diagnostic should be handled:
/// - [`Severity::Error`] aborts the load
/// - [`Severity::Warning`] reports a repair that was applied
/// - [`Severity::Info`] records a harmless event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// A fatal error. No morphology is produced.
    Error,

    /// A non-fatal issue. The corresponding repair proceeds regardless of
    /// whether the warning is suppressed.
    Warning,

    /// Context or a notable event that needs no action.
    Info,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    /// Returns `true` if this is an info severity.
    pub fn is_info(&self) -> bool {
        matches!(self, Severity::Info)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}
