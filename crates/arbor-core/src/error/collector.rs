//! Collector for accumulating non-fatal diagnostics.
//!
//! The [`DiagnosticCollector`] records the warnings and notes raised while a
//! morphology is parsed and repaired. Errors are never collected: they are
//! returned as `Err` and abort the load.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::error::{Diagnostic, WarningKind};

/// A collector for warnings and informational diagnostics.
///
/// Warnings whose kind is in the ignore set are dropped after being traced;
/// suppression controls visibility only, never behavior.
///
/// # Example
///
/// ```
/// # use arbor_core::error::{Diagnostic, DiagnosticCollector, WarningKind};
///
/// let mut collector = DiagnosticCollector::with_ignored([WarningKind::OnlyChild]);
///
/// collector.emit(Diagnostic::warning(WarningKind::OnlyChild, "merged"));
/// collector.emit(Diagnostic::warning(WarningKind::WrongDuplicate, "missing duplicate"));
///
/// assert_eq!(collector.diagnostics().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    ignored: HashSet<WarningKind>,
}

impl DiagnosticCollector {
    /// Create a new empty collector that records everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that drops warnings of the given kinds.
    pub fn with_ignored(ignored: impl IntoIterator<Item = WarningKind>) -> Self {
        Self {
            diagnostics: Vec::new(),
            ignored: ignored.into_iter().collect(),
        }
    }

    /// Add a warning kind to the ignore set.
    pub fn ignore(&mut self, kind: WarningKind) {
        self.ignored.insert(kind);
    }

    /// Returns `true` if warnings of `kind` are suppressed.
    pub fn is_ignored(&self, kind: WarningKind) -> bool {
        self.ignored.contains(&kind)
    }

    /// The set of suppressed warning kinds.
    pub fn ignored(&self) -> &HashSet<WarningKind> {
        &self.ignored
    }

    /// Emit a diagnostic to this collector.
    ///
    /// Errors should be returned to the caller instead; an error emitted here
    /// is recorded like any other diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if let Some(kind) = diagnostic.warning_kind().filter(|kind| self.is_ignored(*kind)) {
            trace!(kind:% = kind, message = diagnostic.message(); "Suppressed warning");
            return;
        }

        if diagnostic.severity().is_warning() {
            warn!("{diagnostic}");
        } else {
            debug!("{diagnostic}");
        }
        self.diagnostics.push(diagnostic);
    }

    /// Get the recorded diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Remove and return the recorded diagnostics, keeping the ignore set.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Finish collection and return the recorded diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_new_is_empty() {
        let collector = DiagnosticCollector::new();
        assert!(collector.diagnostics().is_empty());
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_records_warnings_and_infos() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning(WarningKind::EmptySection, "dropped"));
        collector.emit(Diagnostic::info("elided"));

        assert_eq!(collector.diagnostics().len(), 2);
    }

    #[test]
    fn test_collector_suppresses_ignored_kinds() {
        let mut collector = DiagnosticCollector::new();
        collector.ignore(WarningKind::OnlyChild);

        collector.emit(Diagnostic::warning(WarningKind::OnlyChild, "merged"));
        collector.emit(Diagnostic::info("never suppressed"));

        let diagnostics = collector.finish();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity().is_info());
    }

    #[test]
    fn test_collector_take_keeps_ignore_set() {
        let mut collector = DiagnosticCollector::with_ignored([WarningKind::WrongDuplicate]);
        collector.emit(Diagnostic::warning(WarningKind::OnlyChild, "merged"));

        assert_eq!(collector.take().len(), 1);
        assert!(collector.diagnostics().is_empty());
        assert!(collector.is_ignored(WarningKind::WrongDuplicate));
    }
}
