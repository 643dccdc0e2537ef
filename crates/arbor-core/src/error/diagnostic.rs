//! The core diagnostic type for the Arbor error system.
//!
//! A [`Diagnostic`] represents a single error, warning or note with an
//! optional error code or warning kind, labeled source lines, and help text.

use std::fmt;

use crate::error::{Label, Severity, WarningKind, error_code::ErrorCode};

/// Origin used in links when the source has no name.
const DEFAULT_ORIGIN: &str = "<input>";

/// A diagnostic message with source line information.
///
/// Diagnostics provide:
/// - A severity level
/// - An error code (errors) or a [`WarningKind`] (warnings)
/// - A primary message describing the issue
/// - Zero or more labeled source lines
/// - Optional help text
/// - The origin (file name) the line numbers refer to
///
/// # Example
///
/// ```text
/// cell.asc:12: error[E201]: a soma is already defined
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    warning: Option<WarningKind>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    origin: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use arbor_core::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("unexpected token: Foo")
    ///     .with_code(ErrorCode::E101)
    ///     .with_label(3, "not expected here");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic of the given kind.
    ///
    /// # Example
    ///
    /// ```
    /// # use arbor_core::error::{Diagnostic, WarningKind};
    ///
    /// let diag = Diagnostic::warning(WarningKind::OnlyChild, "section 1 is the only child of section 0")
    ///     .with_label(7, "child starts here");
    /// assert_eq!(diag.warning_kind(), Some(WarningKind::OnlyChild));
    /// ```
    pub fn warning(kind: WarningKind, message: impl Into<String>) -> Self {
        let mut diag = Self::new(Severity::Warning, message);
        diag.warning = Some(kind);
        diag
    }

    /// Create an informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the warning kind, if this is a warning.
    pub fn warning_kind(&self) -> Option<WarningKind> {
        self.warning
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Get the origin the line numbers refer to.
    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }

    /// The line of the first primary label, if any.
    pub fn line(&self) -> Option<usize> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::line)
    }

    /// A link-style reference `origin:line` to the originating line.
    pub fn link(&self) -> Option<String> {
        self.line().map(|line| format!("{}:{line}", self.origin()))
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, line: usize, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(line, message));
        self
    }

    /// Add a primary label when the line is known.
    pub fn with_optional_label(self, line: Option<usize>, message: impl Into<String>) -> Self {
        match line {
            Some(line) => self.with_label(line, message),
            None => self,
        }
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, line: usize, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(line, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the origin (usually a file path) the line numbers refer to.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            warning: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            origin: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "origin:line: error[E001]: message" or "warning[only-child]: message"
        if let Some(link) = self.link() {
            write!(f, "{link}: ")?;
        }
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        } else if let Some(kind) = self.warning {
            write!(f, "[{kind}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
