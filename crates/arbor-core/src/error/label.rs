//! Labeled source lines for diagnostic messages.
//!
//! A label associates a message with a line in the source text,
//! providing context for where an error or warning occurred.

/// A labeled line in the source text.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the main location of an error or warning.
///   There should typically be one primary label per diagnostic.
/// - **Secondary labels** provide additional context, such as "first defined
///   here" or "parent section starts here".
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    line: usize,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the line this label applies to.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
