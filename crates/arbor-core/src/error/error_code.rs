//! Error codes for the Arbor diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Tree invariant errors
//! - `E3xx` - Configuration errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that does not start any token.
    E002,

    /// Unbalanced parentheses.
    ///
    /// The input ended while a parenthesized group was still open.
    E003,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// A specific token was required but a different one was found.
    E100,

    /// Unknown token.
    ///
    /// The token cannot start or continue any construct at this position.
    E101,

    /// Invalid point.
    ///
    /// A point group did not contain four numeric fields.
    E102,

    /// End of input inside a neurite.
    E103,

    // =========================================================================
    // Tree Errors (E2xx)
    // =========================================================================
    /// Missing parent.
    ///
    /// A section refers to a parent id that does not exist.
    E200,

    /// Soma already defined.
    E201,

    /// Soma bifurcation.
    ///
    /// A soma section has more than one child.
    E202,

    /// Soma with a neurite parent.
    E203,

    /// Self-referential parent.
    ///
    /// A section would become its own ancestor.
    E204,

    /// Vector length mismatch.
    ///
    /// Point level vectors (points, diameters, perimeters) differ in length.
    E205,

    /// Section type not allowed by the cell family.
    E206,

    // =========================================================================
    // Configuration Errors (E3xx)
    // =========================================================================
    /// Incompatible modifiers.
    ///
    /// Two requested modifiers would silently undo each other.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            // Tree errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            // Configuration errors
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unbalanced parentheses",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unknown token",
            ErrorCode::E102 => "invalid point",
            ErrorCode::E103 => "end of input inside a neurite",
            // Tree errors
            ErrorCode::E200 => "missing parent",
            ErrorCode::E201 => "soma already defined",
            ErrorCode::E202 => "soma bifurcation",
            ErrorCode::E203 => "soma with neurite parent",
            ErrorCode::E204 => "self-referential parent",
            ErrorCode::E205 => "vector length mismatch",
            ErrorCode::E206 => "section type not allowed",
            // Configuration errors
            ErrorCode::E300 => "incompatible modifiers",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E200.description(), "missing parent");
        assert_eq!(ErrorCode::E201.description(), "soma already defined");
    }
}
