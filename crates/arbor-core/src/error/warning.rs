//! Kinds of warnings that can be suppressed by the caller.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::types::UnknownNameError;

/// The kind of a warning diagnostic.
///
/// Callers pass a set of kinds to ignore; ignored warnings are not recorded
/// but the repair they describe still happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// A section with exactly one child was merged with that child.
    OnlyChild,
    /// A section's first point is not its parent's last point.
    WrongDuplicate,
    /// A section without points was appended.
    AppendingEmptySection,
    /// A section without points was dropped by the sanitizer.
    EmptySection,
}

impl WarningKind {
    /// Every warning kind, in declaration order.
    pub const ALL: [WarningKind; 4] = [
        WarningKind::OnlyChild,
        WarningKind::WrongDuplicate,
        WarningKind::AppendingEmptySection,
        WarningKind::EmptySection,
    ];

    /// Returns the kebab-case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::OnlyChild => "only-child",
            WarningKind::WrongDuplicate => "wrong-duplicate",
            WarningKind::AppendingEmptySection => "appending-empty-section",
            WarningKind::EmptySection => "empty-section",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WarningKind {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WarningKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNameError::new("warning kind", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip_through_from_str() {
        for kind in WarningKind::ALL {
            assert_eq!(kind.as_str().parse::<WarningKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "no-soma".parse::<WarningKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown warning kind `no-soma`");
    }
}
