//! Modifier flags passed once at load time.
//!
//! [`Options`] is a bitmask of [`Modifier`]s. Modifiers run after
//! sanitization; see [`crate::mutable::Morphology::apply_modifiers`].

use std::{fmt, ops, str::FromStr};

use serde::Deserialize;

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    types::UnknownNameError,
};

/// A single optional transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    /// Collapse every section to its first and last point.
    TwoPointSections,
    /// Replace the soma by a single sphere fitted on its points.
    SomaSphere,
    /// Remove exactly duplicated consecutive points within a section.
    NoDuplicates,
    /// Normalize the order of roots and of children at branch points.
    NrnOrder,
}

impl Modifier {
    /// Every modifier, in application order after the soma sphere.
    pub const ALL: [Modifier; 4] = [
        Modifier::TwoPointSections,
        Modifier::SomaSphere,
        Modifier::NoDuplicates,
        Modifier::NrnOrder,
    ];

    /// The bit of this modifier in an [`Options`] mask.
    pub fn bit(&self) -> u8 {
        match self {
            Modifier::TwoPointSections => 0x01,
            Modifier::SomaSphere => 0x02,
            Modifier::NoDuplicates => 0x04,
            Modifier::NrnOrder => 0x08,
        }
    }

    /// Returns the kebab-case name of this modifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::TwoPointSections => "two-point-sections",
            Modifier::SomaSphere => "soma-sphere",
            Modifier::NoDuplicates => "no-duplicates",
            Modifier::NrnOrder => "nrn-order",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|modifier| modifier.as_str() == s)
            .ok_or_else(|| UnknownNameError::new("modifier", s))
    }
}

/// Pairs of modifiers where one would silently undo the other.
const INCOMPATIBLE: [(Modifier, Modifier); 1] =
    [(Modifier::TwoPointSections, Modifier::NoDuplicates)];

/// A combination of [`Modifier`]s.
///
/// # Example
///
/// ```
/// # use arbor_core::options::{Modifier, Options};
///
/// let options = Options::SOMA_SPHERE | Options::NRN_ORDER;
/// assert!(options.contains(Modifier::SomaSphere));
/// assert!(!options.contains(Modifier::NoDuplicates));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Options(u8);

impl Options {
    pub const NO_MODIFIER: Options = Options(0x00);
    pub const TWO_POINTS_SECTIONS: Options = Options(0x01);
    pub const SOMA_SPHERE: Options = Options(0x02);
    pub const NO_DUPLICATES: Options = Options(0x04);
    pub const NRN_ORDER: Options = Options(0x08);

    /// Builds options from raw bits, ignoring unknown bits.
    pub fn from_bits(bits: u8) -> Self {
        Options(bits & 0x0F)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `modifier` is requested.
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns a copy with `modifier` added.
    pub fn with(self, modifier: Modifier) -> Self {
        Options(self.0 | modifier.bit())
    }

    /// Iterates over the requested modifiers.
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL
            .into_iter()
            .filter(|modifier| self.contains(*modifier))
    }

    /// Checks that no two requested modifiers are mutually exclusive.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E300`] diagnostic naming both modifiers.
    pub fn validate(&self) -> Result<()> {
        for (first, second) in INCOMPATIBLE {
            if self.contains(first) && self.contains(second) {
                return Err(Diagnostic::error(format!(
                    "modifiers `{first}` and `{second}` are incompatible"
                ))
                .with_code(ErrorCode::E300)
                .with_help("request at most one of them"));
            }
        }
        Ok(())
    }
}

impl ops::BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Self) -> Self::Output {
        Options(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Modifier> for Options {
    fn from(modifier: Modifier) -> Self {
        Options(modifier.bit())
    }
}

impl FromIterator<Modifier> for Options {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        iter.into_iter().fold(Options::NO_MODIFIER, Options::with)
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.modifiers().map(|m| m.as_str()).collect();
        write!(f, "{}", names.join(" | "))
    }
}
