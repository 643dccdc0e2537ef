//! Configuration types for loading Arbor morphologies.
//!
//! All types implement [`serde::Deserialize`] so they can be read from
//! external sources such as the CLI's TOML configuration file:
//!
//! ```toml
//! [load]
//! modifiers = ["soma-sphere", "nrn-order"]
//! ignored_warnings = ["only-child"]
//! ```
//!
//! # Example
//!
//! ```
//! # use arbor::config::{AppConfig, LoadConfig};
//! # use arbor::options::Modifier;
//! let config = AppConfig::new(LoadConfig::default().with_modifier(Modifier::SomaSphere));
//! assert!(config.load().options().contains(Modifier::SomaSphere));
//! ```

use serde::Deserialize;

use arbor_core::{
    error::WarningKind,
    options::{Modifier, Options},
};
use arbor_parser::ParseConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Load pipeline section.
    #[serde(default)]
    load: LoadConfig,
}

impl AppConfig {
    pub fn new(load: LoadConfig) -> Self {
        Self { load }
    }

    /// Returns the load configuration.
    pub fn load(&self) -> &LoadConfig {
        &self.load
    }

    /// Returns the load configuration for in-place overrides.
    pub fn load_mut(&mut self) -> &mut LoadConfig {
        &mut self.load
    }
}

/// Settings applied every time a morphology is loaded.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoadConfig {
    /// Modifiers applied after sanitization.
    #[serde(default)]
    modifiers: Vec<Modifier>,

    /// Warning kinds that are not recorded.
    #[serde(default)]
    ignored_warnings: Vec<WarningKind>,
}

impl LoadConfig {
    pub fn new(modifiers: Vec<Modifier>, ignored_warnings: Vec<WarningKind>) -> Self {
        Self {
            modifiers,
            ignored_warnings,
        }
    }

    /// Adds a modifier unless it is already requested.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.add_modifier(modifier);
        self
    }

    /// Adds a suppressed warning kind unless it is already present.
    pub fn with_ignored_warning(mut self, kind: WarningKind) -> Self {
        self.add_ignored_warning(kind);
        self
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    pub fn add_ignored_warning(&mut self, kind: WarningKind) {
        if !self.ignored_warnings.contains(&kind) {
            self.ignored_warnings.push(kind);
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn ignored_warnings(&self) -> &[WarningKind] {
        &self.ignored_warnings
    }

    /// The requested modifiers as an [`Options`] mask.
    ///
    /// The mask is not validated here; incompatible modifiers are reported
    /// when a morphology is loaded.
    pub fn options(&self) -> Options {
        self.modifiers.iter().copied().collect()
    }

    /// The parser configuration derived from these settings.
    pub fn parse_config(&self) -> ParseConfig {
        self.ignored_warnings.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = AppConfig::default();

        assert!(config.load().options().is_empty());
        assert!(config.load().ignored_warnings().is_empty());
    }

    #[test]
    fn test_builders_skip_duplicates() {
        let load = LoadConfig::default()
            .with_modifier(Modifier::NrnOrder)
            .with_modifier(Modifier::NrnOrder)
            .with_ignored_warning(WarningKind::OnlyChild)
            .with_ignored_warning(WarningKind::OnlyChild);

        assert_eq!(load.modifiers(), &[Modifier::NrnOrder]);
        assert_eq!(load.ignored_warnings(), &[WarningKind::OnlyChild]);
    }

    #[test]
    fn test_options_mask() {
        let load = LoadConfig::new(
            vec![Modifier::SomaSphere, Modifier::TwoPointSections],
            Vec::new(),
        );

        assert_eq!(load.options(), Options::SOMA_SPHERE | Options::TWO_POINTS_SECTIONS);
    }

    #[test]
    fn test_parse_config_carries_ignored_warnings() {
        let load = LoadConfig::default().with_ignored_warning(WarningKind::EmptySection);

        assert_eq!(load.parse_config().ignored_warnings(), &[WarningKind::EmptySection]);
    }
}
