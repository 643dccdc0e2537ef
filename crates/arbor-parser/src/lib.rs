//! # Arbor Parser
//!
//! Parser for Neurolucida ASC morphology files. This crate turns source
//! text into an editable [`Morphology`] plus the [`DebugInfo`] that maps
//! sections back to source lines.
//!
//! The result is the raw tree: it has not been sanitized yet. The `arbor`
//! crate runs the full load pipeline.
//!
//! ## Usage
//!
//! ```
//! # use arbor_parser::{parse, ParseConfig};
//! # use arbor_core::error::LoadError;
//!
//! fn main() -> Result<(), LoadError> {
//!     let source = r#"
//!         ("axon" (Axon)
//!           (0 0 0 1)
//!           (0 1 0 1)
//!           (0 2 0 1)
//!         )
//!     "#;
//!
//!     let parsed = parse(source, &ParseConfig::default())?;
//!     assert_eq!(parsed.morphology.section_count(), 1);
//!     Ok(())
//! }
//! ```

mod lexer;
mod parser;
mod tokens;

pub use lexer::{Lexer, tokenize};
pub use tokens::{GroupKind, PositionedToken, Token};

use log::info;

use arbor_core::{
    debug_info::DebugInfo,
    error::{LoadError, WarningKind},
    mutable::Morphology,
};

/// Configuration for parsing.
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    ignored_warnings: Vec<WarningKind>,
}

impl ParseConfig {
    /// Suppress warnings of the given kind in the produced morphology.
    pub fn with_ignored_warning(mut self, kind: WarningKind) -> Self {
        if !self.ignored_warnings.contains(&kind) {
            self.ignored_warnings.push(kind);
        }
        self
    }

    pub fn ignored_warnings(&self) -> &[WarningKind] {
        &self.ignored_warnings
    }
}

impl FromIterator<WarningKind> for ParseConfig {
    fn from_iter<I: IntoIterator<Item = WarningKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |config, kind| config.with_ignored_warning(kind))
    }
}

/// The output of a successful parse.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The unsanitized section tree.
    pub morphology: Morphology,
    /// Source line of every section.
    pub debug_info: DebugInfo,
}

/// Parse ASC source text into an unsanitized morphology.
///
/// The ignore set of `config` is installed on the morphology, so it also
/// applies to the warnings raised while sanitizing it later.
///
/// # Errors
///
/// Returns a [`LoadError`] whose first diagnostic is the lexer or parser
/// error that stopped the parse. No partial morphology is returned.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Parsed, LoadError> {
    info!(bytes = source.len(); "Parsing morphology");

    let morphology =
        Morphology::new().with_ignored_warnings(config.ignored_warnings.iter().copied());
    let (morphology, debug_info) = parser::parse_document(source, morphology)?;

    info!(
        sections = morphology.section_count(),
        soma_points = morphology.soma().points().len(),
        markers = morphology.markers().len();
        "Parsed morphology"
    );
    Ok(Parsed {
        morphology,
        debug_info,
    })
}
