//! Arbor - reading Neurolucida ASC neuron morphologies.
//!
//! Parsing, repair and freezing of neuron morphologies. A load runs four
//! stages: the source is parsed into an editable section tree, the tree is
//! sanitized, the requested modifiers are applied, and the result is frozen
//! into an immutable, array-backed snapshot that can be shared across
//! threads.

pub mod config;

mod error;

pub use arbor_core::{
    debug_info, immutable, iter, marker, mutable, options, point_level, snapshot, soma, types,
};
pub use arbor_core::error::{Diagnostic, ErrorCode, Label, LoadError, Severity, WarningKind};

pub use error::ArborError;

use std::{fs, iter::once, path::Path};

use log::{debug, info, trace};

use config::AppConfig;

/// Loader for ASC morphologies.
///
/// # Examples
///
/// ```
/// use arbor::{MorphologyLoader, config::AppConfig};
///
/// let source = r#"
///     ((CellBody) (0 0 0 10))
///     ((Dendrite) (0 5 0 2) (0 10 0 2) (0 15 0 2))
/// "#;
///
/// let loader = MorphologyLoader::new(AppConfig::default());
/// let loaded = loader.load(source).expect("Failed to load");
///
/// let morphology = loaded.morphology();
/// assert_eq!(morphology.section_count(), 1);
/// assert_eq!(morphology.soma().points().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MorphologyLoader {
    config: AppConfig,
}

impl MorphologyLoader {
    /// Create a new loader with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a morphology from source text.
    ///
    /// The returned [`Loaded`] carries the frozen morphology and every
    /// warning recorded along the way.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Load`] for the first lexer, parser, sanitizer or
    /// modifier error. No partial morphology is returned.
    pub fn load(&self, source: &str) -> Result<Loaded, ArborError> {
        self.load_with_origin(source, None)
    }

    /// Load a morphology from a file.
    ///
    /// Diagnostics carry the file path as their origin.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Io`] if the file cannot be read, and otherwise
    /// the errors of [`MorphologyLoader::load`].
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Loaded, ArborError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Reading morphology file");
        let source = fs::read_to_string(path)?;
        self.load_with_origin(&source, Some(&path.display().to_string()))
    }

    /// Run the load pipeline but stop before freezing the tree.
    ///
    /// Recorded warnings stay in the returned morphology.
    ///
    /// # Errors
    ///
    /// See [`MorphologyLoader::load`].
    pub fn load_mut(&self, source: &str) -> Result<mutable::Morphology, ArborError> {
        self.build_tree(source)
            .map_err(|err| ArborError::new_load_error(err, source))
    }

    fn load_with_origin(&self, source: &str, origin: Option<&str>) -> Result<Loaded, ArborError> {
        let mut morphology = self.build_tree(source).map_err(|err| {
            let err = match origin {
                Some(origin) => err.with_origin(origin),
                None => err,
            };
            ArborError::new_load_error(err, source)
        })?;

        let snapshot = morphology.build_snapshot();
        let diagnostics = morphology
            .take_diagnostics()
            .into_iter()
            .map(|diag| match origin {
                Some(origin) => diag.with_origin(origin),
                None => diag,
            })
            .collect();

        info!(
            sections = snapshot.section_count(),
            points = snapshot.points().len();
            "Morphology loaded"
        );
        Ok(Loaded {
            morphology: snapshot,
            diagnostics,
        })
    }

    fn build_tree(&self, source: &str) -> Result<mutable::Morphology, LoadError> {
        let load = self.config.load();
        let options = load.options();
        info!(options:% = options; "Loading morphology");

        let arbor_parser::Parsed {
            mut morphology,
            debug_info,
        } = arbor_parser::parse(source, &load.parse_config())?;
        debug!(sections = morphology.section_count(); "Source parsed");

        morphology
            .sanitize(&debug_info)
            .map_err(|fatal| abort(fatal, &mut morphology))?;
        debug!(sections = morphology.section_count(); "Morphology sanitized");

        morphology
            .apply_modifiers(options)
            .map_err(|fatal| abort(fatal, &mut morphology))?;
        trace!(morphology:? = morphology; "Modified morphology");

        Ok(morphology)
    }
}

/// The fatal diagnostic first, then the warnings recorded before it.
fn abort(fatal: Diagnostic, morphology: &mut mutable::Morphology) -> LoadError {
    LoadError::new(once(fatal).chain(morphology.take_diagnostics()).collect())
}

/// The result of a successful load.
#[derive(Debug, Clone)]
pub struct Loaded {
    morphology: immutable::Morphology,
    diagnostics: Vec<Diagnostic>,
}

impl Loaded {
    pub fn morphology(&self) -> &immutable::Morphology {
        &self.morphology
    }

    /// Warnings and notes recorded during the load, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_morphology(self) -> immutable::Morphology {
        self.morphology
    }
}
