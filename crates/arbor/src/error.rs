//! Error types for Arbor operations.
//!
//! This module provides the main error type [`ArborError`] which wraps
//! the error conditions that can occur while loading a morphology.

use std::io;

use thiserror::Error;

use arbor_core::error::LoadError;

/// The main error type for Arbor operations.
///
/// # Diagnostic Variants
///
/// The `Load` variant carries the line-indexed diagnostics of a failed load
/// together with the source text, so that callers can render rich reports.
#[derive(Debug, Error)]
pub enum ArborError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Load { err: LoadError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArborError {
    /// Create a new `Load` error with the associated source text.
    pub fn new_load_error(err: LoadError, src: impl Into<String>) -> Self {
        Self::Load {
            err,
            src: src.into(),
        }
    }
}
