//! Error and diagnostic system for Arbor.
//!
//! This module provides a line-indexed diagnostic system with:
//! - Error codes for documentation and searchability
//! - Warning kinds that callers can suppress individually
//! - Severity levels (error, warning, info)
//! - A collector that records warnings while a load proceeds
//!
//! # Overview
//!
//! Every event raised while lexing, parsing or repairing a morphology is a
//! [`Diagnostic`]. Errors abort the load and are wrapped into a [`LoadError`].
//! Warnings never abort: the repair they describe always happens, and the
//! [`DiagnosticCollector`] only decides whether the warning is recorded.
//!
//! # Example
//!
//! ```
//! # use arbor_core::error::{Diagnostic, ErrorCode};
//!
//! let diag = Diagnostic::error("a soma is already defined")
//!     .with_code(ErrorCode::E201)
//!     .with_label(12, "second soma group")
//!     .with_secondary_label(3, "first defined here");
//! assert_eq!(diag.line(), Some(12));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod load_error;
mod severity;
mod warning;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use load_error::{LoadError, Result};
pub use severity::Severity;
pub use warning::WarningKind;
