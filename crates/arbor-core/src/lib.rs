//! Arbor Core Types and Section Trees
//!
//! This crate provides the data model shared by the Arbor morphology
//! toolkit. It includes:
//!
//! - **Types**: points, section and soma classifications, cell families ([`types`] module)
//! - **Diagnostics**: line-indexed errors and warnings ([`error`] module)
//! - **Mutable tree**: the editable section tree ([`mutable::Morphology`])
//! - **Repairs**: sanitization and optional modifiers ([`options::Options`])
//! - **Snapshot**: the immutable, array-backed morphology ([`immutable::Morphology`])
//! - **Iterators**: depth-first, breadth-first and upstream cursors ([`iter`] module)

pub mod debug_info;
pub mod error;
pub mod immutable;
pub mod iter;
pub mod marker;
mod modifiers;
pub mod mutable;
pub mod options;
pub mod point_level;
mod sanitize;
pub mod snapshot;
pub mod soma;
pub mod types;
