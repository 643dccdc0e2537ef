//! Source line bookkeeping for sections.

use std::collections::HashMap;

use crate::types::SectionId;

/// Maps a section id to the source line where the section began.
///
/// Built during parsing and consulted only when diagnostics are reported.
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    lines: HashMap<SectionId, usize>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the line on which section `id` starts.
    pub fn set_line(&mut self, id: SectionId, line: usize) {
        self.lines.insert(id, line);
    }

    /// The line on which section `id` starts, if known.
    pub fn line(&self, id: SectionId) -> Option<usize> {
        self.lines.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
