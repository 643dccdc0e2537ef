//! The editable section tree.
//!
//! [`Morphology`] owns its sections in a single table keyed by
//! [`SectionId`]. Parent and children relations live in side indices, so
//! structural edits touch a constant number of entries and never walk the
//! tree. Ids are handed out by a counter in creation order, starting at 0.
//!
//! The tree is repaired by [`Morphology::sanitize`], transformed by
//! [`Morphology::apply_modifiers`] and frozen by
//! [`Morphology::build_snapshot`].

mod section;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

pub use section::Section;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result, WarningKind},
    immutable,
    iter::{BreadthIter, DepthIter, Tree, UpstreamIter},
    marker::Marker,
    point_level::PointLevel,
    soma::Soma,
    types::{CellFamily, SectionId, SectionType, points_equal},
};

/// An editable neuron morphology.
///
/// # Example
///
/// ```
/// # use arbor_core::{mutable::Morphology, point_level::PointLevel, types::SectionType};
///
/// let mut morphology = Morphology::new();
/// let data = PointLevel::from_points(vec![[0.0; 3], [0.0, 1.0, 0.0]], vec![1.0, 1.0]).unwrap();
/// let root = morphology.append_root_section(SectionType::Axon, data).unwrap();
///
/// let err = morphology
///     .append_section(Some(999), SectionType::Axon, PointLevel::default())
///     .unwrap_err();
/// assert!(err.message().contains("999"));
/// assert_eq!(morphology.root_sections(), &[root]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Morphology {
    family: CellFamily,
    soma: Soma,
    sections: IndexMap<SectionId, Section>,
    root_sections: Vec<SectionId>,
    parents: HashMap<SectionId, SectionId>,
    children: HashMap<SectionId, Vec<SectionId>>,
    next_id: SectionId,
    markers: Vec<Marker>,
    diagnostics: DiagnosticCollector,
}

impl Morphology {
    /// Creates an empty neuron morphology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty morphology of the given family.
    pub fn with_family(family: CellFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    /// Suppresses warnings of the given kinds from now on.
    pub fn with_ignored_warnings(mut self, kinds: impl IntoIterator<Item = WarningKind>) -> Self {
        for kind in kinds {
            self.diagnostics.ignore(kind);
        }
        self
    }

    pub fn family(&self) -> CellFamily {
        self.family
    }

    pub fn soma(&self) -> &Soma {
        &self.soma
    }

    pub fn soma_mut(&mut self) -> &mut Soma {
        &mut self.soma
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(&id)
    }

    /// All sections in creation order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    pub fn root_sections(&self) -> &[SectionId] {
        &self.root_sections
    }

    pub fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.parents.get(&id).copied()
    }

    pub fn children(&self, id: SectionId) -> &[SectionId] {
        self.children.get(&id).map_or(&[][..], Vec::as_slice)
    }

    pub fn is_root(&self, id: SectionId) -> bool {
        self.contains(id) && !self.parents.contains_key(&id)
    }

    /// The id the next appended section will receive.
    pub fn next_id(&self) -> SectionId {
        self.next_id
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Records a diagnostic, dropping suppressed warnings.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    /// The warnings and notes recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Removes and returns the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Appends a new root section.
    ///
    /// # Errors
    ///
    /// See [`Morphology::append_section`].
    pub fn append_root_section(
        &mut self,
        section_type: SectionType,
        data: PointLevel,
    ) -> Result<SectionId> {
        self.append_section(None, section_type, data)
    }

    /// Appends a section under `parent`, or as a new root when `parent` is
    /// `None`, and returns its id.
    ///
    /// Empty sections and children that do not start on their parent's last
    /// point are accepted with a warning.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E200`] when `parent` does not exist.
    /// - [`ErrorCode::E206`] when the family does not allow `section_type`.
    pub fn append_section(
        &mut self,
        parent: Option<SectionId>,
        section_type: SectionType,
        data: PointLevel,
    ) -> Result<SectionId> {
        if let Some(parent) = parent {
            self.check_exists(parent, "parent section")?;
        }
        if !self.family.accepts(section_type) {
            return Err(Diagnostic::error(format!(
                "section type `{section_type}` is not allowed in a {} morphology",
                self.family
            ))
            .with_code(ErrorCode::E206));
        }

        let id = self.next_id;
        if data.is_empty() {
            self.emit(Diagnostic::warning(
                WarningKind::AppendingEmptySection,
                format!("appending empty section {id}"),
            ));
        } else if let Some(parent) = parent {
            self.check_duplicate_point(parent, id, &data);
        }

        Ok(self.insert_section(parent, section_type, data))
    }

    /// Deletes section `id`.
    ///
    /// With `recursive` the whole subtree goes. Otherwise the children take
    /// the deleted section's place under its parent (or among the roots).
    /// Returns `false` if `id` does not exist.
    pub fn delete_section(&mut self, id: SectionId, recursive: bool) -> bool {
        if !self.contains(id) {
            return false;
        }

        if recursive {
            let subtree: Vec<SectionId> = self.depth_iter(Some(id)).collect();
            self.detach(id);
            for sid in subtree {
                self.sections.shift_remove(&sid);
                self.parents.remove(&sid);
                self.children.remove(&sid);
            }
        } else {
            let parent = self.parents.remove(&id);
            let orphans = self.children.remove(&id).unwrap_or_default();
            let siblings = self.siblings_mut(parent);
            if let Some(position) = siblings.iter().position(|&sibling| sibling == id) {
                siblings.splice(position..=position, orphans.iter().copied());
            }
            for orphan in orphans {
                match parent {
                    Some(parent) => self.parents.insert(orphan, parent),
                    None => self.parents.remove(&orphan),
                };
            }
            self.sections.shift_remove(&id);
        }

        trace!(id = id, recursive = recursive; "Deleted section");
        true
    }

    /// Moves section `id` with its subtree under `new_parent`, or to the end
    /// of the roots when `new_parent` is `None`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E200`] when either section does not exist.
    /// - [`ErrorCode::E204`] when `new_parent` lies in the subtree of `id`.
    pub fn reparent(&mut self, id: SectionId, new_parent: Option<SectionId>) -> Result<()> {
        self.check_exists(id, "section")?;
        if let Some(new_parent) = new_parent {
            self.check_exists(new_parent, "parent section")?;
            if self.upstream_iter(new_parent).any(|ancestor| ancestor == id) {
                return Err(Diagnostic::error(format!(
                    "section {id} cannot become a descendant of itself"
                ))
                .with_code(ErrorCode::E204)
                .with_help(format!("section {new_parent} is in the subtree of section {id}")));
            }
        }

        self.detach(id);
        self.attach(id, new_parent);
        Ok(())
    }

    /// Copies a read-only section under `parent` with a fresh id.
    ///
    /// With `recursive` its descendants are copied as well, keeping their
    /// relative structure. Returns the id of the copy of `section`.
    ///
    /// # Errors
    ///
    /// See [`Morphology::append_section`].
    pub fn graft(
        &mut self,
        parent: Option<SectionId>,
        section: &immutable::Section,
        recursive: bool,
    ) -> Result<SectionId> {
        let root = self.append_section(parent, section.section_type(), section.to_point_level())?;
        if !recursive {
            return Ok(root);
        }

        let mut stack: Vec<(SectionId, immutable::Section)> = section
            .children()
            .into_iter()
            .rev()
            .map(|child| (root, child))
            .collect();
        while let Some((new_parent, source)) = stack.pop() {
            let id =
                self.append_section(Some(new_parent), source.section_type(), source.to_point_level())?;
            stack.extend(source.children().into_iter().rev().map(|child| (id, child)));
        }
        Ok(root)
    }

    /// Depth-first cursor from `start`, or over all roots.
    pub fn depth_iter(&self, start: Option<SectionId>) -> DepthIter<'_, Self> {
        DepthIter::new(self, start)
    }

    /// Breadth-first cursor from `start`, or over all roots.
    pub fn breadth_iter(&self, start: Option<SectionId>) -> BreadthIter<'_, Self> {
        BreadthIter::new(self, start)
    }

    /// Cursor from `id` up to its root.
    pub fn upstream_iter(&self, id: SectionId) -> UpstreamIter<'_, Self> {
        UpstreamIter::new(self, Some(id))
    }

    /// Registers a section without validation.
    pub(crate) fn insert_section(
        &mut self,
        parent: Option<SectionId>,
        section_type: SectionType,
        data: PointLevel,
    ) -> SectionId {
        let id = self.next_id;
        self.next_id += 1;
        self.sections.insert(id, Section::new(id, section_type, data));
        self.attach(id, parent);
        trace!(id = id, parent:? = parent; "Appended section");
        id
    }

    /// Sorts the roots and every children list with `compare`.
    pub(crate) fn sort_children_by(
        &mut self,
        mut compare: impl FnMut(&Self, SectionId, SectionId) -> std::cmp::Ordering,
    ) {
        let mut roots = std::mem::take(&mut self.root_sections);
        roots.sort_by(|&a, &b| compare(self, a, b));
        self.root_sections = roots;

        let parents: Vec<SectionId> = self.children.keys().copied().collect();
        for parent in parents {
            if let Some(mut children) = self.children.remove(&parent) {
                children.sort_by(|&a, &b| compare(self, a, b));
                self.children.insert(parent, children);
            }
        }
    }

    fn check_exists(&self, id: SectionId, what: &str) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        Err(Diagnostic::error(format!("{what} {id} does not exist")).with_code(ErrorCode::E200))
    }

    fn check_duplicate_point(&mut self, parent: SectionId, id: SectionId, data: &PointLevel) {
        let parent_last = self
            .section(parent)
            .and_then(|section| section.point_level().last_point().copied());
        let (Some(parent_last), Some(first)) = (parent_last, data.first_point()) else {
            return;
        };
        if !points_equal(&parent_last, first) {
            self.emit(
                Diagnostic::warning(
                    WarningKind::WrongDuplicate,
                    format!(
                        "first point {first:?} of section {id} is not the last point \
                         {parent_last:?} of its parent section {parent}"
                    ),
                )
                .with_help("the first point of a section should repeat the last point of its parent"),
            );
        }
    }

    fn siblings_mut(&mut self, parent: Option<SectionId>) -> &mut Vec<SectionId> {
        match parent {
            Some(parent) => self.children.entry(parent).or_default(),
            None => &mut self.root_sections,
        }
    }

    fn attach(&mut self, id: SectionId, parent: Option<SectionId>) {
        self.siblings_mut(parent).push(id);
        if let Some(parent) = parent {
            self.parents.insert(id, parent);
        }
    }

    fn detach(&mut self, id: SectionId) {
        let parent = self.parents.remove(&id);
        self.siblings_mut(parent).retain(|&sibling| sibling != id);
        if let Some(parent) = parent {
            if self.children(parent).is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}

impl Tree for Morphology {
    fn root_ids(&self) -> &[SectionId] {
        &self.root_sections
    }

    fn children_of(&self, id: SectionId) -> &[SectionId] {
        self.children(id)
    }

    fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.parent(id)
    }

    fn contains(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }
}

impl From<&immutable::Morphology> for Morphology {
    /// Rebuilds an editable tree from a snapshot, keeping its ids.
    fn from(snapshot: &immutable::Morphology) -> Self {
        let mut morphology = Morphology::with_family(snapshot.family());
        morphology.soma = snapshot.soma().clone();
        morphology.markers = snapshot.markers().to_vec();

        let mut ids = HashMap::new();
        for section in snapshot.sections() {
            let parent = section.parent_id().and_then(|parent| ids.get(&parent).copied());
            let id =
                morphology.insert_section(parent, section.section_type(), section.to_point_level());
            ids.insert(section.id(), id);
        }
        morphology
    }
}
