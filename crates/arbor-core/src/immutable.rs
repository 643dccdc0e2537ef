//! The read-only, array-backed morphology.
//!
//! An [`immutable::Morphology`](Morphology) is a cheap handle on a shared
//! [`Snapshot`]. Cloning it, or taking a [`Section`] out of it, only bumps a
//! reference count; a section stays valid after the morphology it came from
//! is dropped. Nothing here can mutate the snapshot, so handles can be read
//! from any number of threads.

use std::{ops::Range, sync::Arc};

use crate::{
    iter::{BreadthIter, DepthIter, Tree, UpstreamIter},
    marker::Marker,
    point_level::PointLevel,
    snapshot::{SectionRecord, Snapshot},
    soma::Soma,
    types::{CellFamily, Float, Point, SectionId, SectionType},
};

/// A frozen morphology.
///
/// Built by [`crate::mutable::Morphology::build_snapshot`]. Two morphologies
/// compare equal when their snapshots are identical.
#[derive(Debug, Clone)]
pub struct Morphology {
    snapshot: Arc<Snapshot>,
}

impl Morphology {
    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// The underlying shared storage.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn family(&self) -> CellFamily {
        self.snapshot.family
    }

    pub fn soma(&self) -> &Soma {
        &self.snapshot.soma
    }

    pub fn markers(&self) -> &[Marker] {
        &self.snapshot.markers
    }

    /// Points of every section, packed in section id order.
    pub fn points(&self) -> &[Point] {
        &self.snapshot.points
    }

    pub fn diameters(&self) -> &[Float] {
        &self.snapshot.diameters
    }

    /// Perimeters of every section, or empty when any section lacks them.
    pub fn perimeters(&self) -> &[Float] {
        &self.snapshot.perimeters
    }

    pub fn section_count(&self) -> usize {
        self.snapshot.sections.len()
    }

    /// Start offset of every section into the flat arrays, followed by the
    /// total length.
    pub fn section_offsets(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self
            .snapshot
            .sections
            .iter()
            .map(|record| record.range.start)
            .collect();
        offsets.push(self.snapshot.points.len());
        offsets
    }

    pub fn root_ids(&self) -> &[SectionId] {
        &self.snapshot.roots
    }

    pub fn root_sections(&self) -> Vec<Section> {
        self.root_ids().iter().map(|&id| self.handle(id)).collect()
    }

    pub fn section(&self, id: SectionId) -> Option<Section> {
        self.snapshot.record(id).map(|_| self.handle(id))
    }

    /// All sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        (0..self.section_count() as SectionId).map(|id| self.handle(id))
    }

    /// Depth-first cursor from `start`, or over all roots.
    pub fn depth_iter(&self, start: Option<SectionId>) -> DepthIter<'_, Snapshot> {
        DepthIter::new(&*self.snapshot, start)
    }

    /// Breadth-first cursor from `start`, or over all roots.
    pub fn breadth_iter(&self, start: Option<SectionId>) -> BreadthIter<'_, Snapshot> {
        BreadthIter::new(&*self.snapshot, start)
    }

    /// Cursor from `id` up to its root.
    pub fn upstream_iter(&self, id: SectionId) -> UpstreamIter<'_, Snapshot> {
        UpstreamIter::new(&*self.snapshot, Some(id))
    }

    fn handle(&self, id: SectionId) -> Section {
        Section {
            id,
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl PartialEq for Morphology {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.snapshot, &other.snapshot) || self.snapshot == other.snapshot
    }
}

/// A read-only view of one section of a snapshot.
///
/// The handle keeps the snapshot alive.
#[derive(Debug, Clone)]
pub struct Section {
    id: SectionId,
    snapshot: Arc<Snapshot>,
}

impl Section {
    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn section_type(&self) -> SectionType {
        self.record().section_type
    }

    /// Offsets of this section into the flat arrays.
    pub fn range(&self) -> Range<usize> {
        self.record().range.clone()
    }

    pub fn points(&self) -> &[Point] {
        &self.snapshot.points[self.range()]
    }

    pub fn diameters(&self) -> &[Float] {
        &self.snapshot.diameters[self.range()]
    }

    pub fn perimeters(&self) -> &[Float] {
        if self.snapshot.perimeters.is_empty() {
            return &[];
        }
        &self.snapshot.perimeters[self.range()]
    }

    /// Copies the point level data out of the snapshot.
    pub fn to_point_level(&self) -> PointLevel {
        PointLevel::from_slices(self.points(), self.diameters(), self.perimeters())
    }

    pub fn is_root(&self) -> bool {
        self.record().parent.is_none()
    }

    pub fn parent_id(&self) -> Option<SectionId> {
        self.record().parent
    }

    pub fn parent(&self) -> Option<Section> {
        self.parent_id().map(|id| self.sibling_handle(id))
    }

    pub fn child_ids(&self) -> &[SectionId] {
        &self.record().children
    }

    pub fn children(&self) -> Vec<Section> {
        self.child_ids()
            .iter()
            .map(|&id| self.sibling_handle(id))
            .collect()
    }

    /// Depth-first cursor over the subtree rooted here.
    pub fn depth_iter(&self) -> DepthIter<'_, Snapshot> {
        DepthIter::new(&*self.snapshot, Some(self.id))
    }

    /// Breadth-first cursor over the subtree rooted here.
    pub fn breadth_iter(&self) -> BreadthIter<'_, Snapshot> {
        BreadthIter::new(&*self.snapshot, Some(self.id))
    }

    /// Cursor from this section up to its root.
    pub fn upstream_iter(&self) -> UpstreamIter<'_, Snapshot> {
        UpstreamIter::new(&*self.snapshot, Some(self.id))
    }

    fn record(&self) -> &SectionRecord {
        // Handles are only created for ids present in the snapshot.
        &self.snapshot.sections[self.id as usize]
    }

    fn sibling_handle(&self, id: SectionId) -> Section {
        Section {
            id,
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.snapshot, &other.snapshot)
    }
}

impl Tree for Morphology {
    fn root_ids(&self) -> &[SectionId] {
        self.snapshot.root_ids()
    }

    fn children_of(&self, id: SectionId) -> &[SectionId] {
        self.snapshot.children_of(id)
    }

    fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.snapshot.parent_of(id)
    }

    fn contains(&self, id: SectionId) -> bool {
        self.snapshot.contains(id)
    }
}
