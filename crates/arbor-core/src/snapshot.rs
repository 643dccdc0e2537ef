//! Flattening a mutable tree into a [`Snapshot`].
//!
//! The builder walks the roots in stored order and each root tree depth
//! first, so the result depends only on the tree structure and contents,
//! never on the order in which sections were created or edited. Section ids
//! in the snapshot are the depth-first visitation index.

use std::{collections::HashMap, ops::Range};

use log::{debug, info};

use crate::{
    immutable,
    iter::Tree,
    marker::Marker,
    mutable,
    soma::Soma,
    types::{CellFamily, Float, Point, SectionId, SectionType},
};

/// Per-section entry of the snapshot side table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionRecord {
    pub(crate) range: Range<usize>,
    pub(crate) section_type: SectionType,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: Vec<SectionId>,
}

/// The flattened, read-only storage behind [`immutable::Morphology`].
///
/// Points, diameters and perimeters of every section are packed into three
/// contiguous arrays; each section is a half-open offset range into them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub(crate) family: CellFamily,
    pub(crate) soma: Soma,
    pub(crate) points: Vec<Point>,
    pub(crate) diameters: Vec<Float>,
    pub(crate) perimeters: Vec<Float>,
    pub(crate) sections: Vec<SectionRecord>,
    pub(crate) roots: Vec<SectionId>,
    pub(crate) markers: Vec<Marker>,
}

impl Snapshot {
    pub(crate) fn record(&self, id: SectionId) -> Option<&SectionRecord> {
        self.sections.get(id as usize)
    }
}

impl Tree for Snapshot {
    fn root_ids(&self) -> &[SectionId] {
        &self.roots
    }

    fn children_of(&self, id: SectionId) -> &[SectionId] {
        self.record(id).map_or(&[][..], |record| record.children.as_slice())
    }

    fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.record(id).and_then(|record| record.parent)
    }

    fn contains(&self, id: SectionId) -> bool {
        self.record(id).is_some()
    }
}

impl mutable::Morphology {
    /// Builds the immutable snapshot of this tree.
    ///
    /// The snapshot is a copy: later edits of `self` do not affect it.
    /// Perimeters are kept only when every section carries them.
    pub fn build_snapshot(&self) -> immutable::Morphology {
        let order: Vec<SectionId> = self.depth_iter(None).collect();
        let new_ids: HashMap<SectionId, SectionId> = order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index as SectionId))
            .collect();
        let with_perimeters = !order.is_empty()
            && self
                .sections()
                .all(|section| section.point_level().has_perimeters());

        let total: usize = self.sections().map(|section| section.points().len()).sum();
        let mut points = Vec::with_capacity(total);
        let mut diameters = Vec::with_capacity(total);
        let mut perimeters = Vec::new();
        let mut sections = Vec::with_capacity(order.len());

        for id in &order {
            let Some(section) = self.section(*id) else {
                continue;
            };
            let start = points.len();
            points.extend_from_slice(section.points());
            diameters.extend_from_slice(section.diameters());
            if with_perimeters {
                perimeters.extend_from_slice(section.perimeters());
            }
            sections.push(SectionRecord {
                range: start..points.len(),
                section_type: section.section_type(),
                parent: self.parent(*id).and_then(|parent| new_ids.get(&parent).copied()),
                children: self
                    .children(*id)
                    .iter()
                    .filter_map(|child| new_ids.get(child).copied())
                    .collect(),
            });
        }

        let roots = self
            .root_sections()
            .iter()
            .filter_map(|root| new_ids.get(root).copied())
            .collect();

        info!(sections = sections.len(), points = points.len(); "Built snapshot");
        debug!(with_perimeters = with_perimeters, markers = self.markers().len(); "Snapshot details");

        immutable::Morphology::from_snapshot(Snapshot {
            family: self.family(),
            soma: self.soma().clone(),
            points,
            diameters,
            perimeters,
            sections,
            roots,
            markers: self.markers().to_vec(),
        })
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::point_level::PointLevel;

    // ===================
    // Strategies
    // ===================

    /// Parent choices for each section, as in the mutable tree properties.
    fn shape_strategy() -> impl Strategy<Value = Vec<Option<prop::sample::Index>>> {
        prop::collection::vec(prop::option::weighted(0.7, any::<prop::sample::Index>()), 1..30)
    }

    fn parents(shape: &[Option<prop::sample::Index>]) -> Vec<Option<usize>> {
        shape
            .iter()
            .enumerate()
            .map(|(i, choice)| match choice {
                Some(index) if i > 0 => Some(index.index(i)),
                _ => None,
            })
            .collect()
    }

    fn data(i: usize) -> PointLevel {
        let x = i as f64;
        PointLevel::from_points(vec![[x, 0.0, 0.0], [x, x, 0.0]], vec![1.0, x]).unwrap()
    }

    /// Appends section `i` before anything else it does not depend on.
    fn build_in_creation_order(parents: &[Option<usize>]) -> mutable::Morphology {
        let mut morphology = mutable::Morphology::new();
        for (i, parent) in parents.iter().enumerate() {
            morphology.insert_section(parent.map(|p| p as SectionId), SectionType::Axon, data(i));
        }
        morphology
    }

    /// Creates every section as a detached root first, in reverse, then
    /// wires the parent relations with re-parenting.
    fn build_in_edit_order(parents: &[Option<usize>]) -> mutable::Morphology {
        let mut morphology = mutable::Morphology::new();
        let mut ids = vec![0; parents.len()];
        for i in (0..parents.len()).rev() {
            ids[i] = morphology.insert_section(None, SectionType::Axon, data(i));
        }
        for (i, parent) in parents.iter().enumerate() {
            let new_parent = parent.map(|p| ids[p]);
            morphology.reparent(ids[i], new_parent).unwrap();
        }
        morphology
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Identical structure and contents give identical snapshots.
    fn check_snapshot_is_deterministic(parents: &[Option<usize>]) -> Result<(), TestCaseError> {
        let first = build_in_creation_order(parents).build_snapshot();
        let second = build_in_edit_order(parents).build_snapshot();

        prop_assert_eq!(first.points(), second.points());
        prop_assert_eq!(first.diameters(), second.diameters());
        prop_assert_eq!(first.section_offsets(), second.section_offsets());
        prop_assert!(first == second);
        Ok(())
    }

    /// Offsets cover the arrays without gaps.
    fn check_offsets_are_contiguous(parents: &[Option<usize>]) -> Result<(), TestCaseError> {
        let snapshot = build_in_creation_order(parents).build_snapshot();
        let offsets = snapshot.section_offsets();

        prop_assert_eq!(offsets.len(), snapshot.section_count() + 1);
        prop_assert_eq!(offsets[0], 0);
        prop_assert_eq!(*offsets.last().unwrap(), snapshot.points().len());
        prop_assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
        Ok(())
    }

    proptest! {
        #[test]
        fn snapshot_is_deterministic(shape in shape_strategy()) {
            check_snapshot_is_deterministic(&parents(&shape))?;
        }

        #[test]
        fn offsets_are_contiguous(shape in shape_strategy()) {
            check_offsets_are_contiguous(&parents(&shape))?;
        }
    }
}
