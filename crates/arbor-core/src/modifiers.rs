//! Optional transformations requested through [`Options`].
//!
//! Modifiers run after sanitization, in a fixed order: soma sphere, duplicate
//! removal, two-point collapsing and finally child ordering.

use std::collections::HashMap;

use log::{debug, info};

use crate::{
    error::Result,
    mutable::Morphology,
    options::{Modifier, Options},
    types::{SectionId, SectionType, SomaType},
};

impl Morphology {
    /// Applies the requested modifiers in place.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E300`](crate::error::ErrorCode::E300)
    /// diagnostic, before touching the tree, when two requested modifiers
    /// are incompatible.
    pub fn apply_modifiers(&mut self, options: Options) -> Result<()> {
        options.validate()?;
        if options.is_empty() {
            return Ok(());
        }
        info!(options:% = options; "Applying modifiers");

        if options.contains(Modifier::SomaSphere) {
            self.soma_to_sphere();
        }
        if options.contains(Modifier::NoDuplicates) {
            self.remove_duplicate_points();
        }
        if options.contains(Modifier::TwoPointSections) {
            self.collapse_to_two_points();
        }
        if options.contains(Modifier::NrnOrder) {
            self.normalize_order();
        }
        Ok(())
    }

    /// Replaces a soma with two or more points by its centroid, with a
    /// diameter of twice the mean distance of the points to the centroid.
    fn soma_to_sphere(&mut self) {
        let soma = self.soma_mut();
        if soma.points().len() < 2 {
            return;
        }
        let (Some(center), Some(radius)) = (soma.center(), soma.mean_radius()) else {
            return;
        };
        soma.point_level_mut().set_single(center, 2.0 * radius);
        soma.set_soma_type(SomaType::SinglePoint);
        debug!(center:? = center, radius = radius; "Soma converted to sphere");
    }

    fn remove_duplicate_points(&mut self) {
        let ids: Vec<SectionId> = self.sections().map(|section| section.id()).collect();
        let mut removed = 0;
        for id in ids {
            let Some(section) = self.section_mut(id) else {
                continue;
            };
            let data = section.point_level_mut();
            let points = data.points().to_vec();
            let before = points.len();
            data.retain_indices(|i| i == 0 || points[i] != points[i - 1]);
            removed += before - data.len();
        }
        debug!(removed = removed; "Removed duplicate points");
    }

    fn collapse_to_two_points(&mut self) {
        let ids: Vec<SectionId> = self.sections().map(|section| section.id()).collect();
        for id in ids {
            let Some(section) = self.section_mut(id) else {
                continue;
            };
            let data = section.point_level_mut();
            let last = data.len().saturating_sub(1);
            data.retain_indices(|i| i == 0 || i == last);
        }
    }

    /// Sorts the roots by type (axon, basal, apical, others) and the children
    /// at every branch point by descending subtree point count. Both sorts
    /// are stable.
    fn normalize_order(&mut self) {
        let weights = self.subtree_point_counts();
        self.sort_children_by(|morphology, a, b| {
            match (morphology.is_root(a), morphology.is_root(b)) {
                (true, true) => type_rank(morphology, a).cmp(&type_rank(morphology, b)),
                _ => weight(&weights, b).cmp(&weight(&weights, a)),
            }
        });
    }

    fn subtree_point_counts(&self) -> HashMap<SectionId, usize> {
        let order: Vec<SectionId> = self.depth_iter(None).collect();
        let mut counts = HashMap::with_capacity(order.len());
        for &id in order.iter().rev() {
            let own = self.section(id).map_or(0, |section| section.points().len());
            let below: usize = self
                .children(id)
                .iter()
                .map(|child| counts.get(child).copied().unwrap_or(0))
                .sum();
            counts.insert(id, own + below);
        }
        counts
    }
}

fn weight(weights: &HashMap<SectionId, usize>, id: SectionId) -> usize {
    weights.get(&id).copied().unwrap_or(0)
}

fn type_rank(morphology: &Morphology, id: SectionId) -> u8 {
    match morphology.section(id).map(|section| section.section_type()) {
        Some(SectionType::Axon) => 0,
        Some(SectionType::BasalDendrite) => 1,
        Some(SectionType::ApicalDendrite) => 2,
        _ => 3,
    }
}
