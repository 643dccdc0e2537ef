//! Repairs applied to every freshly parsed tree.
//!
//! [`Morphology::sanitize`] runs three passes in order:
//!
//! 1. sections without points are dropped, their children spliced into the
//!    grandparent;
//! 2. soma typed sections are checked for bifurcations and for a neurite
//!    parent, both fatal;
//! 3. every section with exactly one child absorbs that child, repeatedly,
//!    until no such chain is left.
//!
//! Warnings raised on the way are subject to the morphology's ignore set;
//! the repairs themselves happen regardless.

use log::{debug, info};

use crate::{
    debug_info::DebugInfo,
    error::{Diagnostic, ErrorCode, Result, WarningKind},
    mutable::Morphology,
    types::{SectionId, SectionType, points_equal},
};

impl Morphology {
    /// Repairs the tree in place.
    ///
    /// `debug_info` supplies the source lines cited by the diagnostics.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E202`] when a soma section has more than one child.
    /// - [`ErrorCode::E203`] when a soma section has a non-soma parent.
    pub fn sanitize(&mut self, debug_info: &DebugInfo) -> Result<()> {
        info!(sections = self.section_count(); "Sanitizing morphology");

        let dropped = self.drop_empty_sections(debug_info);
        self.check_soma_sections(debug_info)?;
        let merged = self.merge_only_children(debug_info);

        debug!(dropped = dropped, merged = merged, sections = self.section_count(); "Sanitized morphology");
        Ok(())
    }

    fn drop_empty_sections(&mut self, debug_info: &DebugInfo) -> usize {
        let empty: Vec<SectionId> = self
            .sections()
            .filter(|section| section.is_empty())
            .map(|section| section.id())
            .collect();

        for &id in &empty {
            self.emit(
                Diagnostic::warning(WarningKind::EmptySection, format!("section {id} has no points"))
                    .with_optional_label(debug_info.line(id), "section starts here")
                    .with_help("the section is removed and its children attached to its parent"),
            );
            self.delete_section(id, false);
        }
        empty.len()
    }

    fn check_soma_sections(&self, debug_info: &DebugInfo) -> Result<()> {
        let somata = self
            .sections()
            .filter(|section| section.section_type() == SectionType::Soma);

        for soma in somata {
            let id = soma.id();
            let line = debug_info.line(id);
            if let Some(parent) = self.parent(id) {
                let parent_type = self.section(parent).map(|section| section.section_type());
                if parent_type != Some(SectionType::Soma) {
                    return Err(Diagnostic::error(format!(
                        "soma section {id} has a neurite parent (section {parent})"
                    ))
                    .with_code(ErrorCode::E203)
                    .with_optional_label(line, "soma section starts here"));
                }
            }

            let children = self.children(id);
            if children.len() > 1 {
                let mut diag = Diagnostic::error(format!(
                    "soma section {id} bifurcates into {} children",
                    children.len()
                ))
                .with_code(ErrorCode::E202)
                .with_optional_label(line, "soma section starts here");
                for &child in children {
                    if let Some(child_line) = debug_info.line(child) {
                        diag = diag.with_secondary_label(child_line, format!("child section {child}"));
                    }
                }
                return Err(diag);
            }
        }
        Ok(())
    }

    /// Merges only children into their parents, returning the merge count.
    fn merge_only_children(&mut self, debug_info: &DebugInfo) -> usize {
        let order: Vec<SectionId> = self.depth_iter(None).collect();
        let mut merged = 0;

        for id in order {
            if !self.contains(id) {
                continue;
            }
            loop {
                let child = match self.children(id) {
                    [child] => *child,
                    _ => break,
                };
                self.warn_only_child(debug_info, id, child);
                self.absorb_child(id, child);
                merged += 1;
            }
        }
        merged
    }

    fn warn_only_child(&mut self, debug_info: &DebugInfo, parent: SectionId, child: SectionId) {
        let mut diag = Diagnostic::warning(
            WarningKind::OnlyChild,
            format!("section {child} is the only child of section {parent}"),
        )
        .with_optional_label(debug_info.line(child), "only child starts here")
        .with_help("the two sections are merged into one");
        if let Some(parent_line) = debug_info.line(parent) {
            diag = diag.with_secondary_label(parent_line, "parent starts here");
        }
        self.emit(diag);
    }

    /// Appends the child's samples to `parent` and removes the child, whose
    /// own children move up to `parent`.
    ///
    /// The child's first sample is dropped when it repeats the parent's last
    /// point.
    fn absorb_child(&mut self, parent: SectionId, child: SectionId) {
        let Some(child_data) = self.section(child).map(|section| section.point_level().clone())
        else {
            return;
        };
        if let Some(section) = self.section_mut(parent) {
            let data = section.point_level_mut();
            let joint = match (data.last_point(), child_data.first_point()) {
                (Some(last), Some(first)) => points_equal(last, first),
                _ => false,
            };
            data.extend_from(&child_data, usize::from(joint));
        }
        self.delete_section(child, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_level::PointLevel;

    fn level(xs: &[f64], diameter: f64) -> PointLevel {
        let points = xs.iter().map(|&x| [x, 0.0, 0.0]).collect();
        PointLevel::from_points(points, vec![diameter; xs.len()]).unwrap()
    }

    #[test]
    fn test_only_child_is_merged() {
        let mut morphology = Morphology::new();
        let root = morphology.append_root_section(SectionType::Axon, level(&[0.0, 1.0], 1.0)).unwrap();
        morphology.append_section(Some(root), SectionType::Axon, level(&[1.0, 2.0, 3.0], 0.5)).unwrap();
        let mut debug_info = DebugInfo::new();
        debug_info.set_line(0, 3);
        debug_info.set_line(1, 5);

        morphology.sanitize(&debug_info).unwrap();

        assert_eq!(morphology.section_count(), 1);
        let section = morphology.section(root).unwrap();
        assert_eq!(section.points().len(), 4);
        assert_eq!(section.diameters(), &[1.0, 1.0, 0.5, 0.5]);

        let warning = &morphology.diagnostics()[0];
        assert_eq!(warning.warning_kind(), Some(WarningKind::OnlyChild));
        assert_eq!(warning.line(), Some(5));
        assert_eq!(warning.labels()[1].line(), 3);
    }

    #[test]
    fn test_suppressed_merge_is_identical() {
        let build = |ignored: &[WarningKind]| {
            let mut morphology = Morphology::new().with_ignored_warnings(ignored.iter().copied());
            let root = morphology
                .append_root_section(SectionType::Axon, level(&[0.0, 1.0], 1.0))
                .unwrap();
            morphology
                .append_section(Some(root), SectionType::Axon, level(&[1.0, 2.0], 0.5))
                .unwrap();
            morphology.sanitize(&DebugInfo::new()).unwrap();
            morphology
        };

        let reported = build(&[]);
        let suppressed = build(&[WarningKind::OnlyChild]);

        assert_eq!(reported.diagnostics().len(), 1);
        assert!(suppressed.diagnostics().is_empty());
        assert_eq!(reported.build_snapshot(), suppressed.build_snapshot());
    }

    #[test]
    fn test_chain_collapses_and_keeps_branches() {
        // 0 ── 1 ── 2 ─┬─ 3
        //              └─ 4
        let mut morphology = Morphology::new();
        let s0 = morphology.append_root_section(SectionType::Axon, level(&[0.0, 1.0], 1.0)).unwrap();
        let s1 = morphology.append_section(Some(s0), SectionType::Axon, level(&[1.0, 2.0], 1.0)).unwrap();
        let s2 = morphology.append_section(Some(s1), SectionType::Axon, level(&[2.0, 3.0], 1.0)).unwrap();
        morphology.append_section(Some(s2), SectionType::Axon, level(&[3.0, 4.0], 1.0)).unwrap();
        morphology.append_section(Some(s2), SectionType::Axon, level(&[3.0, 5.0], 1.0)).unwrap();

        morphology.sanitize(&DebugInfo::new()).unwrap();

        assert_eq!(morphology.section_count(), 3);
        assert_eq!(morphology.children(s0), &[3, 4]);
        let xs: Vec<f64> = morphology.section(s0).unwrap().points().iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_sections_are_dropped() {
        let mut morphology = Morphology::new();
        let root = morphology.append_root_section(SectionType::Axon, level(&[0.0, 1.0], 1.0)).unwrap();
        let empty = morphology.append_section(Some(root), SectionType::Axon, PointLevel::default()).unwrap();
        morphology.append_section(Some(empty), SectionType::Axon, level(&[1.0, 2.0], 1.0)).unwrap();
        morphology.append_section(Some(empty), SectionType::Axon, level(&[1.0, 3.0], 1.0)).unwrap();

        morphology.sanitize(&DebugInfo::new()).unwrap();

        assert!(morphology.section(empty).is_none());
        assert_eq!(morphology.children(root), &[2, 3]);
        assert!(
            morphology
                .diagnostics()
                .iter()
                .any(|diag| diag.warning_kind() == Some(WarningKind::EmptySection))
        );
    }

    #[test]
    fn test_soma_bifurcation_is_fatal() {
        let mut morphology = Morphology::new();
        let soma = morphology.append_root_section(SectionType::Soma, level(&[0.0, 1.0], 1.0)).unwrap();
        morphology.append_section(Some(soma), SectionType::Axon, level(&[1.0, 2.0], 1.0)).unwrap();
        morphology.append_section(Some(soma), SectionType::Axon, level(&[1.0, 3.0], 1.0)).unwrap();

        let err = morphology.sanitize(&DebugInfo::new()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_soma_with_neurite_parent_is_fatal() {
        let mut morphology = Morphology::new();
        let axon = morphology.append_root_section(SectionType::Axon, level(&[0.0, 1.0], 1.0)).unwrap();
        morphology.append_section(Some(axon), SectionType::Soma, level(&[1.0, 2.0], 1.0)).unwrap();
        let mut debug_info = DebugInfo::new();
        debug_info.set_line(1, 8);

        let err = morphology.sanitize(&debug_info).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E203));
        assert_eq!(err.line(), Some(8));
    }
}
