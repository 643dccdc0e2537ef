//! Plain text report of a loaded morphology.

use std::fmt;

use arbor::{Loaded, immutable::Morphology, types::SectionId};

use crate::args::Traversal;

/// Summary of a loaded morphology, optionally followed by a section listing.
///
/// ```text
/// family: neuron
/// soma: simple-contour (4 points)
/// sections: 3 (2 roots)
/// points: 9
/// markers: 1
/// ```
pub struct Report<'a> {
    loaded: &'a Loaded,
    traversal: Option<Traversal>,
}

impl<'a> Report<'a> {
    pub fn new(loaded: &'a Loaded, traversal: Option<Traversal>) -> Self {
        Self { loaded, traversal }
    }

    fn write_sections(&self, f: &mut fmt::Formatter<'_>, traversal: Traversal) -> fmt::Result {
        let morphology = self.loaded.morphology();
        let order: Vec<SectionId> = match traversal {
            Traversal::Depth => morphology.depth_iter(None).collect(),
            Traversal::Breadth => morphology.breadth_iter(None).collect(),
        };

        let name = match traversal {
            Traversal::Depth => "depth-first",
            Traversal::Breadth => "breadth-first",
        };
        writeln!(f, "sections ({name}):")?;
        for id in order {
            write_section(f, morphology, id)?;
        }
        Ok(())
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, morphology: &Morphology, id: SectionId) -> fmt::Result {
    let Some(section) = morphology.section(id) else {
        return Ok(());
    };
    let parent = section
        .parent_id()
        .map_or_else(|| "-".to_string(), |parent| parent.to_string());
    writeln!(
        f,
        "  {id} {} parent={parent} points={}",
        section.section_type(),
        section.points().len()
    )
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let morphology = self.loaded.morphology();
        let soma = morphology.soma();

        writeln!(f, "family: {}", morphology.family())?;
        writeln!(f, "soma: {} ({} points)", soma.soma_type(), soma.points().len())?;
        writeln!(
            f,
            "sections: {} ({} roots)",
            morphology.section_count(),
            morphology.root_ids().len()
        )?;
        writeln!(f, "points: {}", morphology.points().len())?;
        writeln!(f, "markers: {}", morphology.markers().len())?;

        if let Some(traversal) = self.traversal {
            self.write_sections(f, traversal)?;
        }

        let diagnostics = self.loaded.diagnostics();
        if !diagnostics.is_empty() {
            writeln!(f, "diagnostics:")?;
            for diag in diagnostics {
                writeln!(f, "  {diag}")?;
            }
        }
        Ok(())
    }
}
