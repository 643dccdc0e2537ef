//! Example: Building a morphology in code
//!
//! This example demonstrates how to assemble a section tree directly,
//! without parsing ASC text, then repair, normalize and freeze it.

use arbor::{
    debug_info::DebugInfo,
    mutable::Morphology,
    options::{Modifier, Options},
    point_level::PointLevel,
    soma::Soma,
    types::{SectionType, SomaType},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building morphology in code...\n");

    let mut morphology = Morphology::new();

    // A three point soma contour
    *morphology.soma_mut() = Soma::new(
        SomaType::SimpleContour,
        PointLevel::from_points(
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]],
            vec![1.0, 1.0, 1.0],
        )?,
    );

    // A dendrite trunk with two branches
    let trunk = morphology.append_root_section(
        SectionType::BasalDendrite,
        PointLevel::from_points(vec![[0.0, 1.0, 0.0], [0.0, 5.0, 0.0]], vec![2.0, 2.0])?,
    )?;
    for x in [-3.0, 3.0] {
        morphology.append_section(
            Some(trunk),
            SectionType::BasalDendrite,
            PointLevel::from_points(vec![[0.0, 5.0, 0.0], [x, 9.0, 0.0]], vec![1.0, 1.0])?,
        )?;
    }

    // An axon with a single continuation, merged away by the sanitizer
    let axon = morphology.append_root_section(
        SectionType::Axon,
        PointLevel::from_points(vec![[0.0, -1.0, 0.0], [0.0, -4.0, 0.0]], vec![1.0, 1.0])?,
    )?;
    morphology.append_section(
        Some(axon),
        SectionType::Axon,
        PointLevel::from_points(vec![[0.0, -4.0, 0.0], [0.0, -8.0, 0.0]], vec![0.5, 0.5])?,
    )?;

    println!("Built {} sections", morphology.section_count());

    morphology.sanitize(&DebugInfo::new())?;
    for diag in morphology.take_diagnostics() {
        println!("  {diag}");
    }

    let options: Options = [Modifier::SomaSphere, Modifier::NrnOrder].into_iter().collect();
    morphology.apply_modifiers(options)?;

    let frozen = morphology.build_snapshot();
    println!(
        "\nFrozen: {} sections, {} points, soma {}",
        frozen.section_count(),
        frozen.points().len(),
        frozen.soma().soma_type()
    );

    println!("\nDepth-first:");
    for section in frozen.sections() {
        println!(
            "  {} {} parent={:?} points={}",
            section.id(),
            section.section_type(),
            section.parent_id(),
            section.points().len()
        );
    }

    Ok(())
}
