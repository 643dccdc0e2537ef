//! Basic value types shared by every morphology representation.
//!
//! This module defines the scalar and point types, the morphological
//! classification of sections ([`SectionType`]), the soma classification
//! ([`SomaType`]) and the cell family ([`CellFamily`]) that constrains which
//! section types a morphology may contain.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Floating point type used for coordinates, diameters and perimeters.
pub type Float = f64;

/// A point in 3D space, `[x, y, z]`.
pub type Point = [Float; 3];

/// Stable identifier of a section inside one morphology.
pub type SectionId = u32;

/// Absolute tolerance used when comparing points for equality.
pub const POINT_TOLERANCE: Float = 1e-6;

/// Returns `true` if the two points are equal within [`POINT_TOLERANCE`].
pub fn points_equal(a: &Point, b: &Point) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(lhs, rhs)| (lhs - rhs).abs() <= POINT_TOLERANCE)
}

/// Error returned when a kebab-case name does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{name}`")]
pub struct UnknownNameError {
    kind: &'static str,
    name: String,
}

impl UnknownNameError {
    pub(crate) fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// The name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Morphological classification of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionType {
    /// Cell body. Only legal as a section in programmatically built trees.
    Soma,
    Axon,
    /// General or basal dendrite (near to the soma).
    BasalDendrite,
    /// Apical dendrite (far from the soma).
    ApicalDendrite,
    /// Glial process.
    GlialProcess,
    /// Glial perivascular endfoot.
    GlialPerivascular,
    /// Custom type following the neuromorpho.org numbering (`>= 5`).
    Custom(u32),
}

impl SectionType {
    /// First number available for [`SectionType::Custom`].
    pub const CUSTOM_START: u32 = 5;

    /// Returns `true` for neurite types (everything except the soma).
    pub fn is_neurite(&self) -> bool {
        !matches!(self, SectionType::Soma)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Soma => write!(f, "soma"),
            SectionType::Axon => write!(f, "axon"),
            SectionType::BasalDendrite => write!(f, "basal-dendrite"),
            SectionType::ApicalDendrite => write!(f, "apical-dendrite"),
            SectionType::GlialProcess => write!(f, "glial-process"),
            SectionType::GlialPerivascular => write!(f, "glial-perivascular"),
            SectionType::Custom(n) => write!(f, "custom-{n}"),
        }
    }
}

/// Classification of the soma representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SomaType {
    /// No soma points, or a representation that could not be classified.
    #[default]
    Undefined,
    SinglePoint,
    /// The NeuroMorpho three point cylinder convention.
    ThreePointCylinders,
    /// A chain of cylinders.
    Cylinders,
    /// A closed contour in the XY plane.
    SimpleContour,
}

impl SomaType {
    /// Classifies a soma read from a contour based file by its point count.
    pub fn from_contour_len(len: usize) -> Self {
        match len {
            0 => SomaType::Undefined,
            1 => SomaType::SinglePoint,
            _ => SomaType::SimpleContour,
        }
    }
}

impl fmt::Display for SomaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SomaType::Undefined => write!(f, "undefined"),
            SomaType::SinglePoint => write!(f, "single-point"),
            SomaType::ThreePointCylinders => write!(f, "three-point-cylinders"),
            SomaType::Cylinders => write!(f, "cylinders"),
            SomaType::SimpleContour => write!(f, "simple-contour"),
        }
    }
}

/// The cell family of a morphology.
///
/// The family decides which [`SectionType`]s may appear in the section tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellFamily {
    #[default]
    Neuron,
    Glia,
}

impl CellFamily {
    /// Returns `true` if sections of `section_type` are legal in this family.
    pub fn accepts(&self, section_type: SectionType) -> bool {
        match self {
            CellFamily::Neuron => matches!(
                section_type,
                SectionType::Soma
                    | SectionType::Axon
                    | SectionType::BasalDendrite
                    | SectionType::ApicalDendrite
                    | SectionType::Custom(_)
            ),
            CellFamily::Glia => matches!(
                section_type,
                SectionType::Soma | SectionType::GlialProcess | SectionType::GlialPerivascular
            ),
        }
    }
}

impl fmt::Display for CellFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFamily::Neuron => write!(f, "neuron"),
            CellFamily::Glia => write!(f, "glia"),
        }
    }
}

impl FromStr for CellFamily {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neuron" => Ok(CellFamily::Neuron),
            "glia" => Ok(CellFamily::Glia),
            other => Err(UnknownNameError::new("cell family", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_equal_within_tolerance() {
        assert!(points_equal(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0 + 1e-7]));
        assert!(!points_equal(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.001]));
    }

    #[test]
    fn test_family_accepts() {
        assert!(CellFamily::Neuron.accepts(SectionType::Axon));
        assert!(CellFamily::Neuron.accepts(SectionType::Custom(7)));
        assert!(!CellFamily::Neuron.accepts(SectionType::GlialProcess));
        assert!(CellFamily::Glia.accepts(SectionType::GlialPerivascular));
        assert!(!CellFamily::Glia.accepts(SectionType::ApicalDendrite));
    }

    #[test]
    fn test_soma_type_from_contour_len() {
        assert_eq!(SomaType::from_contour_len(0), SomaType::Undefined);
        assert_eq!(SomaType::from_contour_len(1), SomaType::SinglePoint);
        assert_eq!(SomaType::from_contour_len(4), SomaType::SimpleContour);
    }

    #[test]
    fn test_cell_family_from_str() {
        assert_eq!("glia".parse::<CellFamily>(), Ok(CellFamily::Glia));
        let err = "astrocyte".parse::<CellFamily>().unwrap_err();
        assert_eq!(err.name(), "astrocyte");
        assert_eq!(err.to_string(), "unknown cell family `astrocyte`");
    }
}
