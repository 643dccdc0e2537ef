//! Labeled annotations kept outside the section tree.

use crate::{
    point_level::PointLevel,
    types::{Float, Point},
};

/// A labeled group of points that is not part of the neuron itself.
///
/// Markers come from top-level groups with a quoted label such as
/// `("Marker 3" (1 2 3 0.5))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    label: String,
    data: PointLevel,
}

impl Marker {
    pub fn new(label: impl Into<String>, data: PointLevel) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[Point] {
        self.data.points()
    }

    pub fn diameters(&self) -> &[Float] {
        self.data.diameters()
    }

    pub fn point_level(&self) -> &PointLevel {
        &self.data
    }
}
