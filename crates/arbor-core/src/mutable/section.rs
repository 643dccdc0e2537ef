use crate::{
    point_level::PointLevel,
    types::{Float, Point, SectionId, SectionType},
};

/// An editable unbranched polyline.
///
/// A section does not know its parent or children; the owning
/// [`Morphology`](super::Morphology) keeps those relations by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    section_type: SectionType,
    data: PointLevel,
}

impl Section {
    pub(super) fn new(id: SectionId, section_type: SectionType, data: PointLevel) -> Self {
        Self {
            id,
            section_type,
            data,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    pub fn set_section_type(&mut self, section_type: SectionType) {
        self.section_type = section_type;
    }

    pub fn points(&self) -> &[Point] {
        self.data.points()
    }

    pub fn diameters(&self) -> &[Float] {
        self.data.diameters()
    }

    pub fn perimeters(&self) -> &[Float] {
        self.data.perimeters()
    }

    pub fn point_level(&self) -> &PointLevel {
        &self.data
    }

    pub fn point_level_mut(&mut self) -> &mut PointLevel {
        &mut self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
