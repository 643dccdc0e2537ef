//! The cell body.

use crate::{
    point_level::PointLevel,
    types::{Float, Point, SomaType},
};

/// The distinguished cell body of a morphology.
///
/// The soma is not part of the section graph. A morphology has exactly one,
/// possibly without points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Soma {
    soma_type: SomaType,
    data: PointLevel,
}

impl Soma {
    pub fn new(soma_type: SomaType, data: PointLevel) -> Self {
        Self { soma_type, data }
    }

    pub fn soma_type(&self) -> SomaType {
        self.soma_type
    }

    pub fn set_soma_type(&mut self, soma_type: SomaType) {
        self.soma_type = soma_type;
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

    pub fn point_level_mut(&mut self) -> &mut PointLevel {
        &mut self.data
    }

    /// Returns `true` if the soma has no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The centroid of the soma points, or `None` for an empty soma.
    pub fn center(&self) -> Option<Point> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }

        let n = points.len() as Float;
        let mut sum = [0.0; 3];
        for point in points {
            for (acc, coord) in sum.iter_mut().zip(point) {
                *acc += coord;
            }
        }
        Some(sum.map(|coord| coord / n))
    }

    /// Mean distance from the points to the centroid.
    pub fn mean_radius(&self) -> Option<Float> {
        let center = self.center()?;
        let points = self.points();
        let total: Float = points.iter().map(|point| distance(point, &center)).sum();
        Some(total / points.len() as Float)
    }
}

fn distance(a: &Point, b: &Point) -> Float {
    a.iter()
        .zip(b)
        .map(|(lhs, rhs)| (lhs - rhs) * (lhs - rhs))
        .sum::<Float>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn square_soma() -> Soma {
        let points = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]];
        let data = PointLevel::from_points(points, vec![0.0; 4]).unwrap();
        Soma::new(SomaType::SimpleContour, data)
    }

    #[test]
    fn test_center_and_radius() {
        let soma = square_soma();
        let center = soma.center().unwrap();

        for coord in center {
            assert_approx_eq!(f64, coord, 0.0);
        }
        assert_approx_eq!(f64, soma.mean_radius().unwrap(), 1.0);
    }

    #[test]
    fn test_empty_soma_has_no_center() {
        let soma = Soma::default();

        assert!(soma.is_empty());
        assert_eq!(soma.soma_type(), SomaType::Undefined);
        assert!(soma.center().is_none());
    }
}
