//! Per-point attributes of a section or soma.

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    types::{Float, Point},
};

/// Points with their parallel diameters and optional perimeters.
///
/// `diameters` always has the length of `points`; `perimeters` is either
/// empty or has the length of `points` too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLevel {
    points: Vec<Point>,
    diameters: Vec<Float>,
    perimeters: Vec<Float>,
}

impl PointLevel {
    /// Creates point level data, checking that the vectors line up.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E205`] diagnostic when `diameters` or a
    /// non-empty `perimeters` differ in length from `points`.
    pub fn new(points: Vec<Point>, diameters: Vec<Float>, perimeters: Vec<Float>) -> Result<Self> {
        check_lengths("points", points.len(), "diameters", diameters.len())?;
        if !perimeters.is_empty() {
            check_lengths("points", points.len(), "perimeters", perimeters.len())?;
        }
        Ok(Self {
            points,
            diameters,
            perimeters,
        })
    }

    /// Creates point level data without perimeters.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E205`] diagnostic when the lengths differ.
    pub fn from_points(points: Vec<Point>, diameters: Vec<Float>) -> Result<Self> {
        Self::new(points, diameters, Vec::new())
    }

    /// Copies slices that are already known to line up.
    pub(crate) fn from_slices(points: &[Point], diameters: &[Float], perimeters: &[Float]) -> Self {
        debug_assert_eq!(points.len(), diameters.len());
        Self {
            points: points.to_vec(),
            diameters: diameters.to_vec(),
            perimeters: perimeters.to_vec(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn diameters(&self) -> &[Float] {
        &self.diameters
    }

    pub fn perimeters(&self) -> &[Float] {
        &self.perimeters
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_perimeters(&self) -> bool {
        !self.perimeters.is_empty()
    }

    pub fn first_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Inserts a sample before the first point.
    ///
    /// The perimeter of an existing first sample is repeated so that the
    /// perimeters stay parallel to the points.
    pub fn prepend(&mut self, point: Point, diameter: Float) {
        if let Some(&perimeter) = self.perimeters.first() {
            self.perimeters.insert(0, perimeter);
        }
        self.points.insert(0, point);
        self.diameters.insert(0, diameter);
    }

    /// Appends `other` after the last point, skipping its first `skip` samples.
    ///
    /// Perimeters are kept only when both sides carry them.
    pub fn extend_from(&mut self, other: &PointLevel, skip: usize) {
        let skip = skip.min(other.len());
        let keep_perimeters = (self.has_perimeters() || self.is_empty()) && other.has_perimeters();
        self.points.extend_from_slice(&other.points[skip..]);
        self.diameters.extend_from_slice(&other.diameters[skip..]);
        if keep_perimeters {
            self.perimeters.extend_from_slice(&other.perimeters[skip..]);
        } else {
            self.perimeters.clear();
        }
    }

    /// Keeps only the samples whose index satisfies `keep`.
    pub fn retain_indices(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let indices: Vec<usize> = (0..self.len()).filter(|&index| keep(index)).collect();
        self.points = indices.iter().map(|&i| self.points[i]).collect();
        self.diameters = indices.iter().map(|&i| self.diameters[i]).collect();
        if self.has_perimeters() {
            self.perimeters = indices.iter().map(|&i| self.perimeters[i]).collect();
        }
    }

    /// Replaces the content with a single sample.
    pub fn set_single(&mut self, point: Point, diameter: Float) {
        self.points = vec![point];
        self.diameters = vec![diameter];
        self.perimeters.clear();
    }
}

fn check_lengths(name1: &str, len1: usize, name2: &str, len2: usize) -> Result<()> {
    if len1 == len2 {
        return Ok(());
    }

    let mut diag = Diagnostic::error(format!(
        "vector length mismatch: length of {name1} is {len1}, length of {name2} is {len2}"
    ))
    .with_code(ErrorCode::E205);
    if len1 == 0 || len2 == 0 {
        let empty = if len1 == 0 { name1 } else { name2 };
        diag = diag.with_help(format!("did you forget to fill `{empty}`?"));
    }
    Err(diag)
}
