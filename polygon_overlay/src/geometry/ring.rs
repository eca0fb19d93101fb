use crate::core::{
    math::{max_abs_coordinate, ring_perimeter, signed_area, Vector2},
    traits::Real,
};
use num_traits::Float;
use static_aabb2d_index::AABB;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RingOrientation;

/// Closed ring of points. The closing segment from the last point back to the first is implied,
/// an explicitly repeated closing point is accepted and ignored by all measures.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ring<T = f64> {
    pub points: Vec<Vector2<T>>,
}

impl<T> Ring<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn from_points(points: Vec<Vector2<T>>) -> Self {
        Self { points }
    }

    /// Add a point to the end of the ring.
    pub fn add(&mut self, x: T, y: T) {
        self.points.push(Vector2::new(x, y));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `true` if the last point repeats the first point exactly.
    pub fn has_closing_point(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Points without an explicit closing point.
    pub fn open_points(&self) -> &[Vector2<T>] {
        if self.has_closing_point() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    /// Points with the first point repeated at the end.
    pub fn closed_points(&self) -> Vec<Vector2<T>> {
        let open = self.open_points();
        let mut result = Vec::with_capacity(open.len() + 1);
        result.extend_from_slice(open);
        if let Some(&first) = open.first() {
            result.push(first);
        }
        result
    }

    /// Signed area, positive for counter clockwise rings.
    pub fn signed_area(&self) -> T {
        signed_area(self.open_points())
    }

    pub fn area(&self) -> T {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> T {
        ring_perimeter(self.open_points())
    }

    /// Orientation by the sign of the area, `None` for rings with zero area.
    pub fn orientation(&self) -> Option<RingOrientation> {
        let a = self.signed_area();
        if a > T::zero() {
            Some(RingOrientation::CounterClockwise)
        } else if a < T::zero() {
            Some(RingOrientation::Clockwise)
        } else {
            None
        }
    }

    /// Copy of this ring with the point order reversed.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Bounding box of the ring, `None` if empty.
    pub fn extents(&self) -> Option<AABB<T>> {
        extents_of(&self.points)
    }

    /// Largest absolute coordinate, used to scale tolerances.
    pub fn max_abs_coordinate(&self) -> T {
        max_abs_coordinate(&self.points)
    }
}

/// Bounding box of a point slice, `None` if empty.
pub fn extents_of<T>(points: &[Vector2<T>]) -> Option<AABB<T>>
where
    T: Real,
{
    let first = points.first()?;
    let mut result = AABB::new(first.x, first.y, first.x, first.y);
    for p in points.iter().skip(1) {
        result.min_x = Float::min(result.min_x, p.x);
        result.min_y = Float::min(result.min_y, p.y);
        result.max_x = Float::max(result.max_x, p.x);
        result.max_y = Float::max(result.max_y, p.y);
    }

    Some(result)
}

impl<T> From<Vec<Vector2<T>>> for Ring<T>
where
    T: Real,
{
    fn from(points: Vec<Vector2<T>>) -> Self {
        Ring::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring;

    #[test]
    fn closing_point_is_ignored() {
        let open = ring![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)];
        let closed = ring![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)];
        assert!(!open.has_closing_point());
        assert!(closed.has_closing_point());
        assert_eq!(open.signed_area(), closed.signed_area());
        assert_eq!(open.signed_area(), -4.0);
        assert_eq!(open.orientation(), Some(RingOrientation::Clockwise));
        assert_eq!(closed.open_points().len(), 4);
        assert_eq!(open.closed_points().len(), 5);
        assert_eq!(open.perimeter(), 8.0);
    }

    #[test]
    fn extents() {
        let r = ring![(1.0, -1.0), (3.0, 2.0), (-2.0, 0.5)];
        let bb = r.extents().unwrap();
        assert_eq!(
            (bb.min_x, bb.min_y, bb.max_x, bb.max_y),
            (-2.0, -1.0, 3.0, 2.0)
        );
        assert!(Ring::<f64>::new().extents().is_none());
        assert_eq!(r.reversed().signed_area(), -r.signed_area());
    }
}
