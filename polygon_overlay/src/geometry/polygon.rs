use super::Ring;
use crate::core::{math::Vector2, traits::Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Polygon with one exterior ring and zero or more holes.
///
/// Input polygons may use either orientation, the overlay engine normalizes orientation itself.
/// Output polygons follow
/// [OverlayOptions::output_orientation](crate::overlay::OverlayOptions::output_orientation).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polygon<T = f64> {
    pub exterior: Ring<T>,
    pub interiors: Vec<Ring<T>>,
}

impl<T> Polygon<T>
where
    T: Real,
{
    pub fn new(exterior: Ring<T>, interiors: Vec<Ring<T>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Area enclosed by the exterior minus the area of the holes (orientation independent).
    pub fn area(&self) -> T {
        self.interiors
            .iter()
            .fold(self.exterior.area(), |acc, hole| acc - hole.area())
    }

    /// Total number of rings (exterior plus holes).
    pub fn ring_count(&self) -> usize {
        1 + self.interiors.len()
    }
}

impl<T> From<Ring<T>> for Polygon<T>
where
    T: Real,
{
    fn from(exterior: Ring<T>) -> Self {
        Polygon::new(exterior, Vec::new())
    }
}

/// Collection of polygons, the output container of areal overlay operations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MultiPolygon<T = f64> {
    pub polygons: Vec<Polygon<T>>,
}

impl<T> MultiPolygon<T>
where
    T: Real,
{
    pub fn new(polygons: Vec<Polygon<T>>) -> Self {
        Self { polygons }
    }

    pub fn empty() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn area(&self) -> T {
        self.polygons
            .iter()
            .fold(T::zero(), |acc, polygon| acc + polygon.area())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon<T>> {
        self.polygons.iter()
    }
}

impl<T> Extend<Polygon<T>> for MultiPolygon<T>
where
    T: Real,
{
    fn extend<I: IntoIterator<Item = Polygon<T>>>(&mut self, iter: I) {
        self.polygons.extend(iter);
    }
}

impl<T> IntoIterator for MultiPolygon<T> {
    type Item = Polygon<T>;
    type IntoIter = std::vec::IntoIter<Polygon<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<T> FromIterator<Polygon<T>> for MultiPolygon<T> {
    fn from_iter<I: IntoIterator<Item = Polygon<T>>>(iter: I) -> Self {
        Self {
            polygons: iter.into_iter().collect(),
        }
    }
}

/// Axis aligned box.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect<T = f64> {
    pub min: Vector2<T>,
    pub max: Vector2<T>,
}

impl<T> Rect<T>
where
    T: Real,
{
    pub fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min: Vector2::new(min_x, min_y),
            max: Vector2::new(max_x, max_y),
        }
    }

    pub fn area(&self) -> T {
        ((self.max.x - self.min.x) * (self.max.y - self.min.y)).abs()
    }

    /// Box as a clockwise ring starting at the minimum corner.
    pub fn to_ring(&self) -> Ring<T> {
        Ring::from_points(vec![
            self.min,
            Vector2::new(self.min.x, self.max.y),
            self.max,
            Vector2::new(self.max.x, self.min.y),
        ])
    }
}
