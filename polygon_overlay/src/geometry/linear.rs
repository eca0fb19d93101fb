use crate::core::{math::Vector2, traits::Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Open sequence of connected segments.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineString<T = f64> {
    pub points: Vec<Vector2<T>>,
}

impl<T> LineString<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Vector2<T>>) -> Self {
        Self { points }
    }

    pub fn add(&mut self, x: T, y: T) {
        self.points.push(Vector2::new(x, y));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> T {
        self.points
            .windows(2)
            .fold(T::zero(), |acc, w| acc + (w[1] - w[0]).length())
    }
}

/// Collection of line strings, the output container of linear clipping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MultiLineString<T = f64> {
    pub line_strings: Vec<LineString<T>>,
}

impl<T> MultiLineString<T>
where
    T: Real,
{
    pub fn new(line_strings: Vec<LineString<T>>) -> Self {
        Self { line_strings }
    }

    pub fn len(&self) -> usize {
        self.line_strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_strings.is_empty()
    }

    pub fn length(&self) -> T {
        self.line_strings
            .iter()
            .fold(T::zero(), |acc, ls| acc + ls.length())
    }
}

impl<T> Extend<LineString<T>> for MultiLineString<T> {
    fn extend<I: IntoIterator<Item = LineString<T>>>(&mut self, iter: I) {
        self.line_strings.extend(iter);
    }
}
