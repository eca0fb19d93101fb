//! Geometry types consumed and produced by the overlay engine.
//!
//! [Geometry] is the closed sum type over the supported kinds. The overlay engine only sees a
//! uniform sequence of rings (or line strings) produced by [Geometry::for_each_ring] and
//! [Geometry::for_each_line_string].
mod linear;
mod polygon;
mod ring;

pub use linear::*;
pub use polygon::*;
pub use ring::*;

use crate::core::{math::Vector2, traits::Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotational direction of a ring.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RingOrientation {
    Clockwise,
    CounterClockwise,
}

impl RingOrientation {
    pub fn opposite(self) -> Self {
        match self {
            RingOrientation::Clockwise => RingOrientation::CounterClockwise,
            RingOrientation::CounterClockwise => RingOrientation::Clockwise,
        }
    }
}

/// Whether output rings repeat their first point at the end.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClosureConvention {
    /// Last point repeats the first point.
    Closed,
    /// Closing segment is implied.
    Open,
}

/// Kind of geometry, used for dispatch and error reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Ring,
    Polygon,
    MultiPolygon,
    Rect,
    LineString,
    MultiLineString,
}

/// Any geometry the overlay engine accepts as input.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry<T = f64> {
    Ring(Ring<T>),
    Polygon(Polygon<T>),
    MultiPolygon(MultiPolygon<T>),
    Rect(Rect<T>),
    LineString(LineString<T>),
    MultiLineString(MultiLineString<T>),
}

impl<T> Geometry<T>
where
    T: Real,
{
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Ring(_) => GeometryKind::Ring,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::Rect(_) => GeometryKind::Rect,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
        }
    }

    /// `true` for kinds that enclose area.
    pub fn is_areal(&self) -> bool {
        !self.is_linear()
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }

    /// Enclosed area, zero for linear geometries.
    pub fn area(&self) -> T {
        match self {
            Geometry::Ring(r) => r.area(),
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(mp) => mp.area(),
            Geometry::Rect(r) => r.area(),
            Geometry::LineString(_) | Geometry::MultiLineString(_) => T::zero(),
        }
    }

    /// Visit every ring of an areal geometry as `(multi_index, ring_index, points)` where
    /// `ring_index` is `None` for exterior rings. Linear geometries visit nothing.
    pub fn for_each_ring<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, Option<usize>, &[Vector2<T>]),
    {
        let mut visit_polygon = |multi_index: usize, polygon: &Polygon<T>| {
            visitor(multi_index, None, &polygon.exterior.points);
            for (i, hole) in polygon.interiors.iter().enumerate() {
                visitor(multi_index, Some(i), &hole.points);
            }
        };

        match self {
            Geometry::Ring(r) => visit_polygon(0, &Polygon::from(r.clone())),
            Geometry::Polygon(p) => visit_polygon(0, p),
            Geometry::MultiPolygon(mp) => {
                for (i, p) in mp.polygons.iter().enumerate() {
                    visit_polygon(i, p);
                }
            }
            Geometry::Rect(r) => visit_polygon(0, &Polygon::from(r.to_ring())),
            Geometry::LineString(_) | Geometry::MultiLineString(_) => {}
        }
    }

    /// Visit every line string of a linear geometry as `(multi_index, points)`. Areal geometries
    /// visit nothing.
    pub fn for_each_line_string<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &[Vector2<T>]),
    {
        match self {
            Geometry::LineString(ls) => visitor(0, &ls.points),
            Geometry::MultiLineString(mls) => {
                for (i, ls) in mls.line_strings.iter().enumerate() {
                    visitor(i, &ls.points);
                }
            }
            _ => {}
        }
    }

    /// Visit every coordinate of the geometry.
    pub fn for_each_point<F>(&self, mut visitor: F)
    where
        F: FnMut(Vector2<T>),
    {
        self.for_each_ring(|_, _, points| points.iter().for_each(|&p| visitor(p)));
        self.for_each_line_string(|_, points| points.iter().for_each(|&p| visitor(p)));
    }
}

macro_rules! impl_from_geometry {
    ($ty:ident) => {
        impl<T> From<$ty<T>> for Geometry<T> {
            fn from(g: $ty<T>) -> Self {
                Geometry::$ty(g)
            }
        }
    };
}

impl_from_geometry!(Ring);
impl_from_geometry!(Polygon);
impl_from_geometry!(MultiPolygon);
impl_from_geometry!(Rect);
impl_from_geometry!(LineString);
impl_from_geometry!(MultiLineString);
