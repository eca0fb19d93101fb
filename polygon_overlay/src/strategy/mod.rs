//! Pluggable predicates used by the overlay engine.
//!
//! The engine never computes a side, a segment intersection or a point location directly, it asks
//! the [OverlayStrategy] passed into the overlay entry point. [CartesianStrategy] is the planar
//! implementation.
mod cartesian;

pub use cartesian::CartesianStrategy;

use crate::{
    core::{
        math::{SegmentIntersection, Vector2},
        traits::Real,
    },
    geometry::Geometry,
};

/// Location of a point relative to a single ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RingLocation {
    /// Point lies on the ring boundary (within tolerance).
    OnBoundary,
    /// Winding number of the ring around the point (0 means outside, sign follows orientation).
    Winding(i32),
}

/// Location of a point relative to an areal geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    OnBoundary,
}

impl Location {
    /// Location relative to the complement of the geometry.
    pub fn complement(self) -> Self {
        match self {
            Location::Inside => Location::Outside,
            Location::Outside => Location::Inside,
            Location::OnBoundary => Location::OnBoundary,
        }
    }
}

/// Combines ring locations of one polygon (exterior first, then holes) into a location.
pub fn polygon_location<I>(exterior: RingLocation, holes: I) -> Location
where
    I: IntoIterator<Item = RingLocation>,
{
    match exterior {
        RingLocation::OnBoundary => return Location::OnBoundary,
        RingLocation::Winding(0) => return Location::Outside,
        RingLocation::Winding(_) => {}
    }

    for hole in holes {
        match hole {
            RingLocation::OnBoundary => return Location::OnBoundary,
            RingLocation::Winding(0) => {}
            RingLocation::Winding(_) => return Location::Outside,
        }
    }

    Location::Inside
}

/// Capability set the overlay engine needs from a coordinate system.
pub trait OverlayStrategy<T>
where
    T: Real,
{
    /// Tolerance used by the predicates of this strategy.
    fn epsilon(&self) -> T;

    /// Side of `p` relative to the directed line `p1 -> p2`: `1` left, `-1` right, `0` collinear.
    fn side(&self, p1: Vector2<T>, p2: Vector2<T>, p: Vector2<T>) -> i32;

    /// Intersection of segment `a1 -> a2` with segment `b1 -> b2`.
    fn segment_intersection(
        &self,
        a1: Vector2<T>,
        a2: Vector2<T>,
        b1: Vector2<T>,
        b2: Vector2<T>,
    ) -> SegmentIntersection<T>;

    /// Location of `point` relative to the closed ring `ring` (closing segment implied).
    fn locate_in_ring(&self, point: Vector2<T>, ring: &[Vector2<T>]) -> RingLocation;

    /// Location of `point` relative to an areal geometry. A point is inside when it is inside any
    /// member polygon (inside its exterior and outside all of its holes). Linear geometries enclose
    /// nothing so every point is outside.
    fn locate_in_geometry(&self, point: Vector2<T>, geometry: &Geometry<T>) -> Location {
        let mut result = Location::Outside;
        let mut current: Option<(usize, RingLocation, Vec<RingLocation>)> = None;
        let finish = |entry: Option<(usize, RingLocation, Vec<RingLocation>)>,
                          result: &mut Location| {
            if let Some((_, exterior, holes)) = entry {
                match polygon_location(exterior, holes) {
                    Location::OnBoundary => *result = Location::OnBoundary,
                    Location::Inside if *result != Location::OnBoundary => {
                        *result = Location::Inside
                    }
                    _ => {}
                }
            }
        };

        geometry.for_each_ring(|multi_index, ring_index, points| {
            let location = self.locate_in_ring(point, points);
            match ring_index {
                None => {
                    let previous = current.replace((multi_index, location, Vec::new()));
                    finish(previous, &mut result);
                }
                Some(_) => {
                    if let Some((_, _, holes)) = current.as_mut() {
                        holes.push(location);
                    }
                }
            }
        });
        finish(current, &mut result);

        result
    }
}
