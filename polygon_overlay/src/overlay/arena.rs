//! Flattened, normalized storage of every ring taking part in one overlay call.
use super::segment_id::{RingId, SegmentId};
use crate::{
    core::{
        math::{ring_perimeter, signed_area, Vector2},
        traits::Real,
    },
    geometry::{extents_of, Geometry},
    strategy::{polygon_location, Location, OverlayStrategy},
};
use static_aabb2d_index::AABB;
use std::{collections::BTreeMap, ops::Range};

/// One ring (or line string) stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaRing {
    pub id: RingId,
    /// Offset of the first vertex in the arena point buffer.
    pub start: usize,
    /// Vertex count, closing vertex is never stored.
    pub len: usize,
    /// `false` for line strings (no closing segment).
    pub closed: bool,
}

impl ArenaRing {
    /// Number of segments, including the implied closing segment of rings.
    #[inline]
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.len
        } else {
            self.len.saturating_sub(1)
        }
    }
}

/// Rings of (up to) two input geometries in the internal convention: exterior rings clockwise,
/// holes counter clockwise, interior always on the right of every directed segment. A reversed
/// source is stored with every ring flipped, so its complement is on the right.
#[derive(Debug, Clone)]
pub struct RingArena<T = f64> {
    points: Vec<Vector2<T>>,
    rings: Vec<ArenaRing>,
    lookup: BTreeMap<RingId, usize>,
    source_rings: [Range<usize>; 2],
    source_extents: [Option<AABB<T>>; 2],
    reversed: [bool; 2],
    areal: [bool; 2],
}

impl<T> RingArena<T>
where
    T: Real,
{
    /// Build the arena for `geometry1` and `geometry2`.
    ///
    /// Consecutive points within `pos_equal_eps` are merged and a duplicated closing point is
    /// dropped. Areal rings with less than 3 distinct points or with an area not exceeding
    /// `pos_equal_eps * perimeter` are left out entirely (along with the holes of such an exterior),
    /// as are line strings with less than 2 distinct points.
    pub fn new(
        geometry1: &Geometry<T>,
        geometry2: &Geometry<T>,
        reversed: [bool; 2],
        pos_equal_eps: T,
    ) -> Self {
        let mut arena = Self::empty(reversed);
        arena.add_source(0, geometry1, pos_equal_eps);
        arena.add_source(1, geometry2, pos_equal_eps);
        arena
    }

    /// Arena holding a single geometry as source 0 (used for self turn finding).
    pub fn single(geometry: &Geometry<T>, pos_equal_eps: T) -> Self {
        let mut arena = Self::empty([false, false]);
        arena.add_source(0, geometry, pos_equal_eps);
        arena.source_rings[1] = arena.rings.len()..arena.rings.len();
        arena
    }

    fn empty(reversed: [bool; 2]) -> Self {
        Self {
            points: Vec::new(),
            rings: Vec::new(),
            lookup: BTreeMap::new(),
            source_rings: [0..0, 0..0],
            source_extents: [None, None],
            reversed,
            areal: [false, false],
        }
    }

    fn add_source(&mut self, source_index: usize, geometry: &Geometry<T>, pos_equal_eps: T) {
        let first_ring = self.rings.len();
        self.areal[source_index] = geometry.is_areal();

        let mut scratch = Vec::new();
        let mut skipped_multi = None;
        let reversed = self.reversed[source_index];
        geometry.for_each_ring(|multi_index, ring_index, points| {
            if ring_index.is_some() && skipped_multi == Some(multi_index) {
                return;
            }

            clean_ring_points(points, pos_equal_eps, true, &mut scratch);
            let area = signed_area(&scratch);
            if scratch.len() < 3 || area.abs() <= pos_equal_eps * ring_perimeter(&scratch) {
                log::debug!(
                    "skipping degenerate ring {:?} of input geometry {}",
                    (multi_index, ring_index),
                    source_index
                );
                if ring_index.is_none() {
                    skipped_multi = Some(multi_index);
                }
                return;
            }

            // exterior clockwise (negative area), holes counter clockwise (positive area)
            let wrong_orientation = match ring_index {
                None => area > T::zero(),
                Some(_) => area < T::zero(),
            };
            if wrong_orientation != reversed {
                scratch.reverse();
            }

            self.push_ring(
                RingId::new(source_index, multi_index, ring_index),
                &scratch,
                true,
            );
        });

        geometry.for_each_line_string(|multi_index, points| {
            clean_ring_points(points, pos_equal_eps, false, &mut scratch);
            if scratch.len() < 2 {
                return;
            }
            self.push_ring(RingId::new(source_index, multi_index, None), &scratch, false);
        });

        let ring_range = first_ring..self.rings.len();
        let start = self.rings.get(first_ring).map_or(self.points.len(), |r| r.start);
        self.source_extents[source_index] = extents_of(&self.points[start..]);
        self.source_rings[source_index] = ring_range;
    }

    fn push_ring(&mut self, id: RingId, points: &[Vector2<T>], closed: bool) {
        self.lookup.insert(id, self.rings.len());
        self.rings.push(ArenaRing {
            id,
            start: self.points.len(),
            len: points.len(),
            closed,
        });
        self.points.extend_from_slice(points);
    }

    /// All rings of the arena, source 0 first.
    #[inline]
    pub fn rings(&self) -> &[ArenaRing] {
        &self.rings
    }

    #[inline]
    pub fn ring(&self, ring: usize) -> &ArenaRing {
        &self.rings[ring]
    }

    /// Arena index range of the rings of `source_index`.
    #[inline]
    pub fn source_rings(&self, source_index: usize) -> Range<usize> {
        self.source_rings[source_index].clone()
    }

    /// Bounding box of all points of `source_index`, `None` if it has no rings.
    #[inline]
    pub fn source_extents(&self, source_index: usize) -> Option<AABB<T>> {
        self.source_extents[source_index]
    }

    #[inline]
    pub fn is_reversed(&self, source_index: usize) -> bool {
        self.reversed[source_index]
    }

    #[inline]
    pub fn is_areal(&self, source_index: usize) -> bool {
        self.areal[source_index]
    }

    /// Arena index of the ring named by `id`.
    #[inline]
    pub fn ring_index(&self, id: RingId) -> Option<usize> {
        self.lookup.get(&id).copied()
    }

    /// Vertices of a ring (closing vertex not repeated).
    #[inline]
    pub fn ring_points(&self, ring: usize) -> &[Vector2<T>] {
        let r = &self.rings[ring];
        &self.points[r.start..r.start + r.len]
    }

    /// Vertex `i` of a ring, wrapping around.
    #[inline]
    pub fn vertex(&self, ring: usize, i: usize) -> Vector2<T> {
        let r = &self.rings[ring];
        self.points[r.start + i % r.len]
    }

    /// Start and end point of a segment.
    pub fn segment_points(&self, seg_id: SegmentId) -> Option<(Vector2<T>, Vector2<T>)> {
        let ring = self.ring_index(seg_id.ring_id())?;
        Some((
            self.vertex(ring, seg_id.segment_index),
            self.vertex(ring, seg_id.segment_index + 1),
        ))
    }

    /// Location of `point` relative to the region described by `source_index` as stored (the
    /// complement of the input geometry when the source is reversed). Line strings enclose
    /// nothing.
    pub fn locate<S>(&self, point: Vector2<T>, source_index: usize, strategy: &S) -> Location
    where
        S: OverlayStrategy<T>,
    {
        let location = self.locate_unreversed(point, source_index, strategy);
        if self.reversed[source_index] {
            location.complement()
        } else {
            location
        }
    }

    fn locate_unreversed<S>(&self, point: Vector2<T>, source_index: usize, strategy: &S) -> Location
    where
        S: OverlayStrategy<T>,
    {
        if !self.areal[source_index] {
            return Location::Outside;
        }

        let eps = strategy.epsilon();
        match self.source_extents[source_index] {
            Some(b)
                if point.x >= b.min_x - eps
                    && point.y >= b.min_y - eps
                    && point.x <= b.max_x + eps
                    && point.y <= b.max_y + eps => {}
            _ => return Location::Outside,
        }

        let range = self.source_rings(source_index);
        let mut result = Location::Outside;
        let mut i = range.start;
        while i < range.end {
            let exterior = i;
            let multi_index = self.rings[exterior].id.multi_index;
            i += 1;
            let holes_start = i;
            while i < range.end
                && self.rings[i].id.multi_index == multi_index
                && self.rings[i].id.ring_index.is_some()
            {
                i += 1;
            }

            let exterior_location = strategy.locate_in_ring(point, self.ring_points(exterior));
            let holes = (holes_start..i).map(|h| strategy.locate_in_ring(point, self.ring_points(h)));
            match polygon_location(exterior_location, holes) {
                Location::OnBoundary => return Location::OnBoundary,
                Location::Inside => result = Location::Inside,
                Location::Outside => {}
            }
        }

        result
    }
}

/// Copy `points` into `out` dropping consecutive repeats (within `eps`) and, for rings, a trailing
/// copy of the first point.
pub fn clean_ring_points<T>(points: &[Vector2<T>], eps: T, closed: bool, out: &mut Vec<Vector2<T>>)
where
    T: Real,
{
    out.clear();
    for &p in points {
        push_point_remove_repeat(out, p, eps);
    }

    if closed {
        while out.len() > 1 && out[out.len() - 1].fuzzy_eq_eps(out[0], eps) {
            out.pop();
        }
    }
}

/// Push `point` unless it coincides with the last point of `points`.
#[inline]
pub fn push_point_remove_repeat<T>(points: &mut Vec<Vector2<T>>, point: Vector2<T>, eps: T)
where
    T: Real,
{
    match points.last() {
        Some(last) if last.fuzzy_eq_eps(point, eps) => {}
        _ => points.push(point),
    }
}
