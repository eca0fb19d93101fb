//! Monotonic sections: runs of consecutive segments whose direction signs do not change, so their
//! bounding box is a tight filter for segment pair testing.
use super::{arena::RingArena, segment_id::SegmentId};
use crate::{
    core::{math::Vector2, traits::Real},
    error::OverlayError,
    strategy::OverlayStrategy,
};
use num_traits::Float;
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder, AABB};

/// Maximum number of segments collected into one section.
pub const MAX_SECTION_SEGMENTS: usize = 10;

#[derive(Debug, Clone)]
pub struct Section<T> {
    /// Arena ring index.
    pub ring: usize,
    /// First segment index.
    pub begin: usize,
    /// One past the last segment index.
    pub end: usize,
    pub bounds: AABB<T>,
    direction: (i32, i32),
}

impl<T> Section<T>
where
    T: Real,
{
    fn new(ring: usize, segment: usize, p: Vector2<T>, q: Vector2<T>, direction: (i32, i32)) -> Self {
        let mut bounds = AABB::new(p.x, p.y, p.x, p.y);
        expand(&mut bounds, q);
        Self {
            ring,
            begin: segment,
            end: segment + 1,
            bounds,
            direction,
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.end - self.begin
    }

    /// `true` if the bounding boxes overlap after growing by `eps`.
    #[inline]
    pub fn overlaps(&self, other: &AABB<T>, eps: T) -> bool {
        boxes_overlap(&self.bounds, other, eps)
    }
}

#[inline]
fn expand<T>(bounds: &mut AABB<T>, p: Vector2<T>)
where
    T: Real,
{
    bounds.min_x = Float::min(bounds.min_x, p.x);
    bounds.min_y = Float::min(bounds.min_y, p.y);
    bounds.max_x = Float::max(bounds.max_x, p.x);
    bounds.max_y = Float::max(bounds.max_y, p.y);
}

/// `true` if `a` and `b` overlap after growing both by `eps`.
#[inline]
pub fn boxes_overlap<T>(a: &AABB<T>, b: &AABB<T>, eps: T) -> bool
where
    T: Real,
{
    a.min_x <= b.max_x + eps
        && b.min_x <= a.max_x + eps
        && a.min_y <= b.max_y + eps
        && b.min_y <= a.max_y + eps
}

/// Bounding box of the segment `p -> q`.
#[inline]
pub fn segment_bounds<T>(p: Vector2<T>, q: Vector2<T>) -> AABB<T>
where
    T: Real,
{
    AABB::new(
        Float::min(p.x, q.x),
        Float::min(p.y, q.y),
        Float::max(p.x, q.x),
        Float::max(p.y, q.y),
    )
}

/// Split ring `ring` of the arena into monotonic sections appended to `sections`.
///
/// Zero length segments (within `pos_equal_eps`) are left out and end the current section.
/// Spikes (a vertex where the ring reverses direction along the same line) are recorded in
/// `spikes` as the id of the segment leaving the spike vertex.
pub fn sectionalize<T, S>(
    arena: &RingArena<T>,
    ring: usize,
    strategy: &S,
    pos_equal_eps: T,
    sections: &mut Vec<Section<T>>,
    spikes: &mut Vec<SegmentId>,
) where
    T: Real,
    S: OverlayStrategy<T>,
{
    let arena_ring = arena.ring(ring);
    let seg_count = arena_ring.segment_count();
    let first_new = sections.len();

    for i in 0..seg_count {
        let p = arena.vertex(ring, i);
        let q = arena.vertex(ring, i + 1);
        if p.fuzzy_eq_eps(q, pos_equal_eps) {
            continue;
        }

        let direction = (
            (q.x - p.x).fuzzy_sign_eps(pos_equal_eps),
            (q.y - p.y).fuzzy_sign_eps(pos_equal_eps),
        );

        let has_current = sections.len() > first_new;
        match sections.last_mut() {
            Some(s)
                if has_current
                    && s.end == i
                    && s.direction == direction
                    && s.segment_count() < MAX_SECTION_SEGMENTS =>
            {
                s.end = i + 1;
                expand(&mut s.bounds, q);
            }
            _ => sections.push(Section::new(ring, i, p, q, direction)),
        }
    }

    let (first_vertex, last_vertex) = if arena_ring.closed {
        (0, arena_ring.len)
    } else {
        (1, arena_ring.len.saturating_sub(1))
    };
    for i in first_vertex..last_vertex {
        let prev = arena.vertex(ring, i + arena_ring.len - 1);
        let current = arena.vertex(ring, i);
        let next = arena.vertex(ring, i + 1);
        if strategy.side(prev, current, next) == 0 && (current - prev).dot(next - current) < T::zero()
        {
            spikes.push(SegmentId::new(arena_ring.id, i));
        }
    }
}

/// Sections of all rings of one arena source, in ring order.
pub fn sectionalize_source<T, S>(
    arena: &RingArena<T>,
    source_index: usize,
    strategy: &S,
    pos_equal_eps: T,
    spikes: &mut Vec<SegmentId>,
) -> Vec<Section<T>>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let mut sections = Vec::new();
    for ring in arena.source_rings(source_index) {
        sectionalize(arena, ring, strategy, pos_equal_eps, &mut sections, spikes);
    }

    sections
}

/// Packed spatial index over the section bounding boxes (item index = section index).
pub fn build_section_index<T>(sections: &[Section<T>]) -> Result<StaticAABB2DIndex<T>, OverlayError>
where
    T: Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(sections.len());
    for s in sections {
        builder.add(s.bounds.min_x, s.bounds.min_y, s.bounds.max_x, s.bounds.max_y);
    }

    builder
        .build()
        .map_err(|e| OverlayError::SpatialIndex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Geometry, LineString},
        strategy::CartesianStrategy,
    };

    #[test]
    fn square_has_one_section_per_side() {
        let square = Geometry::from(ring![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let arena = RingArena::single(&square, 1e-5);
        let mut spikes = Vec::new();
        let sections =
            sectionalize_source(&arena, 0, &CartesianStrategy::default(), 1e-5, &mut spikes);
        assert_eq!(sections.len(), 4);
        assert!(spikes.is_empty());
        assert_eq!(sections[0].begin, 0);
        assert_eq!(sections[3].end, 4);
    }

    #[test]
    fn monotonic_run_is_merged() {
        // staircase going up and right, then back down
        let ring = Geometry::from(ring![
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 3.0),
            (3.0, 4.0),
            (4.0, 0.0)
        ]);
        let arena = RingArena::single(&ring, 1e-5);
        let mut spikes = Vec::new();
        let sections =
            sectionalize_source(&arena, 0, &CartesianStrategy::default(), 1e-5, &mut spikes);
        assert_eq!(sections.len(), 3);
        let first = &sections[0];
        assert_eq!(first.segment_count(), 3);
        assert_eq!(
            (first.bounds.min_x, first.bounds.min_y, first.bounds.max_x, first.bounds.max_y),
            (0.0, 0.0, 3.0, 4.0)
        );
    }

    #[test]
    fn spike_is_reported() {
        let mut ls = LineString::new();
        ls.add(0.0, 0.0);
        ls.add(2.0, 0.0);
        ls.add(1.0, 0.0);
        let line = Geometry::from(ls);
        let arena = RingArena::single(&line, 1e-5);
        let mut spikes = Vec::new();
        let sections =
            sectionalize_source(&arena, 0, &CartesianStrategy::default(), 1e-5, &mut spikes);
        assert_eq!(sections.len(), 2);
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].segment_index, 1);
    }

    #[test]
    fn index_over_sections() {
        let square = Geometry::from(ring![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let arena = RingArena::single(&square, 1e-5);
        let mut spikes = Vec::new();
        let sections =
            sectionalize_source(&arena, 0, &CartesianStrategy::default(), 1e-5, &mut spikes);
        let index = build_section_index(&sections).unwrap();
        let mut hits = index.query(-0.5, 0.25, 0.5, 0.75);
        hits.sort_unstable();
        assert_eq!(hits, vec![0]);
    }
}
