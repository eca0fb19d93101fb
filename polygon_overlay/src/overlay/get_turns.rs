//! Turn finding: every intersection event between segments of the two geometries (or between
//! non adjacent segments of one geometry for self turns).
use super::{
    arena::RingArena,
    sections::{boxes_overlap, build_section_index, sectionalize_source, segment_bounds, Section},
    segment_id::SegmentId,
    turn::{Method, OperationType, Turn, TurnOperation},
    validate_input, OverlayOptions,
};
use crate::{
    core::{
        math::{SegmentIntersection, SegmentIntersectionPoint, Vector2},
        traits::{ControlFlow, Real},
        Control,
    },
    error::OverlayError,
    geometry::Geometry,
    strategy::OverlayStrategy,
};
use static_aabb2d_index::StaticAABB2DIndex;

/// Receives turns as they are found. Returning a value for which
/// [ControlFlow::should_break] is `true` stops turn finding.
pub trait TurnVisitor<T, C>
where
    C: ControlFlow,
{
    fn visit_turn(&mut self, turn: &Turn<T>) -> C;
}

impl<T, C, F> TurnVisitor<T, C> for F
where
    F: FnMut(&Turn<T>) -> C,
    C: ControlFlow,
{
    #[inline]
    fn visit_turn(&mut self, turn: &Turn<T>) -> C {
        self(turn)
    }
}

/// All turns between two geometries along with the detected spikes.
#[derive(Debug, Clone, Default)]
pub struct TurnInfo<T = f64> {
    pub turns: Vec<Turn<T>>,
    /// Segments leaving a vertex where a ring reverses onto itself.
    pub spikes: Vec<SegmentId>,
}

/// Visit the turns between source 0 and source 1 of `arena`.
///
/// Turns are produced in a deterministic order: sections of source 1 in ring order, each against
/// the overlapping sections of source 0 in ring order.
pub fn visit_turns<T, S, C, V>(
    arena: &RingArena<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
    spikes: &mut Vec<SegmentId>,
    visitor: &mut V,
) -> Result<C, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    let eps = options.pos_equal_eps;
    let sections1 = sectionalize_source(arena, 0, strategy, eps, spikes);
    let sections2 = sectionalize_source(arena, 1, strategy, eps, spikes);
    if sections1.is_empty() || sections2.is_empty() {
        return Ok(C::continuing());
    }

    let index = build_section_index(&sections1)?;
    Ok(visit_section_pairs(
        arena, &sections1, &index, &sections2, strategy, eps, visitor,
    ))
}

fn visit_section_pairs<T, S, C, V>(
    arena: &RingArena<T>,
    sections1: &[Section<T>],
    index: &StaticAABB2DIndex<T>,
    sections2: &[Section<T>],
    strategy: &S,
    eps: T,
    visitor: &mut V,
) -> C
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    let mut query_stack = Vec::with_capacity(8);
    let mut hits = Vec::new();
    for s2 in sections2 {
        hits.clear();
        let mut query_visitor = |i: usize| {
            hits.push(i);
        };
        index.visit_query_with_stack(
            s2.bounds.min_x - eps,
            s2.bounds.min_y - eps,
            s2.bounds.max_x + eps,
            s2.bounds.max_y + eps,
            &mut query_visitor,
            &mut query_stack,
        );
        hits.sort_unstable();

        for &i in hits.iter() {
            try_cf!(visit_section_pair(
                arena,
                &sections1[i],
                s2,
                strategy,
                eps,
                false,
                visitor
            ));
        }
    }

    C::continuing()
}

/// Segment end point handling for one side of a segment pair.
#[derive(Debug, Copy, Clone)]
struct SegmentSide<T> {
    seg_id: SegmentId,
    start: Vector2<T>,
    end: Vector2<T>,
    /// An intersection at the end vertex is reported by the following segment, which does not
    /// exist for the last segment of an open line string.
    end_reported_elsewhere: bool,
}

fn visit_section_pair<T, S, C, V>(
    arena: &RingArena<T>,
    s1: &Section<T>,
    s2: &Section<T>,
    strategy: &S,
    eps: T,
    self_turns: bool,
    visitor: &mut V,
) -> C
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    let ring1 = arena.ring(s1.ring);
    let same_ring = s1.ring == s2.ring;
    let side_of = |ring: usize, i: usize| {
        let r = arena.ring(ring);
        SegmentSide {
            seg_id: SegmentId::new(r.id, i),
            start: arena.vertex(ring, i),
            end: arena.vertex(ring, i + 1),
            end_reported_elsewhere: r.closed || i + 1 < r.segment_count(),
        }
    };

    for i in s1.begin..s1.end {
        let a = side_of(s1.ring, i);
        let a_bounds = segment_bounds(a.start, a.end);
        if !s2.overlaps(&a_bounds, eps) {
            continue;
        }

        for j in s2.begin..s2.end {
            if self_turns && same_ring {
                // each unordered pair once, never a segment with itself or its neighbours
                let n = ring1.len;
                if j <= i || j == i + 1 || (ring1.closed && i == 0 && j + 1 == n) {
                    continue;
                }
            }

            let b = side_of(s2.ring, j);
            if !boxes_overlap(&a_bounds, &segment_bounds(b.start, b.end), eps) {
                continue;
            }

            try_cf!(visit_segment_pair(a, b, strategy, visitor));
        }
    }

    C::continuing()
}

fn visit_segment_pair<T, S, C, V>(
    a: SegmentSide<T>,
    b: SegmentSide<T>,
    strategy: &S,
    visitor: &mut V,
) -> C
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    let skip = |ip: &SegmentIntersectionPoint<T>| {
        (ip.seg1_t == T::one() && a.end_reported_elsewhere)
            || (ip.seg2_t == T::one() && b.end_reported_elsewhere)
    };

    match strategy.segment_intersection(a.start, a.end, b.start, b.end) {
        SegmentIntersection::Disjoint => {}
        SegmentIntersection::Point(ip) => {
            if !skip(&ip) {
                let turn = point_turn(&a, &b, &ip, strategy);
                try_cf!(visitor.visit_turn(&turn));
            }
        }
        SegmentIntersection::Overlap(p, q) => {
            for ip in [p, q] {
                if skip(&ip) {
                    continue;
                }
                let method = if ip.seg1_t == T::zero() && ip.seg2_t == T::zero() {
                    Method::Equal
                } else {
                    Method::Collinear
                };
                let turn = Turn::new(
                    ip.point,
                    method,
                    [
                        TurnOperation::new(a.seg_id, ip.seg1_t, OperationType::None),
                        TurnOperation::new(b.seg_id, ip.seg2_t, OperationType::None),
                    ],
                );
                try_cf!(visitor.visit_turn(&turn));
            }
        }
    }

    C::continuing()
}

fn point_turn<T, S>(
    a: &SegmentSide<T>,
    b: &SegmentSide<T>,
    ip: &SegmentIntersectionPoint<T>,
    strategy: &S,
) -> Turn<T>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let at_start1 = ip.seg1_t == T::zero();
    let at_start2 = ip.seg2_t == T::zero();
    let method = match (at_start1, at_start2) {
        (true, true) => Method::Touch,
        (true, false) | (false, true) => Method::TouchInterior,
        (false, false) => Method::Crosses,
    };

    // interior is on the right: continuing to the right of the other segment enters it
    let (op1, op2) = if method == Method::Crosses {
        let classify = |side: i32| match side {
            -1 => OperationType::Intersection,
            1 => OperationType::Union,
            _ => OperationType::None,
        };
        (
            classify(strategy.side(b.start, b.end, a.end)),
            classify(strategy.side(a.start, a.end, b.end)),
        )
    } else {
        (OperationType::None, OperationType::None)
    };

    Turn::new(
        ip.point,
        method,
        [
            TurnOperation::new(a.seg_id, ip.seg1_t, op1),
            TurnOperation::new(b.seg_id, ip.seg2_t, op2),
        ],
    )
}

/// Visit the self turns of source 0 of `arena`: intersections between segments of different rings
/// and between non adjacent segments of the same ring.
pub fn visit_self_turns<T, S, C, V>(
    arena: &RingArena<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
    spikes: &mut Vec<SegmentId>,
    visitor: &mut V,
) -> Result<C, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    let eps = options.pos_equal_eps;
    let sections = sectionalize_source(arena, 0, strategy, eps, spikes);
    if sections.is_empty() {
        return Ok(C::continuing());
    }

    let index = build_section_index(&sections)?;
    let mut query_stack = Vec::with_capacity(8);
    let mut hits = Vec::new();
    for (k, s) in sections.iter().enumerate() {
        hits.clear();
        let mut query_visitor = |i: usize| {
            if i >= k {
                hits.push(i);
            }
        };
        index.visit_query_with_stack(
            s.bounds.min_x - eps,
            s.bounds.min_y - eps,
            s.bounds.max_x + eps,
            s.bounds.max_y + eps,
            &mut query_visitor,
            &mut query_stack,
        );
        hits.sort_unstable();

        for &h in hits.iter() {
            let other = &sections[h];
            // order the pair so that within one ring the lower segment indexes come first
            let (s1, s2) = if other.ring < s.ring
                || (other.ring == s.ring && other.begin < s.begin)
            {
                (other, s)
            } else {
                (s, other)
            };
            let cf = visit_section_pair(arena, s1, s2, strategy, eps, true, visitor);
            if cf.should_break() {
                return Ok(cf);
            }
        }
    }

    Ok(C::continuing())
}

/// Find all turns between `geometry1` and `geometry2`.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::geometry::*;
/// # use polygon_overlay::overlay::*;
/// # use polygon_overlay::strategy::CartesianStrategy;
/// let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
/// let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
/// let info = get_turns(&a, &b, &CartesianStrategy::default(), &OverlayOptions::new()).unwrap();
/// assert_eq!(info.turns.len(), 2);
/// assert!(info.turns.iter().all(|t| t.method == Method::Crosses));
/// ```
pub fn get_turns<T, S>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<TurnInfo<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    options.validate()?;
    validate_input(geometry1, 0)?;
    validate_input(geometry2, 1)?;

    let arena = RingArena::new(geometry1, geometry2, [false, false], options.pos_equal_eps);
    let mut info = TurnInfo {
        turns: Vec::new(),
        spikes: Vec::new(),
    };
    let turns = &mut info.turns;
    let mut visitor = |turn: &Turn<T>| {
        turns.push(turn.clone());
        Control::<()>::Continue
    };
    visit_turns(&arena, strategy, options, &mut info.spikes, &mut visitor)?;
    Ok(info)
}

/// Find turns between `geometry1` and `geometry2`, handing each one to `visitor` which may stop the
/// search. Returns `true` if all turns were visited.
pub fn get_turns_interruptible<T, S, C, V>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
    visitor: &mut V,
) -> Result<bool, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
    C: ControlFlow,
    V: TurnVisitor<T, C>,
{
    options.validate()?;
    validate_input(geometry1, 0)?;
    validate_input(geometry2, 1)?;

    let arena = RingArena::new(geometry1, geometry2, [false, false], options.pos_equal_eps);
    let mut spikes = Vec::new();
    let cf = visit_turns(&arena, strategy, options, &mut spikes, visitor)?;
    Ok(!cf.should_break())
}

/// Find the self turns of `geometry`. Both operations of a self turn refer to source 0.
pub fn get_self_turns<T, S>(
    geometry: &Geometry<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<TurnInfo<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    options.validate()?;
    validate_input(geometry, 0)?;

    let arena = RingArena::single(geometry, options.pos_equal_eps);
    let mut info = TurnInfo::default();
    let turns = &mut info.turns;
    let mut visitor = |turn: &Turn<T>| {
        turns.push(turn.clone());
        Control::<()>::Continue
    };
    visit_self_turns(&arena, strategy, options, &mut info.spikes, &mut visitor)?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::math::vec2,
        geometry::{LineString, Rect},
        strategy::CartesianStrategy,
    };

    fn turns_of(a: &Geometry<f64>, b: &Geometry<f64>) -> Vec<Turn<f64>> {
        get_turns(a, b, &CartesianStrategy::default(), &OverlayOptions::new())
            .unwrap()
            .turns
    }

    #[test]
    fn crossing_boxes_classified_by_side() {
        let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
        let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
        let turns = turns_of(&a, &b);
        assert_eq!(turns.len(), 2);
        for t in turns.iter() {
            assert_eq!(t.method, Method::Crosses);
            let ops = [t.operations[0].operation, t.operations[1].operation];
            assert!(ops.contains(&OperationType::Union));
            assert!(ops.contains(&OperationType::Intersection));
        }

        // a enters b at (1, 2) going right along its top edge
        let top = turns
            .iter()
            .find(|t| t.point.fuzzy_eq(vec2(1.0, 2.0)))
            .unwrap();
        assert_eq!(top.operations[0].operation, OperationType::Intersection);
        assert_eq!(top.operations[0].seg_id.segment_index, 1);
        assert_eq!(top.operations[0].fraction, 0.5);
    }

    #[test]
    fn identical_boxes_one_equal_turn_per_vertex() {
        let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let turns = turns_of(&a, &a);
        assert_eq!(turns.len(), 4);
        for t in turns.iter() {
            assert_eq!(t.method, Method::Equal);
            assert_eq!(
                t.operations[0].seg_id.segment_index,
                t.operations[1].seg_id.segment_index
            );
        }
    }

    #[test]
    fn corner_touch_single_turn() {
        let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = Geometry::from(Rect::new(1.0, 1.0, 2.0, 2.0));
        let turns = turns_of(&a, &b);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].method, Method::Touch);
        assert!(turns[0].point.fuzzy_eq(vec2(1.0, 1.0)));
    }

    #[test]
    fn disjoint_has_no_turns() {
        let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = Geometry::from(Rect::new(3.0, 0.0, 4.0, 1.0));
        assert!(turns_of(&a, &b).is_empty());
    }

    #[test]
    fn interrupted_after_first_turn() {
        let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
        let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
        let mut count = 0;
        let completed = get_turns_interruptible(
            &a,
            &b,
            &CartesianStrategy::default(),
            &OverlayOptions::new(),
            &mut |_: &Turn<f64>| {
                count += 1;
                Control::Break(())
            },
        )
        .unwrap();
        assert!(!completed);
        assert_eq!(count, 1);
    }

    #[test]
    fn open_line_reports_its_last_end_point() {
        let mut ls = LineString::new();
        ls.add(-1.0, 0.5);
        ls.add(0.0, 0.5);
        let line = Geometry::from(ls);
        let square = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let turns = turns_of(&line, &square);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].operations[0].fraction, 1.0);
        assert_eq!(turns[0].operations[1].fraction, 0.5);
    }

    #[test]
    fn self_turns_of_bow_tie() {
        let bow_tie = Geometry::from(ring![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 3.0)]);
        let info =
            get_self_turns(&bow_tie, &CartesianStrategy::default(), &OverlayOptions::new())
                .unwrap();
        assert_eq!(info.turns.len(), 1);
        assert!(info.turns[0].point.fuzzy_eq(vec2(1.2, 1.2)));
        assert_eq!(info.turns[0].method, Method::Crosses);

        let square = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let info =
            get_self_turns(&square, &CartesianStrategy::default(), &OverlayOptions::new())
                .unwrap();
        assert!(info.turns.is_empty());
    }

    #[test]
    fn non_finite_input_rejected() {
        let a = Geometry::from(Rect::new(0.0, 0.0, f64::NAN, 1.0));
        let b = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let result = get_turns(&a, &b, &CartesianStrategy::default(), &OverlayOptions::new());
        assert!(matches!(
            result,
            Err(OverlayError::NonFiniteCoordinate {
                source_index: 0,
                ..
            })
        ));
    }
}
