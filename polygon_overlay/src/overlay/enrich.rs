//! Enrichment: orders the operations along every ring, links each operation to the next event on
//! its ring and classifies the operations turn finding could not classify locally.
use super::{
    arena::RingArena,
    segment_id::RingId,
    turn::{op_at, op_at_mut, OperationType, Toi, Turn},
    OverlayOptions,
};
use crate::{
    core::{
        math::{dist_squared, dist_to_segment, midpoint, Vector2},
        traits::Real,
    },
    strategy::{Location, OverlayStrategy},
};
use std::{cmp::Ordering, collections::BTreeMap};

/// Operations grouped by half edge id (operations of one ring leaving the same location).
#[derive(Debug, Clone, Default)]
pub struct HalfEdges {
    groups: Vec<Vec<Toi>>,
}

impl HalfEdges {
    /// All operations sharing the half edge `id`.
    #[inline]
    pub fn siblings(&self, id: usize) -> &[Toi] {
        &self.groups[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Fill in the travel links and along segment distance of every operation.
///
/// Operations are grouped per ring and sorted by `(segment_index, distance)`. Consecutive
/// operations at the same location (within `pos_equal_eps`) form one half edge group. Every
/// operation of a group travels to the first turn of the cyclically next group.
pub fn enrich_turns<T>(
    turns: &mut [Turn<T>],
    arena: &RingArena<T>,
    options: &OverlayOptions<T>,
) -> HalfEdges
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let mut ring_ops: BTreeMap<RingId, Vec<Toi>> = BTreeMap::new();
    for (ti, turn) in turns.iter_mut().enumerate() {
        let point = turn.point;
        for (oi, op) in turn.operations.iter_mut().enumerate() {
            if let Some((start, _)) = arena.segment_points(op.seg_id) {
                op.enriched.distance = dist_squared(start, point);
            }
            ring_ops
                .entry(op.seg_id.ring_id())
                .or_default()
                .push(Toi::new(ti, oi));
        }
    }

    let mut half_edges = HalfEdges::default();
    for (ring_id, mut tois) in ring_ops {
        tois.sort_by(|a, b| {
            let oa = op_at(turns, *a);
            let ob = op_at(turns, *b);
            oa.seg_id
                .segment_index
                .cmp(&ob.seg_id.segment_index)
                .then_with(|| {
                    oa.enriched
                        .distance
                        .partial_cmp(&ob.enriched.distance)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.cmp(b))
        });

        // group operations leaving the same location
        let mut groups: Vec<Vec<Toi>> = Vec::new();
        for toi in tois {
            let seg = op_at(turns, toi).seg_id.segment_index;
            let point = turns[toi.turn_index].point;
            match groups.last_mut() {
                Some(group)
                    if op_at(turns, group[0]).seg_id.segment_index == seg
                        && turns[group[0].turn_index].point.fuzzy_eq_eps(point, eps) =>
                {
                    group.push(toi)
                }
                _ => groups.push(vec![toi]),
            }
        }

        let closed = arena
            .ring_index(ring_id)
            .map_or(false, |r| arena.ring(r).closed);
        let group_count = groups.len();
        for g in 0..group_count {
            let half_edge = half_edges.groups.len();
            let wraps = g + 1 == group_count;
            let next = if wraps {
                if closed {
                    Some(groups[0][0])
                } else {
                    None
                }
            } else {
                Some(groups[g + 1][0])
            };

            let seg = op_at(turns, groups[g][0]).seg_id.segment_index;
            let next_info = next.map(|n| (n.turn_index, op_at(turns, n).seg_id.segment_index));
            for &toi in groups[g].iter() {
                let enriched = &mut op_at_mut(turns, toi).enriched;
                enriched.half_edge = Some(half_edge);
                if let Some((next_turn, next_seg)) = next_info {
                    enriched.travels_to_ip_index = Some(next_turn);
                    enriched.travels_to_vertex_index = Some(next_seg);
                    enriched.next_ip_index = if !wraps && next_seg == seg {
                        Some(next_turn)
                    } else {
                        None
                    };
                }
            }

            half_edges.groups.push(groups[g].clone());
        }
    }

    half_edges
}

/// Classify operations from the half edge leaving their turn.
///
/// Operations left unclassified by turn finding and all operations of clustered turns are
/// classified by locating the midpoint of the half edge (turn point to the next turn on the
/// segment, or to the segment end vertex) against the other geometry. Must run after
/// [enrich_turns].
pub fn classify_operations<T, S>(
    turns: &mut [Turn<T>],
    arena: &RingArena<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
) where
    T: Real,
    S: OverlayStrategy<T>,
{
    for ti in 0..turns.len() {
        for oi in 0..2 {
            let toi = Toi::new(ti, oi);
            let op = op_at(turns, toi);
            if op.operation != OperationType::None && !turns[ti].is_clustered() {
                continue;
            }

            let operation = classify_half_edge(turns, toi, arena, strategy, options.pos_equal_eps);
            op_at_mut(turns, toi).operation = operation;
        }
    }
}

/// End point of the half edge leaving the turn along the operation's segment.
pub fn half_edge_end<T>(turns: &[Turn<T>], toi: Toi, arena: &RingArena<T>) -> Option<Vector2<T>>
where
    T: Real,
{
    let op = op_at(turns, toi);
    match op.enriched.next_ip_index {
        Some(next) => Some(turns[next].point),
        None => arena.segment_points(op.seg_id).map(|(_, end)| end),
    }
}

fn classify_half_edge<T, S>(
    turns: &[Turn<T>],
    toi: Toi,
    arena: &RingArena<T>,
    strategy: &S,
    pos_equal_eps: T,
) -> OperationType
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let start = turns[toi.turn_index].point;
    let end = match half_edge_end(turns, toi, arena) {
        Some(end) => end,
        None => return OperationType::Blocked,
    };

    if start.fuzzy_eq_eps(end, pos_equal_eps) {
        return OperationType::Blocked;
    }

    let other_source = 1 - op_at(turns, toi).seg_id.source_index;
    let mid = midpoint(start, end);
    match arena.locate(mid, other_source, strategy) {
        Location::Inside => OperationType::Intersection,
        Location::Outside => OperationType::Union,
        Location::OnBoundary => match nearest_segment_direction(arena, other_source, mid) {
            Some(dir) if (end - start).dot(dir) > T::zero() => OperationType::Continue,
            _ => OperationType::Opposite,
        },
    }
}

/// Direction of the segment of `source_index` closest to `point`.
fn nearest_segment_direction<T>(
    arena: &RingArena<T>,
    source_index: usize,
    point: Vector2<T>,
) -> Option<Vector2<T>>
where
    T: Real,
{
    let mut best: Option<(T, Vector2<T>)> = None;
    for ring in arena.source_rings(source_index) {
        for i in 0..arena.ring(ring).segment_count() {
            let p = arena.vertex(ring, i);
            let q = arena.vertex(ring, i + 1);
            let d = dist_to_segment(p, q, point);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, q - p));
            }
        }
    }

    best.map(|(_, dir)| dir)
}
