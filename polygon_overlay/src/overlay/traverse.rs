//! Traversal: walks the enriched turn graph emitting one ring per thread.
use super::{
    arena::{push_point_remove_repeat, RingArena},
    cluster::Cluster,
    enrich::HalfEdges,
    select_edge::EdgeSelector,
    turn::{op_at, op_at_mut, OperationType, Toi, Turn, Visited},
    OverlayOptions,
};
use crate::{
    core::{math::Vector2, traits::Real},
    strategy::OverlayStrategy,
};
use std::fmt;

/// Why a traversal thread gave up on its ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// More steps taken than there are turns.
    EndlessLoop,
    /// No operation to continue with at the arrival node.
    DeadEnd,
    /// The selected operation was already consumed by this or another thread.
    Revisit,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbortReason::EndlessLoop => "endless loop",
            AbortReason::DeadEnd => "dead end",
            AbortReason::Revisit => "revisit",
        };
        write!(f, "{}", s)
    }
}

/// Final state of a traversal thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TraverseStatus {
    Finished,
    Aborted(AbortReason),
}

/// Ring traced by one traversal thread. Points are closed (first point repeated) and follow the
/// internal orientation (exterior clockwise).
#[derive(Debug, Clone, PartialEq)]
pub struct TraversedRing<T = f64> {
    pub points: Vec<Vector2<T>>,
    pub status: TraverseStatus,
    /// Operation the thread started from.
    pub start: Toi,
}

impl<T> TraversedRing<T> {
    pub fn is_finished(&self) -> bool {
        self.status == TraverseStatus::Finished
    }
}

/// Trace every ring of the overlay result for `target` (`Union` or `Intersection`).
///
/// Threads start from every unvisited operation that can be followed for `target` (or is
/// `Continue`) in turn order then slot order. Rings are returned in discovery order, aborted
/// rings included.
pub fn traverse<T, S>(
    turns: &mut [Turn<T>],
    clusters: &[Cluster<T>],
    half_edges: &HalfEdges,
    arena: &RingArena<T>,
    strategy: &S,
    options: &OverlayOptions<T>,
    target: OperationType,
) -> Vec<TraversedRing<T>>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let selector = EdgeSelector::new(arena, strategy, options, target);
    let traverser = Traverser {
        clusters,
        half_edges,
        arena,
        selector,
        options,
        target,
    };

    let mut rings = Vec::new();
    for ti in 0..turns.len() {
        for oi in 0..2 {
            let start = Toi::new(ti, oi);
            let op = op_at(turns, start);
            if op.visited != Visited::None || !op.is_traversable_for(target) {
                continue;
            }

            rings.push(traverser.traverse_ring(turns, start));
        }
    }

    rings
}

/// Points of the traversed rings handed to assembly. Aborted rings are dropped unless
/// `keep_aborted` is set.
pub fn ring_points<T>(rings: Vec<TraversedRing<T>>, keep_aborted: bool) -> Vec<Vec<Vector2<T>>> {
    rings
        .into_iter()
        .filter(|r| r.is_finished() || keep_aborted)
        .map(|r| r.points)
        .collect()
}

struct Traverser<'a, T, S> {
    clusters: &'a [Cluster<T>],
    half_edges: &'a HalfEdges,
    arena: &'a RingArena<T>,
    selector: EdgeSelector<'a, T, S>,
    options: &'a OverlayOptions<T>,
    target: OperationType,
}

impl<'a, T, S> Traverser<'a, T, S>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    fn traverse_ring(&self, turns: &mut [Turn<T>], start: Toi) -> TraversedRing<T> {
        let eps = self.options.pos_equal_eps;
        let max_steps = turns.len();
        self.mark(turns, start, Visited::Started);

        let mut points = vec![turns[start.turn_index].point];
        let mut current = start;
        let mut steps = 0;
        let status = loop {
            let dest = match self.advance(turns, current, &mut points) {
                Some(d) => d,
                None => break TraverseStatus::Aborted(AbortReason::DeadEnd),
            };
            let p2 = turns[dest].point;
            push_point_remove_repeat(&mut points, p2, eps);

            let candidates = self.candidates_at(turns, dest);
            if candidates.is_empty() {
                break TraverseStatus::Aborted(AbortReason::DeadEnd);
            }

            if candidates.iter().any(|&c| self.same_half_edge(turns, c, start)) {
                break TraverseStatus::Finished;
            }

            let p1 = points
                .iter()
                .rev()
                .find(|p| !p.fuzzy_eq_eps(p2, eps))
                .copied()
                .unwrap_or(p2);

            let mut selected = match self.selector.select(turns, p1, p2, &candidates) {
                Some(s) => s,
                None => break TraverseStatus::Aborted(AbortReason::DeadEnd),
            };

            if op_at(turns, selected).visited != Visited::None {
                if self.options.abort_on_revisit {
                    break TraverseStatus::Aborted(AbortReason::Revisit);
                }

                let unvisited: Vec<Toi> = candidates
                    .iter()
                    .copied()
                    .filter(|&c| op_at(turns, c).visited == Visited::None)
                    .collect();
                selected = match self.selector.select(turns, p1, p2, &unvisited) {
                    Some(s) => s,
                    None => break TraverseStatus::Aborted(AbortReason::DeadEnd),
                };
            }

            steps += 1;
            if steps > max_steps {
                break TraverseStatus::Aborted(AbortReason::EndlessLoop);
            }

            self.mark(turns, selected, Visited::Visited);
            current = selected;
        };

        match status {
            TraverseStatus::Finished => {
                op_at_mut(turns, start).visited = Visited::Finished;
                if self.options.debug_trace {
                    log::debug!("ring from {} finished with {} points", start, points.len());
                }
            }
            TraverseStatus::Aborted(reason) => {
                log::warn!(
                    "traversal from {} at ({}, {}) aborted: {}",
                    start,
                    turns[start.turn_index].point.x,
                    turns[start.turn_index].point.y,
                    reason
                );
            }
        }

        close_points(&mut points, eps);
        TraversedRing {
            points,
            status,
            start,
        }
    }

    /// Move along the operation's ring to the next turn, copying the ring vertexes passed on the
    /// way. Returns the destination turn.
    fn advance(
        &self,
        turns: &[Turn<T>],
        current: Toi,
        points: &mut Vec<Vector2<T>>,
    ) -> Option<usize> {
        let op = op_at(turns, current);
        if let Some(next) = op.enriched.next_ip_index {
            return Some(next);
        }

        let to_ip = op.enriched.travels_to_ip_index?;
        let to_vertex = op.enriched.travels_to_vertex_index?;
        let ring = self.arena.ring_index(op.seg_id.ring_id())?;
        let n = self.arena.ring(ring).len;
        let seg = op.seg_id.segment_index;
        let count = match (to_vertex + n - seg) % n {
            0 => n,
            c => c,
        };

        let eps = self.options.pos_equal_eps;
        for t in 1..=count {
            push_point_remove_repeat(points, self.arena.vertex(ring, seg + t), eps);
        }

        Some(to_ip)
    }

    /// Operations at the node of `turn_index` that can be followed for the target.
    fn candidates_at(&self, turns: &[Turn<T>], turn_index: usize) -> Vec<Toi> {
        let members = match turns[turn_index].cluster_id {
            Some(c) => self.clusters[c].turn_indices.as_slice(),
            None => std::slice::from_ref(&turn_index),
        };

        let mut candidates = Vec::new();
        for &t in members {
            for oi in 0..2 {
                let toi = Toi::new(t, oi);
                if op_at(turns, toi).is_traversable_for(self.target) {
                    candidates.push(toi);
                }
            }
        }

        candidates
    }

    fn same_half_edge(&self, turns: &[Turn<T>], a: Toi, b: Toi) -> bool {
        if a == b {
            return true;
        }

        match (
            op_at(turns, a).enriched.half_edge,
            op_at(turns, b).enriched.half_edge,
        ) {
            (Some(ha), Some(hb)) => ha == hb,
            _ => false,
        }
    }

    /// Set the visited state of `toi`. Operations sharing its half edge are marked visited, as are
    /// all operations of its turn when both continue along a shared collinear run.
    ///
    /// A `Continue` operation whose partner leaves in another direction (a touch where only one
    /// side runs along the other boundary) leaves the partner free to start or join a thread.
    fn mark(&self, turns: &mut [Turn<T>], toi: Toi, state: Visited) {
        op_at_mut(turns, toi).visited = state;
        self.mark_siblings(turns, toi);

        if turns[toi.turn_index].both(OperationType::Continue) {
            let partner = toi.partner();
            if op_at(turns, partner).visited == Visited::None {
                op_at_mut(turns, partner).visited = Visited::Visited;
                self.mark_siblings(turns, partner);
            }
        }
    }

    fn mark_siblings(&self, turns: &mut [Turn<T>], toi: Toi) {
        if let Some(he) = op_at(turns, toi).enriched.half_edge {
            for &s in self.half_edges.siblings(he) {
                if s != toi && op_at(turns, s).visited == Visited::None {
                    op_at_mut(turns, s).visited = Visited::Visited;
                }
            }
        }
    }
}

/// Make the last point of `points` equal to the first, replacing a last point that coincides with
/// the first within `eps`.
fn close_points<T>(points: &mut Vec<Vector2<T>>, eps: T)
where
    T: Real,
{
    let first = match points.first() {
        Some(&p) => p,
        None => return,
    };

    if points.len() > 1 && points[points.len() - 1].fuzzy_eq_eps(first, eps) {
        let last = points.len() - 1;
        points[last] = first;
    } else {
        points.push(first);
    }
}
