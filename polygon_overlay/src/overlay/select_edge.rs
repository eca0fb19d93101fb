//! Choosing which operation to follow when traversal arrives at a turn or cluster with more than
//! one candidate.
use super::{
    arena::RingArena,
    turn::{op_at, OperationType, Toi, Turn},
    OverlayOptions,
};
use crate::{
    core::{math::Vector2, traits::Real},
    strategy::OverlayStrategy,
};
use std::cmp::Ordering;

/// Maximum number of ring vertexes walked to find a point distinct from the arrival point.
pub const MAX_WALK_HOPS: usize = 10;

/// Identity of a traversal node: a cluster, or a turn that is not clustered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Node {
    Cluster(usize),
    Turn(usize),
}

/// Node a turn belongs to.
#[inline]
pub fn node_of<T>(turns: &[Turn<T>], turn_index: usize) -> Node {
    match turns[turn_index].cluster_id {
        Some(c) => Node::Cluster(c),
        None => Node::Turn(turn_index),
    }
}

/// Stateless selector of the next operation to follow for one traversal target.
///
/// Candidates are the operations at the arrival node that may be followed for the target. The
/// general rule picks the candidate turning most to the right relative to the arrival direction
/// `p1 -> p2`, which keeps the traced ring around a single face of the overlay.
#[derive(Debug)]
pub struct EdgeSelector<'a, T, S> {
    arena: &'a RingArena<T>,
    strategy: &'a S,
    options: &'a OverlayOptions<T>,
    target: OperationType,
}

#[derive(Debug, Copy, Clone)]
struct Keyed<T> {
    toi: Toi,
    /// -1 right, 0 straight ahead, 1 left, 2 straight back.
    ///
    /// Plain side ordering puts a candidate turning straight back at 0 with the ones going
    /// straight ahead. It is moved behind the left turns instead, so a U-turn is only taken when
    /// nothing else leaves the node.
    side: i32,
    ahead: Vector2<T>,
}

impl<'a, T, S> EdgeSelector<'a, T, S>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    pub fn new(
        arena: &'a RingArena<T>,
        strategy: &'a S,
        options: &'a OverlayOptions<T>,
        target: OperationType,
    ) -> Self {
        Self {
            arena,
            strategy,
            options,
            target,
        }
    }

    /// Select among `candidates` after arriving at `p2` coming from `p1`.
    pub fn select(
        &self,
        turns: &[Turn<T>],
        p1: Vector2<T>,
        p2: Vector2<T>,
        candidates: &[Toi],
    ) -> Option<Toi> {
        let selected = self.select_impl(turns, p1, p2, candidates);
        if self.options.debug_trace {
            log::trace!(
                "select at ({}, {}) from ({}, {}) among {:?}: {:?}",
                p2.x,
                p2.y,
                p1.x,
                p1.y,
                candidates,
                selected
            );
        }
        selected
    }

    fn select_impl(
        &self,
        turns: &[Turn<T>],
        p1: Vector2<T>,
        p2: Vector2<T>,
        candidates: &[Toi],
    ) -> Option<Toi> {
        match candidates {
            [] => return None,
            [single] => return Some(*single),
            _ => {}
        }

        if let &[a, b] = candidates {
            let op_a = op_at(turns, a);
            let op_b = op_at(turns, b);
            let same_target = self.same_target(turns, a, b);

            if op_a.operation == OperationType::Continue
                && op_b.operation == OperationType::Continue
                && same_target
            {
                return Some(a);
            }

            let clustered =
                turns[a.turn_index].is_clustered() || turns[b.turn_index].is_clustered();
            if self.target == OperationType::Union
                && clustered
                && op_a.operation == OperationType::Union
                && op_b.operation == OperationType::Union
                && op_a.enriched.rank == op_b.enriched.rank
            {
                if self.options.cluster_rank_shortcut && same_target {
                    return Some(a);
                }
                if let Some(better) = self.better_collinear_for_union(turns, a, b, p2) {
                    return Some(better);
                }
            }
        }

        self.select_rightmost(turns, p1, p2, candidates)
    }

    fn same_target(&self, turns: &[Turn<T>], a: Toi, b: Toi) -> bool {
        match (
            op_at(turns, a).enriched.travels_to_ip_index,
            op_at(turns, b).enriched.travels_to_ip_index,
        ) {
            (Some(ta), Some(tb)) => node_of(turns, ta) == node_of(turns, tb),
            _ => false,
        }
    }

    /// First ring point after the turn along the operation's ring that does not coincide with
    /// `origin`, walking at most [MAX_WALK_HOPS] vertexes.
    pub fn walk_to_point_after_turn(
        &self,
        turns: &[Turn<T>],
        toi: Toi,
        origin: Vector2<T>,
    ) -> Option<Vector2<T>> {
        let op = op_at(turns, toi);
        let ring = self.arena.ring_index(op.seg_id.ring_id())?;
        let seg = op.seg_id.segment_index;
        let eps = self.options.pos_equal_eps;
        (1..=MAX_WALK_HOPS)
            .map(|hop| self.arena.vertex(ring, seg + hop))
            .find(|p| !p.fuzzy_eq_eps(origin, eps))
    }

    fn select_rightmost(
        &self,
        turns: &[Turn<T>],
        p1: Vector2<T>,
        p2: Vector2<T>,
        candidates: &[Toi],
    ) -> Option<Toi> {
        let incoming = p2 - p1;
        let mut keyed: Vec<Keyed<T>> = candidates
            .iter()
            .filter_map(|&toi| {
                let ahead = self.walk_to_point_after_turn(turns, toi, p2)?;
                let side = match self.strategy.side(p1, p2, ahead) {
                    0 if incoming.dot(ahead - p2) < T::zero() => 2,
                    s => s,
                };
                Some(Keyed { toi, side, ahead })
            })
            .collect();

        if keyed.is_empty() {
            return candidates.first().copied();
        }

        keyed.sort_by(|a, b| a.side.cmp(&b.side).then_with(|| a.toi.cmp(&b.toi)));
        let best_side = keyed[0].side;
        let tied_count = keyed.iter().take_while(|k| k.side == best_side).count();
        if tied_count == 1 {
            return Some(keyed[0].toi);
        }

        let tied = &keyed[..tied_count];
        if best_side == 0 || best_side == 2 {
            return Some(self.select_collinear(turns, tied));
        }

        // most clockwise among candidates on the same side
        let mut best = tied[0];
        for k in tied[1..].iter() {
            if self.strategy.side(p2, best.ahead, k.ahead) == -1 {
                best = *k;
            }
        }

        Some(best.toi)
    }

    /// Tie between candidates leaving along the same line: the candidate ordered first by
    /// [collinear_target_first](Self::collinear_target_first) against every other one wins.
    fn select_collinear(&self, turns: &[Turn<T>], tied: &[Keyed<T>]) -> Toi {
        let order = |a: Toi, b: Toi| {
            match (
                self.collinear_target_first(turns, a, b),
                self.collinear_target_first(turns, b, a),
            ) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        };

        tied.iter()
            .map(|k| k.toi)
            .min_by(|&a, &b| order(a, b))
            .unwrap_or(tied[0].toi)
    }

    /// `true` if `a` should be taken before `b` when both leave along the same line.
    ///
    /// A candidate whose partner operation travels nowhere comes first (`a` checked before `b`).
    /// Otherwise `a` comes first unless `b` heads to a node one of the two partners heads to.
    pub fn collinear_target_first(&self, turns: &[Turn<T>], a: Toi, b: Toi) -> bool {
        let target = |toi: Toi| {
            op_at(turns, toi)
                .enriched
                .travels_to_ip_index
                .map(|t| node_of(turns, t))
        };

        let other_a = target(a.partner());
        let other_b = target(b.partner());
        if other_a.is_none() {
            return true;
        }
        if other_b.is_none() {
            return false;
        }

        // b runs via one of the nodes the partners head to
        let target_b = target(b);
        !(target_b == other_a || target_b == other_b)
    }

    /// Decide between two union candidates leaving a cluster along the same line. Returns `None`
    /// when the candidates cannot be told apart.
    ///
    /// The candidate with fewer geometries on its left wins. Otherwise both paths are followed
    /// until they leave the common line: a path leaving to a higher side wins, and among paths
    /// leaving to the left the one leaving earlier wins (later when leaving to the right).
    pub fn better_collinear_for_union(
        &self,
        turns: &[Turn<T>],
        a: Toi,
        b: Toi,
        origin: Vector2<T>,
    ) -> Option<Toi> {
        let op_a = op_at(turns, a);
        let op_b = op_at(turns, b);
        match op_a.enriched.count_left.cmp(&op_b.enriched.count_left) {
            Ordering::Less => return Some(a),
            Ordering::Greater => return Some(b),
            Ordering::Equal => {}
        }

        let (side_a, dist_a) = self.ahead_info(turns, a, origin)?;
        let (side_b, dist_b) = self.ahead_info(turns, b, origin)?;
        if side_a != side_b {
            return Some(if side_a > side_b { a } else { b });
        }

        let cmp = dist_a.partial_cmp(&dist_b)?;
        match (side_a, cmp) {
            (_, Ordering::Equal) | (0, _) => None,
            (1, Ordering::Less) | (-1, Ordering::Greater) => Some(a),
            _ => Some(b),
        }
    }

    /// Side to which the ring of `toi` leaves the line through its leaving direction, and the
    /// distance along that line at which it leaves.
    fn ahead_info(&self, turns: &[Turn<T>], toi: Toi, origin: Vector2<T>) -> Option<(i32, T)> {
        let op = op_at(turns, toi);
        let ring = self.arena.ring_index(op.seg_id.ring_id())?;
        let first = self.walk_to_point_after_turn(turns, toi, origin)?;
        let dir = first - origin;
        let len = dir.length();
        let seg = op.seg_id.segment_index;
        let n = self.arena.ring(ring).len;

        let mut last = origin;
        for k in 1..=n {
            let v = self.arena.vertex(ring, seg + k);
            let side = self.strategy.side(origin, first, v);
            if side != 0 {
                return Some((side, (last - origin).dot(dir) / len));
            }
            last = v;
        }

        Some((0, T::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::math::vec2,
        geometry::{Geometry, Rect},
        overlay::{
            segment_id::{RingId, SegmentId},
            turn::{Method, TurnOperation},
        },
        strategy::CartesianStrategy,
    };

    /// Two rings crossing at the origin: a plus shaped arrangement where a leaves the origin to
    /// the east and b leaves it to the north.
    fn setup() -> (RingArena<f64>, Vec<Turn<f64>>) {
        let a = Geometry::from(Rect::new(0.0, -1.0, 2.0, 0.0));
        let b = Geometry::from(Rect::new(-1.0, 0.0, 0.0, 2.0));
        let arena = RingArena::new(&a, &b, [false, false], 1e-5);
        // a: (0,-1) (0,0) (2,0) (2,-1), segment 1 leaves the origin east
        // b: (-1,0) (-1,2) (0,2) (0,0), segment 3 leaves the origin west
        let op = |source, segment| {
            TurnOperation::new(
                SegmentId::new(RingId::new(source, 0, None), segment),
                0.0,
                OperationType::Union,
            )
        };
        let turns = vec![Turn::new(vec2(0.0, 0.0), Method::Touch, [op(0, 1), op(1, 3)])];
        (arena, turns)
    }

    #[test]
    fn single_candidate_and_empty() {
        let (arena, turns) = setup();
        let strategy = CartesianStrategy::default();
        let options = OverlayOptions::new();
        let selector = EdgeSelector::new(&arena, &strategy, &options, OperationType::Union);
        let only = Toi::new(0, 0);
        assert_eq!(
            selector.select(&turns, vec2(0.0, -1.0), vec2(0.0, 0.0), &[only]),
            Some(only)
        );
        assert_eq!(
            selector.select(&turns, vec2(0.0, -1.0), vec2(0.0, 0.0), &[]),
            None
        );
    }

    #[test]
    fn rightmost_candidate_wins() {
        let (arena, turns) = setup();
        let strategy = CartesianStrategy::default();
        let options = OverlayOptions::new();
        let selector = EdgeSelector::new(&arena, &strategy, &options, OperationType::Union);
        let east = Toi::new(0, 0);
        let west = Toi::new(0, 1);
        assert_eq!(
            selector.walk_to_point_after_turn(&turns, east, vec2(0.0, 0.0)),
            Some(vec2(2.0, 0.0))
        );
        assert_eq!(
            selector.walk_to_point_after_turn(&turns, west, vec2(0.0, 0.0)),
            Some(vec2(-1.0, 0.0))
        );

        // arriving heading north: east is a right turn
        assert_eq!(
            selector.select(&turns, vec2(0.0, -1.0), vec2(0.0, 0.0), &[west, east]),
            Some(east)
        );
        // arriving heading south: west is a right turn
        assert_eq!(
            selector.select(&turns, vec2(0.0, 1.0), vec2(0.0, 0.0), &[east, west]),
            Some(west)
        );
        // arriving heading east: straight ahead beats turning back
        assert_eq!(
            selector.select(&turns, vec2(-1.0, 0.0), vec2(0.0, 0.0), &[west, east]),
            Some(east)
        );
    }

    /// Two candidates at the origin both leaving east along a's segment 1, with the given
    /// `[own, partner]` targets, followed by three filler turns (indexes 2, 3 and 4).
    fn collinear_table(targets: [[Option<usize>; 2]; 2]) -> Vec<Turn<f64>> {
        let op = |source, segment, operation, to: Option<usize>| {
            let mut op = TurnOperation::new(
                SegmentId::new(RingId::new(source, 0, None), segment),
                0.0,
                operation,
            );
            op.enriched.travels_to_ip_index = to;
            op
        };
        let mut turns: Vec<Turn<f64>> = targets
            .iter()
            .map(|[own, partner]| {
                Turn::new(
                    vec2(0.0, 0.0),
                    Method::Touch,
                    [
                        op(0, 1, OperationType::Union, *own),
                        op(1, 3, OperationType::Union, *partner),
                    ],
                )
            })
            .collect();
        for x in 1..=3 {
            turns.push(Turn::new(
                vec2(x as f64, 5.0),
                Method::Crosses,
                [
                    op(0, 0, OperationType::Blocked, None),
                    op(1, 0, OperationType::Blocked, None),
                ],
            ));
        }
        turns
    }

    #[test]
    fn collinear_tie_prefers_partner_without_target() {
        let (arena, _) = setup();
        let strategy = CartesianStrategy::default();
        let options = OverlayOptions::new();
        let selector = EdgeSelector::new(&arena, &strategy, &options, OperationType::Union);
        let (a, b) = (Toi::new(0, 0), Toi::new(1, 0));

        let turns = collinear_table([[Some(2), Some(3)], [Some(4), None]]);
        assert!(!selector.collinear_target_first(&turns, a, b));
        assert!(selector.collinear_target_first(&turns, b, a));
        // arriving heading east, both candidates go straight ahead
        assert_eq!(
            selector.select(&turns, vec2(-1.0, 0.0), vec2(0.0, 0.0), &[a, b]),
            Some(b)
        );
    }

    #[test]
    fn collinear_tie_by_partner_targets() {
        let (arena, _) = setup();
        let strategy = CartesianStrategy::default();
        let options = OverlayOptions::new();
        let selector = EdgeSelector::new(&arena, &strategy, &options, OperationType::Union);
        let (a, b) = (Toi::new(0, 0), Toi::new(1, 0));
        let (p1, p2) = (vec2(-1.0, 0.0), vec2(0.0, 0.0));

        // b heads to turn 3 where its own partner heads as well
        let turns = collinear_table([[Some(2), Some(4)], [Some(3), Some(3)]]);
        assert!(!selector.collinear_target_first(&turns, a, b));
        assert_eq!(selector.select(&turns, p1, p2, &[a, b]), Some(b));

        // no shared targets, first candidate kept
        let turns = collinear_table([[Some(2), Some(4)], [Some(3), Some(4)]]);
        assert!(selector.collinear_target_first(&turns, a, b));
        assert!(selector.collinear_target_first(&turns, b, a));
        assert_eq!(selector.select(&turns, p1, p2, &[a, b]), Some(a));
    }
}
