//! Clustering of coincident turns and angular ranking of the operations leaving a cluster.
use super::{
    arena::RingArena,
    enrich::half_edge_end,
    turn::{op_at, op_at_mut, Toi, Turn},
    OverlayOptions,
};
use crate::{
    core::{
        math::{pseudo_angle, Vector2},
        traits::Real,
    },
    error::OverlayError,
};
use static_aabb2d_index::StaticAABB2DIndexBuilder;
use std::cmp::Ordering;

/// Turns sharing one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<T = f64> {
    /// Member turn indexes in ascending order.
    pub turn_indices: Vec<usize>,
    pub point: Vector2<T>,
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Group turns whose points are within `pos_equal_eps` of each other (transitively) into clusters.
///
/// Every clustered turn gets its `cluster_id` set and its point snapped to the cluster point (the
/// point of the lowest indexed member). Discarded turns are never clustered. Cluster ids follow the
/// order of the lowest member turn index.
pub fn cluster_turns<T>(
    turns: &mut [Turn<T>],
    options: &OverlayOptions<T>,
) -> Result<Vec<Cluster<T>>, OverlayError>
where
    T: Real,
{
    if turns.len() < 2 {
        return Ok(Vec::new());
    }

    let eps = options.pos_equal_eps;
    let mut builder = StaticAABB2DIndexBuilder::new(turns.len());
    for t in turns.iter() {
        builder.add(t.point.x, t.point.y, t.point.x, t.point.y);
    }
    let index = builder
        .build()
        .map_err(|e| OverlayError::SpatialIndex(e.to_string()))?;

    let mut parent: Vec<usize> = (0..turns.len()).collect();
    let mut query_stack = Vec::new();
    let mut hits = Vec::new();
    for (i, t) in turns.iter().enumerate() {
        hits.clear();
        let mut query_visitor = |j: usize| {
            if j > i {
                hits.push(j);
            }
        };
        index.visit_query_with_stack(
            t.point.x - eps,
            t.point.y - eps,
            t.point.x + eps,
            t.point.y + eps,
            &mut query_visitor,
            &mut query_stack,
        );

        for &j in hits.iter() {
            if !t.point.fuzzy_eq_eps(turns[j].point, eps) {
                continue;
            }
            let ri = find_root(&mut parent, i);
            let rj = find_root(&mut parent, j);
            if ri != rj {
                // lowest index stays the root
                let (lo, hi) = if ri < rj { (ri, rj) } else { (rj, ri) };
                parent[hi] = lo;
            }
        }
    }

    let mut clusters: Vec<Cluster<T>> = Vec::new();
    let mut cluster_of_root = vec![None; turns.len()];
    for i in 0..turns.len() {
        let root = find_root(&mut parent, i);
        if root == i {
            continue;
        }

        let cluster_id = match cluster_of_root[root] {
            Some(c) => c,
            None => {
                let c = clusters.len();
                clusters.push(Cluster {
                    turn_indices: vec![root],
                    point: turns[root].point,
                });
                turns[root].cluster_id = Some(c);
                cluster_of_root[root] = Some(c);
                c
            }
        };

        clusters[cluster_id].turn_indices.push(i);
        turns[i].cluster_id = Some(cluster_id);
        turns[i].point = clusters[cluster_id].point;
    }

    Ok(clusters)
}

/// Set `count_left` of every operation and the angular `rank` of every clustered operation.
///
/// Ranks order the leaving directions counter clockwise starting at the positive x axis. Leaving
/// directions that are collinear (within `collinear_eps`, relative to their lengths) and point the
/// same way share a rank. Must run after classification.
pub fn assign_ranks<T>(
    turns: &mut [Turn<T>],
    clusters: &[Cluster<T>],
    arena: &RingArena<T>,
    options: &OverlayOptions<T>,
) where
    T: Real,
{
    for turn in turns.iter_mut() {
        for op in turn.operations.iter_mut() {
            op.enriched.count_left = op.operation.count_left();
            op.enriched.rank = 0;
        }
    }

    let mut leaving: Vec<(Toi, Vector2<T>, T)> = Vec::new();
    for cluster in clusters {
        leaving.clear();
        for &t in cluster.turn_indices.iter() {
            for oi in 0..2 {
                let toi = Toi::new(t, oi);
                let dir = half_edge_end(turns, toi, arena)
                    .map_or(Vector2::zero(), |end| end - cluster.point);
                leaving.push((toi, dir, pseudo_angle(dir)));
            }
        }

        leaving.sort_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut rank = 0;
        for k in 0..leaving.len() {
            if k > 0 && !same_direction(leaving[k - 1].1, leaving[k].1, options.collinear_eps) {
                rank += 1;
            }
            op_at_mut(turns, leaving[k].0).enriched.rank = rank;
        }

        if options.debug_trace {
            for (toi, _, angle) in leaving.iter() {
                let op = op_at(turns, *toi);
                log::trace!(
                    "cluster at ({}, {}): {} {:?} angle {} rank {}",
                    cluster.point.x,
                    cluster.point.y,
                    toi,
                    op.operation,
                    angle,
                    op.enriched.rank
                );
            }
        }
    }
}

/// `true` if `a` and `b` are collinear and point the same way.
fn same_direction<T>(a: Vector2<T>, b: Vector2<T>, collinear_eps: T) -> bool
where
    T: Real,
{
    let scale = a.length() * b.length();
    if scale == T::zero() {
        return a.length_squared() == b.length_squared();
    }

    a.perp_dot(b).abs() <= collinear_eps * scale && a.dot(b) > T::zero()
}
