//! Assembly of traversed and untouched rings into output polygons.
use super::{
    arena::{clean_ring_points, RingArena},
    turn::{OperationType, Turn},
    OverlayOptions,
};
use crate::{
    core::{
        math::{midpoint, ring_perimeter, signed_area, Vector2},
        traits::Real,
    },
    error::OverlayError,
    geometry::{extents_of, ClosureConvention, MultiPolygon, Polygon, Ring, RingOrientation},
    strategy::{Location, OverlayStrategy, RingLocation},
};
use static_aabb2d_index::{StaticAABB2DIndexBuilder, AABB};
use std::collections::BTreeSet;

/// Rings of the arena that no turn touches and that belong to the result for `target`.
///
/// A ring is kept for `Union` when it lies outside the other source and for `Intersection` when
/// it lies inside (as stored, so reversed sources select by their complement). Rings are returned
/// in arena orientation.
pub fn select_untouched_rings<T, S>(
    arena: &RingArena<T>,
    turns: &[Turn<T>],
    strategy: &S,
    target: OperationType,
) -> Vec<Vec<Vector2<T>>>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let touched: BTreeSet<_> = turns
        .iter()
        .flat_map(|t| t.operations.iter().map(|op| op.seg_id.ring_id()))
        .collect();

    let wanted = match target {
        OperationType::Union => Location::Outside,
        _ => Location::Inside,
    };

    let mut result = Vec::new();
    for (r, ring) in arena.rings().iter().enumerate() {
        if !ring.closed || touched.contains(&ring.id) {
            continue;
        }

        let other = 1 - ring.id.source_index;
        match representative_location(arena.ring_points(r), |p| arena.locate(p, other, strategy)) {
            Some(location) if location == wanted => result.push(arena.ring_points(r).to_vec()),
            _ => {}
        }
    }

    result
}

/// Location of the first ring vertex (then segment midpoint) that is not on the boundary.
fn representative_location<T, F>(points: &[Vector2<T>], mut locate: F) -> Option<Location>
where
    T: Real,
    F: FnMut(Vector2<T>) -> Location,
{
    let vertexes = points.iter().copied();
    let midpoints = (0..points.len()).map(|i| midpoint(points[i], points[(i + 1) % points.len()]));
    vertexes
        .chain(midpoints)
        .map(&mut locate)
        .find(|l| *l != Location::OnBoundary)
}

#[derive(Debug, Clone)]
struct AssemblyRing<T> {
    points: Vec<Vector2<T>>,
    area: T,
    extents: AABB<T>,
}

/// Build the output polygons from closed rings in internal orientation (exteriors clockwise,
/// holes counter clockwise).
///
/// Rings with less than 3 distinct points or with an area not exceeding `pos_equal_eps *
/// perimeter` are dropped. Each hole is given to the smallest exterior containing it, holes
/// contained by no exterior are dropped. Polygons are emitted in the order their exteriors appear
/// in `rings`.
pub fn assemble<T, S>(
    rings: Vec<Vec<Vector2<T>>>,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let eps = options.pos_equal_eps;
    let mut exteriors = Vec::new();
    let mut holes = Vec::new();
    let mut cleaned = Vec::new();
    for points in rings {
        clean_ring_points(&points, eps, true, &mut cleaned);
        if cleaned.len() < 3 {
            continue;
        }

        let area = signed_area(&cleaned);
        if area.abs() <= eps * ring_perimeter(&cleaned) {
            if options.debug_trace {
                log::debug!("dropping ring with {} points and area {}", cleaned.len(), area);
            }
            continue;
        }

        let extents = match extents_of(&cleaned) {
            Some(e) => e,
            None => continue,
        };

        let ring = AssemblyRing {
            points: cleaned.clone(),
            area,
            extents,
        };
        if area < T::zero() {
            exteriors.push(ring);
        } else {
            holes.push(ring);
        }
    }

    if exteriors.is_empty() {
        if !holes.is_empty() {
            log::warn!("dropping {} holes without exterior ring", holes.len());
        }
        return Ok(MultiPolygon::empty());
    }

    let mut hole_lists: Vec<Vec<AssemblyRing<T>>> = vec![Vec::new(); exteriors.len()];
    if !holes.is_empty() {
        let mut builder = StaticAABB2DIndexBuilder::new(exteriors.len());
        for e in exteriors.iter() {
            builder.add(e.extents.min_x, e.extents.min_y, e.extents.max_x, e.extents.max_y);
        }
        let index = builder
            .build()
            .map_err(|e| OverlayError::SpatialIndex(e.to_string()))?;

        let mut query_stack = Vec::new();
        for hole in holes {
            let b = hole.extents;
            let mut candidates = Vec::new();
            let mut query_visitor = |i: usize| {
                candidates.push(i);
            };
            index.visit_query_with_stack(
                b.min_x,
                b.min_y,
                b.max_x,
                b.max_y,
                &mut query_visitor,
                &mut query_stack,
            );
            candidates.sort_unstable();

            let mut owner: Option<usize> = None;
            for i in candidates {
                let exterior = &exteriors[i];
                let inside = representative_location(&hole.points, |p| {
                    match strategy.locate_in_ring(p, &exterior.points) {
                        RingLocation::OnBoundary => Location::OnBoundary,
                        RingLocation::Winding(0) => Location::Outside,
                        RingLocation::Winding(_) => Location::Inside,
                    }
                }) == Some(Location::Inside);

                if inside && owner.map_or(true, |o| exterior.area.abs() < exteriors[o].area.abs()) {
                    owner = Some(i);
                }
            }

            match owner {
                Some(o) => hole_lists[o].push(hole),
                None => log::warn!(
                    "dropping hole with {} points not contained by any exterior",
                    hole.points.len()
                ),
            }
        }
    }

    let polygons = exteriors
        .into_iter()
        .zip(hole_lists)
        .map(|(exterior, holes)| {
            Polygon::new(
                output_ring(exterior.points, options),
                holes
                    .into_iter()
                    .map(|h| output_ring(h.points, options))
                    .collect(),
            )
        })
        .collect();

    Ok(polygons)
}

/// Convert an internally oriented ring to the requested output orientation and closure.
fn output_ring<T>(mut points: Vec<Vector2<T>>, options: &OverlayOptions<T>) -> Ring<T>
where
    T: Real,
{
    // internal orientation is clockwise for exteriors
    if options.output_orientation == RingOrientation::CounterClockwise {
        points.reverse();
    }

    if options.closure == ClosureConvention::Closed {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }

    Ring::from_points(points)
}
