//! Boolean overlay of areal geometries (and clipping of linear geometries by areal ones).
//!
//! The pipeline for one areal operation:
//! 1. load both inputs into a [RingArena](arena::RingArena) with normalized orientation (the second
//!    input reversed for difference),
//! 2. find turns ([get_turns]) using monotonic sections and a spatial index,
//! 3. enrich turns (travel links along each ring) and cluster coincident turns,
//! 4. classify unresolved operations and rank the operations leaving each cluster,
//! 5. traverse the turn graph emitting rings,
//! 6. add untouched rings and assemble rings into polygons.
pub mod arena;
pub mod assemble;
pub mod cluster;
pub mod enrich;
pub mod follow;
pub mod get_turns;
pub mod sections;
pub mod segment_id;
pub mod select_edge;
pub mod traverse;
pub mod turn;

pub use cluster::Cluster;
pub use follow::clip_linestring;
pub use get_turns::{get_self_turns, get_turns, get_turns_interruptible, TurnInfo, TurnVisitor};
pub use segment_id::{RingId, SegmentId};
pub use traverse::{AbortReason, TraverseStatus, TraversedRing};
pub use turn::{EnrichmentInfo, Method, OperationType, Toi, Turn, TurnOperation, Visited};

use self::{
    arena::RingArena,
    assemble::{assemble, select_untouched_rings},
    cluster::{assign_ranks, cluster_turns},
    enrich::{classify_operations, enrich_turns},
    get_turns::visit_turns,
    traverse::{ring_points, traverse},
};
use crate::{
    core::{math::Vector2, traits::Real, Control},
    error::OverlayError,
    geometry::{ClosureConvention, Geometry, MultiPolygon, Polygon, RingOrientation},
    strategy::{CartesianStrategy, Location, OverlayStrategy},
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Boolean operation to perform.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayOp {
    /// Area covered by either geometry.
    Union,
    /// Area covered by both geometries.
    Intersection,
    /// Area covered by the first geometry but not the second.
    Difference,
    /// Area covered by exactly one of the geometries.
    SymDifference,
}

impl OverlayOp {
    pub fn name(self) -> &'static str {
        match self {
            OverlayOp::Union => "union",
            OverlayOp::Intersection => "intersection",
            OverlayOp::Difference => "difference",
            OverlayOp::SymDifference => "sym_difference",
        }
    }
}

impl fmt::Display for OverlayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters for overlay operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions<T> {
    /// Fuzzy comparison epsilon used for determining if two positions are equal (merging repeated
    /// points, grouping turns, clustering and discarding degenerate rings).
    pub pos_equal_eps: T,
    /// Relative tolerance for deciding if two directions leaving a cluster are collinear.
    pub collinear_eps: T,
    /// Orientation of output exterior rings (holes get the opposite orientation).
    pub output_orientation: RingOrientation,
    /// Whether output rings repeat their first point.
    pub closure: ClosureConvention,
    /// Take the first of two equally ranked union candidates in a cluster when both lead to the
    /// same next node instead of comparing them further.
    pub cluster_rank_shortcut: bool,
    /// Abort a ring when the selected operation was already visited. When `false` traversal
    /// reselects among the unvisited candidates instead.
    pub abort_on_revisit: bool,
    /// Include rings whose traversal aborted in the output.
    pub keep_aborted_rings: bool,
    /// Log turn lists, selector decisions and traversal progress at debug/trace level.
    pub debug_trace: bool,
}

impl<T> OverlayOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from_f64(1e-5),
            collinear_eps: T::from_f64(1e-8),
            output_orientation: RingOrientation::CounterClockwise,
            closure: ClosureConvention::Closed,
            cluster_rank_shortcut: true,
            abort_on_revisit: true,
            keep_aborted_rings: false,
            debug_trace: false,
        }
    }

    /// Check that the tolerances are finite and positive.
    pub fn validate(&self) -> Result<(), OverlayError> {
        let check = |name: &'static str, value: T| {
            if value.is_finite() && value > T::zero() {
                Ok(())
            } else {
                Err(OverlayError::InvalidTolerance {
                    name,
                    value: value.to_f64().unwrap_or(f64::NAN),
                })
            }
        };

        check("pos_equal_eps", self.pos_equal_eps)?;
        check("collinear_eps", self.collinear_eps)
    }
}

impl<T> Default for OverlayOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Reject geometries with non-finite coordinates.
pub(crate) fn validate_input<T>(geometry: &Geometry<T>, source_index: usize) -> Result<(), OverlayError>
where
    T: Real,
{
    let mut bad = None;
    geometry.for_each_point(|p| {
        if bad.is_none() && !p.is_finite() {
            bad = Some(p);
        }
    });

    match bad {
        Some(p) => Err(OverlayError::NonFiniteCoordinate {
            source_index,
            x: p.x.to_f64().unwrap_or(f64::NAN),
            y: p.y.to_f64().unwrap_or(f64::NAN),
        }),
        None => Ok(()),
    }
}

fn require_areal<T>(geometry: &Geometry<T>, source_index: usize, op: OverlayOp) -> Result<(), OverlayError>
where
    T: Real,
{
    if geometry.is_areal() {
        Ok(())
    } else {
        Err(OverlayError::UnsupportedGeometry {
            operation: op.name(),
            kind: geometry.kind(),
            source_index,
        })
    }
}

/// Perform the boolean operation `op` on two areal geometries.
///
/// Output polygons follow `options.output_orientation` and `options.closure`, holes are assigned
/// to the smallest containing exterior. Invalid input (self intersections, wrong orientation,
/// spikes) does not produce an error, the result is then best effort.
///
/// # Errors
///
/// Returns an error for non-finite coordinates, invalid tolerances or linear input.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::geometry::*;
/// # use polygon_overlay::overlay::*;
/// # use polygon_overlay::strategy::CartesianStrategy;
/// let a = Geometry::from(Rect::new(0.0_f64, 0.0, 2.0, 2.0));
/// let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
/// let strategy = CartesianStrategy::default();
/// let options = OverlayOptions::new();
/// let result = overlay(&a, &b, OverlayOp::Union, &strategy, &options).unwrap();
/// assert_eq!(result.len(), 1);
/// assert!((result.area() - 7.0).abs() < 1e-9);
/// ```
pub fn overlay<T, S>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
    op: OverlayOp,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let mut result = MultiPolygon::empty();
    append_overlay(geometry1, geometry2, op, strategy, options, &mut result)?;
    Ok(result)
}

/// Same as [overlay] but appends the output polygons to `out`.
pub fn append_overlay<T, S, E>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
    op: OverlayOp,
    strategy: &S,
    options: &OverlayOptions<T>,
    out: &mut E,
) -> Result<(), OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
    E: Extend<Polygon<T>>,
{
    options.validate()?;
    validate_input(geometry1, 0)?;
    validate_input(geometry2, 1)?;
    require_areal(geometry1, 0, op)?;
    require_areal(geometry2, 1, op)?;

    let run = |g1: &Geometry<T>, g2: &Geometry<T>, reverse_second: bool, target: OperationType| {
        overlay_areal(g1, g2, [false, reverse_second], target, strategy, options)
    };

    match op {
        OverlayOp::Union => out.extend(run(geometry1, geometry2, false, OperationType::Union)?),
        OverlayOp::Intersection => {
            out.extend(run(geometry1, geometry2, false, OperationType::Intersection)?)
        }
        OverlayOp::Difference => {
            out.extend(run(geometry1, geometry2, true, OperationType::Intersection)?)
        }
        OverlayOp::SymDifference => {
            let a_minus_b = run(geometry1, geometry2, true, OperationType::Intersection)?;
            let b_minus_a = run(geometry2, geometry1, true, OperationType::Intersection)?;
            out.extend(a_minus_b);
            out.extend(b_minus_a);
        }
    }

    Ok(())
}

/// Run the full pipeline for one traversal target. Difference is an intersection with the second
/// source reversed.
fn overlay_areal<T, S>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
    reversed: [bool; 2],
    target: OperationType,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    let arena = RingArena::new(geometry1, geometry2, reversed, options.pos_equal_eps);
    let mut turns = Vec::new();
    let mut spikes = Vec::new();
    visit_turns(&arena, strategy, options, &mut spikes, &mut |t: &Turn<T>| {
        turns.push(t.clone());
        Control::<()>::Continue
    })?;

    let half_edges = enrich_turns(&mut turns, &arena, options);
    let clusters = cluster_turns(&mut turns, options)?;
    classify_operations(&mut turns, &arena, strategy, options);
    assign_ranks(&mut turns, &clusters, &arena, options);

    if options.debug_trace {
        log::debug!(
            "{:?} overlay: {} turns, {} clusters, {} spikes",
            target,
            turns.len(),
            clusters.len(),
            spikes.len()
        );
        for (i, t) in turns.iter().enumerate() {
            log::debug!("turn {}: {}", i, t);
        }
    }

    let traversed = traverse(
        &mut turns,
        &clusters,
        &half_edges,
        &arena,
        strategy,
        options,
        target,
    );

    let mut rings = ring_points(traversed, options.keep_aborted_rings);
    rings.extend(select_untouched_rings(&arena, &turns, strategy, target));

    assemble(rings, strategy, options)
}

/// Union of two areal geometries using the planar strategy and default options.
pub fn union<T>(geometry1: &Geometry<T>, geometry2: &Geometry<T>) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
{
    overlay(
        geometry1,
        geometry2,
        OverlayOp::Union,
        &CartesianStrategy::default(),
        &OverlayOptions::new(),
    )
}

/// Intersection of two areal geometries using the planar strategy and default options.
pub fn intersection<T>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
{
    overlay(
        geometry1,
        geometry2,
        OverlayOp::Intersection,
        &CartesianStrategy::default(),
        &OverlayOptions::new(),
    )
}

/// `geometry1` minus `geometry2` using the planar strategy and default options.
pub fn difference<T>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
{
    overlay(
        geometry1,
        geometry2,
        OverlayOp::Difference,
        &CartesianStrategy::default(),
        &OverlayOptions::new(),
    )
}

/// Symmetric difference of two areal geometries using the planar strategy and default options.
pub fn sym_difference<T>(
    geometry1: &Geometry<T>,
    geometry2: &Geometry<T>,
) -> Result<MultiPolygon<T>, OverlayError>
where
    T: Real,
{
    overlay(
        geometry1,
        geometry2,
        OverlayOp::SymDifference,
        &CartesianStrategy::default(),
        &OverlayOptions::new(),
    )
}

fn first_point<T>(geometry: &Geometry<T>) -> Option<Vector2<T>>
where
    T: Real,
{
    let mut first = None;
    geometry.for_each_point(|p| {
        if first.is_none() {
            first = Some(p);
        }
    });
    first
}

/// `true` if the geometries share at least one point (boundaries touching counts).
///
/// Turn finding stops at the first turn. Without turns one geometry intersects the other only if
/// it lies entirely inside it, which is decided by locating a single vertex.
pub fn intersects<T>(geometry1: &Geometry<T>, geometry2: &Geometry<T>) -> Result<bool, OverlayError>
where
    T: Real,
{
    let strategy = CartesianStrategy::default();
    let options = OverlayOptions::new();
    let completed = get_turns_interruptible(
        geometry1,
        geometry2,
        &strategy,
        &options,
        &mut |_: &Turn<T>| Control::Break(()),
    )?;
    if !completed {
        return Ok(true);
    }

    let inside = |a: &Geometry<T>, b: &Geometry<T>| {
        first_point(a).map_or(false, |p| strategy.locate_in_geometry(p, b) != Location::Outside)
    };

    Ok(inside(geometry1, geometry2) || inside(geometry2, geometry1))
}

/// `true` if the geometries share no point, the negation of [intersects].
pub fn disjoint<T>(geometry1: &Geometry<T>, geometry2: &Geometry<T>) -> Result<bool, OverlayError>
where
    T: Real,
{
    intersects(geometry1, geometry2).map(|i| !i)
}

/// `true` if the geometry intersects itself.
///
/// Rings of one polygon may touch each other at points, any other self turn (crossings, touches
/// within one ring, shared segments) counts as a self intersection. Spikes count as well.
pub fn has_self_intersections<T>(geometry: &Geometry<T>) -> Result<bool, OverlayError>
where
    T: Real,
{
    let info = get_self_turns(geometry, &CartesianStrategy::default(), &OverlayOptions::new())?;
    if !info.spikes.is_empty() {
        return Ok(true);
    }

    Ok(info.turns.iter().any(|t| {
        let touch = matches!(t.method, Method::Touch | Method::TouchInterior);
        let same_ring = t.operations[0].seg_id.ring_id() == t.operations[1].seg_id.ring_id();
        !touch || same_ring
    }))
}
