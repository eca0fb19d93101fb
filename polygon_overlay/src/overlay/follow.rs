//! Linear clipping: splits line strings at their turns with an areal geometry and keeps the pieces
//! on the requested side.
use super::{
    arena::{push_point_remove_repeat, RingArena},
    get_turns::visit_turns,
    turn::Turn,
    validate_input, OverlayOp, OverlayOptions,
};
use crate::{
    core::{
        math::{midpoint, Vector2},
        traits::Real,
        Control,
    },
    error::OverlayError,
    geometry::{Geometry, LineString, MultiLineString},
    strategy::{Location, OverlayStrategy},
};
use std::cmp::Ordering;

/// Clip the line strings of `line` against the areal geometry `areal`.
///
/// `OverlayOp::Intersection` keeps the pieces inside `areal` or on its boundary,
/// `OverlayOp::Difference` keeps the pieces outside. Adjacent kept pieces are merged so a line
/// running through a touching point comes out as a single line string. Lines are returned in input
/// order, pieces of one line in the order they appear along it.
///
/// # Errors
///
/// Returns [OverlayError::UnsupportedGeometry] if `line` is not linear, `areal` is not areal or
/// `op` is neither intersection nor difference.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::geometry::*;
/// # use polygon_overlay::core::math::vec2;
/// # use polygon_overlay::overlay::*;
/// # use polygon_overlay::strategy::CartesianStrategy;
/// let line = LineString::from_points(vec![vec2(-1.0_f64, 0.5), vec2(2.0, 0.5)]);
/// let square = Rect::new(0.0, 0.0, 1.0, 1.0);
/// let clipped = clip_linestring(
///     &Geometry::from(line),
///     &Geometry::from(square),
///     OverlayOp::Intersection,
///     &CartesianStrategy::default(),
///     &OverlayOptions::new(),
/// )
/// .unwrap();
/// assert_eq!(clipped.len(), 1);
/// assert!((clipped.length() - 1.0).abs() < 1e-9);
/// ```
pub fn clip_linestring<T, S>(
    line: &Geometry<T>,
    areal: &Geometry<T>,
    op: OverlayOp,
    strategy: &S,
    options: &OverlayOptions<T>,
) -> Result<MultiLineString<T>, OverlayError>
where
    T: Real,
    S: OverlayStrategy<T>,
{
    options.validate()?;
    validate_input(line, 0)?;
    validate_input(areal, 1)?;
    if !line.is_linear() {
        return Err(OverlayError::UnsupportedGeometry {
            operation: "line clipping",
            kind: line.kind(),
            source_index: 0,
        });
    }
    if !areal.is_areal() {
        return Err(OverlayError::UnsupportedGeometry {
            operation: "line clipping",
            kind: areal.kind(),
            source_index: 1,
        });
    }
    let keep_inside = match op {
        OverlayOp::Intersection => true,
        OverlayOp::Difference => false,
        OverlayOp::Union | OverlayOp::SymDifference => {
            return Err(OverlayError::UnsupportedGeometry {
                operation: op.name(),
                kind: line.kind(),
                source_index: 0,
            })
        }
    };

    let eps = options.pos_equal_eps;
    let arena = RingArena::new(line, areal, [false, false], eps);
    let mut turns = Vec::new();
    let mut spikes = Vec::new();
    visit_turns(&arena, strategy, options, &mut spikes, &mut |t: &Turn<T>| {
        turns.push(t.clone());
        Control::<()>::Continue
    })?;

    if options.debug_trace {
        for t in turns.iter() {
            log::debug!("line turn {}", t);
        }
    }

    let mut result = MultiLineString::default();
    for r in arena.source_rings(0) {
        let ring = arena.ring(r);
        let points = arena.ring_points(r);
        if points.len() < 2 {
            continue;
        }

        // cut positions along the line: (segment index, fraction, point)
        let last_seg = ring.segment_count() - 1;
        let mut cuts = vec![(0, T::zero(), points[0])];
        cuts.extend(
            turns
                .iter()
                .filter(|t| t.operations[0].seg_id.ring_id() == ring.id)
                .map(|t| {
                    let op = &t.operations[0];
                    (op.seg_id.segment_index, op.fraction, t.point)
                }),
        );
        cuts.push((last_seg, T::one(), points[points.len() - 1]));
        cuts.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        });
        cuts.dedup_by(|b, a| a.2.fuzzy_eq_eps(b.2, eps));

        let mut current: Vec<Vector2<T>> = Vec::new();
        let mut piece = Vec::new();
        for w in cuts.windows(2) {
            let (seg0, _, p0) = w[0];
            let (seg1, _, p1) = w[1];
            piece.clear();
            piece.push(p0);
            for v in (seg0 + 1)..=seg1 {
                push_point_remove_repeat(&mut piece, points[v], eps);
            }
            push_point_remove_repeat(&mut piece, p1, eps);
            if piece.len() < 2 {
                continue;
            }

            let location = arena.locate(midpoint(piece[0], piece[1]), 1, strategy);
            let keep = match location {
                Location::Outside => !keep_inside,
                Location::Inside | Location::OnBoundary => keep_inside,
            };

            if keep {
                if current.is_empty() {
                    current.push(piece[0]);
                }
                for &p in piece.iter().skip(1) {
                    push_point_remove_repeat(&mut current, p, eps);
                }
            } else if !current.is_empty() {
                let finished = std::mem::take(&mut current);
                result.line_strings.push(LineString::from_points(finished));
            }
        }

        if current.len() > 1 {
            result.line_strings.push(LineString::from_points(current));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::traits::FuzzyEq,
        core::math::vec2,
        geometry::{MultiPolygon, Polygon, Rect},
        strategy::CartesianStrategy,
    };

    fn clip(line: Vec<Vector2<f64>>, areal: Geometry<f64>, op: OverlayOp) -> MultiLineString<f64> {
        clip_linestring(
            &Geometry::from(LineString::from_points(line)),
            &areal,
            op,
            &CartesianStrategy::default(),
            &OverlayOptions::new(),
        )
        .unwrap()
    }

    #[test]
    fn line_through_box() {
        let line = vec![vec2(-1.0, 0.5), vec2(0.5, 0.5), vec2(2.0, 0.5)];
        let square = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let inside = clip(line.clone(), square.clone(), OverlayOp::Intersection);
        assert_eq!(inside.len(), 1);
        let points = &inside.line_strings[0].points;
        assert_eq!(points.len(), 3);
        assert_fuzzy_eq!(points[0], vec2(0.0, 0.5));
        assert_fuzzy_eq!(points[1], vec2(0.5, 0.5));
        assert_fuzzy_eq!(points[2], vec2(1.0, 0.5));

        let outside = clip(line, square, OverlayOp::Difference);
        assert_eq!(outside.len(), 2);
        assert_fuzzy_eq!(outside.length(), 2.0);
    }

    #[test]
    fn line_through_hole() {
        let polygon = Polygon::new(
            Rect::new(0.0, 0.0, 10.0, 10.0).to_ring(),
            vec![Rect::new(4.0, 4.0, 6.0, 6.0).to_ring()],
        );
        let line = vec![vec2(-1.0, 5.0), vec2(11.0, 5.0)];
        let areal = Geometry::from(MultiPolygon::new(vec![polygon]));
        let inside = clip(line, areal, OverlayOp::Intersection);
        assert_eq!(inside.len(), 2);
        assert_fuzzy_eq!(inside.length(), 8.0);
    }

    #[test]
    fn line_along_boundary_is_inside() {
        let line = vec![vec2(-1.0, 0.0), vec2(2.0, 0.0)];
        let square = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let inside = clip(line.clone(), square.clone(), OverlayOp::Intersection);
        assert_fuzzy_eq!(inside.length(), 1.0);
        let outside = clip(line, square, OverlayOp::Difference);
        assert_fuzzy_eq!(outside.length(), 2.0);
    }

    #[test]
    fn unsupported_inputs_rejected() {
        let square = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
        let line = Geometry::from(LineString::from_points(vec![vec2(0.0, 0.0), vec2(1.0, 1.0)]));
        let strategy = CartesianStrategy::default();
        let options = OverlayOptions::new();
        assert!(matches!(
            clip_linestring(&square, &square, OverlayOp::Intersection, &strategy, &options),
            Err(OverlayError::UnsupportedGeometry { source_index: 0, .. })
        ));
        assert!(matches!(
            clip_linestring(&line, &line, OverlayOp::Intersection, &strategy, &options),
            Err(OverlayError::UnsupportedGeometry { source_index: 1, .. })
        ));
        assert!(matches!(
            clip_linestring(&line, &square, OverlayOp::Union, &strategy, &options),
            Err(OverlayError::UnsupportedGeometry { .. })
        ));
    }
}
