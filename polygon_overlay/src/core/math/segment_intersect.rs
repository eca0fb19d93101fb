use super::{base_math::parametric_from_point, dist_to_segment, point_from_parametric, Vector2};
use crate::core::traits::Real;
use num_traits::Float;

/// One intersection location between two segments with its parametric position on each.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentIntersectionPoint<T = f64> {
    pub point: Vector2<T>,
    /// Parametric value along the first segment (`0` at its start, `1` at its end).
    pub seg1_t: T,
    /// Parametric value along the second segment.
    pub seg2_t: T,
}

/// Result of intersecting two line segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentIntersection<T = f64> {
    /// Segments do not intersect.
    Disjoint,
    /// Segments meet at a single point (a crossing or a touch).
    Point(SegmentIntersectionPoint<T>),
    /// Segments are collinear and share an interval, the two points are the interval end points
    /// ordered along the first segment.
    Overlap(SegmentIntersectionPoint<T>, SegmentIntersectionPoint<T>),
}

impl<T> SegmentIntersection<T>
where
    T: Real,
{
    /// Number of intersection points (0, 1 or 2).
    pub fn count(&self) -> usize {
        match self {
            SegmentIntersection::Disjoint => 0,
            SegmentIntersection::Point(_) => 1,
            SegmentIntersection::Overlap(..) => 2,
        }
    }

    pub fn is_overlap(&self) -> bool {
        matches!(self, SegmentIntersection::Overlap(..))
    }
}

/// Snaps parametric `t` to 0 or 1 when the position it represents is within `epsilon` of the
/// segment end points. `length` is the segment length.
#[inline]
fn snap_parametric<T>(t: T, length: T, epsilon: T) -> T
where
    T: Real,
{
    if (t * length).abs() <= epsilon {
        T::zero()
    } else if ((T::one() - t) * length).abs() <= epsilon {
        T::one()
    } else {
        t
    }
}

#[inline]
fn clamp_unit<T>(t: T) -> T
where
    T: Real,
{
    Float::min(Float::max(t, T::zero()), T::one())
}

#[inline]
fn point_at_snapped<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    if t == T::zero() {
        p0
    } else if t == T::one() {
        p1
    } else {
        point_from_parametric(p0, p1, t)
    }
}

/// Finds the intersection between the segments `v1->v2` and `u1->u2`.
///
/// All tolerance checks are done in position space: parametric values are scaled by segment length
/// before comparing against `epsilon`, so the result does not depend on segment length. Positions
/// within `epsilon` of a segment end point are snapped to that end point exactly.
///
/// Collinear segments (both end points of each within `epsilon` of the other's line) that share
/// more than a point produce [SegmentIntersection::Overlap].
///
/// # Examples
///
/// ```
/// # use polygon_overlay::core::math::*;
/// let r = segment_intr(
///     Vector2::new(0.0, 0.0),
///     Vector2::new(2.0, 2.0),
///     Vector2::new(0.0, 2.0),
///     Vector2::new(2.0, 0.0),
///     1e-9,
/// );
/// match r {
///     SegmentIntersection::Point(p) => {
///         assert_eq!(p.point, Vector2::new(1.0, 1.0));
///         assert_eq!(p.seg1_t, 0.5);
///     }
///     _ => unreachable!("expected crossing"),
/// }
///
/// let r = segment_intr(
///     Vector2::new(0.0, 0.0),
///     Vector2::new(4.0, 0.0),
///     Vector2::new(3.0, 0.0),
///     Vector2::new(1.0, 0.0),
///     1e-9,
/// );
/// assert!(r.is_overlap());
/// ```
pub fn segment_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> SegmentIntersection<T>
where
    T: Real,
{
    use SegmentIntersection::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_len = v.length();
    let u_len = u.length();

    if v_len <= epsilon || u_len <= epsilon {
        return degenerate_intr(v1, v2, u1, u2, v_len <= epsilon, epsilon);
    }

    // perpendicular distances of u end points from line v
    let d_u1 = v.perp_dot(u1 - v1) / v_len;
    let d_u2 = v.perp_dot(u2 - v1) / v_len;

    if d_u1.abs() <= epsilon && d_u2.abs() <= epsilon {
        return collinear_intr(v1, v2, u1, u2, v_len, u_len, epsilon);
    }

    let v_pdot_u = v.perp_dot(u);
    if v_pdot_u != T::zero() {
        let w = v1 - u1;
        let seg1_t = u.perp_dot(w) / v_pdot_u;
        let seg2_t = v.perp_dot(w) / v_pdot_u;
        let in_seg1 = (seg1_t * v_len).fuzzy_in_range_eps(T::zero(), v_len, epsilon);
        let in_seg2 = (seg2_t * u_len).fuzzy_in_range_eps(T::zero(), u_len, epsilon);
        if in_seg1 && in_seg2 {
            let seg1_t = snap_parametric(clamp_unit(seg1_t), v_len, epsilon);
            let seg2_t = snap_parametric(clamp_unit(seg2_t), u_len, epsilon);
            let point = if seg1_t == T::zero() || seg1_t == T::one() {
                point_at_snapped(v1, v2, seg1_t)
            } else if seg2_t == T::zero() || seg2_t == T::one() {
                point_at_snapped(u1, u2, seg2_t)
            } else {
                point_from_parametric(v1, v2, seg1_t)
            };

            return Point(SegmentIntersectionPoint {
                point,
                seg1_t,
                seg2_t,
            });
        }
    }

    // nearly parallel segments may still touch at an end point within tolerance while the line
    // intersection lies far away
    end_point_touch(v1, v2, u1, u2, epsilon).map_or(Disjoint, Point)
}

fn end_point_touch<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> Option<SegmentIntersectionPoint<T>>
where
    T: Real,
{
    let v_len = (v2 - v1).length();
    let u_len = (u2 - u1).length();
    for (p, on_v) in [(v1, true), (v2, true), (u1, false), (u2, false)] {
        let (s1, s2) = if on_v { (u1, u2) } else { (v1, v2) };
        if dist_to_segment(s1, s2, p) > epsilon {
            continue;
        }

        let (seg1_t, seg2_t) = if on_v {
            let t = parametric_from_point(u1, u2, p);
            (
                if p == v1 { T::zero() } else { T::one() },
                snap_parametric(clamp_unit(t), u_len, epsilon),
            )
        } else {
            let t = parametric_from_point(v1, v2, p);
            (
                snap_parametric(clamp_unit(t), v_len, epsilon),
                if p == u1 { T::zero() } else { T::one() },
            )
        };

        return Some(SegmentIntersectionPoint {
            point: p,
            seg1_t,
            seg2_t,
        });
    }

    None
}

fn collinear_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    v_len: T,
    u_len: T,
    epsilon: T,
) -> SegmentIntersection<T>
where
    T: Real,
{
    use SegmentIntersection::*;

    // interval of u projected onto v
    let s0 = parametric_from_point(v1, v2, u1);
    let s1 = parametric_from_point(v1, v2, u2);
    let (s_min, s_max) = super::min_max(s0, s1);
    let lo = Float::max(s_min, T::zero());
    let hi = Float::min(s_max, T::one());

    if (hi - lo) * v_len < -epsilon {
        return Disjoint;
    }

    let make_point = |s: T| {
        let seg1_t = snap_parametric(s, v_len, epsilon);
        let point = point_at_snapped(v1, v2, seg1_t);
        let t = clamp_unit(parametric_from_point(u1, u2, point));
        let seg2_t = snap_parametric(t, u_len, epsilon);
        let point = if seg1_t == T::zero() || seg1_t == T::one() {
            point
        } else {
            point_at_snapped(u1, u2, seg2_t)
        };
        SegmentIntersectionPoint {
            point,
            seg1_t,
            seg2_t,
        }
    };

    if (hi - lo) * v_len <= epsilon {
        // end to end contact
        let s = if (hi - lo) < T::zero() {
            (lo + hi) * T::half()
        } else {
            lo
        };
        return Point(make_point(s));
    }

    Overlap(make_point(lo), make_point(hi))
}

fn degenerate_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    v_is_point: bool,
    epsilon: T,
) -> SegmentIntersection<T>
where
    T: Real,
{
    use SegmentIntersection::*;

    if v_is_point {
        if dist_to_segment(u1, u2, v1) > epsilon {
            return Disjoint;
        }
        let u_len = (u2 - u1).length();
        let t = clamp_unit(parametric_from_point(u1, u2, v1));
        return Point(SegmentIntersectionPoint {
            point: v1,
            seg1_t: T::zero(),
            seg2_t: snap_parametric(t, u_len, epsilon),
        });
    }

    if dist_to_segment(v1, v2, u1) > epsilon {
        return Disjoint;
    }
    let v_len = (v2 - v1).length();
    let t = clamp_unit(parametric_from_point(v1, v2, u1));
    Point(SegmentIntersectionPoint {
        point: u1,
        seg1_t: snap_parametric(t, v_len, epsilon),
        seg2_t: T::zero(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    const EPS: f64 = 1e-9;

    #[test]
    fn crossing() {
        match segment_intr(vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(1.0, -1.0), vec2(1.0, 3.0), EPS) {
            SegmentIntersection::Point(p) => {
                assert_eq!(p.point, vec2(1.0, 0.0));
                assert_eq!(p.seg1_t, 0.25);
                assert_eq!(p.seg2_t, 0.25);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn touch_at_end_point_snaps() {
        match segment_intr(vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 5.0), EPS) {
            SegmentIntersection::Point(p) => {
                assert_eq!(p.point, vec2(2.0, 0.0));
                assert_eq!(p.seg1_t, 1.0);
                assert_eq!(p.seg2_t, 0.0);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn vertex_on_interior() {
        match segment_intr(vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 5.0), EPS) {
            SegmentIntersection::Point(p) => {
                assert_eq!(p.point, vec2(1.0, 0.0));
                assert_eq!(p.seg1_t, 0.5);
                assert_eq!(p.seg2_t, 0.0);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn parallel_disjoint() {
        let r = segment_intr(vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(0.0, 1.0), vec2(2.0, 1.0), EPS);
        assert_eq!(r, SegmentIntersection::Disjoint);
        let r = segment_intr(vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(3.0, 0.0), vec2(5.0, 0.0), EPS);
        assert_eq!(r, SegmentIntersection::Disjoint);
    }

    #[test]
    fn collinear_end_to_end() {
        match segment_intr(vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 0.0), vec2(5.0, 0.0), EPS) {
            SegmentIntersection::Point(p) => {
                assert_eq!(p.point, vec2(2.0, 0.0));
                assert_eq!(p.seg1_t, 1.0);
                assert_eq!(p.seg2_t, 0.0);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn overlap_opposite_direction() {
        match segment_intr(vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(3.0, 0.0), vec2(1.0, 0.0), EPS) {
            SegmentIntersection::Overlap(a, b) => {
                assert_eq!(a.point, vec2(1.0, 0.0));
                assert_eq!(a.seg1_t, 0.25);
                assert_eq!(a.seg2_t, 1.0);
                assert_eq!(b.point, vec2(3.0, 0.0));
                assert_eq!(b.seg1_t, 0.75);
                assert_eq!(b.seg2_t, 0.0);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn overlap_identical() {
        match segment_intr(vec2(0.0, 0.0), vec2(0.0, 1.0), vec2(0.0, 0.0), vec2(0.0, 1.0), EPS) {
            SegmentIntersection::Overlap(a, b) => {
                assert_eq!((a.seg1_t, a.seg2_t), (0.0, 0.0));
                assert_eq!((b.seg1_t, b.seg2_t), (1.0, 1.0));
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }
}
