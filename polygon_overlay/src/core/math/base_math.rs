use super::Vector2;
use crate::core::traits::Real;
use num_traits::Float;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::core::math::*;
/// let (min_val, max_val) = min_max(8.0, 4.0);
/// assert_eq!(min_val, 4.0);
/// assert_eq!(max_val, 8.0);
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) * T::half(), (p0.y + p1.y) * T::half())
}

/// Returns the point on the line segment going from `p0` to `p1` at parametric value `t`.
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Parametric value of the projection of `point` onto the line through `p0` and `p1`.
///
/// Returns zero for a degenerate (zero length) segment.
#[inline]
pub fn parametric_from_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len_sq = v.length_squared();
    if len_sq == T::zero() {
        return T::zero();
    }

    (point - p0).dot(v) / len_sq
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    let t = parametric_from_point(p0, p1, point);
    if t <= T::zero() {
        return p0;
    }

    if t >= T::one() {
        return p1;
    }

    point_from_parametric(p0, p1, t)
}

/// Distance from `point` to the line segment `p0` to `p1`.
#[inline]
pub fn dist_to_segment<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    dist_squared(line_seg_closest_point(p0, p1, point), point).sqrt()
}

/// Signed perpendicular distance of `point` from the directed line `p0` to `p1`, positive when
/// `point` is left of the line.
///
/// Falls back to the plain distance between `p0` and `point` if `p0` and `p1` coincide.
#[inline]
pub fn signed_line_distance<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len = v.length();
    if len == T::zero() {
        return (point - p0).length();
    }

    v.perp_dot(point - p0) / len
}

/// Side of `point` relative to the directed line `p0` to `p1`: `1` left, `-1` right and `0`
/// collinear (within `epsilon` perpendicular distance).
///
/// # Examples
///
/// ```
/// # use polygon_overlay::core::math::*;
/// let p0 = Vector2::new(0.0, 0.0);
/// let p1 = Vector2::new(2.0, 0.0);
/// assert_eq!(side_of_line(p0, p1, Vector2::new(1.0, 1.0), 1e-9), 1);
/// assert_eq!(side_of_line(p0, p1, Vector2::new(1.0, -1.0), 1e-9), -1);
/// assert_eq!(side_of_line(p0, p1, Vector2::new(5.0, 1e-12), 1e-9), 0);
/// ```
#[inline]
pub fn side_of_line<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>, epsilon: T) -> i32
where
    T: Real,
{
    signed_line_distance(p0, p1, point).fuzzy_sign_eps(epsilon)
}

/// Monotonic stand-in for the polar angle of the direction `v` in the range `[0, 4)`, increasing
/// counter clockwise starting from the positive x axis. Cheaper than `atan2` and sufficient for
/// sorting directions around a point.
#[inline]
pub fn pseudo_angle<T>(v: Vector2<T>) -> T
where
    T: Real,
{
    let sum = v.x.abs() + v.y.abs();
    if sum == T::zero() {
        return T::zero();
    }

    let p = v.x / sum;
    let one = T::one();
    let two = T::two();
    if v.y < T::zero() {
        two + two - (one - p)
    } else {
        one - p
    }
}

/// Shoelace signed area of the closed ring given by `points` (closing segment implied), positive
/// when counter clockwise.
pub fn signed_area<T>(points: &[Vector2<T>]) -> T
where
    T: Real,
{
    let n = points.len();
    if n < 3 {
        return T::zero();
    }

    let mut double_area = T::zero();
    let mut prev = points[n - 1];
    for &p in points {
        double_area = double_area + prev.perp_dot(p);
        prev = p;
    }

    double_area * T::half()
}

/// Length of the closed ring given by `points` (closing segment implied).
pub fn ring_perimeter<T>(points: &[Vector2<T>]) -> T
where
    T: Real,
{
    let n = points.len();
    if n < 2 {
        return T::zero();
    }

    let mut length = T::zero();
    let mut prev = points[n - 1];
    for &p in points {
        length = length + (p - prev).length();
        prev = p;
    }

    length
}

/// Largest absolute coordinate of `points`, zero for an empty slice.
pub fn max_abs_coordinate<T>(points: &[Vector2<T>]) -> T
where
    T: Real,
{
    points.iter().fold(T::zero(), |acc, p| {
        Float::max(acc, Float::max(p.x.abs(), p.y.abs()))
    })
}
