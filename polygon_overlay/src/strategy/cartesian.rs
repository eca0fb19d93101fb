use super::{OverlayStrategy, RingLocation};
use crate::core::{
    math::{dist_to_segment, segment_intr, side_of_line, SegmentIntersection, Vector2},
    traits::Real,
};

/// Planar strategy: tolerance based side test, parametric segment intersection and winding number
/// point location.
#[derive(Debug, Copy, Clone)]
pub struct CartesianStrategy<T = f64> {
    /// Distance tolerance for collinearity, coincidence and on-boundary checks.
    pub epsilon: T,
}

impl<T> CartesianStrategy<T>
where
    T: Real,
{
    pub fn new(epsilon: T) -> Self {
        Self { epsilon }
    }
}

impl<T> Default for CartesianStrategy<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new(T::fuzzy_epsilon())
    }
}

impl<T> OverlayStrategy<T> for CartesianStrategy<T>
where
    T: Real,
{
    #[inline]
    fn epsilon(&self) -> T {
        self.epsilon
    }

    #[inline]
    fn side(&self, p1: Vector2<T>, p2: Vector2<T>, p: Vector2<T>) -> i32 {
        side_of_line(p1, p2, p, self.epsilon)
    }

    #[inline]
    fn segment_intersection(
        &self,
        a1: Vector2<T>,
        a2: Vector2<T>,
        b1: Vector2<T>,
        b2: Vector2<T>,
    ) -> SegmentIntersection<T> {
        segment_intr(a1, a2, b1, b2, self.epsilon)
    }

    fn locate_in_ring(&self, point: Vector2<T>, ring: &[Vector2<T>]) -> RingLocation {
        let n = ring.len();
        if n == 0 {
            return RingLocation::Winding(0);
        }

        let mut winding = 0;
        for i in 0..n {
            let v1 = ring[i];
            let v2 = ring[(i + 1) % n];
            if dist_to_segment(v1, v2, point) <= self.epsilon {
                return RingLocation::OnBoundary;
            }

            let is_left = (v2 - v1).perp_dot(point - v1);
            if v1.y <= point.y {
                if v2.y > point.y && is_left > T::zero() {
                    winding += 1;
                }
            } else if v2.y <= point.y && is_left < T::zero() {
                winding -= 1;
            }
        }

        RingLocation::Winding(winding)
    }
}
