use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Coordinate value type of all geometries handled by the overlay engine.
///
/// Implemented for `f32` and `f64`. `IndexableNum` is required so coordinates can be loaded
/// directly into a [StaticAABB2DIndex](static_aabb2d_index::StaticAABB2DIndex).
pub trait Real:
    num_traits::Float
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + std::fmt::Display
    + IndexableNum
    + 'static
{
    fn two() -> Self;

    fn half() -> Self;

    /// Convert a constant into this type (used for tolerances and option defaults).
    fn from_f64(value: f64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn two() -> Self {
        2.0f32
    }

    #[inline]
    fn half() -> Self {
        0.5f32
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Real for f64 {
    #[inline]
    fn two() -> Self {
        2.0f64
    }

    #[inline]
    fn half() -> Self {
        0.5f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
