//! Math primitives: points, distances, side tests, ring measures and segment intersection.
mod base_math;
mod segment_intersect;
mod vector2;

pub use base_math::*;
pub use segment_intersect::{segment_intr, SegmentIntersection, SegmentIntersectionPoint};
pub use vector2::{vec2, Vector2};
