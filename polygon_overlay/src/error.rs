use crate::geometry::GeometryKind;
use thiserror::Error;

/// Contract violations rejected before any turn finding begins.
///
/// Topological problems in the input (self intersections, inconsistent orientation, degenerate
/// rings) are not errors, the overlay degrades gracefully on them instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("non-finite coordinate ({x}, {y}) in input geometry {source_index}")]
    NonFiniteCoordinate {
        source_index: usize,
        x: f64,
        y: f64,
    },

    #[error("tolerance {name} = {value} must be finite and positive")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("{operation} is not supported for {kind:?} input geometry {source_index}")]
    UnsupportedGeometry {
        operation: &'static str,
        kind: GeometryKind,
        source_index: usize,
    },

    #[error("failed to build spatial index: {0}")]
    SpatialIndex(String),
}
