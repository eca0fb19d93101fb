//! Boolean overlay (union, intersection, difference, symmetric difference) of planar polygons,
//! multi polygons and boxes, plus clipping of line strings by areal geometries.
//!
//! Start with [overlay::overlay] (or the [overlay::union], [overlay::intersection],
//! [overlay::difference] and [overlay::sym_difference] shortcuts). Geometry types live in
//! [geometry], the numeric predicates the engine relies on are supplied through an
//! [strategy::OverlayStrategy].
//!
//! # Examples
//!
//! ```
//! use polygon_overlay::geometry::{Geometry, Rect};
//! use polygon_overlay::overlay;
//!
//! let a = Geometry::from(Rect::new(0.0_f64, 0.0, 2.0, 2.0));
//! let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
//! let common = overlay::intersection(&a, &b).unwrap();
//! assert!((common.area() - 1.0).abs() < 1e-9);
//! ```
extern crate static_aabb2d_index;

#[macro_use]
mod macros;

#[macro_use]
pub mod core;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod strategy;

pub use static_aabb2d_index::AABB;

pub use crate::error::OverlayError;
