//! Smartcam Geom -- planar geometry for the smartcam visualizer effects.
//!
//! Points, vectors, affine transforms and Bezier paths come from `kurbo`,
//! which this crate re-exports. On top of it the crate adds what the
//! rendering effects share: 8-bit colors, the [`Outline`](outline::Outline)
//! shapes an effect hands to a surface, and the pie constructor that speaks
//! the view's angle convention.
//!
//! # Quick Start
//!
//! ```
//! use smartcam_geom::prelude::*;
//!
//! // A pie slice of radius 10, opening 90 degrees around the +x axis.
//! let pie = Outline::pie(10.0, -45.0, 90.0);
//!
//! // Move it to view pixel (100, 50) at zoom 2.
//! let transform = Affine::translate((100.0, 50.0)) * Affine::scale(2.0);
//! let shape = pie.transformed(transform);
//!
//! let path = shape.to_path();
//! assert_eq!(path.elements()[0], PathEl::MoveTo(Point::new(100.0, 50.0))); // pie apex
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod outline;

pub use kurbo;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use kurbo::{Affine, BezPath, Circle, CircleSegment, PathEl, Point, Rect, Shape, Vec2};

    pub use crate::color::Color;
    pub use crate::outline::{
        view_extent_deg, view_start_deg, Outline, TransformedShape, PATH_TOLERANCE,
    };
}
