//! Planar outlines placed on a surface by an affine transform.
//!
//! An [`Outline`] is the shape-local description of something to draw,
//! built from `kurbo` shapes. It is paired with a `kurbo::Affine` as a
//! [`TransformedShape`] when handed to a drawing surface, and flattened to a
//! `BezPath` on demand.
//!
//! # Angles
//!
//! Pie angles given to [`Outline::pie`] are degrees in the view convention:
//! the point at angle `a` is `(cos a, -sin a) * radius`, so positive angles
//! sweep counter-clockwise on a y-down surface. `kurbo` measures angles the
//! other way round (`(cos t, sin t)`), so the stored [`CircleSegment`] holds
//! the negated angles in radians. [`view_start_deg`] and [`view_extent_deg`]
//! convert back.

use kurbo::{Affine, BezPath, Circle, CircleSegment, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// Flattening tolerance used when converting curves to Bezier paths, in
/// shape-local units.
pub const PATH_TOLERANCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

/// A shape expressed as a planar outline in its own local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outline {
    /// Full circle.
    Circle(Circle),
    /// Pie slice: an arc plus both radii, inner radius zero.
    Pie(CircleSegment),
    /// Free-form path. An empty path draws nothing.
    Path(BezPath),
}

impl Outline {
    /// Circle of the given diameter centred on the origin.
    pub fn circle(diameter: f64) -> Self {
        Outline::Circle(Circle::new(Point::ORIGIN, diameter / 2.0))
    }

    /// Pie slice of `radius` with its apex on the origin.
    ///
    /// `start_deg` and `extent_deg` follow the view convention described in
    /// the module docs. Extents beyond a full turn are clamped to one turn.
    pub fn pie(radius: f64, start_deg: f64, extent_deg: f64) -> Self {
        let extent_deg = extent_deg.clamp(-360.0, 360.0);
        Outline::Pie(CircleSegment::new(
            Point::ORIGIN,
            radius,
            0.0,
            -start_deg.to_radians(),
            -extent_deg.to_radians(),
        ))
    }

    /// An outline with no geometry.
    pub fn empty() -> Self {
        Outline::Path(BezPath::new())
    }

    /// True when the outline contributes nothing to a fill or stroke.
    pub fn is_empty(&self) -> bool {
        matches!(self, Outline::Path(path) if path.elements().is_empty())
    }

    /// Evaluate into lines and cubic curves.
    pub fn to_path(&self) -> BezPath {
        match self {
            Outline::Circle(circle) => circle.to_path(PATH_TOLERANCE),
            Outline::Pie(segment) => segment.to_path(PATH_TOLERANCE),
            Outline::Path(path) => path.clone(),
        }
    }

    /// Pair this outline with the transform that places it on a surface.
    pub fn transformed(self, transform: Affine) -> TransformedShape {
        TransformedShape::new(self, transform)
    }
}

/// Start angle of a pie in view-convention degrees.
pub fn view_start_deg(segment: &CircleSegment) -> f64 {
    -segment.start_angle.to_degrees()
}

/// Sweep of a pie in view-convention degrees.
pub fn view_extent_deg(segment: &CircleSegment) -> f64 {
    -segment.sweep_angle.to_degrees()
}

// ---------------------------------------------------------------------------
// TransformedShape
// ---------------------------------------------------------------------------

/// An outline together with the affine transform that maps it onto a
/// surface.
///
/// `outline` stays in shape-local coordinates. [`to_path`](Self::to_path)
/// produces the transformed geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedShape {
    pub outline: Outline,
    pub transform: Affine,
}

impl TransformedShape {
    pub fn new(outline: Outline, transform: Affine) -> Self {
        Self { outline, transform }
    }

    /// The outline evaluated and mapped into surface coordinates.
    pub fn to_path(&self) -> BezPath {
        let mut path = self.outline.to_path();
        path.apply_affine(self.transform);
        path
    }

    /// Surface-space bounds of the evaluated path, `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let path = self.to_path();
        if path.elements().is_empty() {
            None
        } else {
            Some(path.bounding_box())
        }
    }
}
