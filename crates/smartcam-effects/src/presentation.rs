//! Fixed-size presentation effect for camera/object simulations.
//!
//! Draws every node as a filled circle whose color tells its role, and every
//! vision action the node carries as a field-of-view pie outline oriented
//! along the node's heading. Sizes and colors are fixed so the picture reads
//! well on a projector.
//!
//! # Role Mapping
//!
//! | Node carries           | Role   | Fill            | Diameter |
//! |------------------------|--------|-----------------|----------|
//! | `wanted` (any others)  | Wanted | RGB(200, 0, 0)  | 2.5 or 4 |
//! | `vision`, not `wanted` | Camera | black           | 2.5      |
//! | neither                | Object | RGB(0, 150, 0)  | 4        |
//!
//! A wanted camera keeps the camera diameter. Field-of-view cones are
//! stroked in blue, after the marker.
//!
//! # Frames
//!
//! Shapes are built in a shape-local frame in world units and placed with
//! `translate(view) . scale(zoom) . rotate(-heading)`. The heading is
//! negated because the view's y axis grows downward while the world's grows
//! upward.

use smartcam_geom::color::Color;
use smartcam_geom::kurbo::{Affine, Vec2};
use smartcam_geom::outline::Outline;
use tracing::trace;

use crate::effect::{Effect, RenderError};
use crate::host::{
    Environment, EuclideanPhysics2D, Molecule, Node, ViewPoint, VisionParameters, Wormhole,
};
use crate::surface::Surface;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Name of the molecule marking a node as a target.
pub const WANTED_MOLECULE: &str = "wanted";

/// Name of the molecule marking a node as a camera.
pub const VISION_MOLECULE: &str = "vision";

/// Fill for wanted nodes: RGB(200, 0, 0).
pub const COLOR_WANTED: Color = Color::rgb(200, 0, 0);

/// Fill for plain objects: RGB(0, 150, 0).
pub const COLOR_OBJECT: Color = Color::rgb(0, 150, 0);

/// Fill for cameras.
pub const COLOR_CAMERA: Color = Color::BLACK;

/// Stroke for field-of-view cones.
pub const COLOR_FOV: Color = Color::BLUE;

/// Legend color of this effect.
pub const COLOR_SUMMARY: Color = Color::GREEN;

/// Marker diameter of nodes carrying `vision`, in world units.
pub const CAMERA_DIAMETER: f64 = 2.5;

/// Marker diameter of every other node, in world units.
pub const OBJECT_DIAMETER: f64 = 4.0;

// ---------------------------------------------------------------------------
// MarkerRole
// ---------------------------------------------------------------------------

/// Role of a node as far as marker color is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// Carries `wanted`. Takes precedence over `vision`.
    Wanted,
    /// Carries `vision` but not `wanted`.
    Camera,
    /// Carries neither.
    Object,
}

impl MarkerRole {
    /// Fill color of markers with this role.
    pub fn color(self) -> Color {
        match self {
            MarkerRole::Wanted => COLOR_WANTED,
            MarkerRole::Camera => COLOR_CAMERA,
            MarkerRole::Object => COLOR_OBJECT,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Heading angle in radians, world frame: `atan2(hy, hx)`.
pub fn heading_angle(heading: Vec2) -> f64 {
    heading.y.atan2(heading.x)
}

/// Transform from shape-local world units to view pixels.
///
/// `translate(view) * scale(zoom) * rotate(-heading_angle)`. The rotation is
/// negated because view y grows downward and world y grows upward.
pub fn view_transform(view: ViewPoint, zoom: f64, heading_angle: f64) -> Affine {
    Affine::translate(view.to_point().to_vec2())
        * Affine::scale(zoom)
        * Affine::rotate(-heading_angle)
}

/// Field-of-view pie in the shape-local frame.
///
/// Apex on the origin, radius `distance`, opening `angle_deg` symmetrically
/// around the +x axis (the heading direction).
///
/// A negative or non-finite distance, or a non-finite angle, has no framing
/// square and yields an empty outline.
pub fn field_of_view(vision: VisionParameters) -> Outline {
    let d = vision.distance;
    if !(d.is_finite() && d >= 0.0 && vision.angle_deg.is_finite()) {
        return Outline::empty();
    }
    Outline::pie(d, -vision.angle_deg / 2.0, vision.angle_deg)
}

// ---------------------------------------------------------------------------
// PresentationRenderer
// ---------------------------------------------------------------------------

/// Draws role markers and field-of-view cones at presentation sizes.
#[derive(Debug, Clone)]
pub struct PresentationRenderer {
    wanted: Molecule,
    vision: Molecule,
}

impl Default for PresentationRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationRenderer {
    /// Renderer keyed on the `wanted` and `vision` molecules.
    pub fn new() -> Self {
        Self {
            wanted: Molecule::new(WANTED_MOLECULE),
            vision: Molecule::new(VISION_MOLECULE),
        }
    }

    /// Classify `node`. Exactly one role is returned; `wanted` wins over
    /// `vision`.
    pub fn marker_role(&self, node: &dyn Node) -> MarkerRole {
        if node.contains(&self.wanted) {
            MarkerRole::Wanted
        } else if node.contains(&self.vision) {
            MarkerRole::Camera
        } else {
            MarkerRole::Object
        }
    }

    /// Marker diameter in world units. Depends only on `vision`.
    pub fn marker_diameter(&self, node: &dyn Node) -> f64 {
        if node.contains(&self.vision) {
            CAMERA_DIAMETER
        } else {
            OBJECT_DIAMETER
        }
    }

    fn draw_marker(
        &self,
        surface: &mut dyn Surface,
        node: &dyn Node,
        env: &dyn EuclideanPhysics2D,
        transform: Affine,
    ) -> Result<(), RenderError> {
        let diameter = self.marker_diameter(node);
        let shape = env.shape_factory().circle(diameter);
        let Some(outline) = shape.as_planar_outline() else {
            trace!(node = %node.id(), diameter, "marker shape has no planar outline, skipping");
            return Ok(());
        };

        surface.set_color(self.marker_role(node).color())?;
        surface.fill(&outline.transformed(transform))?;
        Ok(())
    }

    fn draw_field_of_view(
        &self,
        surface: &mut dyn Surface,
        node: &dyn Node,
        transform: Affine,
    ) -> Result<(), RenderError> {
        surface.set_color(COLOR_FOV)?;
        for reaction in node.reactions() {
            for vision in reaction.actions().filter_map(|a| a.vision_parameters()) {
                let cone = field_of_view(vision);
                if cone.is_empty() {
                    trace!(
                        node = %node.id(),
                        distance = vision.distance,
                        angle = vision.angle_deg,
                        "field of view has no framing square, stroking an empty cone"
                    );
                }
                surface.draw(&cone.transformed(transform))?;
            }
        }
        Ok(())
    }
}

impl Effect for PresentationRenderer {
    fn name(&self) -> &str {
        "draw for presentation"
    }

    fn apply(
        &self,
        surface: &mut dyn Surface,
        node: &dyn Node,
        environment: &dyn Environment,
        wormhole: &dyn Wormhole,
    ) -> Result<(), RenderError> {
        let Some(env) = environment.as_euclidean_physics_2d() else {
            trace!(node = %node.id(), dimensions = environment.dimensions(), "not a 2D physical environment, skipping");
            return Ok(());
        };
        let Some(position) = env.position(node) else {
            trace!(node = %node.id(), "node has no position, skipping");
            return Ok(());
        };

        let view = wormhole.view_point(position);
        let transform = view_transform(view, wormhole.zoom(), heading_angle(env.heading(node)));

        // Cones go on top of the marker.
        self.draw_marker(surface, node, env, transform)?;
        self.draw_field_of_view(surface, node, transform)
    }

    fn color_summary(&self) -> Color {
        COLOR_SUMMARY
    }
}
