//! Collaborator traits supplied by the hosting visualizer.
//!
//! Effects never see concrete simulation types. The host hands them trait
//! objects and the effect asks for the capabilities it needs:
//!
//! - [`Environment::as_euclidean_physics_2d`] exposes position, heading, and
//!   shape construction only for 2D Euclidean physical environments.
//! - [`GeometricShape::as_planar_outline`] exposes a drawable outline only
//!   for shapes that have one.
//! - [`Action::vision_parameters`] is `Some` only for vision actions.
//!
//! A `None` from any of these means "not applicable here", never an error.
//!
//! # Frames
//!
//! World positions live in a y-up frame. View points produced by a
//! [`Wormhole`] live in a y-down pixel frame.

use std::fmt;

use serde::{Deserialize, Serialize};
use smartcam_geom::kurbo::{Point, Vec2};
use smartcam_geom::outline::Outline;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Stable identifier of a node within its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// An opaque named token attached to a node.
///
/// Two molecules are the same molecule when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Molecule(String);

impl Molecule {
    /// Molecule named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The molecule's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

/// Field-of-view parameters carried by a vision action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionParameters {
    /// Full aperture of the cone, in degrees.
    pub angle_deg: f64,
    /// How far the node can see, in world units.
    pub distance: f64,
}

/// One behavioural unit of a reaction.
pub trait Action {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Cone parameters if this is a vision action.
    fn vision_parameters(&self) -> Option<VisionParameters> {
        None
    }
}

/// A reaction: a group of actions triggered together.
pub trait Reaction {
    /// The reaction's actions, in declaration order.
    fn actions(&self) -> Box<dyn Iterator<Item = &dyn Action> + '_>;
}

/// A simulated agent.
pub trait Node {
    /// Identifier, unique within the node's environment.
    fn id(&self) -> NodeId;

    /// Whether the node currently carries `molecule`.
    fn contains(&self, molecule: &Molecule) -> bool;

    /// Every reaction of the node, in declaration order.
    fn reactions(&self) -> Box<dyn Iterator<Item = &dyn Reaction> + '_>;
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A shape produced by an environment's shape factory.
pub trait GeometricShape {
    /// Diameter of the smallest enclosing circle, in world units.
    fn diameter(&self) -> f64;

    /// The shape as a planar outline, if it can be expressed as one.
    fn as_planar_outline(&self) -> Option<Outline>;
}

/// Builds shapes in an environment's geometry.
pub trait ShapeFactory {
    /// Circle of `diameter` world units centred on the shape-local origin.
    fn circle(&self, diameter: f64) -> Box<dyn GeometricShape>;
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// The world container.
pub trait Environment {
    /// Number of spatial dimensions.
    fn dimensions(&self) -> usize;

    /// Every node, in a stable order.
    fn nodes(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_>;

    /// Number of nodes.
    fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// The 2D Euclidean physical view of this environment, if it has one.
    fn as_euclidean_physics_2d(&self) -> Option<&dyn EuclideanPhysics2D> {
        None
    }
}

/// Capabilities of a 2D Euclidean environment with oriented nodes.
pub trait EuclideanPhysics2D {
    /// World position of `node`, or `None` if the node is not placed here.
    fn position(&self, node: &dyn Node) -> Option<Point>;

    /// Heading vector of `node` in the world frame.
    fn heading(&self, node: &dyn Node) -> Vec2;

    /// Factory for shapes in this environment's geometry.
    fn shape_factory(&self) -> &dyn ShapeFactory;
}

// ---------------------------------------------------------------------------
// Wormhole
// ---------------------------------------------------------------------------

/// An integer pixel position in view space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: i32,
    pub y: i32,
}

impl ViewPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The pixel as a floating-point view position.
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Maps world positions to view pixels.
pub trait Wormhole {
    /// View pixel showing the world position `world`.
    fn view_point(&self, world: Point) -> ViewPoint;

    /// Current zoom factor (view pixels per world unit).
    fn zoom(&self) -> f64;
}
