//! Smartcam Effects -- per-node rendering effects for camera/object
//! simulations.
//!
//! The host visualizer calls an [`Effect`](effect::Effect) once per node per
//! frame, handing it a drawing [`Surface`](surface::Surface), the node, its
//! environment, and a [`Wormhole`](host::Wormhole) that maps world
//! positions to view pixels. The main effect is the
//! [`PresentationRenderer`](presentation::PresentationRenderer): role-colored
//! markers plus field-of-view cones for cameras.
//!
//! # Quick Start
//!
//! ```
//! use smartcam_effects::prelude::*;
//!
//! let vision = Molecule::new("vision");
//! let mut env = SmartcamEnvironment::new(100.0, 100.0, vision.clone()).unwrap();
//! let camera = SimNode::new(NodeId(1))
//!     .with_molecule(vision)
//!     .with_reaction(SimReaction::new().with_action(SimAction::See(See::new(90.0, 20.0))));
//! env.add_node(camera, Point::new(0.0, 0.0)).unwrap();
//!
//! let wormhole = Wormhole2D::new(WormholeConfig::default()).unwrap();
//! let renderer = PresentationRenderer::new();
//! let mut surface = RecordingSurface::new();
//!
//! let node = env.node(NodeId(1)).unwrap();
//! renderer.apply(&mut surface, node, &env, &wormhole).unwrap();
//!
//! // One black marker, one blue cone.
//! assert_eq!(surface.fills().count(), 1);
//! assert_eq!(surface.strokes().count(), 1);
//! ```

#![deny(unsafe_code)]

pub mod effect;
pub mod frame;
pub mod host;
pub mod model;
pub mod presentation;
pub mod scene;
pub mod surface;

/// Re-export the geometry crate for convenience.
pub use smartcam_geom;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use smartcam_geom::prelude::*;

    pub use crate::effect::{Effect, RenderError};
    pub use crate::frame::{FrameRenderer, FrameSnapshot, FrameStats};
    pub use crate::host::{
        Action, Environment, EuclideanPhysics2D, GeometricShape, Molecule, Node, NodeId, Reaction,
        ShapeFactory, ViewPoint, VisionParameters, Wormhole,
    };
    pub use crate::model::{
        CircleFactory, CircleShape, EnvironmentError, See, SimAction, SimNode, SimReaction,
        SmartcamEnvironment, StepStats, Wormhole2D, WormholeConfig, WormholeError,
    };
    pub use crate::presentation::{MarkerRole, PresentationRenderer};
    pub use crate::scene::{build_scene, Displacement, SceneConfig, SceneError};
    pub use crate::surface::{DrawCommand, RecordingSurface, Surface, SurfaceError};
}
