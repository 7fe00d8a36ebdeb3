//! Reference in-memory host.
//!
//! A minimal implementation of every collaborator trait in
//! [`host`](crate::host): nodes with molecules and reactions, a bounded 2D
//! environment that can execute heading and random-target actions, circle
//! shapes, and a centred wormhole. Used by the scene
//! builder, the benches, and the tests; real hosts bring their own.

pub mod environment;
pub mod node;
pub mod shape;
pub mod wormhole;

pub use environment::{
    random_target, sample_levy, EnvironmentError, RectangularBoundaries, SmartcamEnvironment,
    StepStats, DEFAULT_HEADING,
};
pub use node::{See, SimAction, SimNode, SimReaction};
pub use shape::{CircleFactory, CircleShape};
pub use wormhole::{Wormhole2D, WormholeConfig, WormholeError};
