//! Frame driver and frame snapshots.
//!
//! A [`FrameRenderer`] holds an ordered chain of effects and applies all of
//! them to every node of an environment, node by node. This is the loop a
//! host runs once per frame.
//!
//! [`FrameSnapshot`] captures what a [`RecordingSurface`] received during a
//! frame together with a BLAKE3 digest of the serialized commands. Two
//! frames rendered from equal inputs have equal digests.
//!
//! # Example
//!
//! ```
//! use smartcam_effects::prelude::*;
//!
//! let env = build_scene(&SceneConfig::default()).unwrap();
//! let wormhole = Wormhole2D::new(WormholeConfig::default()).unwrap();
//!
//! let mut frame = FrameRenderer::new();
//! frame.push(PresentationRenderer::new());
//!
//! let mut surface = RecordingSurface::new();
//! let stats = frame.render(&mut surface, &env, &wormhole).unwrap();
//! assert_eq!(stats.nodes, 30);
//!
//! let snapshot = FrameSnapshot::capture(&surface).unwrap();
//! assert_eq!(snapshot.hash.len(), 64);
//! ```

use serde::{Deserialize, Serialize};
use smartcam_geom::color::Color;
use tracing::debug;

use crate::effect::{Effect, RenderError};
use crate::host::{Environment, Wormhole};
use crate::surface::{DrawCommand, RecordingSurface, Surface};

// ---------------------------------------------------------------------------
// FrameStats
// ---------------------------------------------------------------------------

/// Counts gathered while rendering one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Nodes visited.
    pub nodes: usize,
    /// Effect applications (nodes x effects).
    pub applications: usize,
}

// ---------------------------------------------------------------------------
// FrameRenderer
// ---------------------------------------------------------------------------

/// An ordered chain of effects applied to every node.
#[derive(Default)]
pub struct FrameRenderer {
    effects: Vec<Box<dyn Effect>>,
}

impl FrameRenderer {
    /// An empty chain. Rendering it only counts nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect. Effects run in insertion order for each node.
    pub fn push(&mut self, effect: impl Effect + 'static) {
        self.effects.push(Box::new(effect));
    }

    /// Number of effects in the chain.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when no effect has been pushed.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// `(name, legend color)` of every effect, in order.
    pub fn legend(&self) -> Vec<(String, Color)> {
        self.effects
            .iter()
            .map(|e| (e.name().to_owned(), e.color_summary()))
            .collect()
    }

    /// Apply every effect to every node of `environment`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`RenderError`]. Commands issued
    /// before the failure stay on the surface.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        environment: &dyn Environment,
        wormhole: &dyn Wormhole,
    ) -> Result<FrameStats, RenderError> {
        let mut stats = FrameStats::default();
        for node in environment.nodes() {
            for effect in &self.effects {
                effect.apply(surface, node, environment, wormhole)?;
                stats.applications += 1;
            }
            stats.nodes += 1;
        }
        debug!(
            nodes = stats.nodes,
            effects = self.effects.len(),
            zoom = wormhole.zoom(),
            "frame rendered"
        );
        Ok(stats)
    }
}

impl std::fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRenderer")
            .field(
                "effects",
                &self.effects.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FrameSnapshot
// ---------------------------------------------------------------------------

/// The draw commands of one frame plus their content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub commands: Vec<DrawCommand>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the JSON-serialized
    /// commands.
    pub hash: String,
}

impl FrameSnapshot {
    /// Snapshot everything `surface` has recorded so far.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if the commands cannot be serialized.
    pub fn capture(surface: &RecordingSurface) -> Result<Self, serde_json::Error> {
        Self::from_commands(surface.commands().to_vec())
    }

    /// Snapshot an explicit command list.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if the commands cannot be serialized.
    pub fn from_commands(commands: Vec<DrawCommand>) -> Result<Self, serde_json::Error> {
        let hash = compute_hash(&commands)?;
        Ok(Self { commands, hash })
    }

    /// Recompute the digest and compare it with the stored one.
    pub fn verify(&self) -> bool {
        compute_hash(&self.commands).is_ok_and(|hash| hash == self.hash)
    }

    /// Number of filled shapes in the snapshot.
    pub fn fill_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_fill()).count()
    }

    /// Number of stroked outlines in the snapshot.
    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_stroke()).count()
    }
}

/// BLAKE3 over the JSON encoding, streamed straight into the hasher.
fn compute_hash(commands: &[DrawCommand]) -> Result<String, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, commands)?;
    Ok(hasher.finalize().to_hex().to_string())
}
