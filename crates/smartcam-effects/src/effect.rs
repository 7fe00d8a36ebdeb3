//! The effect plugin contract.
//!
//! An [`Effect`] is a stateless rendering strategy the host calls once per
//! node per frame. It paints on a [`Surface`] using what it can learn from
//! the node, its environment, and the wormhole. Input the effect does not
//! apply to is skipped silently; only surface failures are errors.

use smartcam_geom::color::Color;

use crate::host::{Environment, Node, Wormhole};
use crate::surface::{Surface, SurfaceError};

/// Errors an effect can return to the host.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// The drawing surface rejected a call.
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// A per-node rendering effect.
pub trait Effect {
    /// Name shown next to the legend color in the host's effect list.
    fn name(&self) -> &str;

    /// Draw `node` on `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the surface fails. The surface's
    /// color may have been changed even when an error is returned.
    fn apply(
        &self,
        surface: &mut dyn Surface,
        node: &dyn Node,
        environment: &dyn Environment,
        wormhole: &dyn Wormhole,
    ) -> Result<(), RenderError>;

    /// Color representing this effect in the host's legend.
    fn color_summary(&self) -> Color;
}
