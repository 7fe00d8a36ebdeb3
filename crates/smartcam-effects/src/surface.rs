//! Drawing surfaces and the headless recording surface.
//!
//! A [`Surface`] is the minimal 2D drawing API effects paint on: a current
//! color plus fill and stroke of transformed shapes. The
//! [`RecordingSurface`] keeps every call as a [`DrawCommand`] instead of
//! rasterizing, which is what tests, snapshots, and headless runs use.

use serde::{Deserialize, Serialize};
use smartcam_geom::color::Color;
use smartcam_geom::outline::TransformedShape;

// ---------------------------------------------------------------------------
// SurfaceError
// ---------------------------------------------------------------------------

/// Failures reported by a drawing surface.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface was disposed and can no longer be drawn on.
    #[error("surface has been disposed")]
    Disposed,

    /// Backend-specific failure.
    #[error("surface backend failure: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A 2D drawing surface.
///
/// Color is surface state: `fill` and `draw` use whatever color was set
/// last. Effects may leave the color changed.
pub trait Surface {
    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError>;

    fn color(&self) -> Color;

    /// Fill the interior of `shape` with the current color.
    fn fill(&mut self, shape: &TransformedShape) -> Result<(), SurfaceError>;

    /// Stroke the outline of `shape` with the current color.
    fn draw(&mut self, shape: &TransformedShape) -> Result<(), SurfaceError>;
}

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Interior of `shape` filled with `color`.
    Fill {
        color: Color,
        shape: TransformedShape,
    },
    /// Outline of `shape` stroked with `color`.
    Stroke {
        color: Color,
        shape: TransformedShape,
    },
}

impl DrawCommand {
    /// Color the command was recorded with.
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Fill { color, .. } | DrawCommand::Stroke { color, .. } => *color,
        }
    }

    /// Shape and placement transform.
    pub fn shape(&self) -> &TransformedShape {
        match self {
            DrawCommand::Fill { shape, .. } | DrawCommand::Stroke { shape, .. } => shape,
        }
    }

    pub fn is_fill(&self) -> bool {
        matches!(self, DrawCommand::Fill { .. })
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self, DrawCommand::Stroke { .. })
    }
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// A surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    color: Color,
    commands: Vec<DrawCommand>,
    disposed: bool,
}

impl Default for RecordingSurface {
    /// Starts black with no commands.
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            commands: Vec::new(),
            disposed: false,
        }
    }
}

impl RecordingSurface {
    /// A black surface with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded command, in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded fills, in call order.
    pub fn fills(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_fill())
    }

    /// Recorded strokes, in call order.
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_stroke())
    }

    /// Drain the recorded commands, leaving the surface empty but usable.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget every recorded command. The current color is kept.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Invalidate the surface. Every later call fails with
    /// [`SurfaceError::Disposed`].
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        self.color = color;
        Ok(())
    }

    fn color(&self) -> Color {
        self.color
    }

    fn fill(&mut self, shape: &TransformedShape) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        self.commands.push(DrawCommand::Fill {
            color: self.color,
            shape: shape.clone(),
        });
        Ok(())
    }

    fn draw(&mut self, shape: &TransformedShape) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        self.commands.push(DrawCommand::Stroke {
            color: self.color,
            shape: shape.clone(),
        });
        Ok(())
    }
}
