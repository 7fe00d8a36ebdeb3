//! World-to-view mapping for a fixed-size view.
//!
//! [`Wormhole2D`] centres the view on a world point and scales by a zoom
//! factor. The view's y axis is inverted: world y grows upward, view y grows
//! downward.

use serde::{Deserialize, Serialize};
use smartcam_geom::kurbo::{Point, Vec2};

use crate::host::{ViewPoint, Wormhole};

// ---------------------------------------------------------------------------
// WormholeConfig
// ---------------------------------------------------------------------------

/// Configuration of a [`Wormhole2D`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormholeConfig {
    /// View width in pixels. Must be positive.
    pub view_width: u32,
    /// View height in pixels. Must be positive.
    pub view_height: u32,
    /// World point shown at the centre of the view.
    pub center: Point,
    /// View pixels per world unit. Must be positive and finite.
    pub zoom: f64,
}

impl Default for WormholeConfig {
    /// 800x600 view centred on the world origin at zoom 1.
    fn default() -> Self {
        Self {
            view_width: 800,
            view_height: 600,
            center: Point::ORIGIN,
            zoom: 1.0,
        }
    }
}

/// Errors produced by wormhole configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WormholeError {
    #[error("zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),

    #[error("view size must be positive, got {width}x{height}")]
    InvalidViewSize { width: u32, height: u32 },

    #[error("view centre must be finite, got {0:?}")]
    InvalidCenter(Point),
}

// ---------------------------------------------------------------------------
// Wormhole2D
// ---------------------------------------------------------------------------

/// A centred, zoomable world-to-view mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Wormhole2D {
    config: WormholeConfig,
}

fn check_zoom(zoom: f64) -> Result<(), WormholeError> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(WormholeError::InvalidZoom(zoom))
    }
}

impl Wormhole2D {
    /// # Errors
    ///
    /// Returns a [`WormholeError`] if the view size is zero, the zoom is not
    /// positive and finite, or the centre is not finite.
    pub fn new(config: WormholeConfig) -> Result<Self, WormholeError> {
        if config.view_width == 0 || config.view_height == 0 {
            return Err(WormholeError::InvalidViewSize {
                width: config.view_width,
                height: config.view_height,
            });
        }
        check_zoom(config.zoom)?;
        if !config.center.is_finite() {
            return Err(WormholeError::InvalidCenter(config.center));
        }
        Ok(Self { config })
    }

    /// Current configuration.
    pub fn config(&self) -> &WormholeConfig {
        &self.config
    }

    /// Change the zoom factor.
    ///
    /// # Errors
    ///
    /// [`WormholeError::InvalidZoom`] if `zoom` is not positive and finite.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), WormholeError> {
        check_zoom(zoom)?;
        self.config.zoom = zoom;
        Ok(())
    }

    /// Show `center` in the middle of the view.
    ///
    /// # Errors
    ///
    /// [`WormholeError::InvalidCenter`] if `center` is not finite.
    pub fn center_on(&mut self, center: Point) -> Result<(), WormholeError> {
        if !center.is_finite() {
            return Err(WormholeError::InvalidCenter(center));
        }
        self.config.center = center;
        Ok(())
    }

    fn half_view(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.config.view_width) / 2.0,
            f64::from(self.config.view_height) / 2.0,
        )
    }

    /// Inverse mapping: view pixel to world position.
    pub fn world_point(&self, view: ViewPoint) -> Point {
        let half = self.half_view();
        let c = self.config.center;
        let z = self.config.zoom;
        Point::new(
            c.x + (f64::from(view.x) - half.x) / z,
            c.y - (f64::from(view.y) - half.y) / z,
        )
    }
}

impl Wormhole for Wormhole2D {
    fn view_point(&self, world: Point) -> ViewPoint {
        let half = self.half_view();
        let c = self.config.center;
        let z = self.config.zoom;
        // `as` saturates out-of-range values and maps NaN to 0.
        ViewPoint {
            x: (half.x + (world.x - c.x) * z).round() as i32,
            y: (half.y - (world.y - c.y) * z).round() as i32,
        }
    }

    fn zoom(&self) -> f64 {
        self.config.zoom
    }
}
