//! Circles with a planar outline.

use smartcam_geom::outline::Outline;

use crate::host::{GeometricShape, ShapeFactory};

/// A circle centred on the shape-local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub diameter: f64,
}

impl GeometricShape for CircleShape {
    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn as_planar_outline(&self) -> Option<Outline> {
        Some(Outline::circle(self.diameter))
    }
}

/// Shape factory of the Euclidean 2D environments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleFactory;

impl ShapeFactory for CircleFactory {
    fn circle(&self, diameter: f64) -> Box<dyn GeometricShape> {
        Box::new(CircleShape { diameter })
    }
}
