//! Geometry fixtures shared by the unit tests.

use lkscene_geom::{Curve3d, PlanarPatch, Plane, Surface};
use lkscene_math::{Dir3, Point2, Point3, Transform, Vec3};

/// A `width × length` patch lying flat at the origin, facing up.
pub fn flat_patch(width: f64, length: f64) -> PlanarPatch {
    PlanarPatch::rectangle(Plane::xy(), width, length)
}

/// A 2 × 1 patch whose normal has the given tilt and compass bearing (degrees).
pub fn tilted_patch(tilt: f64, azimuth: f64) -> PlanarPatch {
    let x = Dir3::new_normalize(Vec3::x());
    // A negative turn about X leans the normal north; a negative turn
    // about Z swings it clockwise.
    let t = Transform::rotation_z(-azimuth.to_radians())
        .then(&Transform::rotation_about_axis(&x, -tilt.to_radians()));
    PlanarPatch::rectangle(Plane::xy().transform(&t), 2.0, 1.0)
}

/// A valid surface whose centroid has no closest point.
#[derive(Debug, Clone)]
pub struct CentroidlessSurface {
    inner: PlanarPatch,
}

impl Default for CentroidlessSurface {
    fn default() -> Self {
        Self {
            inner: flat_patch(1.0, 1.0),
        }
    }
}

impl Surface for CentroidlessSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.inner.evaluate(uv)
    }

    fn normal(&self, uv: Point2) -> Vec3 {
        self.inner.normal(uv)
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        self.inner.domain()
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn area_centroid(&self) -> Option<Point3> {
        self.inner.area_centroid()
    }

    fn closest_point(&self, _p: &Point3) -> Option<Point2> {
        None
    }

    fn edge_curves(&self) -> Vec<Box<dyn Curve3d>> {
        self.inner.edge_curves()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn transform(&self, t: &Transform) -> Box<dyn Surface> {
        self.inner.transform(t)
    }
}
