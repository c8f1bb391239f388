#![warn(missing_docs)]

//! Geometry capability interface for the lkscene exporter.
//!
//! The encoders only ever ask a handful of questions of the CAD kernel:
//! validity, area centroid, closest point, normal, boundary edge lengths,
//! and box frames. Those questions live on the [`Surface`] and [`Curve3d`]
//! traits so the exporter can run against any kernel. The concrete types
//! here ([`PlanarPatch`], [`OrientedBox`], [`Line3d`]) are the in-memory
//! model used by the scene file loader and the tests.

use lkscene_math::{Dir3, Point2, Point3, Tolerance, Transform, Vec3};

// =============================================================================
// Curve types
// =============================================================================

/// A parametric curve in 3D space.
pub trait Curve3d: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t` to get a 3D point.
    fn evaluate(&self, t: f64) -> Point3;

    /// Tangent vector at parameter `t`.
    fn tangent(&self, t: f64) -> Vec3;

    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Arc length over the full domain.
    fn length(&self) -> f64;

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Curve3d>;
}

impl Clone for Box<dyn Curve3d> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A 3D line segment defined by origin and direction.
///
/// Parameterization: `P(t) = origin + t * direction`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line3d {
    /// Starting point.
    pub origin: Point3,
    /// Direction; its magnitude is the segment length.
    pub direction: Vec3,
}

impl Line3d {
    /// Create a line from two endpoints, parameterized so `t=0` gives `start` and `t=1` gives `end`.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self {
            origin: start,
            direction: end - start,
        }
    }

    /// End point of the segment.
    pub fn end(&self) -> Point3 {
        self.origin + self.direction
    }
}

impl Curve3d for Line3d {
    fn evaluate(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    fn tangent(&self, _t: f64) -> Vec3 {
        self.direction
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn length(&self) -> f64 {
        self.direction.norm()
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Surface types
// =============================================================================

/// A parametric surface as seen by the exporter.
///
/// Implementations wrap whatever the host kernel provides. Every query
/// that can fail numerically returns an `Option`.
pub trait Surface: Send + Sync + std::fmt::Debug {
    /// Evaluate the surface at parameter `(u, v)` to get a 3D point.
    fn evaluate(&self, uv: Point2) -> Point3;

    /// Surface normal at parameter `(u, v)`. Not necessarily unit length.
    fn normal(&self, uv: Point2) -> Vec3;

    /// Parameter domain as `((u_min, u_max), (v_min, v_max))`.
    fn domain(&self) -> ((f64, f64), (f64, f64));

    /// Kernel-defined validity check.
    fn is_valid(&self) -> bool;

    /// Area centroid of the surface, if it can be computed.
    fn area_centroid(&self) -> Option<Point3>;

    /// Parameter of the point on the surface closest to `p`.
    fn closest_point(&self, p: &Point3) -> Option<Point2>;

    /// Boundary edges of the untrimmed surface, in kernel order:
    /// `v = v_min`, `u = u_max`, `v = v_max`, `u = u_min`.
    fn edge_curves(&self) -> Vec<Box<dyn Curve3d>>;

    /// Clone this surface into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Surface>;

    /// Apply an affine transform to this surface, returning a new surface.
    fn transform(&self, t: &Transform) -> Box<dyn Surface>;
}

impl Clone for Box<dyn Surface> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite plane defined by an origin point and an orthonormal frame.
///
/// Parameterization: `P(u, v) = origin + u * x_dir + v * y_dir`
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Origin point on the plane.
    pub origin: Point3,
    /// Unit vector along the u direction.
    pub x_dir: Dir3,
    /// Unit vector along the v direction.
    pub y_dir: Dir3,
    /// Unit normal (x_dir × y_dir).
    pub normal_dir: Dir3,
}

impl Plane {
    /// Create a plane from origin and two direction vectors.
    ///
    /// `y_dir` is made orthogonal to `x_dir`. Zero-length inputs, or axes
    /// whose unit cross product is within [`Tolerance::angular`] of zero,
    /// produce a frame that fails [`Plane::is_valid`].
    pub fn new(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Self {
        let x = Dir3::new_normalize(x_dir);
        let y_in = y_dir.normalize();
        let y_perp = if x.as_ref().cross(&y_in).norm() > Tolerance::DEFAULT.angular {
            y_in - y_in.dot(x.as_ref()) * x.as_ref()
        } else {
            Vec3::repeat(f64::NAN)
        };
        let y = Dir3::new_normalize(y_perp);
        let n = Dir3::new_normalize(x.as_ref().cross(y.as_ref()));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal_dir: n,
        }
    }

    /// XY plane at the origin.
    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vec3::x(), Vec3::y())
    }

    /// True when the origin and frame are finite.
    pub fn is_valid(&self) -> bool {
        let finite = |v: &Vec3| v.iter().all(|c| c.is_finite());
        finite(&self.origin.coords)
            && finite(self.x_dir.as_ref())
            && finite(self.y_dir.as_ref())
            && finite(self.normal_dir.as_ref())
    }

    /// Point at parameter `(u, v)`.
    pub fn evaluate(&self, uv: Point2) -> Point3 {
        self.origin + uv.x * self.x_dir.as_ref() + uv.y * self.y_dir.as_ref()
    }

    /// Project a 3D point onto this plane's (u, v) parameter space.
    pub fn project(&self, p: &Point3) -> Point2 {
        let d = p - self.origin;
        Point2::new(d.dot(self.x_dir.as_ref()), d.dot(self.y_dir.as_ref()))
    }

    /// Apply an affine transform to the frame.
    pub fn transform(&self, t: &Transform) -> Self {
        Plane::new(
            t.apply_point(&self.origin),
            t.apply_vec(self.x_dir.as_ref()),
            t.apply_vec(self.y_dir.as_ref()),
        )
    }
}

fn interval_ok(i: (f64, f64), tol: &Tolerance) -> bool {
    i.0.is_finite() && i.1.is_finite() && i.1 - i.0 > tol.linear
}

fn mid(i: (f64, f64)) -> f64 {
    0.5 * (i.0 + i.1)
}

// =============================================================================
// PlanarPatch
// =============================================================================

/// A rectangular piece of a [`Plane`]: the plane restricted to `u × v`.
///
/// This is what a single-face planar surface looks like once its trimming
/// rectangle is taken as its nominal extent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarPatch {
    /// Supporting plane.
    pub plane: Plane,
    /// Parameter interval along `plane.x_dir`.
    pub u: (f64, f64),
    /// Parameter interval along `plane.y_dir`.
    pub v: (f64, f64),
}

impl PlanarPatch {
    /// Create a patch on `plane` over the given parameter intervals.
    pub fn new(plane: Plane, u: (f64, f64), v: (f64, f64)) -> Self {
        Self { plane, u, v }
    }

    /// A `width × length` rectangle with one corner at the plane origin.
    pub fn rectangle(plane: Plane, width: f64, length: f64) -> Self {
        Self::new(plane, (0.0, width), (0.0, length))
    }
}

impl Surface for PlanarPatch {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.plane.evaluate(uv)
    }

    fn normal(&self, _uv: Point2) -> Vec3 {
        *self.plane.normal_dir.as_ref()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (self.u, self.v)
    }

    fn is_valid(&self) -> bool {
        let tol = Tolerance::DEFAULT;
        self.plane.is_valid() && interval_ok(self.u, &tol) && interval_ok(self.v, &tol)
    }

    fn area_centroid(&self) -> Option<Point3> {
        if !self.is_valid() {
            return None;
        }
        Some(self.plane.evaluate(Point2::new(mid(self.u), mid(self.v))))
    }

    fn closest_point(&self, p: &Point3) -> Option<Point2> {
        let uv = self.plane.project(p);
        if !uv.x.is_finite() || !uv.y.is_finite() {
            return None;
        }
        Some(Point2::new(
            uv.x.clamp(self.u.0.min(self.u.1), self.u.0.max(self.u.1)),
            uv.y.clamp(self.v.0.min(self.v.1), self.v.0.max(self.v.1)),
        ))
    }

    fn edge_curves(&self) -> Vec<Box<dyn Curve3d>> {
        let (u0, u1) = self.u;
        let (v0, v1) = self.v;
        let corners = [
            self.evaluate(Point2::new(u0, v0)),
            self.evaluate(Point2::new(u1, v0)),
            self.evaluate(Point2::new(u1, v1)),
            self.evaluate(Point2::new(u0, v1)),
        ];
        (0..4)
            .map(|i| {
                Box::new(Line3d::from_points(corners[i], corners[(i + 1) % 4])) as Box<dyn Curve3d>
            })
            .collect()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn transform(&self, t: &Transform) -> Box<dyn Surface> {
        Box::new(PlanarPatch::new(self.plane.transform(t), self.u, self.v))
    }
}

// =============================================================================
// OrientedBox
// =============================================================================

/// A rectangular prism aligned with a [`Plane`] frame.
///
/// The box spans `x`, `y` along the plane axes and `z` along its normal.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBox {
    /// Local frame; `x_dir` is the box's primary axis.
    pub plane: Plane,
    /// Extent along `plane.x_dir`.
    pub x: (f64, f64),
    /// Extent along `plane.y_dir`.
    pub y: (f64, f64),
    /// Extent along `plane.normal_dir`.
    pub z: (f64, f64),
}

impl OrientedBox {
    /// Create a box from a frame and three intervals.
    pub fn new(plane: Plane, x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self { plane, x, y, z }
    }

    /// A box with dimensions `size` centered on `center`, axes taken from `plane`.
    pub fn centered(plane: Plane, center: Point3, size: Vec3) -> Self {
        let plane = Plane {
            origin: center,
            ..plane
        };
        let half = size / 2.0;
        Self::new(plane, (-half.x, half.x), (-half.y, half.y), (-half.z, half.z))
    }

    /// Center point of the box.
    pub fn center(&self) -> Point3 {
        self.plane.evaluate(Point2::new(mid(self.x), mid(self.y)))
            + mid(self.z) * self.plane.normal_dir.as_ref()
    }

    /// Edge lengths along the local x, y and z axes.
    pub fn extents(&self) -> Vec3 {
        Vec3::new(
            self.x.1 - self.x.0,
            self.y.1 - self.y.0,
            self.z.1 - self.z.0,
        )
    }

    /// The box's local primary axis.
    pub fn x_axis(&self) -> Vec3 {
        *self.plane.x_dir.as_ref()
    }

    /// Finite frame and three strictly increasing intervals.
    pub fn is_valid(&self) -> bool {
        let tol = Tolerance::DEFAULT;
        self.plane.is_valid()
            && interval_ok(self.x, &tol)
            && interval_ok(self.y, &tol)
            && interval_ok(self.z, &tol)
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Point3; 8] {
        let n = self.plane.normal_dir.as_ref();
        let mut out = [Point3::origin(); 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let u = if i & 1 == 0 { self.x.0 } else { self.x.1 };
            let v = if i & 2 == 0 { self.y.0 } else { self.y.1 };
            let w = if i & 4 == 0 { self.z.0 } else { self.z.1 };
            *corner = self.plane.evaluate(Point2::new(u, v)) + w * n;
        }
        out
    }

    /// World-axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Point3, Point3) {
        let corners = self.corners();
        let mut lo = corners[0];
        let mut hi = corners[0];
        for c in &corners[1..] {
            lo = lo.inf(c);
            hi = hi.sup(c);
        }
        (lo, hi)
    }

    /// Apply an affine transform to the box frame.
    pub fn transform(&self, t: &Transform) -> Self {
        Self::new(self.plane.transform(t), self.x, self.y, self.z)
    }
}

// =============================================================================
// Host geometry
// =============================================================================

/// One object handed over by the host CAD environment.
///
/// Collections arrive untyped, so each element carries its own kind and
/// the exporter checks it before use.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// A bare point.
    Point(Point3),
    /// A line segment.
    Line(Line3d),
    /// A single surface.
    Surface(Box<dyn Surface>),
    /// A boundary representation given by its faces.
    Brep(Vec<Box<dyn Surface>>),
    /// An oriented box.
    Box(OrientedBox),
}

impl Geometry {
    /// Short name of the geometry kind, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Surface(_) => "Surface",
            Geometry::Brep(_) => "Brep",
            Geometry::Box(_) => "Box",
        }
    }

    /// The point, if this is one.
    pub fn as_point(&self) -> Option<&Point3> {
        match self {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    /// The surface, if this is one or a single-face brep.
    pub fn as_surface(&self) -> Option<&dyn Surface> {
        match self {
            Geometry::Surface(s) => Some(s.as_ref()),
            Geometry::Brep(faces) if faces.len() == 1 => Some(faces[0].as_ref()),
            _ => None,
        }
    }

    /// The box, if this is one.
    pub fn as_box(&self) -> Option<&OrientedBox> {
        match self {
            Geometry::Box(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Point3> for Geometry {
    fn from(p: Point3) -> Self {
        Geometry::Point(p)
    }
}

impl From<PlanarPatch> for Geometry {
    fn from(s: PlanarPatch) -> Self {
        Geometry::Surface(Box::new(s))
    }
}

impl From<OrientedBox> for Geometry {
    fn from(b: OrientedBox) -> Self {
        Geometry::Box(b)
    }
}

impl From<Line3d> for Geometry {
    fn from(l: Line3d) -> Self {
        Geometry::Line(l)
    }
}
