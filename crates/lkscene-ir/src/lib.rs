//! Scene input file for the lkscene exporter.
//!
//! A scene file is the JSON form of what the host CAD environment hands the
//! exporter: three ordered collections (trees, arrays, buildings) of loosely
//! typed geometry. Nothing here checks whether a collection holds the right
//! kind of geometry; that is the validator's job.

use lkscene_geom::{Geometry, Line3d, OrientedBox, PlanarPatch, Plane, Surface};
use lkscene_math::Point3;
use serde::{Deserialize, Serialize};

/// 3D vector with f64 components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    fn y_axis() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    fn to_point(self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    fn to_vec(self) -> lkscene_math::Vec3 {
        lkscene_math::Vec3::new(self.x, self.y, self.z)
    }
}

/// A planar rectangular surface: a frame plus a `u × v` parameter rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDef {
    /// Frame origin.
    pub origin: Vec3,
    /// Direction of the u parameter.
    #[serde(default = "Vec3::x_axis")]
    pub x_axis: Vec3,
    /// Direction of the v parameter.
    #[serde(default = "Vec3::y_axis")]
    pub y_axis: Vec3,
    /// u interval `[min, max]`.
    pub u: [f64; 2],
    /// v interval `[min, max]`.
    pub v: [f64; 2],
}

impl SurfaceDef {
    fn to_surface(&self) -> Box<dyn Surface> {
        let plane = Plane::new(
            self.origin.to_point(),
            self.x_axis.to_vec(),
            self.y_axis.to_vec(),
        );
        Box::new(PlanarPatch::new(
            plane,
            (self.u[0], self.u[1]),
            (self.v[0], self.v[1]),
        ))
    }
}

/// An oriented box: a frame plus intervals along its x, y and normal axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    /// Frame origin.
    pub origin: Vec3,
    /// Primary (local x) axis.
    #[serde(default = "Vec3::x_axis")]
    pub x_axis: Vec3,
    /// Secondary (local y) axis.
    #[serde(default = "Vec3::y_axis")]
    pub y_axis: Vec3,
    /// Interval along the x axis.
    pub x: [f64; 2],
    /// Interval along the y axis.
    pub y: [f64; 2],
    /// Interval along the frame normal.
    pub z: [f64; 2],
}

/// One geometry object, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryDef {
    /// A point.
    Point {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Z coordinate.
        #[serde(default)]
        z: f64,
    },
    /// A line segment.
    Line {
        /// Start point.
        start: Vec3,
        /// End point.
        end: Vec3,
    },
    /// A planar surface.
    Surface(SurfaceDef),
    /// A boundary representation made of planar faces.
    Brep {
        /// Faces in kernel order.
        faces: Vec<SurfaceDef>,
    },
    /// An oriented box.
    Box(BoxDef),
}

impl GeometryDef {
    /// Build the in-memory geometry for this definition.
    pub fn to_geometry(&self) -> Geometry {
        match self {
            GeometryDef::Point { x, y, z } => Geometry::Point(Point3::new(*x, *y, *z)),
            GeometryDef::Line { start, end } => {
                Geometry::Line(Line3d::from_points(start.to_point(), end.to_point()))
            }
            GeometryDef::Surface(s) => Geometry::Surface(s.to_surface()),
            GeometryDef::Brep { faces } => {
                Geometry::Brep(faces.iter().map(SurfaceDef::to_surface).collect())
            }
            GeometryDef::Box(b) => Geometry::Box(OrientedBox::new(
                Plane::new(b.origin.to_point(), b.x_axis.to_vec(), b.y_axis.to_vec()),
                (b.x[0], b.x[1]),
                (b.y[0], b.y[1]),
                (b.z[0], b.z[1]),
            )),
        }
    }
}

/// The three ordered input collections, as in-memory geometry.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    /// Tree locations.
    pub trees: Vec<Geometry>,
    /// Solar array panels.
    pub arrays: Vec<Geometry>,
    /// Buildings.
    pub buildings: Vec<Geometry>,
}

/// A scene input file: the `.json` document fed to the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Format version string (e.g. "0.1").
    #[serde(default = "default_version")]
    pub version: String,
    /// Tree locations, expected to be points.
    #[serde(default)]
    pub trees: Vec<GeometryDef>,
    /// Solar arrays, expected to be planar surfaces.
    #[serde(default)]
    pub arrays: Vec<GeometryDef>,
    /// Buildings, expected to be boxes.
    #[serde(default)]
    pub buildings: Vec<GeometryDef>,
}

fn default_version() -> String {
    "0.1".to_string()
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            trees: Vec::new(),
            arrays: Vec::new(),
            buildings: Vec::new(),
        }
    }
}

impl SceneFile {
    /// Create a new empty scene file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the in-memory geometry for all three collections.
    pub fn to_geometry(&self) -> SceneGeometry {
        let build = |defs: &[GeometryDef]| -> Vec<Geometry> {
            defs.iter().map(GeometryDef::to_geometry).collect()
        };
        SceneGeometry {
            trees: build(&self.trees),
            arrays: build(&self.arrays),
            buildings: build(&self.buildings),
        }
    }
}
