//! Per-object encoders: panel surfaces, building boxes, tree points.

use std::f64::consts::PI;

use lkscene_geom::{OrientedBox, Surface};
use lkscene_math::{east, north, up, vector_angle, Point3, Vec3};
use thiserror::Error;

use crate::record::{Category, Record};

/// Fixed tree dimensions written for every tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeProfile {
    /// Canopy diameter.
    pub diameter: i64,
    /// Overall height.
    pub height: i64,
    /// Canopy top diameter.
    pub top_diameter: i64,
    /// Trunk height.
    pub trunk_height: i64,
}

/// The only tree shape this exporter emits.
pub const TREE_PROFILE: TreeProfile = TreeProfile {
    diameter: 20,
    height: 20,
    top_diameter: 8,
    trunk_height: 8,
};

/// Orientation of a panel normal, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOrientation {
    /// Compass bearing clockwise from north, `[0, 360)`.
    pub azimuth: f64,
    /// Angle from vertical, `[0, 180]`.
    pub tilt: f64,
}

impl PanelOrientation {
    /// Orientation of a unit normal.
    ///
    /// A normal with no horizontal component has no bearing; it is
    /// reported as azimuth 0.
    pub fn from_normal(normal: &Vec3) -> Self {
        let horizontal = Vec3::new(normal.x, normal.y, 0.0);
        let azimuth = match vector_angle(&north(), &horizontal) {
            // west of north
            Some(a) if normal.x < 0.0 && a > 0.0 => 2.0 * PI - a,
            Some(a) => a,
            None => 0.0,
        };
        let tilt = vector_angle(normal, &up()).unwrap_or(0.0);
        Self {
            azimuth: azimuth.to_degrees().rem_euclid(360.0),
            tilt: tilt.to_degrees(),
        }
    }
}

/// Width and length of a surface's trimming rectangle.
///
/// The second boundary edge is the width and the first is the length;
/// downstream scenes depend on this order.
pub fn trimming_rectangle(surface: &dyn Surface) -> Option<(f64, f64)> {
    let edges = surface.edge_curves();
    match edges.as_slice() {
        [first, second, ..] => Some((second.length(), first.length())),
        _ => None,
    }
}

/// Why a panel produced no record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSkip {
    /// The surface has no area centroid.
    #[error("surface has no area centroid")]
    NoCentroid,
    /// The centroid has no closest point on the surface.
    #[error("centroid has no point on the surface")]
    NoClosestPoint,
    /// The normal at the centroid has zero length.
    #[error("normal at the centroid is zero")]
    ZeroNormal,
    /// Fewer than two boundary edges.
    #[error("trimming rectangle has fewer than two edges")]
    MissingEdges,
}

/// Encode one panel surface as an `Active surface` record, or say why not.
pub fn encode_panel(surface: &dyn Surface, index: usize) -> Result<Record, PanelSkip> {
    let centroid = surface.area_centroid().ok_or(PanelSkip::NoCentroid)?;
    let uv = surface
        .closest_point(&centroid)
        .ok_or(PanelSkip::NoClosestPoint)?;
    let normal = surface
        .normal(uv)
        .try_normalize(f64::EPSILON)
        .ok_or(PanelSkip::ZeroNormal)?;
    let orientation = PanelOrientation::from_normal(&normal);
    let (width, length) = trimming_rectangle(surface).ok_or(PanelSkip::MissingEdges)?;

    Ok(
        Record::new(Category::ActiveSurface, format!("Panel_{index}"))
            .with("X", centroid.x)
            .with("Y", centroid.y)
            .with("Width", width)
            .with("Length", length)
            .with("Azimuth", orientation.azimuth)
            .with("Tilt", orientation.tilt),
    )
}

/// Encode one panel surface as an `Active surface` record.
///
/// Returns `None` for every case [`encode_panel`] rejects. Callers drop
/// such panels instead of failing the batch.
pub fn surface_to_panel(surface: &dyn Surface, index: usize) -> Option<Record> {
    encode_panel(surface, index).ok()
}

/// Unsigned angle in degrees between world east and the box's primary axis.
///
/// Not a bearing: a box turned 90° either way reports 90.
pub fn building_rotation(b: &OrientedBox) -> f64 {
    vector_angle(&east(), &b.x_axis())
        .unwrap_or(0.0)
        .to_degrees()
}

/// Encode one building box as a `Box` record sitting on the ground plane.
pub fn box_to_building(b: &OrientedBox, index: usize) -> Record {
    let center = b.center();
    let size = b.extents();
    Record::new(Category::Box, format!("Building_{index}"))
        .with("X", center.x)
        .with("Y", center.y)
        .with("Z", 0_i64)
        .with("Width", size.x)
        .with("Length", size.y)
        .with("Height", size.z)
        .with("Rotation", building_rotation(b))
}

/// Encode one tree location as a `Tree` record with the fixed profile.
pub fn point_to_tree(point: &Point3, index: usize) -> Record {
    Record::new(Category::Tree, format!("Tree_{index}"))
        .with("X", point.x)
        .with("Y", point.y)
        .with("Z", 0_i64)
        .with("Diameter", TREE_PROFILE.diameter)
        .with("Height", TREE_PROFILE.height)
        .with("TopDiameter", TREE_PROFILE.top_diameter)
        .with("TrunkHeight", TREE_PROFILE.trunk_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::testing::{flat_patch, tilted_patch, CentroidlessSurface};
    use approx::assert_relative_eq;
    use lkscene_geom::{PlanarPatch, Plane};
    use lkscene_math::Transform;

    fn real(rec: &Record, key: &str) -> f64 {
        rec.get(key).and_then(Value::as_f64).expect(key)
    }

    #[test]
    fn flat_panel_record() {
        let rec = surface_to_panel(&flat_patch(2.0, 3.0), 0).expect("panel");
        assert_eq!(rec.name, "Panel_0");
        assert_eq!(
            rec.keys().collect::<Vec<_>>(),
            ["X", "Y", "Width", "Length", "Azimuth", "Tilt"]
        );
        assert_eq!(
            rec.to_string(),
            "O = create('Active surface');\n\
             property(O, {Name='Panel_0', X=1.0, Y=1.5, Width=3.0, Length=2.0, Azimuth=0.0, Tilt=0.0});\n"
        );
    }

    #[test]
    fn tilted_panel_orientation() {
        for (tilt, azimuth) in [(30.0, 0.0), (45.0, 90.0), (20.0, 180.0), (60.0, 270.0), (10.0, 315.0)] {
            let rec = surface_to_panel(&tilted_patch(tilt, azimuth), 4).expect("panel");
            assert_relative_eq!(real(&rec, "Tilt"), tilt, epsilon = 1e-9);
            assert_relative_eq!(real(&rec, "Azimuth"), azimuth, epsilon = 1e-9);
        }
    }

    #[test]
    fn orientation_ranges() {
        for i in 0..72 {
            let a = (i as f64 * 5.0).to_radians();
            for t in [0.1_f64, 0.5, 1.0, 1.5] {
                let n = Vec3::new(t.sin() * a.sin(), t.sin() * a.cos(), t.cos());
                let o = PanelOrientation::from_normal(&n);
                assert!((0.0..360.0).contains(&o.azimuth), "azimuth {}", o.azimuth);
                assert!((0.0..=180.0).contains(&o.tilt), "tilt {}", o.tilt);
            }
        }
    }

    #[test]
    fn north_facing_with_rounding_noise_stays_at_zero() {
        let tilt = 30_f64.to_radians();
        for n in [
            Vec3::new(-1e-17, tilt.sin(), tilt.cos()),
            Vec3::new(-1e-17, 0.0, 1.0),
            Vec3::new(-f64::MIN_POSITIVE, 1.0, 0.0),
        ] {
            let o = PanelOrientation::from_normal(&n);
            assert!((0.0..360.0).contains(&o.azimuth), "azimuth {}", o.azimuth);
            assert_eq!(o.azimuth, 0.0);
        }

        let o = PanelOrientation::from_normal(&Vec3::new(-1e-6, 1.0, 1.0).normalize());
        assert!(o.azimuth > 359.9 && o.azimuth < 360.0, "azimuth {}", o.azimuth);
    }

    #[test]
    fn panel_on_noisy_frame_faces_north() {
        let plane = Plane::new(Point3::origin(), Vec3::new(1.0, 0.0, 1e-17), Vec3::y());
        let rec = surface_to_panel(&PlanarPatch::rectangle(plane, 2.0, 3.0), 0).expect("panel");
        assert_eq!(
            rec.to_string(),
            "O = create('Active surface');\n\
             property(O, {Name='Panel_0', X=1.0, Y=1.5, Width=3.0, Length=2.0, Azimuth=0.0, Tilt=0.0});\n"
        );
    }

    #[test]
    fn west_facing_is_large_bearing() {
        let o = PanelOrientation::from_normal(&Vec3::new(-1.0, 0.0, 1.0).normalize());
        assert_relative_eq!(o.azimuth, 270.0, epsilon = 1e-9);
        assert_relative_eq!(o.tilt, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn vertical_normal_has_zero_azimuth() {
        let o = PanelOrientation::from_normal(&Vec3::z());
        assert_eq!(o.azimuth, 0.0);
        assert_eq!(o.tilt, 0.0);
    }

    // Accepted quirk: a panel whose centroid can't be placed on the surface
    // is dropped silently rather than failing validation.
    #[test]
    fn centroidless_panel_is_skipped() {
        let surface = CentroidlessSurface::default();
        assert!(surface_to_panel(&surface, 0).is_none());
        let reason = encode_panel(&surface, 0).unwrap_err();
        assert_eq!(reason, PanelSkip::NoClosestPoint);
        assert_eq!(reason.to_string(), "centroid has no point on the surface");
    }

    #[test]
    fn degenerate_panel_reports_reason() {
        let flat = PlanarPatch::rectangle(Plane::xy(), 0.0, 3.0);
        assert_eq!(encode_panel(&flat, 0).unwrap_err(), PanelSkip::NoCentroid);
    }

    #[test]
    fn building_record() {
        let b = OrientedBox::centered(
            Plane::xy(),
            Point3::new(5.0, 10.0, 0.0),
            Vec3::new(4.0, 6.0, 8.0),
        );
        let rec = box_to_building(&b, 0);
        assert_eq!(
            rec.to_string(),
            "O = create('Box');\n\
             property(O, {Name='Building_0', X=5.0, Y=10.0, Z=0, Width=4.0, Length=6.0, Height=8.0, Rotation=0.0});\n"
        );
    }

    #[test]
    fn raised_building_sits_on_ground() {
        let b = OrientedBox::new(Plane::xy(), (0.0, 4.0), (0.0, 6.0), (10.0, 18.0));
        let rec = box_to_building(&b, 2);
        assert_eq!(rec.get("Z"), Some(&Value::Int(0)));
        assert_relative_eq!(real(&rec, "Height"), 8.0);
        assert_relative_eq!(real(&rec, "X"), 2.0);
    }

    #[test]
    fn building_rotation_is_unsigned() {
        let base = OrientedBox::centered(Plane::xy(), Point3::origin(), Vec3::new(1.0, 2.0, 3.0));
        let ccw = base.transform(&Transform::rotation_z(30_f64.to_radians()));
        let cw = base.transform(&Transform::rotation_z(-30_f64.to_radians()));
        assert_relative_eq!(building_rotation(&ccw), 30.0, epsilon = 1e-9);
        assert_relative_eq!(building_rotation(&cw), 30.0, epsilon = 1e-9);
        let back = base.transform(&Transform::rotation_z(PI));
        assert_relative_eq!(building_rotation(&back), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn tree_record() {
        let rec = point_to_tree(&Point3::new(1.0, 2.0, 0.0), 0);
        assert_eq!(
            rec.to_string(),
            "O = create('Tree');\n\
             property(O, {Name='Tree_0', X=1.0, Y=2.0, Z=0, Diameter=20, Height=20, TopDiameter=8, TrunkHeight=8});\n"
        );
    }

    #[test]
    fn tree_ignores_elevation() {
        let rec = point_to_tree(&Point3::new(-3.5, 7.25, 12.0), 9);
        assert_eq!(rec.name, "Tree_9");
        assert_eq!(rec.get("Z"), Some(&Value::Int(0)));
        assert_eq!(real(&rec, "X"), -3.5);
    }
}
