//! Input validation.
//!
//! All-or-nothing: the first violation aborts the batch. Collections are
//! checked trees first, then arrays, then buildings.

use lkscene_geom::{Geometry, OrientedBox, Surface};
use lkscene_math::Point3;
use tracing::{info, instrument, warn};

use crate::error::ValidationError;

/// Input collections that passed validation, narrowed to their real types.
#[derive(Debug)]
pub struct ValidatedScene<'a> {
    /// Tree locations.
    pub trees: Vec<&'a Point3>,
    /// Panel surfaces (single-face breps already promoted).
    pub arrays: Vec<&'a dyn Surface>,
    /// Building boxes.
    pub buildings: Vec<&'a OrientedBox>,
}

/// Check the three input collections and narrow them to typed views.
#[instrument(skip_all, fields(trees = trees.len(), arrays = arrays.len(), buildings = buildings.len()))]
pub fn validate_inputs<'a>(
    trees: &'a [Geometry],
    arrays: &'a [Geometry],
    buildings: &'a [Geometry],
) -> Result<ValidatedScene<'a>, ValidationError> {
    let result = check_all(trees, arrays, buildings);
    match &result {
        Ok(_) => info!("input validation successful"),
        Err(e) => warn!(error = %e, "input validation failed"),
    }
    result
}

fn check_all<'a>(
    trees: &'a [Geometry],
    arrays: &'a [Geometry],
    buildings: &'a [Geometry],
) -> Result<ValidatedScene<'a>, ValidationError> {
    let trees = trees
        .iter()
        .enumerate()
        .map(|(index, g)| {
            g.as_point().ok_or(ValidationError::NotAPoint {
                index,
                found: g.type_name(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let arrays = arrays
        .iter()
        .enumerate()
        .map(|(index, g)| check_array(index, g))
        .collect::<Result<Vec<_>, _>>()?;

    let buildings = buildings
        .iter()
        .enumerate()
        .map(|(index, g)| check_building(index, g))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedScene {
        trees,
        arrays,
        buildings,
    })
}

fn check_array(index: usize, g: &Geometry) -> Result<&dyn Surface, ValidationError> {
    let surface = match (g, g.as_surface()) {
        (_, Some(s)) => s,
        (Geometry::Brep(faces), None) => {
            return Err(ValidationError::MultiFaceBrep {
                index,
                faces: faces.len(),
            })
        }
        (_, None) => {
            return Err(ValidationError::NotASurface {
                index,
                found: g.type_name(),
            })
        }
    };

    if !surface.is_valid() {
        return Err(ValidationError::InvalidSurface { index });
    }

    // Orientation is only checked where the centroid can be located on the
    // surface; panels where it can't are dropped later by the encoder.
    let uv = surface
        .area_centroid()
        .and_then(|c| surface.closest_point(&c));
    if let Some(uv) = uv {
        if surface.normal(uv).z < 0.0 {
            return Err(ValidationError::DownwardNormal { index });
        }
    }

    Ok(surface)
}

fn check_building(index: usize, g: &Geometry) -> Result<&OrientedBox, ValidationError> {
    let b = g.as_box().ok_or(ValidationError::NotABox {
        index,
        found: g.type_name(),
    })?;
    if !b.is_valid() {
        return Err(ValidationError::InvalidBox { index });
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Collection;
    use crate::testing::{flat_patch, tilted_patch, CentroidlessSurface};
    use lkscene_geom::{Line3d, OrientedBox, Plane};
    use lkscene_math::Vec3;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(Point3::new(x, y, 0.0))
    }

    fn building() -> Geometry {
        OrientedBox::centered(Plane::xy(), Point3::new(5.0, 10.0, 0.0), Vec3::new(4.0, 6.0, 8.0))
            .into()
    }

    #[test]
    fn empty_inputs_pass() {
        let scene = validate_inputs(&[], &[], &[]).expect("empty is valid");
        assert!(scene.trees.is_empty());
        assert!(scene.arrays.is_empty());
        assert!(scene.buildings.is_empty());
    }

    #[test]
    fn valid_inputs_are_narrowed() {
        let trees = [point(1.0, 2.0), point(3.0, 4.0)];
        let arrays: Vec<Geometry> = vec![flat_patch(2.0, 3.0).into()];
        let buildings = [building()];
        let scene = validate_inputs(&trees, &arrays, &buildings).unwrap();
        assert_eq!(scene.trees.len(), 2);
        assert_eq!(scene.trees[1].x, 3.0);
        assert_eq!(scene.arrays.len(), 1);
        assert_eq!(scene.buildings.len(), 1);
    }

    #[test]
    fn surface_in_tree_collection_fails() {
        let trees = [point(0.0, 0.0), flat_patch(1.0, 1.0).into()];
        let err = validate_inputs(&trees, &[], &[]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAPoint {
                index: 1,
                found: "Surface"
            }
        );
        assert_eq!(err.collection(), Collection::Trees);
        assert_eq!(err.to_string(), "Tree at index 1 is not a point (got Surface)");
    }

    #[test]
    fn downward_surface_fails() {
        let arrays: Vec<Geometry> = vec![
            flat_patch(1.0, 1.0).into(),
            tilted_patch(120.0, 0.0).into(),
        ];
        let err = validate_inputs(&[], &arrays, &[building()]).unwrap_err();
        assert_eq!(err, ValidationError::DownwardNormal { index: 1 });
        assert_eq!(err.collection(), Collection::Arrays);
    }

    #[test]
    fn vertical_surface_passes() {
        let arrays: Vec<Geometry> = vec![tilted_patch(90.0, 0.0).into()];
        assert!(validate_inputs(&[], &arrays, &[]).is_ok());
    }

    #[test]
    fn single_face_brep_is_promoted() {
        let face: Box<dyn Surface> = Box::new(flat_patch(1.0, 1.0));
        let arrays = [Geometry::Brep(vec![face])];
        let scene = validate_inputs(&[], &arrays, &[]).unwrap();
        assert_eq!(scene.arrays.len(), 1);
    }

    #[test]
    fn multi_face_brep_fails() {
        let face = || -> Box<dyn Surface> { Box::new(flat_patch(1.0, 1.0)) };
        let arrays = [Geometry::Brep(vec![face(), face()])];
        let err = validate_inputs(&[], &arrays, &[]).unwrap_err();
        assert_eq!(err, ValidationError::MultiFaceBrep { index: 0, faces: 2 });
    }

    #[test]
    fn line_in_array_collection_fails() {
        let line = Line3d::from_points(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let arrays: Vec<Geometry> = vec![flat_patch(1.0, 1.0).into(), line.into()];
        let err = validate_inputs(&[], &arrays, &[]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotASurface {
                index: 1,
                found: "Line"
            }
        );
    }

    #[test]
    fn degenerate_surface_fails() {
        let arrays: Vec<Geometry> = vec![flat_patch(0.0, 1.0).into()];
        let err = validate_inputs(&[], &arrays, &[]).unwrap_err();
        assert_eq!(err, ValidationError::InvalidSurface { index: 0 });
    }

    #[test]
    fn centroidless_surface_passes_validation() {
        let arrays = [Geometry::Surface(Box::new(CentroidlessSurface::default()))];
        assert!(validate_inputs(&[], &arrays, &[]).is_ok());
    }

    #[test]
    fn building_checks() {
        let err = validate_inputs(&[], &[], &[building(), point(0.0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotABox {
                index: 1,
                found: "Point"
            }
        );
        assert_eq!(err.index(), 1);

        let flat = OrientedBox::new(Plane::xy(), (0.0, 1.0), (0.0, 1.0), (0.0, 0.0));
        let err = validate_inputs(&[], &[], &[Geometry::Box(flat)]).unwrap_err();
        assert_eq!(err, ValidationError::InvalidBox { index: 0 });
        assert_eq!(err.collection(), Collection::Buildings);
    }

    #[test]
    fn trees_checked_before_arrays() {
        let trees = [building()];
        let arrays: Vec<Geometry> = vec![tilted_patch(180.0, 0.0).into()];
        let err = validate_inputs(&trees, &arrays, &[]).unwrap_err();
        assert_eq!(err.collection(), Collection::Trees);
    }
}
