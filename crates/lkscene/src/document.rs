//! Scene document assembly.

use std::fmt;

use lkscene_geom::Geometry;
use tracing::{debug, info, warn};

use crate::encode::{box_to_building, encode_panel, point_to_tree};
use crate::error::ValidationError;
use crate::record::{Record, CLEAR_SCENE};
use crate::validate::{validate_inputs, ValidatedScene};

/// Document text used in place of a scene when validation fails.
pub const PLACEHOLDER: &str = "Please check inputs";

/// Record counts for an assembled document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// `Active surface` statements emitted.
    pub panels: usize,
    /// Panels dropped because their centroid could not be placed.
    pub skipped_panels: usize,
    /// `Box` statements emitted.
    pub buildings: usize,
    /// `Tree` statements emitted.
    pub trees: usize,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} panels ({} skipped), {} buildings, {} trees",
            self.panels, self.skipped_panels, self.buildings, self.trees
        )
    }
}

/// An assembled scene: reset directive, then panels, buildings and trees.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    panels: Vec<Record>,
    skipped_panels: Vec<usize>,
    buildings: Vec<Record>,
    trees: Vec<Record>,
}

impl SceneDocument {
    /// Validate the three collections and encode them.
    pub fn build(
        trees: &[Geometry],
        arrays: &[Geometry],
        buildings: &[Geometry],
    ) -> Result<Self, ValidationError> {
        let scene = validate_inputs(trees, arrays, buildings)?;
        Ok(Self::encode(&scene))
    }

    /// Encode collections that have already been validated.
    pub fn encode(scene: &ValidatedScene<'_>) -> Self {
        let mut panels = Vec::with_capacity(scene.arrays.len());
        let mut skipped_panels = Vec::new();
        for (i, surface) in scene.arrays.iter().enumerate() {
            match encode_panel(*surface, i) {
                Ok(rec) => {
                    debug!(name = %rec.name, "encoded panel");
                    panels.push(rec);
                }
                Err(reason) => {
                    warn!(index = i, %reason, "panel skipped");
                    skipped_panels.push(i);
                }
            }
        }

        let buildings = scene
            .buildings
            .iter()
            .enumerate()
            .map(|(i, b)| box_to_building(b, i))
            .collect();

        let trees = scene
            .trees
            .iter()
            .enumerate()
            .map(|(i, p)| point_to_tree(p, i))
            .collect();

        let doc = Self {
            panels,
            skipped_panels,
            buildings,
            trees,
        };
        info!(stats = %doc.stats(), "scene assembled");
        doc
    }

    /// All records in emission order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.panels
            .iter()
            .chain(self.buildings.iter())
            .chain(self.trees.iter())
    }

    /// Indices of array elements that produced no panel.
    pub fn skipped_panels(&self) -> &[usize] {
        &self.skipped_panels
    }

    /// Record counts.
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            panels: self.panels.len(),
            skipped_panels: self.skipped_panels.len(),
            buildings: self.buildings.len(),
            trees: self.trees.len(),
        }
    }
}

impl fmt::Display for SceneDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(CLEAR_SCENE)?;
        for rec in self.records() {
            write!(f, "{rec}")?;
        }
        Ok(())
    }
}
