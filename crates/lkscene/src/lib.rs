#![warn(missing_docs)]

//! LK scene script generation.
//!
//! Converts CAD geometry (tree points, panel surfaces, building boxes) into
//! the line-oriented `create` / `property` script read by the shading
//! simulation tool.
//!
//! The pipeline is validate → encode → assemble → (optionally) write:
//!
//! ```ignore
//! use lkscene::{export_scene, ExportRequest};
//!
//! let report = export_scene(&ExportRequest {
//!     trees: &trees,
//!     arrays: &arrays,
//!     buildings: &buildings,
//!     path: Some(Path::new("roof.lk")),
//!     write: true,
//! })?;
//! println!("{}", report.output);
//! ```

pub mod config;
pub mod document;
pub mod encode;
pub mod error;
pub mod record;
pub mod validate;
pub mod writer;

#[cfg(test)]
mod testing;

use std::path::Path;

use lkscene_geom::Geometry;

pub use config::{LkConfig, OutputConfig};
pub use document::{SceneDocument, SceneStats, PLACEHOLDER};
pub use encode::{
    box_to_building, encode_panel, point_to_tree, surface_to_panel, PanelSkip, TREE_PROFILE,
};
pub use error::{Collection, LkError, Result, ValidationError};
pub use record::{Category, Record, Value, CLEAR_SCENE};
pub use validate::{validate_inputs, ValidatedScene};
pub use writer::{write_document, WriteOutcome, DEFAULT_FILE_NAME, NOT_WRITTEN};

/// Everything one export run needs.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Tree locations; expected to be points.
    pub trees: &'a [Geometry],
    /// Solar arrays; expected to be upward-facing planar surfaces.
    pub arrays: &'a [Geometry],
    /// Buildings; expected to be boxes.
    pub buildings: &'a [Geometry],
    /// Output file, [`DEFAULT_FILE_NAME`] when `None`.
    pub path: Option<&'a Path>,
    /// Whether to write the output file.
    pub write: bool,
}

impl<'a> ExportRequest<'a> {
    /// Request for the given collections using the output settings from `config`.
    pub fn new(
        trees: &'a [Geometry],
        arrays: &'a [Geometry],
        buildings: &'a [Geometry],
        config: &'a LkConfig,
    ) -> Self {
        Self {
            trees,
            arrays,
            buildings,
            path: config.output.path.as_deref(),
            write: config.output.write,
        }
    }
}

/// Result of one export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// The document text, or [`PLACEHOLDER`] if validation failed.
    pub script: String,
    /// Record counts on success, the first violation on failure.
    pub validation: std::result::Result<SceneStats, ValidationError>,
    /// What happened on disk.
    pub output: WriteOutcome,
}

impl ExportReport {
    /// True if the inputs passed validation.
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }
}

/// Validate, encode and optionally write one scene.
///
/// Validation failures are reported in [`ExportReport::validation`] and
/// never touch the output file. Only write failures are returned as errors.
pub fn export_scene(request: &ExportRequest<'_>) -> Result<ExportReport> {
    match SceneDocument::build(request.trees, request.arrays, request.buildings) {
        Ok(doc) => {
            let script = doc.to_string();
            let output = write_document(&script, request.path, request.write)?;
            Ok(ExportReport {
                script,
                validation: Ok(doc.stats()),
                output,
            })
        }
        Err(e) => Ok(ExportReport {
            script: PLACEHOLDER.to_string(),
            validation: Err(e),
            output: WriteOutcome::Skipped,
        }),
    }
}
