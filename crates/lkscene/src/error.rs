//! Error types for scene export.

use thiserror::Error;

/// Which input collection a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Tree locations.
    Trees,
    /// Solar array panels.
    Arrays,
    /// Buildings.
    Buildings,
}

/// First precondition violation found in the input collections.
///
/// Checked in the order trees, arrays, buildings; every variant names the
/// offending element's index within its collection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A tree element is not a point.
    #[error("Tree at index {index} is not a point (got {found})")]
    NotAPoint {
        /// Index in the tree collection.
        index: usize,
        /// Kind of geometry actually supplied.
        found: &'static str,
    },

    /// An array element is neither a surface nor a brep.
    #[error("Array at index {index} is not a surface or brep (got {found})")]
    NotASurface {
        /// Index in the array collection.
        index: usize,
        /// Kind of geometry actually supplied.
        found: &'static str,
    },

    /// An array element is a brep that cannot be reduced to one surface.
    #[error("Array at index {index} is a brep with {faces} faces; only single-face breps are accepted")]
    MultiFaceBrep {
        /// Index in the array collection.
        index: usize,
        /// Number of faces on the brep.
        faces: usize,
    },

    /// An array surface fails the kernel validity check.
    #[error("Surface at index {index} is not valid")]
    InvalidSurface {
        /// Index in the array collection.
        index: usize,
    },

    /// An array surface faces downwards at its centroid.
    #[error("Surface at index {index} has a normal pointing in a negative direction")]
    DownwardNormal {
        /// Index in the array collection.
        index: usize,
    },

    /// A building element is not a box.
    #[error("Building at index {index} is not a box (got {found})")]
    NotABox {
        /// Index in the building collection.
        index: usize,
        /// Kind of geometry actually supplied.
        found: &'static str,
    },

    /// A building box has degenerate or non-finite geometry.
    #[error("Building at index {index} is not a valid box")]
    InvalidBox {
        /// Index in the building collection.
        index: usize,
    },
}

impl ValidationError {
    /// The collection holding the offending element.
    pub fn collection(&self) -> Collection {
        match self {
            ValidationError::NotAPoint { .. } => Collection::Trees,
            ValidationError::NotASurface { .. }
            | ValidationError::MultiFaceBrep { .. }
            | ValidationError::InvalidSurface { .. }
            | ValidationError::DownwardNormal { .. } => Collection::Arrays,
            ValidationError::NotABox { .. } | ValidationError::InvalidBox { .. } => {
                Collection::Buildings
            }
        }
    }

    /// Index of the offending element within its collection.
    pub fn index(&self) -> usize {
        match *self {
            ValidationError::NotAPoint { index, .. }
            | ValidationError::NotASurface { index, .. }
            | ValidationError::MultiFaceBrep { index, .. }
            | ValidationError::InvalidSurface { index }
            | ValidationError::DownwardNormal { index }
            | ValidationError::NotABox { index, .. }
            | ValidationError::InvalidBox { index } => index,
        }
    }
}

/// Errors that abort an export.
#[derive(Error, Debug)]
pub enum LkError {
    /// I/O error writing the scene file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, LkError>;
