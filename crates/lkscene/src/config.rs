//! Exporter configuration, loaded from TOML.
//!
//! ```toml
//! [output]
//! path = "scenes/roof.lk"
//! write = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where and whether to write the scene file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Target file; [`crate::writer::DEFAULT_FILE_NAME`] when unset.
    pub path: Option<PathBuf>,
    /// Write the file at all.
    pub write: bool,
}

/// Top-level exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LkConfig {
    /// Output settings.
    pub output: OutputConfig,
}

impl LkConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, path: Option<PathBuf>, write: bool) -> Self {
        if path.is_some() {
            self.output.path = path;
        }
        self.output.write |= write;
        self
    }
}
