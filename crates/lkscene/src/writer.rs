//! Writing scene documents to disk.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

/// File name used when no output path is given.
pub const DEFAULT_FILE_NAME: &str = "3DShading.lk";

/// Reported in place of a path when nothing was written.
pub const NOT_WRITTEN: &str = "write flag not set";

/// What the writer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document was written to this absolute path.
    Written(PathBuf),
    /// Writing was not requested.
    Skipped,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Written(path) => write!(f, "{}", path.display()),
            WriteOutcome::Skipped => f.write_str(NOT_WRITTEN),
        }
    }
}

/// Absolute form of the target path, falling back to [`DEFAULT_FILE_NAME`]
/// when `path` is missing or empty.
pub fn resolve_path(path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = path
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new(DEFAULT_FILE_NAME));
    std::path::absolute(path)
}

/// Overwrite the target file with `text` when `write` is set.
pub fn write_document(text: &str, path: Option<&Path>, write: bool) -> std::io::Result<WriteOutcome> {
    if !write {
        return Ok(WriteOutcome::Skipped);
    }
    let full_path = resolve_path(path)?;
    std::fs::write(&full_path, text)?;
    info!(path = %full_path.display(), "LK scene written");
    Ok(WriteOutcome::Written(full_path))
}
