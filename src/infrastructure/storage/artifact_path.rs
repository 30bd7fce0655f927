use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{DEFAULT_MAX_LENGTH, safe_filename};

/// Ensures `directory` exists and returns `directory/<safe stem>.<extension>`.
///
/// Missing ancestors are created too. Nothing happens on disk when the
/// directory is already present.
pub fn build_artifact_path(directory: &Path, stem: &str, extension: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(directory)?;
    Ok(directory.join(safe_filename(stem, Some(extension), DEFAULT_MAX_LENGTH)))
}
