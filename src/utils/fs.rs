//! File system utilities

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Removes a directory tree, logging instead of failing
///
/// A directory that is already gone counts as removed.
pub async fn remove_dir_logged(path: &Path) {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove directory");
        }
    }
}

/// Reads a newline-separated list file
pub fn read_list_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ListFile {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(crate::core::parse_list(&content))
}
