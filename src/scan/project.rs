//! Project root discovery.

use crate::error::{Result, SecureThisError};
use std::path::{Path, PathBuf};

/// Manifest that marks a project root unless told otherwise.
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "package.json";

/// Find the nearest directory at or above `start` containing `manifest`.
///
/// A relative `start` is resolved against the current directory first.
pub fn find_project_root(start: &Path, manifest: &str) -> Result<PathBuf> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()?.join(start)
    };

    start
        .ancestors()
        .find(|dir| dir.join(manifest).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| SecureThisError::ProjectRootNotFound {
            start: start.clone(),
            manifest: manifest.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_finds_manifest_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let nested = tmp.path().join("src/deep/er");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested, DEFAULT_MANIFEST_FILE_NAME).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_nearest_manifest_wins() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let inner = tmp.path().join("packages/app");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join("package.json"), "{}").unwrap();

        let root = find_project_root(&inner, DEFAULT_MANIFEST_FILE_NAME).unwrap();
        assert!(root.ends_with("packages/app"));
    }

    #[test]
    fn test_manifest_directory_does_not_count() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("securethis-manifest.json")).unwrap();

        let err = find_project_root(tmp.path(), "securethis-manifest.json").unwrap_err();
        assert!(matches!(err, SecureThisError::ProjectRootNotFound { .. }));
    }
}
