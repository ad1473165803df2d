//! Merging project exclusions into the scanner's YAML config.

use super::glob::normalize_exclusions;
use crate::error::{Result, SecureThisError};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Base scanner config shipped with securethis.
pub const BUNDLED_BASE_CONFIG: &str = include_str!("../../assets/base-fluid-attacks-config.yaml");

/// Result file name the scanner is told to write.
pub const RESULT_FILE_NAME: &str = "Fluid-Attacks-Results.csv";

/// Directory the output dir is mounted at inside the container.
pub const CONTAINER_OUTPUT_DIR: &str = "/scan-output";

/// Output format forced onto every merged config.
pub const RESULT_FORMAT: &str = "CSV";

const MERGED_FILE_NAME: &str = "merged-fluid-attacks-config.yaml";
const TEMP_DIR_PREFIX: &str = "fluid-attacks-config-";

/// Where the base scanner config comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaseConfigSource {
    /// The copy compiled into the binary
    #[default]
    Bundled,
    /// A YAML file on disk
    File(PathBuf),
}

/// Load and parse the base scanner config.
pub fn load_base_config(source: &BaseConfigSource) -> Result<Value> {
    let (content, origin) = match source {
        BaseConfigSource::Bundled => (BUNDLED_BASE_CONFIG.to_string(), "bundled base config".to_string()),
        BaseConfigSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SecureThisError::base_config(format!("cannot read {}: {e}", path.display()))
            })?;
            (content, path.display().to_string())
        }
    };

    serde_yaml::from_str(&content)
        .map_err(|e| SecureThisError::base_config(format!("cannot parse {origin}: {e}")))
}

/// Build the merged scanner config from `base` and the project's exclusions.
///
/// `base` is left untouched. The result has `sast.exclude` replaced by the
/// normalized exclusions and the output section pointed at
/// `/scan-output/Fluid-Attacks-Results.csv` in CSV format.
pub fn merge_exclusions(base: &Value, exclusions: &[String]) -> Result<Value> {
    let mut merged = base.clone();
    let root = merged
        .as_mapping_mut()
        .ok_or_else(|| SecureThisError::base_config("document root is not a mapping"))?;

    let excluded: Vec<Value> = normalize_exclusions(exclusions)
        .into_iter()
        .map(Value::String)
        .collect();
    section_mut(root, "sast")?.insert("exclude".into(), Value::Sequence(excluded));

    let output = section_mut(root, "output")?;
    output.insert(
        "file_path".into(),
        Value::String(format!("{CONTAINER_OUTPUT_DIR}/{RESULT_FILE_NAME}")),
    );
    output.insert("format".into(), Value::String(RESULT_FORMAT.to_string()));

    Ok(merged)
}

/// Get the mapping under `key`, creating it when absent or null.
fn section_mut<'a>(root: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping> {
    let entry = root
        .entry(Value::String(key.to_string()))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if entry.is_null() {
        *entry = Value::Mapping(Mapping::new());
    }
    entry
        .as_mapping_mut()
        .ok_or_else(|| SecureThisError::base_config(format!("`{key}` is not a mapping")))
}

// ============================================================================
// Temporary merged config file
// ============================================================================

/// A merged config written to its own temporary directory.
///
/// The directory is removed when this value is dropped, whichever way the
/// scan ended.
#[derive(Debug)]
pub struct MergedConfigFile {
    dir: TempDir,
    path: PathBuf,
}

impl MergedConfigFile {
    /// Path of the merged YAML file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary directory holding the file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the temporary directory now, logging instead of failing.
    pub fn close(self) {
        let dir = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!("Cleaned up temporary config directory: {}", dir.display()),
            Err(e) => tracing::warn!(
                "Could not clean up temporary directory {}: {e}. You may need to remove it manually.",
                dir.display()
            ),
        }
    }
}

/// Serialize `merged` into a fresh temporary directory.
pub fn write_merged_config(merged: &Value) -> Result<MergedConfigFile> {
    let dir = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()
        .map_err(|e| SecureThisError::io(std::env::temp_dir(), e))?;
    let path = dir.path().join(MERGED_FILE_NAME);

    let content = serde_yaml::to_string(merged)
        .map_err(|e| SecureThisError::base_config(format!("cannot serialize merged config: {e}")))?;
    std::fs::write(&path, &content).map_err(|e| SecureThisError::io(&path, e))?;

    tracing::debug!("Created temporary merged config at {}", path.display());
    tracing::debug!("---\n{content}\n===");
    Ok(MergedConfigFile { dir, path })
}

/// Load the base config, merge `exclusions` into it and write the result.
pub fn prepare_merged_config(
    source: &BaseConfigSource,
    exclusions: &[String],
) -> Result<MergedConfigFile> {
    let base = load_base_config(source)?;
    let merged = merge_exclusions(&base, exclusions)?;
    write_merged_config(&merged)
}
