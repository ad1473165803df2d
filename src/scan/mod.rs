//! Scan orchestration.
//!
//! Ties the pieces of one scan run together:
//! project root → config → output dir → merged scanner config → scanner →
//! result artifact.

mod artifact;
mod project;
mod runner;

pub use artifact::{
    collect_artifact, summarize, timestamped_file_name, CollectedArtifact, ScanSummary,
    NO_VULNERABILITIES_MARKER, RESULT_FILE_PREFIX,
};
pub use project::{find_project_root, DEFAULT_MANIFEST_FILE_NAME};
pub use runner::{
    DockerRunner, ScanInvocation, ScanRunner, CONTAINER_CONFIG_PATH, CONTAINER_TARGET_DIR,
    DEFAULT_DOCKER_PROGRAM, DEFAULT_SCANNER_IMAGE,
};

use crate::config::{load_config, TypeSource};
use crate::error::{Result, SecureThisError};
use crate::merge::{prepare_merged_config, BaseConfigSource};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Options for a scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Where the project root search starts; the current directory if unset
    pub cwd: Option<PathBuf>,
    /// File that marks the project root
    pub manifest_file_name: String,
    /// Type import used if a config file has to be generated
    pub type_source: TypeSource,
    pub base_config: BaseConfigSource,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            type_source: TypeSource::default(),
            base_config: BaseConfigSource::default(),
        }
    }
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Renamed result file; `None` when the scanner wrote none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
    pub output_dir_absolute: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScanSummary>,
}

/// Run a full scan.
///
/// The temporary merged config is removed before this returns, on success
/// and on every error path.
pub fn run_scan<R: ScanRunner + ?Sized>(options: &ScanOptions, runner: &R) -> Result<ScanResult> {
    let start = match options.cwd {
        Some(ref cwd) => cwd.clone(),
        None => std::env::current_dir()?,
    };

    let project_root = find_project_root(&start, &options.manifest_file_name)?;
    tracing::info!("Project root found: {}", project_root.display());

    let config = load_config(&project_root, &options.type_source)?;

    let output_dir_absolute = resolve_output_dir(&project_root, &config.output_dir_relative);
    if !output_dir_absolute.exists() {
        tracing::debug!("Creating output directory: {}", output_dir_absolute.display());
    }
    std::fs::create_dir_all(&output_dir_absolute)
        .map_err(|e| SecureThisError::io(&output_dir_absolute, e))?;
    tracing::info!("Results will be saved to: {}", output_dir_absolute.display());

    let merged = prepare_merged_config(&options.base_config, &config.sast_exclude)?;

    let invocation = ScanInvocation {
        project_root: project_root.clone(),
        output_dir: output_dir_absolute.clone(),
        merged_config_path: merged.path().to_path_buf(),
    };
    // On error, `merged` is dropped here and its directory removed.
    runner.run(&invocation)?;

    let collected = collect_artifact(&output_dir_absolute, chrono::Utc::now());
    merged.close();

    let (artifact_path, summary) = match collected {
        Some(artifact) => (Some(artifact.path), artifact.summary),
        None => (None, None),
    };

    Ok(ScanResult {
        artifact_path,
        output_dir_absolute,
        summary,
    })
}

/// Join `relative` onto `root` and fold away `.` and `..` components.
fn resolve_output_dir(root: &Path, relative: &str) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in root.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
