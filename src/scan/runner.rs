//! Invocation of the external scanner.

use crate::error::{Result, SecureThisError};
use crate::merge::CONTAINER_OUTPUT_DIR;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default container runtime executable.
pub const DEFAULT_DOCKER_PROGRAM: &str = "docker";

/// Default scanner image.
pub const DEFAULT_SCANNER_IMAGE: &str = "fluidattacks/cli:arm64";

/// Mount point of the project root inside the container.
pub const CONTAINER_TARGET_DIR: &str = "/scan-target";

/// Mount point of the merged config inside the container.
pub const CONTAINER_CONFIG_PATH: &str = "/temp-merged-config/config.yaml";

/// Everything the scanner needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInvocation {
    /// Mounted read-only
    pub project_root: PathBuf,
    /// Mounted read-write
    pub output_dir: PathBuf,
    /// Mounted read-only
    pub merged_config_path: PathBuf,
}

/// Runs the external scanner to completion.
///
/// Implementations block until the scan has finished. Any failure, whether
/// the process could not start or exited non-zero, is reported as
/// [`SecureThisError::ScanExecution`].
pub trait ScanRunner {
    fn run(&self, invocation: &ScanInvocation) -> Result<()>;
}

/// Runs the Fluid Attacks scanner in a Docker container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerRunner {
    pub program: String,
    pub image: String,
}

impl Default for DockerRunner {
    fn default() -> Self {
        Self {
            program: DEFAULT_DOCKER_PROGRAM.to_string(),
            image: DEFAULT_SCANNER_IMAGE.to_string(),
        }
    }
}

impl DockerRunner {
    #[must_use]
    pub fn new(program: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            image: image.into(),
        }
    }

    /// Arguments passed to the container runtime.
    #[must_use]
    pub fn args(&self, invocation: &ScanInvocation) -> Vec<OsString> {
        vec![
            "run".into(),
            "--rm".into(),
            "-v".into(),
            mount(&invocation.project_root, CONTAINER_TARGET_DIR, true),
            "-v".into(),
            mount(&invocation.output_dir, CONTAINER_OUTPUT_DIR, false),
            "-v".into(),
            mount(&invocation.merged_config_path, CONTAINER_CONFIG_PATH, true),
            self.image.clone().into(),
            "skims".into(),
            "scan".into(),
            CONTAINER_CONFIG_PATH.into(),
        ]
    }
}

impl ScanRunner for DockerRunner {
    fn run(&self, invocation: &ScanInvocation) -> Result<()> {
        let args = self.args(invocation);
        tracing::info!("Running Fluid Attacks container {}", self.image);
        tracing::debug!(
            "Executing: {} {}",
            self.program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.program).args(&args).status().map_err(|e| {
            SecureThisError::scan_execution(format!(
                "could not start `{}`: {e}. Ensure Docker is running and the image {} is available.",
                self.program, self.image
            ))
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(SecureThisError::scan_execution(format!(
                "`{} run {}` exited with {status}",
                self.program, self.image
            )))
        }
    }
}

fn mount(host: &Path, container: &str, read_only: bool) -> OsString {
    let mut spec = host.as_os_str().to_os_string();
    spec.push(":");
    spec.push(container);
    if read_only {
        spec.push(":ro");
    }
    spec
}
