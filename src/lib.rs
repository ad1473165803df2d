//! **Run a containerized static-analysis scan against a project.**
//!
//! `securethis` drives the Fluid Attacks scanner (`skims`, inside Docker)
//! against a target project. Each project customizes its scans through a
//! typed, project-local `securethis.config.ts`:
//!
//! ```ts
//! import type {SecureThisConfig} from 'securethis';
//!
//! export const config: SecureThisConfig = {
//!     "outputDirRelative": "securethis-results",
//!     "sastExclude": ["glob(**/node_modules/**)", "coverage"]
//! };
//! ```
//!
//! ## Core Concepts & Modules
//!
//! - **[`config`]**: generates, evaluates and validates the project config.
//!   The file is never executed; a restricted literal grammar is evaluated
//!   instead.
//! - **[`merge`]**: normalizes exclusions into the scanner's `glob(...)`
//!   dialect and merges them into a copy of the base scanner config.
//! - **[`scan`]**: finds the project root, runs the scanner through the
//!   [`ScanRunner`] seam and interprets the result artifact.
//! - **[`cli`]**: command handlers behind the `securethis` binary.
//!
//! ## Getting Started
//!
//! ```no_run
//! use securethis::{run_scan, DockerRunner, ScanOptions, SecureThisError};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     match run_scan(&ScanOptions::default(), &DockerRunner::default()) {
//!         Ok(result) => println!("results in {}", result.output_dir_absolute.display()),
//!         // First run: the config file was created and must be reviewed.
//!         Err(e @ SecureThisError::ConfigMissing { .. }) => println!("{e}"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod scan;

// Re-export main types for convenience
pub use config::{
    generate_config_file, load_config, ConfigOverrides, SecureThisConfig, TypeSource,
};
pub use error::{ConfigInvalidKind, Result, SecureThisError};
pub use merge::{merge_exclusions, normalize_exclusion, BaseConfigSource, MergedConfigFile};
pub use scan::{run_scan, DockerRunner, ScanInvocation, ScanOptions, ScanResult, ScanRunner, ScanSummary};
