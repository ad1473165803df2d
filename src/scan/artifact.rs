//! Handling of the scanner's result artifact.

use crate::merge::RESULT_FILE_NAME;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Text the scanner writes when it found nothing.
pub const NO_VULNERABILITIES_MARKER: &str = "Summary: No vulnerabilities were found";

/// Prefix of renamed result files.
pub const RESULT_FILE_PREFIX: &str = "Fluid-Attacks-Results";

/// What the result file says, judged by a text heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanSummary {
    /// The no-vulnerabilities marker is present
    Clean,
    /// Non-empty lines after the header
    IssuesFound { count: usize },
    /// The file has neither the marker nor data rows
    Undetermined,
}

/// Classify result file content.
///
/// This is a string heuristic, not a CSV parse.
#[must_use]
pub fn summarize(content: &str) -> ScanSummary {
    if content.contains(NO_VULNERABILITIES_MARKER) {
        return ScanSummary::Clean;
    }
    let lines = content.lines().filter(|l| !l.trim().is_empty()).count();
    match lines.saturating_sub(1) {
        0 => ScanSummary::Undetermined,
        count => ScanSummary::IssuesFound { count },
    }
}

/// Timestamped file name for a result produced at `at`.
#[must_use]
pub fn timestamped_file_name(at: DateTime<Utc>) -> String {
    format!("{RESULT_FILE_PREFIX}-{}.csv", at.format("%Y%m%d%H%M%S"))
}

/// The result file after a scan, if there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedArtifact {
    pub path: PathBuf,
    /// `None` when the file could not be read back
    pub summary: Option<ScanSummary>,
}

/// Find the scanner's result in `output_dir`, move it to a timestamped name
/// and summarize it.
///
/// A missing result is logged and yields `None`. A failed rename keeps the
/// original path.
pub fn collect_artifact(output_dir: &Path, finished_at: DateTime<Utc>) -> Option<CollectedArtifact> {
    let original = output_dir.join(RESULT_FILE_NAME);
    if !original.exists() {
        tracing::warn!(
            "Expected results file '{RESULT_FILE_NAME}' not found in {}",
            output_dir.display()
        );
        tracing::warn!("The scan may have failed or produced no CSV output. Check the scanner logs above.");
        return None;
    }

    let renamed = output_dir.join(timestamped_file_name(finished_at));
    let path = match std::fs::rename(&original, &renamed) {
        Ok(()) => {
            tracing::info!("Results file renamed to: {}", renamed.display());
            renamed
        }
        Err(e) => {
            tracing::warn!(
                "Could not rename results file '{}' to '{}': {e}",
                original.display(),
                renamed.display()
            );
            original
        }
    };

    let summary = match std::fs::read_to_string(&path) {
        Ok(content) => Some(summarize(&content)),
        Err(e) => {
            tracing::warn!("Could not read results file {}: {e}", path.display());
            None
        }
    };

    Some(CollectedArtifact { path, summary })
}
