//! Scan command handler.
//!
//! Implements the `scan` subcommand: runs the orchestrator and reports the
//! outcome in human-readable form or as JSON.

use super::exit_codes;
use crate::error::SecureThisError;
use crate::scan::{run_scan, ScanOptions, ScanResult, ScanRunner, ScanSummary};
use anyhow::Result;

/// Run the scan command
pub fn run_scan_command<R: ScanRunner + ?Sized>(
    options: &ScanOptions,
    runner: &R,
    json: bool,
    fail_on_issues: bool,
) -> Result<i32> {
    let result = match run_scan(options, runner) {
        Ok(result) => result,
        Err(err @ SecureThisError::ConfigMissing { .. }) => {
            println!("\n{err}");
            return Ok(exit_codes::CONFIG_CREATED);
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    let found_issues = matches!(result.summary, Some(ScanSummary::IssuesFound { .. }));
    if fail_on_issues && found_issues {
        Ok(exit_codes::ISSUES_FOUND)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn print_result(result: &ScanResult) {
    let Some(ref path) = result.artifact_path else {
        println!(
            "\nScan complete. No results file was produced in {}.",
            result.output_dir_absolute.display()
        );
        return;
    };

    match result.summary {
        Some(ScanSummary::Clean) => {
            println!("\n✅ Fluid Attacks scan complete. No vulnerabilities found!");
        }
        Some(ScanSummary::IssuesFound { count }) => {
            println!("\n⚠️ Fluid Attacks scan complete. {count} potential issue(s) found.");
            println!("Please review the results: file://{}", path.display());
        }
        Some(ScanSummary::Undetermined) => {
            println!(
                "\n➖ Fluid Attacks scan complete. Results file generated, but could not \
                 determine vulnerability status from summary message."
            );
            println!("Please review the results: file://{}", path.display());
        }
        None => {
            println!("\nScan complete. Results: {}", path.display());
        }
    }
}
