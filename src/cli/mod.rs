//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Handlers return an exit code; only `main` terminates the process.

mod init;
mod scan;

pub use init::run_init;
pub use scan::run_scan_command;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Scan finished (and issues were tolerated)
    pub const SUCCESS: i32 = 0;
    /// Issues were found and `--fail-on-issues` was set
    pub const ISSUES_FOUND: i32 = 1;
    /// A config file was just created and must be reviewed
    pub const CONFIG_CREATED: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
