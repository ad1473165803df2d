//! Default values for securethis.

use super::types::SecureThisConfig;

/// File name of the project-local config, placed at the project root.
pub const CONFIG_FILE_NAME: &str = "securethis.config.ts";

/// Identifier of the TypeScript type the config file is constrained to.
pub const CONFIG_TYPE_IDENTIFIER: &str = "SecureThisConfig";

/// Default results directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "securethis-results";

/// Exclusions written into freshly generated config files.
pub const DEFAULT_SAST_EXCLUDE: &[&str] = &[
    "glob(**/node_modules/**)",
    "glob(**/dist/**)",
    "glob(**/build/**)",
    "glob(**/securethis-results/**)",
    "coverage",
    "glob(**/test*/**)",
    "glob(**/*spec*/**)",
    "glob(**/__tests__/**)",
    // Java/Maven build output
    "target",
    // Python virtual environments
    ".venv",
    ".git",
    ".svn",
    ".hg",
    "**/*.log",
    "temp/",
];

impl Default for SecureThisConfig {
    fn default() -> Self {
        Self {
            output_dir_relative: DEFAULT_OUTPUT_DIR.to_string(),
            sast_exclude: DEFAULT_SAST_EXCLUDE.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}
