//! Configuration module for securethis.
//!
//! A project configures its scans through `securethis.config.ts` at the
//! project root:
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
//! The file is never executed. [`module`] evaluates a restricted literal
//! grammar and [`validation`] checks the result against the
//! [`SecureThisConfig`] shape.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use securethis::config::{load_config, TypeSource};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("/path/to/project"), &TypeSource::published())?;
//! println!("results go to {}", config.output_dir_relative);
//! # Ok::<(), securethis::SecureThisError>(())
//! ```

mod defaults;
pub mod file;
pub mod module;
mod types;
mod validation;

pub use defaults::{
    CONFIG_FILE_NAME, CONFIG_TYPE_IDENTIFIER, DEFAULT_OUTPUT_DIR, DEFAULT_SAST_EXCLUDE,
};
pub use file::{config_file_path, generate_config_file, load_config, render_config_source};
pub use module::{evaluate_module, ModuleError};
pub use types::{ConfigOverrides, SecureThisConfig, TypeSource};
pub use validation::{validate_value, ConfigError, Validatable, ValidationError};

/// Generate a JSON Schema for the `SecureThisConfig` value.
///
/// Editors can use it to validate config values that are kept as plain data.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(SecureThisConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_names_fields() {
        let schema = generate_json_schema();
        assert!(schema.contains("outputDirRelative"));
        assert!(schema.contains("sastExclude"));
        assert!(schema.contains("SecureThisConfig"));
    }
}
