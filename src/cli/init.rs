//! Init command handler.
//!
//! Implements the `init` subcommand, which writes a config file without
//! running a scan.

use super::exit_codes;
use crate::config::{generate_config_file, ConfigOverrides, TypeSource};
use crate::scan::find_project_root;
use anyhow::Result;
use std::path::Path;

/// Run the init command
pub fn run_init(
    cwd: &Path,
    manifest: &str,
    overrides: &ConfigOverrides,
    types: &TypeSource,
) -> Result<i32> {
    let project_root = find_project_root(cwd, manifest)?;
    let path = generate_config_file(&project_root, overrides, types)?;
    println!("Created configuration file: {}", path.display());
    println!("Review it, then run `securethis scan`.");
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, CONFIG_FILE_NAME};
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_at_project_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let nested = tmp.path().join("src");
        std::fs::create_dir(&nested).unwrap();

        let overrides = ConfigOverrides::none().output_dir_relative("reports");
        let code = run_init(&nested, "package.json", &overrides, &TypeSource::published()).unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        assert!(tmp.path().join(CONFIG_FILE_NAME).exists());
        let config = load_config(tmp.path(), &TypeSource::published()).unwrap();
        assert_eq!(config.output_dir_relative, "reports");
    }

    #[test]
    fn test_init_without_project_fails() {
        let tmp = TempDir::new().unwrap();
        let result = run_init(
            tmp.path(),
            "securethis-missing-manifest.json",
            &ConfigOverrides::none(),
            &TypeSource::published(),
        );
        assert!(result.is_err());
    }
}
