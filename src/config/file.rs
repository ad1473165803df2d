//! Project config file generation and loading.
//!
//! The config file lives at `<project root>/securethis.config.ts`. When it is
//! missing, [`load_config`] writes a default one and stops with
//! [`SecureThisError::ConfigMissing`] so the user reviews it before the first
//! scan.

use super::defaults::{CONFIG_FILE_NAME, CONFIG_TYPE_IDENTIFIER};
use super::module::evaluate_module;
use super::types::{ConfigOverrides, SecureThisConfig, TypeSource};
use super::validation::validate_value;
use crate::error::{Result, SecureThisError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Expected config file location for a project.
#[must_use]
pub fn config_file_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

// ============================================================================
// Generation
// ============================================================================

/// Render the source of a config module holding `config`.
pub fn render_config_source(
    config: &SecureThisConfig,
    types: &TypeSource,
) -> serde_json::Result<String> {
    Ok(format!(
        "// Security Scan Configuration File ({CONFIG_FILE_NAME})\n\
         // Please review and adjust these settings as needed for your project.\n\
         \n\
         import type {{{CONFIG_TYPE_IDENTIFIER}}} from '{target}';\n\
         \n\
         export const config: {CONFIG_TYPE_IDENTIFIER} = {literal};\n",
        target = escape_single_quoted(&types.import_target()),
        literal = to_indented_json(config)?,
    ))
}

/// Write a default config file, with `overrides` applied, into `project_root`.
///
/// Any existing file is overwritten. Returns the path written.
pub fn generate_config_file(
    project_root: &Path,
    overrides: &ConfigOverrides,
    types: &TypeSource,
) -> Result<PathBuf> {
    let path = config_file_path(project_root);
    let config = SecureThisConfig::default().with_overrides(overrides);

    let source = render_config_source(&config, types)
        .map_err(|e| SecureThisError::io(&path, e.into()))?;
    std::fs::write(&path, source).map_err(|e| SecureThisError::io(&path, e))?;

    tracing::info!("Created a default configuration file: {}", path.display());
    Ok(path)
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate the project config.
///
/// A missing file is generated with defaults, then reported as
/// [`SecureThisError::ConfigMissing`]; the caller is expected to halt.
pub fn load_config(project_root: &Path, types: &TypeSource) -> Result<SecureThisConfig> {
    let path = config_file_path(project_root);

    if !path.exists() {
        generate_config_file(project_root, &ConfigOverrides::none(), types)?;
        return Err(SecureThisError::ConfigMissing { path });
    }

    let source = std::fs::read_to_string(&path).map_err(|e| SecureThisError::io(&path, e))?;
    let value =
        evaluate_module(&source).map_err(|e| SecureThisError::config_invalid(&path, e))?;
    let config = validate_value(&value).map_err(|e| SecureThisError::config_invalid(&path, e))?;

    tracing::debug!(
        "Loaded config from {}: output dir '{}', {} exclusion(s)",
        path.display(),
        config.output_dir_relative,
        config.sast_exclude.len()
    );
    Ok(config)
}

fn to_indented_json(config: &SecureThisConfig) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    // serde_json only emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigInvalidKind;
    use tempfile::TempDir;

    fn package_types() -> TypeSource {
        TypeSource::Package {
            name: "my-securethis-package".to_string(),
        }
    }

    #[test]
    fn test_render_local_import() {
        let types = TypeSource::Local {
            absolute_path: PathBuf::from("/opt/securethis/assets/securethis.d.ts"),
        };
        let source = render_config_source(&SecureThisConfig::default(), &types).unwrap();

        assert!(source.contains(
            "import type {SecureThisConfig} from '/opt/securethis/assets/securethis.d.ts';"
        ));
        assert!(!source.contains("my-securethis-package"));
        assert!(source.contains("\"outputDirRelative\": \"securethis-results\""));
        assert!(source.contains("\"glob(**/node_modules/**)\""));
        assert!(source.contains("export const config"));
    }

    #[test]
    fn test_render_package_import() {
        let source = render_config_source(&SecureThisConfig::default(), &package_types()).unwrap();
        assert!(source.contains("import type {SecureThisConfig} from 'my-securethis-package';"));
    }

    #[test]
    fn test_render_escapes_windows_paths() {
        let types = TypeSource::Local {
            absolute_path: PathBuf::from(r"C:\tools\it's\securethis.d.ts"),
        };
        let source = render_config_source(&SecureThisConfig::default(), &types).unwrap();
        assert!(source.contains(r"from 'C:\\tools\\it\'s\\securethis.d.ts';"));
        assert!(evaluate_module(&source).is_ok());
    }

    #[test]
    fn test_render_is_pretty_and_evaluates_back() {
        let config = SecureThisConfig::default()
            .with_overrides(&ConfigOverrides::none().sast_exclude(["a \"quoted\" path"]));
        let source = render_config_source(&config, &package_types()).unwrap();

        assert!(source.contains("{\n    \"outputDirRelative\""));
        assert!(!source.contains("= {};"));
        let loaded = validate_value(&evaluate_module(&source).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_generate_with_overrides() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides::none()
            .output_dir_relative("my-custom-results")
            .sast_exclude(["custom/exclude/path"]);

        let path = generate_config_file(tmp.path(), &overrides, &package_types()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert_eq!(path, tmp.path().join(CONFIG_FILE_NAME));
        assert!(content.contains("\"outputDirRelative\": \"my-custom-results\""));
        assert!(content.contains("\"custom/exclude/path\""));
        assert!(!content.contains("node_modules"));
    }

    #[test]
    fn test_generate_overwrites_existing() {
        let tmp = TempDir::new().unwrap();
        let path = config_file_path(tmp.path());
        std::fs::write(&path, "garbage").unwrap();

        generate_config_file(tmp.path(), &ConfigOverrides::none(), &package_types()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("// Security Scan Configuration File"));
    }

    #[test]
    fn test_generate_into_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does/not/exist");
        let err =
            generate_config_file(&missing, &ConfigOverrides::none(), &package_types()).unwrap_err();
        assert!(matches!(err, SecureThisError::Io { .. }));
    }

    #[test]
    fn test_load_missing_creates_then_halts() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(tmp.path(), &package_types()).unwrap_err();

        assert!(err.to_string().contains("A config file has been created"));
        assert!(config_file_path(tmp.path()).exists());

        let config = load_config(tmp.path(), &package_types()).unwrap();
        assert_eq!(config, SecureThisConfig::default());
    }

    #[test]
    fn test_load_hand_written_default_export() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            config_file_path(tmp.path()),
            "export default {\n  outputDirRelative: \"loaded-from-file\",\n  sastExclude: [\"only-this-one\"]\n};\n",
        )
        .unwrap();

        let config = load_config(tmp.path(), &package_types()).unwrap();
        assert_eq!(config.output_dir_relative, "loaded-from-file");
        assert_eq!(config.sast_exclude, vec!["only-this-one"]);
    }

    #[test]
    fn test_load_schema_violation() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            config_file_path(tmp.path()),
            "export const config = { outputDirRelative: 'out', sastExclude: 'dist' };",
        )
        .unwrap();

        let err = load_config(tmp.path(), &package_types()).unwrap_err();
        match err {
            SecureThisError::ConfigInvalid {
                source: ConfigInvalidKind::Schema(v),
                ..
            } => assert_eq!(v.errors[0].field, "sastExclude"),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_unevaluable_module() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            config_file_path(tmp.path()),
            "import fs from 'fs';\nexport const config = fs.readFileSync('x');\n",
        )
        .unwrap();

        let err = load_config(tmp.path(), &package_types()).unwrap_err();
        assert!(matches!(
            err,
            SecureThisError::ConfigInvalid {
                source: ConfigInvalidKind::Module(_),
                ..
            }
        ));
    }
}
