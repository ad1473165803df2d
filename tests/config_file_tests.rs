//! Config generation and loading integration tests.
//!
//! These exercise the generate → load cycle against real temporary project
//! directories.

use securethis::config::{
    config_file_path, evaluate_module, generate_config_file, load_config, validate_value,
    ConfigOverrides, SecureThisConfig, TypeSource, CONFIG_FILE_NAME, DEFAULT_SAST_EXCLUDE,
};
use securethis::SecureThisError;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

fn package_types() -> TypeSource {
    TypeSource::Package {
        name: "my-securethis-package".to_string(),
    }
}

fn exported_value(root: &std::path::Path) -> SecureThisConfig {
    let source = std::fs::read_to_string(config_file_path(root)).expect("config file readable");
    let value = evaluate_module(&source).expect("generated module evaluates");
    validate_value(&value).expect("generated value validates")
}

// ============================================================================
// Generation
// ============================================================================

mod generation {
    use super::*;

    #[test]
    fn local_mode_imports_absolute_type_path() {
        let tmp = TempDir::new().unwrap();
        generate_config_file(tmp.path(), &ConfigOverrides::none(), &TypeSource::bundled_local())
            .unwrap();

        let content = std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        let import_line = content
            .lines()
            .find(|l| l.starts_with("import type {SecureThisConfig} from '"))
            .expect("type import line present");
        let target = import_line
            .trim_start_matches("import type {SecureThisConfig} from '")
            .trim_end_matches("';");

        assert!(PathBuf::from(target).is_absolute(), "not absolute: {target}");
        assert!(target.ends_with("securethis.d.ts"));
        assert!(PathBuf::from(target).exists(), "bundled type definition missing");
        assert!(!content.contains("my-securethis-package"));
    }

    #[test]
    fn package_mode_imports_package_name() {
        let tmp = TempDir::new().unwrap();
        generate_config_file(tmp.path(), &ConfigOverrides::none(), &package_types()).unwrap();

        let content = std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(content.contains("import type {SecureThisConfig} from 'my-securethis-package';"));
        assert!(content.contains("export const config: SecureThisConfig = {"));
        assert!(content.contains("\"outputDirRelative\": \"securethis-results\""));
    }

    #[test]
    fn defaults_only_when_no_overrides() {
        let tmp = TempDir::new().unwrap();
        generate_config_file(tmp.path(), &ConfigOverrides::none(), &package_types()).unwrap();

        let config = exported_value(tmp.path());
        assert_eq!(config, SecureThisConfig::default());
        assert_eq!(config.sast_exclude.len(), DEFAULT_SAST_EXCLUDE.len());
    }

    #[test]
    fn scalar_override_keeps_default_array() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides::none().output_dir_relative("./securethis-results");
        generate_config_file(tmp.path(), &overrides, &package_types()).unwrap();

        let config = exported_value(tmp.path());
        assert_eq!(config.output_dir_relative, "./securethis-results");
        assert_eq!(config.sast_exclude, SecureThisConfig::default().sast_exclude);
    }

    #[test]
    fn array_override_replaces_not_appends() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides::none().sast_exclude(["e2e/exclude", "glob(**/dist/**)"]);
        generate_config_file(tmp.path(), &overrides, &package_types()).unwrap();

        let config = exported_value(tmp.path());
        assert_eq!(config.sast_exclude, vec!["e2e/exclude", "glob(**/dist/**)"]);
        assert_eq!(config.output_dir_relative, "securethis-results");
    }
}

// ============================================================================
// Loading
// ============================================================================

mod loading {
    use super::*;

    #[test]
    fn missing_file_is_created_once_then_loads() {
        let tmp = TempDir::new().unwrap();

        let err = load_config(tmp.path(), &package_types()).unwrap_err();
        assert!(matches!(err, SecureThisError::ConfigMissing { .. }));
        assert!(err.to_string().contains("A config file has been created"));

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "exactly one file should be created");
        assert!(config_file_path(tmp.path()).exists());

        let config = load_config(tmp.path(), &package_types()).expect("second load succeeds");
        assert_eq!(config, SecureThisConfig::default());
    }

    #[test]
    fn create_then_get_round_trip() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides::none()
            .output_dir_relative("e2e-test-dir")
            .sast_exclude(["e2e/exclude", "glob(**/dist/**)"]);
        generate_config_file(tmp.path(), &overrides, &package_types()).unwrap();

        let loaded = load_config(tmp.path(), &package_types()).unwrap();
        assert_eq!(loaded, SecureThisConfig::default().with_overrides(&overrides));
    }

    #[test]
    fn hand_edited_file_with_wrong_types_is_invalid() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            config_file_path(tmp.path()),
            "import type {SecureThisConfig} from 'securethis';\n\
             export const config: SecureThisConfig = { outputDirRelative: 1, sastExclude: [true] };\n",
        )
        .unwrap();

        let err = load_config(tmp.path(), &package_types()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SecureThisError::ConfigInvalid { .. }));
        assert!(message.contains("outputDirRelative"), "{message}");
        assert!(message.contains("sastExclude[0]"), "{message}");
    }

    #[test]
    fn loader_does_not_touch_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = config_file_path(tmp.path());
        let source = "export default { outputDirRelative: 'x', sastExclude: [] }\n";
        std::fs::write(&path, source).unwrap();

        load_config(tmp.path(), &package_types()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), source);
    }
}
