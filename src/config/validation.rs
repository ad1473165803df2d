//! Schema validation for project configuration values.
//!
//! Values evaluated from a config module are untyped [`serde_json::Value`]s.
//! [`validate_value`] checks them against the [`SecureThisConfig`] shape
//! without coercing anything: a number where a string belongs is an error,
//! not a string.

use super::types::SecureThisConfig;
use serde_json::Value;

const OUTPUT_DIR_FIELD: &str = "outputDirRelative";
const SAST_EXCLUDE_FIELD: &str = "sastExclude";

// ============================================================================
// Configuration Error
// ============================================================================

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// All violations found in one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<ConfigError>,
}

impl ValidationError {
    #[must_use]
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self { errors }
    }

    /// Names of the offending fields, in the order they were found.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for SecureThisConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.output_dir_relative.is_empty() {
            errors.push(ConfigError::new(OUTPUT_DIR_FIELD, "must not be empty"));
        }
        errors
    }
}

// ============================================================================
// Untyped value validation
// ============================================================================

/// Validate an evaluated config value and convert it into a [`SecureThisConfig`].
///
/// Keys other than `outputDirRelative` and `sastExclude` are ignored.
pub fn validate_value(value: &Value) -> Result<SecureThisConfig, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::new(vec![ConfigError::new(
            "config",
            format!("expected an object, got {}", type_name(value)),
        )]));
    };

    let mut errors = Vec::new();

    let output_dir_relative = match object.get(OUTPUT_DIR_FIELD) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(ConfigError::new(
                OUTPUT_DIR_FIELD,
                format!("expected a string, got {}", type_name(other)),
            ));
            None
        }
        None => {
            errors.push(ConfigError::new(OUTPUT_DIR_FIELD, "required field is missing"));
            None
        }
    };

    let sast_exclude = match object.get(SAST_EXCLUDE_FIELD) {
        Some(Value::Array(items)) => {
            let mut entries = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => entries.push(s.clone()),
                    other => errors.push(ConfigError::new(
                        format!("{SAST_EXCLUDE_FIELD}[{i}]"),
                        format!("expected a string, got {}", type_name(other)),
                    )),
                }
            }
            Some(entries)
        }
        Some(other) => {
            errors.push(ConfigError::new(
                SAST_EXCLUDE_FIELD,
                format!("expected an array of strings, got {}", type_name(other)),
            ));
            None
        }
        None => {
            errors.push(ConfigError::new(SAST_EXCLUDE_FIELD, "required field is missing"));
            None
        }
    };

    // Semantic checks run whenever the output dir parsed, alongside type errors.
    let Some(output_dir_relative) = output_dir_relative else {
        return Err(ValidationError::new(errors));
    };
    let config = SecureThisConfig {
        output_dir_relative,
        sast_exclude: sast_exclude.unwrap_or_default(),
    };
    errors.extend(config.validate());

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ValidationError::new(errors))
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_value() {
        let value = json!({
            "outputDirRelative": "out",
            "sastExclude": ["dist", "glob(**/x/**)"]
        });
        let config = validate_value(&value).unwrap();
        assert_eq!(config.output_dir_relative, "out");
        assert_eq!(config.sast_exclude, vec!["dist", "glob(**/x/**)"]);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let value = json!({
            "outputDirRelative": "out",
            "sastExclude": [],
            "somethingElse": 42
        });
        assert!(validate_value(&value).is_ok());
    }

    #[test]
    fn test_no_coercion_of_numbers() {
        let value = json!({ "outputDirRelative": 5, "sastExclude": [] });
        let err = validate_value(&value).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["outputDirRelative"]);
    }

    #[test]
    fn test_reports_every_bad_field() {
        let value = json!({ "sastExclude": ["ok", 1, null] });
        let err = validate_value(&value).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec!["outputDirRelative", "sastExclude[1]", "sastExclude[2]"]
        );
    }

    #[test]
    fn test_empty_output_dir_reported_with_type_errors() {
        let value = json!({ "outputDirRelative": "", "sastExclude": 5 });
        let err = validate_value(&value).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec!["sastExclude", "outputDirRelative"]
        );
    }

    #[test]
    fn test_string_instead_of_array() {
        let value = json!({ "outputDirRelative": "out", "sastExclude": "dist" });
        let err = validate_value(&value).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.to_string().contains("expected an array of strings"));
    }

    #[test]
    fn test_non_object_root() {
        let err = validate_value(&json!(["a"])).unwrap_err();
        assert_eq!(err.errors[0].field, "config");
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let value = json!({ "outputDirRelative": "", "sastExclude": [] });
        let err = validate_value(&value).unwrap_err();
        assert_eq!(err.to_string(), "outputDirRelative: must not be empty");
    }
}
