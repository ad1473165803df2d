//! Configuration types for securethis.
//!
//! [`SecureThisConfig`] is the value a project exports from its
//! `securethis.config.ts`. Field names serialize in camelCase to match the
//! TypeScript type the generated file imports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Project Configuration
// ============================================================================

/// Project-local scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecureThisConfig {
    /// Directory where scan results will be saved, relative to the project root.
    pub output_dir_relative: String,
    /// SAST exclusion paths.
    ///
    /// Entries can be simple paths (e.g. `dist`, `vendor/some_lib`) or explicit
    /// glob patterns (e.g. `glob(**/__tests__/**)`). Simple paths are wrapped
    /// with `glob()` before they reach the scanner.
    pub sast_exclude: Vec<String>,
}

impl SecureThisConfig {
    /// Overlay caller-supplied overrides onto this config.
    ///
    /// Provided fields replace the existing ones outright; arrays are never
    /// concatenated.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(ref dir) = overrides.output_dir_relative {
            self.output_dir_relative.clone_from(dir);
        }
        if let Some(ref exclude) = overrides.sast_exclude {
            self.sast_exclude.clone_from(exclude);
        }
        self
    }
}

/// Partial config used when generating a new file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub output_dir_relative: Option<String>,
    pub sast_exclude: Option<Vec<String>>,
}

impl ConfigOverrides {
    /// No overrides: the generated file holds the built-in defaults.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output_dir_relative(mut self, dir: impl Into<String>) -> Self {
        self.output_dir_relative = Some(dir.into());
        self
    }

    #[must_use]
    pub fn sast_exclude<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sast_exclude = Some(entries.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// Type import source
// ============================================================================

/// Where the generated config file imports its `SecureThisConfig` type from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSource {
    /// Absolute path to a type definition file on this machine.
    Local { absolute_path: PathBuf },
    /// Name of the published package that provides the type.
    Package { name: String },
}

impl TypeSource {
    /// The type definition shipped inside this crate.
    #[must_use]
    pub fn bundled_local() -> Self {
        Self::Local {
            absolute_path: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/securethis.d.ts"
            )),
        }
    }

    /// The published package, named after this crate.
    #[must_use]
    pub fn published() -> Self {
        Self::Package {
            name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// Pick the source from an explicit local/testing flag.
    #[must_use]
    pub fn from_local_flag(local: bool) -> Self {
        if local {
            Self::bundled_local()
        } else {
            Self::published()
        }
    }

    /// The string placed inside the import statement's quotes.
    #[must_use]
    pub fn import_target(&self) -> String {
        match self {
            Self::Local { absolute_path } => absolute_path.to_string_lossy().into_owned(),
            Self::Package { name } => name.clone(),
        }
    }
}

impl Default for TypeSource {
    fn default() -> Self {
        Self::published()
    }
}
