//! Exclusion rule merging.
//!
//! Turns a project's `sastExclude` list into the scanner's glob dialect and
//! merges it into a copy of the base scanner config. The result is written to
//! a temporary file that lives only as long as one scan.

mod document;
mod glob;

pub use document::{
    load_base_config, merge_exclusions, prepare_merged_config, write_merged_config,
    BaseConfigSource, MergedConfigFile, BUNDLED_BASE_CONFIG, CONTAINER_OUTPUT_DIR,
    RESULT_FILE_NAME, RESULT_FORMAT,
};
pub use glob::{normalize_exclusion, normalize_exclusions};
