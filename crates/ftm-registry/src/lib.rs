//! Loading feature-test macro registries.
//!
//! The registry lives in a YAML document; this crate reads it, validates
//! every record into [`ftm_model`] values, and resolves project settings
//! from `ftm.toml`. It also imports libstdc++'s own `version.def`.

pub mod config;
pub mod error;
pub mod glibcxx;
pub mod ingest;
pub mod loader;
pub mod raw;

pub use config::{
    CONFIG_FILE_NAME, DATA_ENV_VAR, DEFAULT_DATA_FILE, DEFAULT_TEST_DIR, ProjectConfig, data_env,
};
pub use error::{RegistryError, Result};
pub use glibcxx::{
    Definition, Definitions, GlibcxxMacro, GlibcxxValue, ImportSummary, apply_glibcxx,
    parse_definitions, parse_version_def, tokenize,
};
pub use ingest::{ingest_feature, ingest_registry};
pub use loader::{load_registry, parse_registry};
pub use raw::{RawFact, RawFeature, RawRegistry, RawRow};
