use std::path::PathBuf;

use ftm_model::{Implementation, ModelError};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{feature}: {source}")]
    Feature {
        feature: String,
        #[source]
        source: ModelError,
    },

    #[error("{feature}: {implementation} support: {source}")]
    Support {
        feature: String,
        implementation: Implementation,
        #[source]
        source: ModelError,
    },

    #[error("invalid standard ladder in {path}: {source}")]
    Ladder {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("invalid registry document: {message}")]
    InvalidDocument { message: String },

    #[error("invalid version.def: {message}")]
    VersionDef { message: String },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn feature(feature: &str, source: ModelError) -> Self {
        Self::Feature {
            feature: feature.to_string(),
            source,
        }
    }

    pub(crate) fn version_def(message: impl Into<String>) -> Self {
        Self::VersionDef {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
