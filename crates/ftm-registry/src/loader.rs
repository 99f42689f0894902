use std::path::Path;

use tracing::info;

use ftm_model::{Registry, StandardLadder};

use crate::error::{RegistryError, Result};
use crate::ingest::ingest_registry;
use crate::raw::RawRegistry;

/// Parse and validate a registry document.
pub fn parse_registry(text: &str, ladder: &StandardLadder) -> Result<Registry> {
    let raw: RawRegistry = serde_yaml::from_str(text).map_err(|source| RegistryError::Yaml {
        path: "<inline>".into(),
        source,
    })?;
    ingest_registry(raw, ladder)
}

pub fn load_registry(path: &Path, ladder: &StandardLadder) -> Result<Registry> {
    let text = std::fs::read_to_string(path).map_err(|source| RegistryError::io(path, source))?;
    let raw: RawRegistry = serde_yaml::from_str(&text).map_err(|source| RegistryError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = ingest_registry(raw, ladder)?;
    info!(
        path = %path.display(),
        features = registry.feature_count(),
        "loaded registry"
    );
    Ok(registry)
}
