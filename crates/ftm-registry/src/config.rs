//! Project configuration from `ftm.toml`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use ftm_model::{Standard, StandardLadder};

use crate::error::{RegistryError, Result};

pub const CONFIG_FILE_NAME: &str = "ftm.toml";
pub const DATA_ENV_VAR: &str = "FTM_DATA";
pub const DEFAULT_DATA_FILE: &str = "data.yaml";
pub const DEFAULT_TEST_DIR: &str = "test";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub test_dir: Option<PathBuf>,
    /// Replaces the built-in C++ ladder when present.
    #[serde(default)]
    pub standards: Option<Vec<Standard>>,
    #[serde(skip)]
    origin: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|source| RegistryError::io(path, source))?;
        let mut config: ProjectConfig =
            toml::from_str(&text).map_err(|source| RegistryError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        config.origin = Some(path.to_path_buf());
        debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }

    /// Load `ftm.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Paths in the file are relative to the file itself.
    fn resolve(&self, path: &Path) -> PathBuf {
        match self.origin.as_deref().and_then(Path::parent) {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Registry path: explicit argument, then `FTM_DATA`, then the config
    /// file, then `data.yaml` in the working directory.
    pub fn data_path(&self, explicit: Option<&Path>, env: Option<OsString>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = env.filter(|value| !value.is_empty()) {
            return PathBuf::from(path);
        }
        match &self.data {
            Some(path) => self.resolve(path),
            None => PathBuf::from(DEFAULT_DATA_FILE),
        }
    }

    pub fn test_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match &self.test_dir {
            Some(path) => self.resolve(path),
            None => PathBuf::from(DEFAULT_TEST_DIR),
        }
    }

    pub fn ladder(&self) -> Result<StandardLadder> {
        match &self.standards {
            Some(standards) => {
                StandardLadder::new(standards.clone()).map_err(|source| RegistryError::Ladder {
                    path: self
                        .origin
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
                    source,
                })
            }
            None => Ok(StandardLadder::cpp()),
        }
    }
}

/// Value of `FTM_DATA`, if set.
pub fn data_env() -> Option<OsString> {
    std::env::var_os(DATA_ENV_VAR)
}
