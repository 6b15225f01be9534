//! aptsync configuration (`config.toml`)

use anyhow::{Context, Result};
use aptlykit::{AptlyBackend, StateReader};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub aptly: AptlyConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AptlyConfig {
    /// aptly executable (name on PATH or absolute path)
    pub binary: String,
    /// aptly configuration file, passed as `-config=`
    pub config: Option<String>,
}

impl Default for AptlyConfig {
    fn default() -> Self {
        Self {
            binary: aptlykit::backend::aptly::DEFAULT_BINARY.to_string(),
            config: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Cap on concurrent commands and queries
    pub jobs: Option<usize>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Load config from an explicit path, or from the default location.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    log::debug!("Config file does not exist, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config format")
    }

    /// aptly backend configured by this file
    pub fn backend(&self) -> AptlyBackend {
        let backend = AptlyBackend::new(&self.aptly.binary);
        match &self.aptly.config {
            Some(config) => backend.with_config(paths::expand(config)),
            None => backend,
        }
    }

    /// State reader over the configured backend
    pub fn reader(&self) -> StateReader {
        StateReader::new(self.backend()).with_jobs(self.execution.jobs)
    }
}
