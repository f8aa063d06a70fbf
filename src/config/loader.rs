// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{PoolConfig, RawConfigFile};
use crate::errors::Result;

/// Read a TOML file into a [`RawConfigFile`] without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Read and validate a TOML file into a [`PoolConfig`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PoolConfig> {
    let raw = load_from_path(path)?;
    PoolConfig::try_from(raw)
}

/// Parse and validate TOML text into a [`PoolConfig`].
pub fn from_toml_str(contents: &str) -> Result<PoolConfig> {
    let raw: RawConfigFile = toml::from_str(contents)?;
    PoolConfig::try_from(raw)
}
