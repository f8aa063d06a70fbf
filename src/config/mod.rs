// src/config/mod.rs

//! Pool configuration.
//!
//! - [`model`] holds the validated [`PoolConfig`] and its builder, plus the
//!   raw TOML shape [`RawConfigFile`].
//! - [`loader`] reads TOML from disk or a string.
//! - [`validate`] turns raw values into a `PoolConfig`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{from_toml_str, load_and_validate, load_from_path};
pub use model::{PoolConfig, PoolConfigBuilder, RawConfigFile, RawPoolSection};
