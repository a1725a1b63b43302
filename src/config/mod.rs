//! Configuration
//!
//! [`KvTreeConfig`] is assembled by [`ConfigLoader`] from serde defaults, the
//! global `config.toml`, an optional explicit file, and `KVTREE__*`
//! environment variables, in increasing order of precedence.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod store;

pub use crate::logging::LoggingConfig;
pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use store::{BackendKind, StoreConfig};

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KvTreeConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
