//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::KvTreeConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<KvTreeConfig, ConfigError> {
        MergeService::load()
    }

    /// Load configuration with `path` layered over the global file.
    pub fn load_from_file(path: &Path) -> Result<KvTreeConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<KvTreeConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
