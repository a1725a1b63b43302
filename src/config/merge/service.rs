//! MergeService: orchestrates sources, applies merge policy, deserializes to KvTreeConfig.

use crate::config::sources::{environment, global_file};
use crate::config::{xdg, KvTreeConfig};
use config::{ConfigError, File};
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<KvTreeConfig, ConfigError> {
        let global = xdg::global_config_file().ok();
        Self::compose(global.as_deref(), None)
    }

    /// Load config with an explicit file layered over the global one.
    pub fn load_from_file(path: &Path) -> Result<KvTreeConfig, ConfigError> {
        let global = xdg::global_config_file().ok();
        Self::compose(global.as_deref(), Some(path))
    }

    pub(crate) fn compose(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<KvTreeConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, global)?;
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
