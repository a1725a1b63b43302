//! StoreConfig: which store the tooling talks to, and how long a command may take.

use crate::config::xdg;
use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local; contents are lost on exit
    Memory,
    /// Persistent sled database
    #[default]
    Sled,
}

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Sled directory; None means `$XDG_DATA_HOME/kvtree/store`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Deadline applied to each command, in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl StoreConfig {
    /// Resolve the sled directory to an actual filesystem location.
    pub fn resolve_path(&self) -> Result<PathBuf, ToolError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => xdg::default_store_dir(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
