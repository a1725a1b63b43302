//! CLI Tooling
//!
//! Command-line access to a configured store: read and write single keys,
//! list directories, dump subtrees as JSON, and import JSON documents
//! through the [`Encoder`].

use crate::config::{BackendKind, KvTreeConfig};
use crate::context::Context;
use crate::encoder::{EncodeOptions, Encoder};
use crate::error::{StoreError, ToolError};
use crate::store::{
    Action, DeleteOptions, GetOptions, KeysApi, MemoryStore, Node, SetOptions, SledStore,
};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::PathBuf;
use tracing::info;

/// kvtree - typed values over hierarchical key/value stores
#[derive(Parser)]
#[command(name = "kvtree")]
#[command(about = "Inspect and populate hierarchical key/value stores")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store backend (overrides configuration)
    #[arg(long, value_enum)]
    pub store: Option<BackendKind>,

    /// Sled database directory (overrides configuration)
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    /// Per-command deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line flags on top of loaded configuration.
    pub fn apply_overrides(&self, config: &mut KvTreeConfig) {
        if let Some(backend) = self.store {
            config.store.backend = backend;
        }
        if let Some(path) = &self.store_path {
            config.store.path = Some(path.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.store.timeout_ms = Some(timeout_ms);
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a leaf value, or the children of a directory
    Get { key: String },
    /// Write a leaf value, or create an empty directory with --dir
    Set {
        key: String,
        #[arg(required_unless_present = "dir")]
        value: Option<String>,
        /// Create a directory instead of a leaf
        #[arg(long)]
        dir: bool,
    },
    /// Delete a key
    Rm {
        key: String,
        /// Delete a non-empty directory and everything below it
        #[arg(short, long)]
        recursive: bool,
    },
    /// List a directory as a table
    Ls {
        #[arg(default_value = "/")]
        key: String,
    },
    /// Print a subtree as JSON
    Dump {
        #[arg(default_value = "/")]
        key: String,
    },
    /// Write a JSON document under a key
    Import { key: String, file: PathBuf },
}

enum StoreHandle {
    Memory(MemoryStore),
    Sled(SledStore),
}

impl StoreHandle {
    fn keys(&self) -> &dyn KeysApi {
        match self {
            StoreHandle::Memory(store) => store,
            StoreHandle::Sled(store) => store,
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        match self {
            StoreHandle::Memory(_) => Ok(()),
            StoreHandle::Sled(store) => store.flush(),
        }
    }
}

/// CLI context holding the opened store
pub struct CliContext {
    store: StoreHandle,
    config: KvTreeConfig,
}

impl CliContext {
    /// Open the store described by `config`.
    pub fn new(config: KvTreeConfig) -> Result<Self, ToolError> {
        let store = match config.store.backend {
            BackendKind::Memory => StoreHandle::Memory(MemoryStore::new()),
            BackendKind::Sled => {
                let path = config.store.resolve_path()?;
                std::fs::create_dir_all(&path)?;
                info!(path = %path.display(), "opening sled store");
                StoreHandle::Sled(SledStore::open(&path)?)
            }
        };
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &KvTreeConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn KeysApi {
        self.store.keys()
    }

    /// Context for one command, bounded by the configured timeout.
    fn call_context(&self) -> Context {
        match self.config.store.timeout() {
            Some(timeout) => Context::background().with_timeout(timeout),
            None => Context::background(),
        }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ToolError> {
        let ctx = self.call_context();
        let store = self.store.keys();
        let output = match command {
            Commands::Get { key } => {
                let node = store.get(&ctx, key, &GetOptions::default())?;
                if node.dir {
                    node.children
                        .iter()
                        .map(display_key)
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    node.value
                }
            }
            Commands::Set { key, value, dir } => {
                let opts = SetOptions {
                    dir: *dir,
                    ..Default::default()
                };
                let ack = store.set(&ctx, key, value.as_deref().unwrap_or(""), &opts)?;
                self.store.flush()?;
                let verb = match ack.action {
                    Action::Create => "created",
                    Action::Update => "updated",
                    Action::Delete => "deleted",
                };
                format!("{} {} (index {})", verb, ack.key, ack.index)
            }
            Commands::Rm { key, recursive } => {
                let opts = DeleteOptions {
                    recursive: *recursive,
                    dir: true,
                };
                let ack = store.delete(&ctx, key, &opts)?;
                self.store.flush()?;
                format!("deleted {} (index {})", ack.key, ack.index)
            }
            Commands::Ls { key } => {
                let node = store.get(&ctx, key, &GetOptions::default())?;
                format_listing(&node)
            }
            Commands::Dump { key } => {
                let node = store.get(&ctx, key, &GetOptions { recursive: true })?;
                serde_json::to_string_pretty(&node)?
            }
            Commands::Import { key, file } => {
                let text = std::fs::read_to_string(file)?;
                let document: serde_json::Value = serde_json::from_str(&text)?;
                Encoder::new(store).encode_with(&ctx, key, &document, &EncodeOptions::default())?;
                self.store.flush()?;
                format!("imported {} into {}", file.display(), key)
            }
        };
        Ok(output)
    }
}

/// Child key with a trailing `/` for directories.
fn display_key(node: &Node) -> String {
    if node.dir {
        format!("{}/", node.key)
    } else {
        node.key.clone()
    }
}

fn format_listing(node: &Node) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Kind", "Value"]);
    let rows: Vec<&Node> = if node.dir {
        node.children.iter().collect()
    } else {
        vec![node]
    };
    for row in rows {
        let value = if row.dir { "-" } else { row.value.as_str() };
        table.add_row(vec![row.key.clone(), row.kind().to_string(), value.to_string()]);
    }
    table.to_string()
}
