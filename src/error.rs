//! Error types for the mapping engine, the store clients, and the tooling.

use std::fmt;
use thiserror::Error;

/// Boxed error returned by custom codecs.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a node was expected to be, or turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Directory,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => f.write_str("leaf"),
            NodeKind::Directory => f.write_str("directory"),
        }
    }
}

/// A leaf string that does not fit its destination's grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {input:?} as {expected}: {reason}")]
pub struct ParseError {
    pub expected: &'static str,
    pub input: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(expected: &'static str, input: &str, reason: impl fmt::Display) -> Self {
        ParseError {
            expected,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Why a call context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Failures reported by a [`KeysApi`](crate::store::KeysApi) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error("not a directory: {key}")]
    NotADirectory { key: String },

    #[error("not a file: {key}")]
    NotAFile { key: String },

    #[error("directory not empty: {key}")]
    DirectoryNotEmpty { key: String },

    #[error("key already exists: {key}")]
    NodeExists { key: String },

    #[error("root is read only")]
    RootReadOnly,

    #[error("corrupt entry at {key}")]
    Corrupt { key: String },

    #[error("backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("injected failure at {key}")]
    Injected { key: String },

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl StoreError {
    /// True for the "no node at this key" condition that decode policies may absorb.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors produced by [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: destination is not addressable ({reason})")]
    NotAPointer { path: String, reason: &'static str },

    #[error("{path}: can't map value of kind {kind}")]
    UnsupportedKind { path: String, kind: &'static str },

    #[error("{path}: expected {expected}, found {found}")]
    NotADirectory {
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("{path}: key not found")]
    KeyNotFound { path: String },

    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("{path}: store call failed: {source}")]
    Store {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("{path}: custom codec failed: {source}")]
    CustomCodec {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("{path}: invalid path segment {segment:?}")]
    InvalidSegment { path: String, segment: String },

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl Error {
    pub(crate) fn parse(path: &str, source: ParseError) -> Self {
        Error::Parse {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn store(path: &str, source: StoreError) -> Self {
        match source {
            StoreError::Context(e) => Error::Context(e),
            source => Error::Store {
                path: path.to_string(),
                source,
            },
        }
    }

    /// True when the underlying store reported a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store { source, .. } if source.is_not_found())
    }
}

/// Configuration, logging, and command-line failures.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mapping(#[from] Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
