//! Store Client Contract
//!
//! The engine talks to the hierarchical store only through [`KeysApi`]:
//! one Get, Set, or Delete per call, each observing the caller's [`Context`].
//! Implementations must be safe for concurrent use; the engine adds no locking.

pub mod memory;
pub mod persistence;
pub mod recording;
pub mod tree;

use crate::context::Context;
use crate::error::{NodeKind, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use memory::{MemoryBackend, MemoryStore};
pub use persistence::{SledBackend, SledStore};
pub use recording::{RecordingStore, StoreCall};
pub use tree::{Backend, Entry, TreeStore};

/// One addressed entry of the store: a leaf value or a directory of children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default)]
    pub dir: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(key: impl Into<String>, value: impl Into<String>) -> Self {
        Node {
            key: key.into(),
            value: value.into(),
            dir: false,
            children: Vec::new(),
        }
    }

    pub fn directory(key: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            key: key.into(),
            value: String::new(),
            dir: true,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.dir {
            NodeKind::Directory
        } else {
            NodeKind::Leaf
        }
    }

    /// Local name of this node within its parent directory.
    pub fn segment(&self) -> &str {
        crate::path::last_segment(&self.key)
    }
}

/// What a mutating call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

/// Acknowledgement of a Set or Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub action: Action,
    pub key: String,
    /// Store-wide modification index assigned to this change
    pub index: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Return the whole subtree rather than direct children only
    pub recursive: bool,
}

/// Existence precondition for a Set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrevExist {
    #[default]
    Ignore,
    Exist,
    NotExist,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Create a directory instead of a leaf; the value is ignored
    pub dir: bool,
    pub prev_exist: PrevExist,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub recursive: bool,
    pub dir: bool,
}

/// Get/Set/Delete against path keys.
pub trait KeysApi: Send + Sync {
    /// Fetch the node at `key`. Fails with [`StoreError::NotFound`] when absent.
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError>;
    fn set(&self, ctx: &Context, key: &str, value: &str, opts: &SetOptions)
        -> Result<Ack, StoreError>;
    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError>;
}

impl<S: KeysApi + ?Sized> KeysApi for &S {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        (**self).get(ctx, key, opts)
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        (**self).set(ctx, key, value, opts)
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        (**self).delete(ctx, key, opts)
    }
}

impl<S: KeysApi + ?Sized> KeysApi for Arc<S> {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        (**self).get(ctx, key, opts)
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        (**self).set(ctx, key, value, opts)
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        (**self).delete(ctx, key, opts)
    }
}

impl<S: KeysApi + ?Sized> KeysApi for Box<S> {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        (**self).get(ctx, key, opts)
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        (**self).set(ctx, key, value, opts)
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        (**self).delete(ctx, key, opts)
    }
}
