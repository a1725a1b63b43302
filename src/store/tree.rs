//! Hierarchical semantics over an ordered flat key space.
//!
//! A [`Backend`] only needs point reads/writes and prefix scans; [`TreeStore`]
//! layers directories, implicit parents, and recursive deletes on top.
//! Mutations are serialized by a store-wide lock, reads are not.

use crate::context::Context;
use crate::error::StoreError;
use crate::path;
use crate::store::{
    Ack, Action, DeleteOptions, GetOptions, KeysApi, Node, PrevExist, SetOptions,
};
use parking_lot::Mutex;
use tracing::trace;

/// Stored form of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Leaf(String),
    Dir,
}

/// Ordered flat storage underneath a [`TreeStore`].
pub trait Backend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Entry>, StoreError>;
    fn write(&self, key: &str, entry: &Entry) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Every entry whose key starts with `prefix`, in key order.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Entry)>, StoreError>;
    /// Next modification index; strictly increasing for the backend's lifetime.
    fn next_index(&self) -> Result<u64, StoreError>;
}

pub struct TreeStore<B> {
    backend: B,
    writes: Mutex<()>,
}

fn dir_prefix(key: &str) -> String {
    if key == "/" {
        key.to_string()
    } else {
        format!("{}/", key)
    }
}

impl<B: Backend> TreeStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            writes: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All leaves at or below `key`, as `(key, value)` pairs in key order.
    pub fn leaves(&self, key: &str) -> Result<Vec<(String, String)>, StoreError> {
        let key = path::normalize(key);
        let mut out = Vec::new();
        if let Some(Entry::Leaf(value)) = self.entry(&key)? {
            out.push((key.clone(), value));
        }
        for (child, entry) in self.backend.scan(&dir_prefix(&key))? {
            if let Entry::Leaf(value) = entry {
                out.push((child, value));
            }
        }
        Ok(out)
    }

    fn entry(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        if key == "/" {
            return Ok(Some(Entry::Dir));
        }
        self.backend.read(key)
    }

    fn children(&self, key: &str, recursive: bool) -> Result<Vec<Node>, StoreError> {
        let prefix = dir_prefix(key);
        let mut nodes = Vec::new();
        for (child_key, entry) in self.backend.scan(&prefix)? {
            let rest = &child_key[prefix.len()..];
            if rest.is_empty() || rest.contains('/') {
                continue;
            }
            let node = match entry {
                Entry::Leaf(value) => Node::leaf(child_key, value),
                Entry::Dir => {
                    let grandchildren = if recursive {
                        self.children(&child_key, true)?
                    } else {
                        Vec::new()
                    };
                    Node::directory(child_key, grandchildren)
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Create missing ancestor directories of `key`, top-down.
    fn ensure_parents(&self, key: &str) -> Result<(), StoreError> {
        let mut ancestors = Vec::new();
        let mut current = path::parent(key);
        while let Some(parent) = current {
            if parent == "/" {
                break;
            }
            ancestors.push(parent);
            current = path::parent(parent);
        }
        for ancestor in ancestors.into_iter().rev() {
            match self.backend.read(ancestor)? {
                Some(Entry::Dir) => {}
                Some(Entry::Leaf(_)) => {
                    return Err(StoreError::NotADirectory {
                        key: ancestor.to_string(),
                    })
                }
                None => self.backend.write(ancestor, &Entry::Dir)?,
            }
        }
        Ok(())
    }
}

impl<B: Backend> KeysApi for TreeStore<B> {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        ctx.check()?;
        let key = path::normalize(key);
        trace!(key = %key, recursive = opts.recursive, "store get");
        match self.entry(&key)? {
            None => Err(StoreError::NotFound { key }),
            Some(Entry::Leaf(value)) => Ok(Node::leaf(key, value)),
            Some(Entry::Dir) => {
                let children = self.children(&key, opts.recursive)?;
                Ok(Node::directory(key, children))
            }
        }
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        ctx.check()?;
        let key = path::normalize(key);
        if key == "/" {
            return Err(StoreError::RootReadOnly);
        }
        let _guard = self.writes.lock();

        let existing = self.backend.read(&key)?;
        match (opts.prev_exist, &existing) {
            (PrevExist::Exist, None) => return Err(StoreError::NotFound { key }),
            (PrevExist::NotExist, Some(_)) => return Err(StoreError::NodeExists { key }),
            _ => {}
        }

        let action = match (&existing, opts.dir) {
            (None, _) => Action::Create,
            (Some(Entry::Dir), false) => return Err(StoreError::NotAFile { key }),
            (Some(Entry::Leaf(_)), true) => return Err(StoreError::NotADirectory { key }),
            (Some(_), _) => Action::Update,
        };

        self.ensure_parents(&key)?;
        if opts.dir {
            if existing.is_none() {
                self.backend.write(&key, &Entry::Dir)?;
            }
        } else {
            self.backend.write(&key, &Entry::Leaf(value.to_string()))?;
        }

        let index = self.backend.next_index()?;
        Ok(Ack { action, key, index })
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        ctx.check()?;
        let key = path::normalize(key);
        if key == "/" {
            return Err(StoreError::RootReadOnly);
        }
        let _guard = self.writes.lock();

        match self.backend.read(&key)? {
            None => return Err(StoreError::NotFound { key }),
            Some(Entry::Leaf(_)) => self.backend.remove(&key)?,
            Some(Entry::Dir) => {
                if !opts.dir && !opts.recursive {
                    return Err(StoreError::NotAFile { key });
                }
                let descendants = self.backend.scan(&dir_prefix(&key))?;
                if !descendants.is_empty() && !opts.recursive {
                    return Err(StoreError::DirectoryNotEmpty { key });
                }
                for (descendant, _) in descendants.iter().rev() {
                    self.backend.remove(descendant)?;
                }
                self.backend.remove(&key)?;
            }
        }

        let index = self.backend.next_index()?;
        Ok(Ack {
            action: Action::Delete,
            key,
            index,
        })
    }
}
