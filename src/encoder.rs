//! Encoder
//!
//! Walks a value's descriptor depth-first and writes it under a path. Struct
//! fields land at `path/segment`, sequence elements at `path/<index>`, and
//! mapping entries at `path/<key>`. Collections replace whatever subtree was
//! there before; structs are merged into the existing tree. A struct or
//! collection that writes nothing below it still leaves a directory behind.

use crate::codec::{custom, NodeRef, NodeValue};
use crate::context::Context;
use crate::error::{Error, StoreError};
use crate::path;
use crate::store::{DeleteOptions, KeysApi, SetOptions};
use tracing::debug;

/// Per-call encoding options.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Applied to every leaf write
    pub set: SetOptions,
}

pub struct Encoder<S> {
    store: S,
}

impl<S: KeysApi> Encoder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Write `value` under `path` with a background context and default options.
    pub fn encode<T: NodeValue + ?Sized>(&self, path: &str, value: &T) -> Result<(), Error> {
        self.encode_with(&Context::background(), path, value, &EncodeOptions::default())
    }

    /// Write `value` under `path`.
    ///
    /// The first failure aborts the walk. Writes already made stay in place.
    pub fn encode_with<T: NodeValue + ?Sized>(
        &self,
        ctx: &Context,
        path: &str,
        value: &T,
        opts: &EncodeOptions,
    ) -> Result<(), Error> {
        let call = EncodeCall {
            store: &self.store,
            ctx,
            opts,
        };
        call.encode(path, value.as_node())?;
        Ok(())
    }
}

struct EncodeCall<'a, S> {
    store: &'a S,
    ctx: &'a Context,
    opts: &'a EncodeOptions,
}

impl<S: KeysApi> EncodeCall<'_, S> {
    /// Write `node` under `path`. Returns whether a node now exists there.
    fn encode(&self, path: &str, node: NodeRef<'_>) -> Result<bool, Error> {
        match node {
            NodeRef::Custom(codec) => {
                let leaf = custom::marshal(codec).map_err(|source| Error::CustomCodec {
                    path: path.to_string(),
                    source,
                })?;
                self.set(path, &leaf)?;
                Ok(true)
            }
            NodeRef::Indirect(None) => Ok(false),
            NodeRef::Indirect(Some(inner)) => self.encode(path, inner.as_node()),
            NodeRef::Struct(fields) => {
                let mut written = false;
                for spec in fields.fields().iter().filter(|spec| !spec.skip) {
                    if let Some(field) = fields.field(spec.name) {
                        written |= self.encode(&path::join(path, &spec.segment), field.as_node())?;
                    }
                }
                if !written {
                    self.make_dir(path)?;
                }
                Ok(true)
            }
            NodeRef::Sequence(items) => {
                self.delete_subtree(path)?;
                let mut written = false;
                for index in 0..items.len() {
                    if let Some(item) = items.element(index) {
                        written |=
                            self.encode(&path::join(path, &index.to_string()), item.as_node())?;
                    }
                }
                if !written {
                    self.make_dir(path)?;
                }
                Ok(true)
            }
            NodeRef::Mapping(map) => {
                let entries = map.entries();
                if let Some((segment, _)) = entries
                    .iter()
                    .find(|(segment, _)| !path::is_valid_segment(segment))
                {
                    return Err(Error::InvalidSegment {
                        path: path.to_string(),
                        segment: segment.clone(),
                    });
                }
                self.delete_subtree(path)?;
                let mut written = false;
                for (segment, value) in entries {
                    written |= self.encode(&path::join(path, &segment), value.as_node())?;
                }
                if !written {
                    self.make_dir(path)?;
                }
                Ok(true)
            }
            NodeRef::Leaf(text) => {
                self.set(path, &text)?;
                Ok(true)
            }
            NodeRef::Unsupported(kind) => Err(Error::UnsupportedKind {
                path: path.to_string(),
                kind,
            }),
        }
    }

    fn set(&self, path: &str, value: &str) -> Result<(), Error> {
        self.ctx.check()?;
        debug!(path, value, "set");
        self.store
            .set(self.ctx, path, value, &self.opts.set)
            .map_err(|e| Error::store(path, e))?;
        Ok(())
    }

    /// Remove the subtree at `path`, if there is one.
    fn delete_subtree(&self, path: &str) -> Result<(), Error> {
        self.ctx.check()?;
        debug!(path, "delete subtree");
        let opts = DeleteOptions {
            recursive: true,
            dir: true,
        };
        match self.store.delete(self.ctx, path, &opts) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::store(path, e)),
        }
    }

    /// Create an empty directory at `path`; an existing directory is kept.
    fn make_dir(&self, path: &str) -> Result<(), Error> {
        self.ctx.check()?;
        debug!(path, "create directory");
        let opts = SetOptions {
            dir: true,
            ..Default::default()
        };
        match self.store.set(self.ctx, path, "", &opts) {
            Ok(_) => Ok(()),
            Err(StoreError::NodeExists { .. }) => Ok(()),
            Err(e) => Err(Error::store(path, e)),
        }
    }
}
