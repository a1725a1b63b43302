//! Decoder
//!
//! Fills a destination from the subtree at a path. Each directory level costs
//! one Get; leaves are read from their parent's listing. Sequence elements are
//! placed by the index in their key, so listing order does not matter.
//! Mapping entries are inserted into the destination; keys already present
//! in it and absent from the store are kept.

use crate::codec::{custom, MappingNode, NodeMut, NodeValue, Primitive, SequenceNode, StructNode};
use crate::context::Context;
use crate::error::{Error, NodeKind, ParseError};
use crate::path;
use crate::store::{GetOptions, KeysApi, Node};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Largest number of default-filled slots a sequence may gain from gaps in
/// its indexes.
const MAX_INDEX_GAP: usize = 4096;

/// Per-call decoding options.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Passed to every Get
    pub get: GetOptions,
    skip_missing: bool,
}

impl DecodeOptions {
    /// Fetch whole subtrees in one Get per top-level call.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.get.recursive = recursive;
        self
    }

    /// Treat every missing node as its zero value.
    #[deprecated(note = "annotate the fields that may be absent with `omitempty`")]
    pub fn skip_missing(mut self, skip: bool) -> Self {
        self.skip_missing = skip;
        self
    }
}

/// Reads typed values out of a [`KeysApi`] store.
///
/// Sequence indexes are strict: a child segment must be the canonical
/// base-10 form of a `usize` (`"01"` and `"+1"` are parse errors), and a
/// listing whose largest index would leave more than 4096 default-filled
/// slots is rejected with [`Error::Parse`] instead of being allocated.
pub struct Decoder<S> {
    store: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Present,
    Missing,
}

impl<S: KeysApi> Decoder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Read the subtree at `path` into `out` with a background context.
    pub fn decode<T: NodeValue>(&self, path: &str, out: &mut T) -> Result<(), Error> {
        self.decode_with(&Context::background(), path, out, &DecodeOptions::default())
    }

    /// Read the subtree at `path` into `out`.
    ///
    /// On error `out` may be partially filled.
    pub fn decode_with<T: NodeValue>(
        &self,
        ctx: &Context,
        path: &str,
        out: &mut T,
        opts: &DecodeOptions,
    ) -> Result<(), Error> {
        if opts.skip_missing {
            warn!(path, "skip_missing is deprecated, annotate fields with omitempty instead");
        }
        let call = DecodeCall {
            store: &self.store,
            ctx,
            opts,
        };
        call.decode(path, out, false, None)?;
        Ok(())
    }
}

struct DecodeCall<'a, S> {
    store: &'a S,
    ctx: &'a Context,
    opts: &'a DecodeOptions,
}

impl<S: KeysApi> DecodeCall<'_, S> {
    /// Decode the node at `path` into `out`.
    ///
    /// `listed` is the node as it appeared in its parent's listing, if any.
    fn decode(
        &self,
        path: &str,
        out: &mut dyn NodeValue,
        omit_empty: bool,
        listed: Option<&Node>,
    ) -> Result<Presence, Error> {
        let expected = match out.as_node_mut() {
            NodeMut::Indirect(slot) => {
                let presence = self.decode(path, slot.get_or_insert(), omit_empty, listed)?;
                if presence == Presence::Missing {
                    slot.clear();
                }
                return Ok(presence);
            }
            NodeMut::Shared(reason) => {
                return Err(Error::NotAPointer {
                    path: path.to_string(),
                    reason,
                })
            }
            NodeMut::Unsupported(kind) => {
                return Err(Error::UnsupportedKind {
                    path: path.to_string(),
                    kind,
                })
            }
            NodeMut::Leaf(_) | NodeMut::Custom(_) => NodeKind::Leaf,
            NodeMut::Struct(_) | NodeMut::Mapping(_) | NodeMut::Sequence(_) => NodeKind::Directory,
        };

        let fetched;
        let node = match listed.filter(|node| !node.dir || self.opts.get.recursive) {
            Some(node) => node,
            None => match self.fetch(path, omit_empty)? {
                Some(node) => {
                    fetched = node;
                    &fetched
                }
                None => {
                    out.reset();
                    return Ok(Presence::Missing);
                }
            },
        };

        if node.kind() != expected {
            return Err(Error::NotADirectory {
                path: path.to_string(),
                expected,
                found: node.kind(),
            });
        }

        match out.as_node_mut() {
            NodeMut::Leaf(slot) => slot
                .parse_leaf(&node.value)
                .map_err(|e| Error::parse(path, e))?,
            NodeMut::Custom(codec) => {
                custom::unmarshal(codec, &node.value).map_err(|source| Error::CustomCodec {
                    path: path.to_string(),
                    source,
                })?
            }
            NodeMut::Struct(fields) => self.decode_struct(path, node, fields)?,
            NodeMut::Mapping(map) => self.decode_mapping(node, map)?,
            NodeMut::Sequence(items) => self.decode_sequence(path, node, items)?,
            NodeMut::Indirect(_) | NodeMut::Shared(_) | NodeMut::Unsupported(_) => {}
        }
        Ok(Presence::Present)
    }

    fn fetch(&self, path: &str, omit_empty: bool) -> Result<Option<Node>, Error> {
        self.ctx.check()?;
        trace!(path, "get");
        match self.store.get(self.ctx, path, &self.opts.get) {
            Ok(node) => Ok(Some(node)),
            Err(e) if e.is_not_found() && (omit_empty || self.opts.skip_missing) => {
                debug!(path, "missing node left at its zero value");
                Ok(None)
            }
            Err(e) => Err(Error::store(path, e)),
        }
    }

    fn decode_struct(
        &self,
        path: &str,
        node: &Node,
        fields: &mut dyn StructNode,
    ) -> Result<(), Error> {
        let children: HashMap<&str, &Node> = node
            .children
            .iter()
            .map(|child| (child.segment(), child))
            .collect();

        for spec in fields.fields().iter().filter(|spec| !spec.skip) {
            let Some(field) = fields.field_mut(spec.name) else {
                continue;
            };
            let field_path = path::join(path, &spec.segment);
            match children.get(spec.segment.as_str()).copied() {
                Some(child) => {
                    self.decode(&field_path, field, spec.omit_empty, Some(child))?;
                }
                None if spec.omit_empty || self.opts.skip_missing => {
                    absent(&field_path, field)?;
                }
                None => return Err(Error::KeyNotFound { path: field_path }),
            }
        }
        Ok(())
    }

    fn decode_mapping(&self, node: &Node, map: &mut dyn MappingNode) -> Result<(), Error> {
        for child in &node.children {
            map.insert_with(&child.key, &mut |value| {
                self.decode(&child.key, value, false, Some(child))?;
                Ok(())
            })?;
        }
        Ok(())
    }

    fn decode_sequence(
        &self,
        path: &str,
        node: &Node,
        items: &mut dyn SequenceNode,
    ) -> Result<(), Error> {
        let mut indexed = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let segment = child.segment();
            let index = usize::from_leaf(segment).map_err(|e| Error::parse(&child.key, e))?;
            if index.to_string() != segment {
                return Err(Error::parse(
                    &child.key,
                    ParseError::new("sequence index", segment, "not in canonical form"),
                ));
            }
            indexed.push((index, child));
        }

        let len = indexed
            .iter()
            .map(|(index, _)| index.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(indexed.len());
        if len - indexed.len() > MAX_INDEX_GAP {
            return Err(Error::parse(
                path,
                ParseError::new(
                    "sequence index",
                    &(len - 1).to_string(),
                    format!("leaves more than {} unfilled slots", MAX_INDEX_GAP),
                ),
            ));
        }

        items.reset_len(len);
        for (index, child) in indexed {
            if let Some(slot) = items.element_mut(index) {
                self.decode(&child.key, slot, false, Some(child))?;
            }
        }
        Ok(())
    }
}

/// Zero a destination whose node is missing but tolerated.
fn absent(path: &str, out: &mut dyn NodeValue) -> Result<(), Error> {
    match out.as_node_mut() {
        NodeMut::Shared(reason) => Err(Error::NotAPointer {
            path: path.to_string(),
            reason,
        }),
        NodeMut::Unsupported(kind) => Err(Error::UnsupportedKind {
            path: path.to_string(),
            kind,
        }),
        _ => {
            out.reset();
            Ok(())
        }
    }
}
