//! Value Descriptors
//!
//! A type takes part in encoding and decoding by implementing [`NodeValue`],
//! which describes its shape as one variant of a closed set: a leaf scalar, a
//! struct with a static field table, a sequence, a mapping, an optional
//! indirection, or a custom bulk codec. The encoder and decoder walk these
//! descriptors; they never inspect concrete types.
//!
//! Std types are covered in [`impls`]. User structs use [`node_struct!`];
//! custom encodings use [`json_node!`], [`text_node!`], or [`custom_node!`].
//!
//! [`node_struct!`]: crate::node_struct
//! [`json_node!`]: crate::json_node
//! [`text_node!`]: crate::text_node
//! [`custom_node!`]: crate::custom_node

pub mod custom;
pub mod duration;
pub mod impls;
mod macros;
pub mod primitive;
pub mod tag;

use crate::error::{Error, ParseError};

pub use custom::{Capability, CustomCodec, JsonCodec, TextCodec};
pub use primitive::Primitive;
pub use tag::FieldSpec;

/// A value that can be written to and read from the store.
pub trait NodeValue {
    /// Read-only view used by the encoder.
    fn as_node(&self) -> NodeRef<'_>;

    /// Writable view used by the decoder.
    fn as_node_mut(&mut self) -> NodeMut<'_>;

    /// Restore the zero value. Applied when a missing node is tolerated.
    fn reset(&mut self);
}

pub enum NodeRef<'a> {
    /// Canonical leaf string
    Leaf(String),
    Struct(&'a dyn StructNode),
    Sequence(&'a dyn SequenceNode),
    Mapping(&'a dyn MappingNode),
    /// Optional value; `None` writes nothing
    Indirect(Option<&'a dyn NodeValue>),
    Custom(&'a dyn CustomCodec),
    Unsupported(&'static str),
}

pub enum NodeMut<'a> {
    Leaf(&'a mut dyn LeafSlot),
    Struct(&'a mut dyn StructNode),
    Sequence(&'a mut dyn SequenceNode),
    Mapping(&'a mut dyn MappingNode),
    Indirect(&'a mut dyn IndirectNode),
    Custom(&'a mut dyn CustomCodec),
    /// The value is reachable but cannot be written through
    Shared(&'static str),
    Unsupported(&'static str),
}

/// A scalar destination filled from one leaf string.
pub trait LeafSlot {
    fn parse_leaf(&mut self, text: &str) -> Result<(), ParseError>;
}

impl<T: Primitive> LeafSlot for T {
    fn parse_leaf(&mut self, text: &str) -> Result<(), ParseError> {
        *self = T::from_leaf(text)?;
        Ok(())
    }
}

/// Field access for struct-shaped values.
pub trait StructNode {
    /// Field table in declaration order. Built once per type.
    fn fields(&self) -> &'static [FieldSpec];
    fn field(&self, name: &str) -> Option<&dyn NodeValue>;
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn NodeValue>;
}

pub trait SequenceNode {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn NodeValue>;
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn NodeValue>;

    /// Replace the contents with `len` zero values.
    fn reset_len(&mut self, len: usize);
}

pub trait MappingNode {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries with their keys rendered as path segments.
    fn entries(&self) -> Vec<(String, &dyn NodeValue)>;

    /// Build a zero value, let `fill` decode into it, then insert it under the
    /// key parsed from the last segment of `child_key`. An existing entry
    /// under that key is replaced.
    fn insert_with(
        &mut self,
        child_key: &str,
        fill: &mut dyn FnMut(&mut dyn NodeValue) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

pub trait IndirectNode {
    /// The contained value, allocated as a zero value if absent.
    fn get_or_insert(&mut self) -> &mut dyn NodeValue;

    /// Drop the contained value.
    fn clear(&mut self);
}
