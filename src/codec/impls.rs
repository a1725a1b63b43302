//! [`NodeValue`] for std types.
//!
//! - scalars are leaves;
//! - `Option<T>` is an indirection, `Box<T>` and `&mut T` are transparent;
//! - `Arc<T>` / `Rc<T>` are transparent for reading and writable only while
//!   uniquely owned; `&T` is read-only;
//! - `Vec<T>` is a sequence, `HashMap` / `BTreeMap` are mappings keyed by any
//!   [`Primitive`];
//! - channel endpoints are unsupported;
//! - `serde_json::Value` can be encoded but not decoded into.

use super::{IndirectNode, MappingNode, NodeMut, NodeRef, NodeValue, Primitive, SequenceNode};
use crate::error::Error;
use crate::path;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;
use std::time::Duration;

macro_rules! leaf_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NodeValue for $ty {
                fn as_node(&self) -> NodeRef<'_> {
                    NodeRef::Leaf(self.to_leaf())
                }

                fn as_node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Leaf(self)
                }

                fn reset(&mut self) {
                    *self = Default::default();
                }
            }
        )*
    };
}

leaf_node!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    Duration,
);

impl<T: NodeValue + Default> NodeValue for Option<T> {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Indirect(self.as_ref().map(|v| v as &dyn NodeValue))
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Indirect(self)
    }

    fn reset(&mut self) {
        *self = None;
    }
}

impl<T: NodeValue + Default> IndirectNode for Option<T> {
    fn get_or_insert(&mut self) -> &mut dyn NodeValue {
        self.get_or_insert_with(T::default)
    }

    fn clear(&mut self) {
        *self = None;
    }
}

impl<T: NodeValue + ?Sized> NodeValue for Box<T> {
    fn as_node(&self) -> NodeRef<'_> {
        (**self).as_node()
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        (**self).as_node_mut()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<T: NodeValue + ?Sized> NodeValue for &mut T {
    fn as_node(&self) -> NodeRef<'_> {
        (**self).as_node()
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        (**self).as_node_mut()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<T: NodeValue + ?Sized> NodeValue for &T {
    fn as_node(&self) -> NodeRef<'_> {
        (**self).as_node()
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Shared("shared reference")
    }

    fn reset(&mut self) {}
}

impl<T: NodeValue + ?Sized> NodeValue for Arc<T> {
    fn as_node(&self) -> NodeRef<'_> {
        (**self).as_node()
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        match Arc::get_mut(self) {
            Some(inner) => inner.as_node_mut(),
            None => NodeMut::Shared("Arc with other owners"),
        }
    }

    fn reset(&mut self) {
        if let Some(inner) = Arc::get_mut(self) {
            inner.reset();
        }
    }
}

impl<T: NodeValue + ?Sized> NodeValue for Rc<T> {
    fn as_node(&self) -> NodeRef<'_> {
        (**self).as_node()
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        match Rc::get_mut(self) {
            Some(inner) => inner.as_node_mut(),
            None => NodeMut::Shared("Rc with other owners"),
        }
    }

    fn reset(&mut self) {
        if let Some(inner) = Rc::get_mut(self) {
            inner.reset();
        }
    }
}

impl<T: NodeValue + Default> NodeValue for Vec<T> {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Sequence(self)
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Sequence(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: NodeValue + Default> SequenceNode for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn NodeValue> {
        self.get(index).map(|v| v as &dyn NodeValue)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn NodeValue> {
        self.get_mut(index).map(|v| v as &mut dyn NodeValue)
    }

    fn reset_len(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, T::default);
    }
}

/// Parse the map key named by the last segment of `child_key`.
fn map_key<K: Primitive>(child_key: &str) -> Result<K, Error> {
    K::from_leaf(path::last_segment(child_key)).map_err(|e| Error::parse(child_key, e))
}

impl<K, V, S> NodeValue for HashMap<K, V, S>
where
    K: Primitive + Eq + Hash,
    V: NodeValue + Default,
    S: BuildHasher + Default,
{
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Mapping(self)
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Mapping(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V, S> MappingNode for HashMap<K, V, S>
where
    K: Primitive + Eq + Hash,
    V: NodeValue + Default,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    /// Sorted by rendered key so writes happen in a stable order.
    fn entries(&self) -> Vec<(String, &dyn NodeValue)> {
        let mut entries: Vec<(String, &dyn NodeValue)> = self
            .iter()
            .map(|(k, v)| (k.to_leaf(), v as &dyn NodeValue))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn insert_with(
        &mut self,
        child_key: &str,
        fill: &mut dyn FnMut(&mut dyn NodeValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let key = map_key::<K>(child_key)?;
        let mut value = V::default();
        fill(&mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V> NodeValue for BTreeMap<K, V>
where
    K: Primitive + Ord,
    V: NodeValue + Default,
{
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Mapping(self)
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Mapping(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V> MappingNode for BTreeMap<K, V>
where
    K: Primitive + Ord,
    V: NodeValue + Default,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Vec<(String, &dyn NodeValue)> {
        self.iter()
            .map(|(k, v)| (k.to_leaf(), v as &dyn NodeValue))
            .collect()
    }

    fn insert_with(
        &mut self,
        child_key: &str,
        fill: &mut dyn FnMut(&mut dyn NodeValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let key = map_key::<K>(child_key)?;
        let mut value = V::default();
        fill(&mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

macro_rules! unsupported_node {
    ($kind:literal => $($ty:ty),* $(,)?) => {
        $(
            impl<T> NodeValue for $ty {
                fn as_node(&self) -> NodeRef<'_> {
                    NodeRef::Unsupported($kind)
                }

                fn as_node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Unsupported($kind)
                }

                fn reset(&mut self) {}
            }
        )*
    };
}

unsupported_node!("channel" => Sender<T>, SyncSender<T>, Receiver<T>);

impl NodeValue for serde_json::Value {
    fn as_node(&self) -> NodeRef<'_> {
        use serde_json::Value;
        match self {
            Value::Null => NodeRef::Indirect(None),
            Value::Bool(b) => NodeRef::Leaf(b.to_string()),
            Value::Number(n) => NodeRef::Leaf(n.to_string()),
            Value::String(s) => NodeRef::Leaf(s.clone()),
            Value::Array(items) => NodeRef::Sequence(items),
            Value::Object(map) => NodeRef::Mapping(map),
        }
    }

    fn as_node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Unsupported("untyped JSON value")
    }

    fn reset(&mut self) {
        *self = serde_json::Value::Null;
    }
}

impl MappingNode for serde_json::Map<String, serde_json::Value> {
    fn len(&self) -> usize {
        serde_json::Map::len(self)
    }

    fn entries(&self) -> Vec<(String, &dyn NodeValue)> {
        self.iter()
            .map(|(k, v)| (k.clone(), v as &dyn NodeValue))
            .collect()
    }

    fn insert_with(
        &mut self,
        child_key: &str,
        fill: &mut dyn FnMut(&mut dyn NodeValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut value = serde_json::Value::Null;
        fill(&mut value)?;
        self.insert(path::last_segment(child_key).to_string(), value);
        Ok(())
    }
}
