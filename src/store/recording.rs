//! Call-recording decorator.
//!
//! Wraps another store, logs every call in order, and can inject failures on
//! chosen keys or reverse directory listings. Used to observe write ordering
//! and error propagation.

use crate::context::Context;
use crate::error::StoreError;
use crate::store::{Ack, DeleteOptions, GetOptions, KeysApi, Node, SetOptions};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get {
        key: String,
    },
    Set {
        key: String,
        value: String,
        dir: bool,
    },
    Delete {
        key: String,
        recursive: bool,
        dir: bool,
    },
}

impl StoreCall {
    pub fn key(&self) -> &str {
        match self {
            StoreCall::Get { key } | StoreCall::Set { key, .. } | StoreCall::Delete { key, .. } => {
                key
            }
        }
    }
}

pub struct RecordingStore<S> {
    inner: S,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<String>>,
    reverse_listings: AtomicBool,
}

impl<S: KeysApi> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            reverse_listings: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make every call on `key` (exact match) fail with [`StoreError::Injected`].
    pub fn fail_on(&self, key: &str) {
        self.failing.lock().insert(key.to_string());
    }

    /// Return directory children in reverse key order.
    pub fn reverse_listings(&self, reverse: bool) {
        self.reverse_listings.store(reverse, Ordering::SeqCst);
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        let key = call.key().to_string();
        self.calls.lock().push(call);
        if self.failing.lock().contains(&key) {
            return Err(StoreError::Injected { key });
        }
        Ok(())
    }
}

impl<S: KeysApi> KeysApi for RecordingStore<S> {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        self.record(StoreCall::Get {
            key: key.to_string(),
        })?;
        let mut node = self.inner.get(ctx, key, opts)?;
        if self.reverse_listings.load(Ordering::SeqCst) {
            node.children.reverse();
        }
        Ok(node)
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        self.record(StoreCall::Set {
            key: key.to_string(),
            value: value.to_string(),
            dir: opts.dir,
        })?;
        self.inner.set(ctx, key, value, opts)
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        self.record(StoreCall::Delete {
            key: key.to_string(),
            recursive: opts.recursive,
            dir: opts.dir,
        })?;
        self.inner.delete(ctx, key, opts)
    }
}
