use crate::integration::support::{sample_config, ServiceConfig};
use kvtree::error::{ContextError, StoreError};
use kvtree::store::{Ack, DeleteOptions, GetOptions, Node, SetOptions};
use kvtree::{
    CancelHandle, Context, DecodeOptions, Decoder, EncodeOptions, Encoder, Error, KeysApi,
    MemoryStore, RecordingStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Cancels its handle once `limit` writes have gone through.
struct CancelAfterWrites {
    inner: MemoryStore,
    handle: CancelHandle,
    limit: usize,
    writes: AtomicUsize,
}

impl KeysApi for CancelAfterWrites {
    fn get(&self, ctx: &Context, key: &str, opts: &GetOptions) -> Result<Node, StoreError> {
        self.inner.get(ctx, key, opts)
    }

    fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<Ack, StoreError> {
        let ack = self.inner.set(ctx, key, value, opts)?;
        if self.writes.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
            self.handle.cancel();
        }
        Ok(ack)
    }

    fn delete(&self, ctx: &Context, key: &str, opts: &DeleteOptions) -> Result<Ack, StoreError> {
        self.inner.delete(ctx, key, opts)
    }
}

#[test]
fn cancellation_stops_the_walk_between_writes() {
    let (ctx, handle) = Context::background().with_cancel();
    let store = CancelAfterWrites {
        inner: MemoryStore::new(),
        handle,
        limit: 4,
        writes: AtomicUsize::new(0),
    };

    let err = Encoder::new(&store)
        .encode_with(&ctx, "/svc", &sample_config(), &EncodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::Cancelled)));
    assert_eq!(store.inner.leaves("/").unwrap().len(), 4);
    assert_eq!(store.writes.load(Ordering::SeqCst), 4);
}

#[test]
fn cancelled_context_makes_no_store_calls() {
    let store = RecordingStore::new(MemoryStore::new());
    Encoder::new(&store)
        .encode("/svc", &sample_config())
        .unwrap();
    store.clear_calls();

    let (ctx, handle) = Context::background().with_cancel();
    handle.cancel();

    let mut out = ServiceConfig::default();
    let err = Decoder::new(&store)
        .decode_with(&ctx, "/svc", &mut out, &DecodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::Cancelled)));

    let err = Encoder::new(&store)
        .encode_with(&ctx, "/svc", &sample_config(), &EncodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::Cancelled)));
    assert!(store.calls().is_empty());
}

#[test]
fn expired_deadline_is_reported() {
    let store = MemoryStore::new();
    let ctx = Context::background().with_timeout(Duration::ZERO);

    let err = Encoder::new(&store)
        .encode_with(&ctx, "/n", &1u8, &EncodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::DeadlineExceeded)));
    assert!(store.leaves("/").unwrap().is_empty());
}

#[test]
fn generous_deadline_does_not_interfere() {
    let store = MemoryStore::new();
    let ctx = Context::background().with_timeout(Duration::from_secs(60));
    Encoder::new(&store)
        .encode_with(&ctx, "/svc", &sample_config(), &EncodeOptions::default())
        .unwrap();

    let mut out = ServiceConfig::default();
    Decoder::new(&store)
        .decode_with(&ctx, "/svc", &mut out, &DecodeOptions::default())
        .unwrap();
    assert_eq!(out.replicas.len(), 12);
}
