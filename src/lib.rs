//! kvtree: typed values over hierarchical key/value stores
//!
//! Encodes structs, sequences, mappings, and scalars into a tree of
//! `/`-delimited keys, and decodes them back. Struct fields and map keys become
//! path segments, sequence elements are addressed by index, and scalars are
//! stored as leaf strings. Types may opt into a JSON or text bulk encoding
//! instead of field-by-field traversal.
//!
//! ```
//! use kvtree::{node_struct, Decoder, Encoder, MemoryStore};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Service {
//!     name: String,
//!     replicas: u32,
//!     tags: Vec<String>,
//! }
//!
//! node_struct!(Service { name, replicas, tags = ",omitempty" });
//!
//! let store = Arc::new(MemoryStore::new());
//! let svc = Service { name: "api".into(), replicas: 3, tags: vec!["edge".into()] };
//! Encoder::new(store.clone()).encode("/services/api", &svc).unwrap();
//!
//! let mut out = Service::default();
//! Decoder::new(store).decode("/services/api", &mut out).unwrap();
//! assert_eq!(out, svc);
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod path;
pub mod store;
pub mod tooling;

pub use codec::{CustomCodec, FieldSpec, JsonCodec, NodeValue, Primitive, TextCodec};
pub use context::{CancelHandle, Context};
pub use decoder::{DecodeOptions, Decoder};
pub use encoder::{EncodeOptions, Encoder};
pub use error::{Error, NodeKind, ParseError, StoreError, ToolError};
pub use store::{KeysApi, MemoryStore, Node, RecordingStore, SledStore};

#[doc(hidden)]
pub use serde_json as __serde_json;
