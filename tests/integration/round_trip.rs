use crate::integration::support::{sample_config, Endpoint, ServiceConfig};
use kvtree::store::GetOptions;
use kvtree::{node_struct, Context, Decoder, Encoder, KeysApi, MemoryStore};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[test]
fn service_config_round_trips() {
    let store = MemoryStore::new();
    let config = sample_config();
    Encoder::new(&store).encode("/services/billing", &config).unwrap();

    let mut out = ServiceConfig::default();
    Decoder::new(&store)
        .decode("/services/billing", &mut out)
        .unwrap();

    let expected = ServiceConfig {
        secret: String::new(),
        ..config
    };
    assert_eq!(out, expected);
}

#[test]
fn encoded_layout_uses_segments_and_indexes() {
    let store = MemoryStore::new();
    Encoder::new(&store)
        .encode("/svc", &sample_config())
        .unwrap();

    let leaves: HashMap<String, String> = store.leaves("/svc").unwrap().into_iter().collect();
    assert_eq!(leaves["/svc/name"], "billing");
    assert_eq!(leaves["/svc/retry_count"], "-3");
    assert_eq!(leaves["/svc/timeout"], "1.5s");
    assert_eq!(leaves["/svc/primary/port"], "5432");
    assert_eq!(leaves["/svc/replicas/11/host"], "replica-11");
    assert_eq!(leaves["/svc/labels/team"], "payments");
    assert_eq!(leaves["/svc/weights/20"], "1.25");
    assert_eq!(leaves["/svc/version"], "v2.7");
    assert_eq!(leaves["/svc/matrix/2/0"], "3");
    assert_eq!(leaves["/svc/owner"], "ops");

    let limits: serde_json::Value = serde_json::from_str(&leaves["/svc/limits"]).unwrap();
    assert_eq!(limits["memory_mb"], 2048);

    assert!(!leaves.contains_key("/svc/secret"));
    assert!(!leaves.contains_key("/svc/retries"));
}

#[test]
fn recursive_get_option_serves_the_whole_tree_in_one_call() {
    let store = kvtree::RecordingStore::new(MemoryStore::new());
    Encoder::new(&store)
        .encode("/svc", &sample_config())
        .unwrap();
    store.clear_calls();

    let opts = kvtree::DecodeOptions::default().recursive(true);
    let mut out = ServiceConfig::default();
    Decoder::new(&store)
        .decode_with(&Context::background(), "/svc", &mut out, &opts)
        .unwrap();

    assert_eq!(store.calls().len(), 1);
    assert_eq!(out.replicas.len(), 12);
}

#[test]
fn nested_empty_sequence_round_trips() {
    let store = MemoryStore::new();
    let value: Vec<Vec<u8>> = vec![vec![], vec![9]];
    Encoder::new(&store).encode("/m", &value).unwrap();

    let node = store
        .get(&Context::background(), "/m/0", &GetOptions::default())
        .unwrap();
    assert!(node.dir);

    let mut out: Vec<Vec<u8>> = vec![vec![1, 1, 1]];
    Decoder::new(&store).decode("/m", &mut out).unwrap();
    assert_eq!(out, value);
}

#[derive(Debug, Default, PartialEq)]
struct Inner {
    x: Option<u32>,
}

node_struct!(Inner { x = ",omitempty" });

#[derive(Debug, Default, PartialEq)]
struct Outer {
    inner: Inner,
    n: u8,
}

node_struct!(Outer { inner, n });

#[test]
fn struct_with_no_written_fields_round_trips() {
    let store = MemoryStore::new();
    let value = Outer {
        inner: Inner { x: None },
        n: 1,
    };
    Encoder::new(&store).encode("/o", &value).unwrap();

    let node = store
        .get(&Context::background(), "/o/inner", &GetOptions::default())
        .unwrap();
    assert!(node.dir);
    assert!(node.children.is_empty());

    let mut out = Outer {
        inner: Inner { x: Some(7) },
        n: 0,
    };
    Decoder::new(&store).decode("/o", &mut out).unwrap();
    assert_eq!(out, value);
}

fn endpoint_strategy() -> impl Strategy<Value = Endpoint> {
    ("[a-z][a-z0-9.-]{0,12}", any::<u16>()).prop_map(|(host, port)| Endpoint { host, port })
}

proptest! {
    #[test]
    fn prop_vec_of_ints_round_trips(values in proptest::collection::vec(any::<i64>(), 0..40)) {
        let store = MemoryStore::new();
        Encoder::new(&store).encode("/v", &values).unwrap();
        let mut out = vec![7i64; 3];
        Decoder::new(&store).decode("/v", &mut out).unwrap();
        prop_assert_eq!(out, values);
    }

    #[test]
    fn prop_string_map_round_trips(
        values in proptest::collection::hash_map("[a-zA-Z0-9_-]{1,10}", any::<u64>(), 0..20)
    ) {
        let store = MemoryStore::new();
        Encoder::new(&store).encode("/m", &values).unwrap();
        let mut out: HashMap<String, u64> = HashMap::new();
        Decoder::new(&store).decode("/m", &mut out).unwrap();
        prop_assert_eq!(out, values);
    }

    #[test]
    fn prop_integer_keyed_map_round_trips(
        values in proptest::collection::btree_map(any::<i32>(), endpoint_strategy(), 0..10)
    ) {
        let store = MemoryStore::new();
        Encoder::new(&store).encode("/m", &values).unwrap();
        let mut out: BTreeMap<i32, Endpoint> = BTreeMap::new();
        Decoder::new(&store).decode("/m", &mut out).unwrap();
        prop_assert_eq!(out, values);
    }

    #[test]
    fn prop_duration_round_trips(secs in 0u64..1_000_000, nanos in 0u32..1_000_000_000) {
        let store = MemoryStore::new();
        let value = Duration::new(secs, nanos);
        Encoder::new(&store).encode("/d", &value).unwrap();
        let mut out = Duration::ZERO;
        Decoder::new(&store).decode("/d", &mut out).unwrap();
        prop_assert_eq!(out, value);
    }

    #[test]
    fn prop_arbitrary_strings_survive(value in any::<String>()) {
        let store = MemoryStore::new();
        Encoder::new(&store).encode("/s", &value).unwrap();
        let mut out = String::new();
        Decoder::new(&store).decode("/s", &mut out).unwrap();
        prop_assert_eq!(out, value);
    }
}
