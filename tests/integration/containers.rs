use crate::integration::support::Endpoint;
use kvtree::store::{GetOptions, SetOptions, StoreCall};
use kvtree::{node_struct, Context, Decoder, Encoder, Error, KeysApi, MemoryStore, RecordingStore};
use std::collections::{BTreeMap, HashMap};

fn set(store: &MemoryStore, key: &str, value: &str) {
    store
        .set(&Context::background(), key, value, &SetOptions::default())
        .unwrap();
}

#[test]
fn sequence_order_follows_indexes_not_listing_order() {
    let store = RecordingStore::new(MemoryStore::new());
    let values: Vec<u32> = (0..15).map(|i| i * 10).collect();
    Encoder::new(&store).encode("/seq", &values).unwrap();

    store.reverse_listings(true);
    let mut out: Vec<u32> = Vec::new();
    Decoder::new(&store).decode("/seq", &mut out).unwrap();
    assert_eq!(out, values);
}

#[test]
fn integer_map_keys_are_parsed_from_segments() {
    let store = MemoryStore::new();
    let mut ports: HashMap<i64, String> = HashMap::new();
    ports.insert(-1, "loopback".to_string());
    ports.insert(443, "https".to_string());
    ports.insert(8080, "alt".to_string());
    Encoder::new(&store).encode("/ports", &ports).unwrap();

    assert_eq!(
        store.leaves("/ports").unwrap(),
        vec![
            ("/ports/-1".to_string(), "loopback".to_string()),
            ("/ports/443".to_string(), "https".to_string()),
            ("/ports/8080".to_string(), "alt".to_string()),
        ]
    );

    let mut out: HashMap<i64, String> = HashMap::new();
    Decoder::new(&store).decode("/ports", &mut out).unwrap();
    assert_eq!(out, ports);
}

#[test]
fn map_key_that_does_not_parse_fails() {
    let store = MemoryStore::new();
    set(&store, "/m/300", "x");

    let mut out: BTreeMap<u8, String> = BTreeMap::new();
    let err = Decoder::new(&store).decode("/m", &mut out).unwrap_err();
    assert!(matches!(err, Error::Parse { ref path, .. } if path == "/m/300"));
}

#[test]
fn map_of_structs_round_trips() {
    let store = MemoryStore::new();
    let mut hosts = BTreeMap::new();
    hosts.insert(
        "east".to_string(),
        Endpoint {
            host: "e".to_string(),
            port: 1,
        },
    );
    hosts.insert(
        "west".to_string(),
        Endpoint {
            host: "w".to_string(),
            port: 2,
        },
    );
    Encoder::new(&store).encode("/hosts", &hosts).unwrap();

    let mut out = BTreeMap::new();
    out.insert("local".to_string(), Endpoint::default());
    out.insert(
        "east".to_string(),
        Endpoint {
            host: "old".to_string(),
            port: 9,
        },
    );
    Decoder::new(&store).decode("/hosts", &mut out).unwrap();

    let mut expected = hosts.clone();
    expected.insert("local".to_string(), Endpoint::default());
    assert_eq!(out, expected);
}

#[test]
fn rewriting_a_shorter_sequence_removes_stale_elements() {
    let store = MemoryStore::new();
    let encoder = Encoder::new(&store);
    let first: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
    let second: Vec<String> = ["x", "y", "z"].map(String::from).to_vec();
    encoder.encode("/list", &first).unwrap();
    encoder.encode("/list", &second).unwrap();

    let keys: Vec<String> = store
        .leaves("/list")
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(keys, vec!["/list/0", "/list/1", "/list/2"]);
}

#[test]
fn rewriting_a_map_removes_stale_entries() {
    let store = MemoryStore::new();
    let encoder = Encoder::new(&store);
    let first: HashMap<String, u8> = [("a", 1), ("b", 2), ("c", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    encoder.encode("/m", &first).unwrap();

    let second: HashMap<String, u8> = [("d".to_string(), 4)].into_iter().collect();
    encoder.encode("/m", &second).unwrap();

    assert_eq!(
        store.leaves("/m").unwrap(),
        vec![("/m/d".to_string(), "4".to_string())]
    );
}

#[derive(Debug, Default, PartialEq)]
struct Settings {
    mode: String,
    level: u8,
}

node_struct!(Settings { mode, level });

#[test]
fn structs_are_merged_not_replaced() {
    let store = RecordingStore::new(MemoryStore::new());
    store
        .set(
            &Context::background(),
            "/settings/extra",
            "keep-me",
            &SetOptions::default(),
        )
        .unwrap();
    store.clear_calls();

    let settings = Settings {
        mode: "fast".to_string(),
        level: 3,
    };
    Encoder::new(&store).encode("/settings", &settings).unwrap();

    assert!(store
        .calls()
        .iter()
        .all(|call| !matches!(call, StoreCall::Delete { .. })));
    assert_eq!(
        store.inner().leaves("/settings").unwrap(),
        vec![
            ("/settings/extra".to_string(), "keep-me".to_string()),
            ("/settings/level".to_string(), "3".to_string()),
            ("/settings/mode".to_string(), "fast".to_string()),
        ]
    );
}

#[test]
fn empty_collections_round_trip_as_empty_directories() {
    let store = MemoryStore::new();
    let encoder = Encoder::new(&store);
    encoder.encode("/v", &Vec::<String>::new()).unwrap();
    encoder.encode("/m", &HashMap::<String, String>::new()).unwrap();

    for key in ["/v", "/m"] {
        let node = store
            .get(&Context::background(), key, &GetOptions::default())
            .unwrap();
        assert!(node.dir, "{} should be a directory", key);
        assert!(node.children.is_empty());
    }

    let mut v = vec!["stale".to_string()];
    let mut m: HashMap<String, String> = HashMap::new();
    m.insert("k".to_string(), "v".to_string());
    let decoder = Decoder::new(&store);
    decoder.decode("/v", &mut v).unwrap();
    decoder.decode("/m", &mut m).unwrap();
    assert!(v.is_empty());
    assert_eq!(m.len(), 1);
    assert_eq!(m["k"], "v");

    let mut fresh: HashMap<String, String> = HashMap::new();
    decoder.decode("/m", &mut fresh).unwrap();
    assert!(fresh.is_empty());
}

#[test]
fn emptying_a_collection_replaces_the_old_subtree() {
    let store = MemoryStore::new();
    let encoder = Encoder::new(&store);
    encoder.encode("/v", &vec![1, 2, 3]).unwrap();
    encoder.encode("/v", &Vec::<i32>::new()).unwrap();

    assert!(store.leaves("/v").unwrap().is_empty());
    let node = store
        .get(&Context::background(), "/v", &GetOptions::default())
        .unwrap();
    assert!(node.dir);
}

#[test]
fn sequence_with_gaps_fills_defaults() {
    let store = MemoryStore::new();
    set(&store, "/v/0/host", "a");
    set(&store, "/v/0/port", "1");
    set(&store, "/v/2/host", "c");
    set(&store, "/v/2/port", "3");

    let mut out: Vec<Endpoint> = Vec::new();
    Decoder::new(&store).decode("/v", &mut out).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[1], Endpoint::default());
    assert_eq!(out[2].host, "c");
}

#[test]
fn invalid_map_key_is_rejected() {
    let store = RecordingStore::new(MemoryStore::new());
    let mut map = HashMap::new();
    map.insert(String::new(), 1u8);

    let err = Encoder::new(&store).encode("/m", &map).unwrap_err();
    assert!(matches!(err, Error::InvalidSegment { ref segment, .. } if segment.is_empty()));
    assert!(store.calls().is_empty());
}

#[test]
fn decoding_a_map_keeps_entries_the_store_does_not_have() {
    let store = MemoryStore::new();
    set(&store, "/m/b", "2");

    let mut out: HashMap<String, u8> = HashMap::new();
    out.insert("a".to_string(), 1);
    Decoder::new(&store).decode("/m", &mut out).unwrap();

    let expected: HashMap<String, u8> = [("a".to_string(), 1), ("b".to_string(), 2)]
        .into_iter()
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn trailing_none_elements_are_not_stored() {
    let store = MemoryStore::new();
    Encoder::new(&store)
        .encode("/v", &vec![Some(1u8), None, Some(3), None])
        .unwrap();

    let mut out: Vec<Option<u8>> = Vec::new();
    Decoder::new(&store).decode("/v", &mut out).unwrap();
    assert_eq!(out, vec![Some(1), None, Some(3)]);
}
