use kvtree::store::{DeleteOptions, SetOptions};
use kvtree::{node_struct, Context, DecodeOptions, Decoder, Encoder, Error, KeysApi, MemoryStore};

#[derive(Debug, Default, PartialEq)]
struct Account {
    id: u64,
    display_name: String,
    nickname: String,
    avatar: Option<String>,
    password: String,
}

node_struct!(Account {
    id,
    display_name = "name",
    nickname = ",omitempty",
    avatar = "avatar_url,omitempty",
    password = "-",
});

#[derive(Debug, Default, PartialEq)]
struct Wrapper {
    account: Account,
    note: String,
}

node_struct!(Wrapper {
    account = ",omitempty",
    note = ",omitempty",
});

fn set(store: &MemoryStore, key: &str, value: &str) {
    store
        .set(&Context::background(), key, value, &SetOptions::default())
        .unwrap();
}

#[test]
fn renamed_fields_use_their_segment() {
    let store = MemoryStore::new();
    let account = Account {
        id: 9,
        display_name: "Ada".to_string(),
        avatar: Some("https://example.com/a.png".to_string()),
        ..Default::default()
    };
    Encoder::new(&store).encode("/acct", &account).unwrap();

    let keys: Vec<String> = store
        .leaves("/acct")
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        vec!["/acct/avatar_url", "/acct/id", "/acct/name", "/acct/nickname"]
    );
}

#[test]
fn skipped_field_is_never_written_nor_read() {
    let store = MemoryStore::new();
    let account = Account {
        password: "secret".to_string(),
        ..Default::default()
    };
    Encoder::new(&store).encode("/acct", &account).unwrap();
    assert!(!store
        .leaves("/acct")
        .unwrap()
        .iter()
        .any(|(k, _)| k.ends_with("password")));

    set(&store, "/acct/password", "from-store");
    let mut out = Account {
        password: "kept".to_string(),
        ..Default::default()
    };
    Decoder::new(&store).decode("/acct", &mut out).unwrap();
    assert_eq!(out.password, "kept");
}

#[test]
fn omitempty_fields_tolerate_missing_nodes() {
    let store = MemoryStore::new();
    set(&store, "/acct/id", "1");
    set(&store, "/acct/name", "Ada");

    let mut out = Account {
        nickname: "stale".to_string(),
        avatar: Some("stale".to_string()),
        ..Default::default()
    };
    Decoder::new(&store).decode("/acct", &mut out).unwrap();
    assert_eq!(out.id, 1);
    assert_eq!(out.display_name, "Ada");
    assert_eq!(out.nickname, "");
    assert_eq!(out.avatar, None);
}

#[test]
fn missing_required_field_is_key_not_found() {
    let store = MemoryStore::new();
    set(&store, "/acct/id", "1");

    let mut out = Account::default();
    let err = Decoder::new(&store).decode("/acct", &mut out).unwrap_err();
    assert!(
        matches!(err, Error::KeyNotFound { ref path } if path == "/acct/name"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn omitempty_struct_field_becomes_default() {
    let store = MemoryStore::new();
    set(&store, "/w/note", "hello");

    let mut out = Wrapper {
        account: Account {
            id: 5,
            ..Default::default()
        },
        note: String::new(),
    };
    Decoder::new(&store).decode("/w", &mut out).unwrap();
    assert_eq!(out.account, Account::default());
    assert_eq!(out.note, "hello");
}

#[test]
fn omitempty_does_not_hide_errors_inside_present_nodes() {
    let store = MemoryStore::new();
    set(&store, "/w/account/id", "not-a-number");

    let mut out = Wrapper::default();
    let err = Decoder::new(&store).decode("/w", &mut out).unwrap_err();
    assert!(matches!(err, Error::Parse { ref path, .. } if path == "/w/account/id"));
}

#[test]
#[allow(deprecated)]
fn deprecated_skip_missing_tolerates_every_field() {
    let store = MemoryStore::new();
    set(&store, "/acct/nickname", "ace");

    let opts = DecodeOptions::default().skip_missing(true);
    let mut out = Account {
        id: 77,
        ..Default::default()
    };
    Decoder::new(&store)
        .decode_with(&Context::background(), "/acct", &mut out, &opts)
        .unwrap();
    assert_eq!(out.id, 0);
    assert_eq!(out.nickname, "ace");

    store
        .delete(
            &Context::background(),
            "/acct",
            &DeleteOptions {
                recursive: true,
                dir: true,
            },
        )
        .unwrap();
    Decoder::new(&store)
        .decode_with(&Context::background(), "/acct", &mut out, &opts)
        .unwrap();
    assert_eq!(out, Account::default());
}
