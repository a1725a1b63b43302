//! Key path helpers.
//!
//! Keys are `/`-delimited. The last segment names a struct field, a map key,
//! or a sequence index.

/// Append `segment` to `parent`, inserting exactly one `/`.
pub fn join(parent: &str, segment: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let mut out = String::with_capacity(parent.len() + segment.len() + 1);
    out.push_str(parent);
    out.push('/');
    out.push_str(segment);
    out
}

/// The final segment of `key`, ignoring any trailing slash.
pub fn last_segment(key: &str) -> &str {
    let key = key.trim_end_matches('/');
    match key.rfind('/') {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

/// Canonical form used by the bundled stores: leading `/`, no empty segments,
/// no trailing `/` except for the root itself.
pub fn normalize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 1);
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Parent of a normalized key; `None` for the root.
pub fn parent(key: &str) -> Option<&str> {
    if key == "/" {
        return None;
    }
    match key.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&key[..idx]),
        None => None,
    }
}

/// True if `segment` can name a single node.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}
