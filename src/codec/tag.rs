//! Field annotations.
//!
//! An annotation is `"segment"`, `"segment,omitempty"`, `",omitempty"`, or
//! `"-"`. Unknown options are ignored.

/// Resolved mapping of one struct field onto a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name
    pub name: &'static str,
    /// Path segment the field is stored under
    pub segment: String,
    /// Tolerate a missing node on decode
    pub omit_empty: bool,
    /// Excluded from both encode and decode
    pub skip: bool,
}

impl FieldSpec {
    pub fn parse(name: &'static str, tag: &str) -> Self {
        if tag == "-" {
            return FieldSpec {
                name,
                segment: name.to_string(),
                omit_empty: false,
                skip: true,
            };
        }

        let mut tokens = tag.split(',');
        let segment = match tokens.next() {
            Some(first) if !first.is_empty() => first.to_string(),
            _ => name.to_string(),
        };
        let omit_empty = tokens.any(|token| token == "omitempty");

        FieldSpec {
            name,
            segment,
            omit_empty,
            skip: false,
        }
    }
}
