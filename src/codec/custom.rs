//! Custom Codec Dispatch
//!
//! A type may replace structural traversal with a bulk encoding of its own.
//! Two capabilities exist: JSON-like (bytes) and text-like (string). When a
//! type offers both, JSON wins in both directions.

use crate::error::BoxError;

pub trait JsonCodec {
    fn marshal_json(&self) -> Result<Vec<u8>, BoxError>;
    fn unmarshal_json(&mut self, bytes: &[u8]) -> Result<(), BoxError>;
}

pub trait TextCodec {
    fn marshal_text(&self) -> Result<String, BoxError>;
    fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Capability accessors. A type returns `Some` for each codec it implements.
pub trait CustomCodec {
    fn json(&self) -> Option<&dyn JsonCodec> {
        None
    }

    fn json_mut(&mut self) -> Option<&mut dyn JsonCodec> {
        None
    }

    fn text(&self) -> Option<&dyn TextCodec> {
        None
    }

    fn text_mut(&mut self) -> Option<&mut dyn TextCodec> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Json,
    Text,
}

impl Capability {
    /// The capability used for `codec`, if any.
    pub fn resolve(codec: &dyn CustomCodec) -> Option<Capability> {
        if codec.json().is_some() {
            Some(Capability::Json)
        } else if codec.text().is_some() {
            Some(Capability::Text)
        } else {
            None
        }
    }
}

/// Leaf string for `codec` under the preferred capability.
pub(crate) fn marshal(codec: &dyn CustomCodec) -> Result<String, BoxError> {
    if let Some(json) = codec.json() {
        let bytes = json.marshal_json()?;
        return Ok(String::from_utf8(bytes)?);
    }
    if let Some(text) = codec.text() {
        return text.marshal_text();
    }
    Err("type declares no custom capability".into())
}

/// Fill `codec` from a leaf string under the preferred capability.
pub(crate) fn unmarshal(codec: &mut dyn CustomCodec, leaf: &str) -> Result<(), BoxError> {
    if let Some(json) = codec.json_mut() {
        return json.unmarshal_json(leaf.as_bytes());
    }
    if let Some(text) = codec.text_mut() {
        return text.unmarshal_text(leaf);
    }
    Err("type declares no custom capability".into())
}
