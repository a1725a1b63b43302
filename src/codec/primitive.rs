//! Primitive Codec
//!
//! Conversion between one leaf string and a scalar. Integers are base 10 and
//! range-checked against their width, booleans are exactly `true`/`false`,
//! strings pass through verbatim, and [`Duration`] uses the compound grammar
//! in [`duration`](super::duration).

use super::duration;
use crate::error::ParseError;
use std::time::Duration;

/// A scalar with a canonical leaf representation.
///
/// Also used for map keys: a key is written as its leaf string and parsed back
/// from the last path segment.
pub trait Primitive: Sized {
    fn to_leaf(&self) -> String;
    fn from_leaf(text: &str) -> Result<Self, ParseError>;
}

macro_rules! impl_primitive_via_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Primitive for $ty {
                fn to_leaf(&self) -> String {
                    self.to_string()
                }

                fn from_leaf(text: &str) -> Result<Self, ParseError> {
                    text.parse::<$ty>()
                        .map_err(|e| ParseError::new(stringify!($ty), text, e))
                }
            }
        )*
    };
}

impl_primitive_via_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Primitive for bool {
    fn to_leaf(&self) -> String {
        self.to_string()
    }

    fn from_leaf(text: &str) -> Result<Self, ParseError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ParseError::new("bool", text, "expected `true` or `false`")),
        }
    }
}

impl Primitive for char {
    fn to_leaf(&self) -> String {
        self.to_string()
    }

    fn from_leaf(text: &str) -> Result<Self, ParseError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ParseError::new("char", text, "expected exactly one character")),
        }
    }
}

impl Primitive for String {
    fn to_leaf(&self) -> String {
        self.clone()
    }

    fn from_leaf(text: &str) -> Result<Self, ParseError> {
        Ok(text.to_string())
    }
}

impl Primitive for Duration {
    fn to_leaf(&self) -> String {
        duration::format(*self)
    }

    fn from_leaf(text: &str) -> Result<Self, ParseError> {
        duration::parse(text)
    }
}
