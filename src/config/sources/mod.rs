//! Configuration sources, each added to a builder in precedence order.

pub mod environment;
pub mod global_file;
