//! Filesystem locations used by the configuration layer.

pub mod xdg_root;
