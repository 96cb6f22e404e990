//! Name grammar helpers: qualified-name splitting and the pluggable name
//! validators consulted while building a tree.

pub mod names;
pub mod qname;
