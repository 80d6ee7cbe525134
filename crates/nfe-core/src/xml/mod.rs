//! Namespace-aware XML document tree.
//!
//! NFe lookups are always "element with this local name in this namespace",
//! so the tree keeps resolved namespace URIs instead of prefixes.

mod tree;

pub use tree::{Element, parse, parse_bytes};
