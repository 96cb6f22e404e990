//! Rendering of a built tree into markup text.
//!
//! [`xml`] lays nodes out with the block/inline model and optional
//! pretty-printing; [`escape`] holds the text transforms used on the way.

pub mod escape;
pub mod xml;

pub use xml::{is_void_element, render_document, render_node, Closing, INDENT};
