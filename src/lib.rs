//! # xmlwright
//!
//! Build markup trees programmatically and render them as XML text.
//!
//! A [`Document`] owns every node in an arena and hands out [`NodeId`]s.
//! Nodes are created detached and attached exactly once; element and
//! attribute names are checked by a replaceable set of name validators, and
//! every failure is reported as a [`BuildError`] before anything changes.
//! Rendering follows a block/inline layout model and never fails.
//!
//! ## Quick Start
//!
//! ```
//! use xmlwright::{Document, ElementConfig};
//!
//! # fn main() -> Result<(), xmlwright::BuildError> {
//! let mut doc = Document::new();
//! let root = doc.root();
//! let table = doc.add_element_with(root, "table", &ElementConfig::default().validating(["row"]))?;
//! let row = doc.add_element(table, "row")?;
//! doc.set_attribute(row, "id", "r1")?;
//! doc.add_text(row, "1 < 2")?;
//! assert!(doc.add_element(table, "column").is_err());
//!
//! assert_eq!(
//!     doc.render(true),
//!     "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>\n\
//!      \n<root>\
//!      \n  <table>\
//!      \n    <row id='r1'>1 &lt; 2</row>\
//!      \n  </table>\
//!      \n</root>"
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{BuildError, BuildResult, IdentifierError};
pub use serial::Closing;
pub use tree::{Document, DocumentOptions, ElementConfig, Namespace, NodeId, NodeKind, SortOrder};
pub use util::names::{NameClass, NameValidator, NameValidators};
