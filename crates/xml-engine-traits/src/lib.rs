//! Collaborator abstractions for change-tracked XML trees.
//!
//! The tree itself lives in `xml-tree`. This crate defines the seams at
//! which external engines meet it: a read-only tree view, a builder view
//! for engines that produce new trees, and the loader, schema validator
//! and transform engine traits.

pub mod error;
pub mod loader;
pub mod schema;
pub mod transform;
pub mod tree;

pub use error::Error;
pub use loader::DocumentLoader;
pub use schema::{SchemaInfo, SchemaValidator, ValidationError, ValidationReport, Validity};
pub use transform::{ExtendedTransformEngine, TransformEngine};
pub use tree::{MutableXmlTree, NodeType, XmlTree};
