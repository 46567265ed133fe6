//! Loading trees from JSON descriptions.

use tracing::debug;
use xml_engine_traits::{error::Result, DocumentLoader, Error};
use xml_tree::{Fixed, Node, Tree};

/// Loader for the serde form of [`Fixed`].
///
/// The document must be a single element:
///
/// ```json
/// {"element": {"name": "rss", "attributes": [["version", "2.0"]], "children": []}}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the description without building anything
    pub fn parse(&self, source: &str) -> Result<Fixed> {
        let fixed: Fixed = serde_json::from_str(source)?;
        match fixed {
            Fixed::Element { .. } => Ok(fixed),
            Fixed::Text(_) => Err(Error::load("document root must be an element")),
        }
    }
}

impl DocumentLoader for JsonLoader {
    type Tree = Tree;

    fn load_str(&self, tree: &mut Tree, source: &str) -> Result<Node> {
        let fixed = self.parse(source)?;
        let root = tree.build(&fixed)?;
        debug!(?root, nodes = tree.descendants_and_self(root).len(), "loaded document");
        Ok(root)
    }
}
