//! Document loader abstraction trait

use crate::error::Result;
use crate::tree::{MutableXmlTree, XmlTree};
use std::path::Path;

/// Trait for anything that can supply an initial tree.
///
/// The tree engine does not care how a document was obtained; a loader
/// builds detached nodes inside an existing tree and returns the root.
pub trait DocumentLoader {
    /// The tree implementation this loader builds into
    type Tree: MutableXmlTree;

    /// Build a tree from source text and return its detached root
    fn load_str(
        &self,
        tree: &mut Self::Tree,
        source: &str,
    ) -> Result<<Self::Tree as XmlTree>::Node>;

    /// Build a tree from a file
    fn load_file(
        &self,
        tree: &mut Self::Tree,
        path: &Path,
    ) -> Result<<Self::Tree as XmlTree>::Node> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(tree, &content)
    }
}
