//! Transform engine abstraction trait

use crate::error::Result;
use crate::tree::{MutableXmlTree, XmlTree};

/// Trait for engines that turn one tree into a new one.
///
/// The source tree is only ever borrowed immutably, so it cannot change
/// for the duration of a call.
pub trait TransformEngine {
    /// The XML tree implementation this engine works with
    type Tree: MutableXmlTree + Default;

    /// Type representing a compiled stylesheet
    type Stylesheet;

    /// Compile a stylesheet from the transform description rooted at `root`
    fn compile(
        &mut self,
        tree: &Self::Tree,
        root: &<Self::Tree as XmlTree>::Node,
    ) -> Result<Self::Stylesheet>;

    /// Transform the source subtree into a fresh tree, returning it with its root
    fn transform(
        &mut self,
        stylesheet: &Self::Stylesheet,
        source: &Self::Tree,
        root: &<Self::Tree as XmlTree>::Node,
    ) -> Result<(Self::Tree, <Self::Tree as XmlTree>::Node)>;
}

/// Extended transform engine capabilities
pub trait ExtendedTransformEngine: TransformEngine {
    /// Compile, transform and serialize the result in one go
    fn transform_to_string(
        &mut self,
        stylesheet_tree: &Self::Tree,
        stylesheet_root: &<Self::Tree as XmlTree>::Node,
        source: &Self::Tree,
        root: &<Self::Tree as XmlTree>::Node,
    ) -> Result<String> {
        let stylesheet = self.compile(stylesheet_tree, stylesheet_root)?;
        let (result, result_root) = self.transform(&stylesheet, source, root)?;
        result.serialize(&result_root)
    }
}

// Blanket implementation for all transform engines
impl<T: TransformEngine> ExtendedTransformEngine for T {}
