//! Feed to HTML list transform.
//!
//! The stylesheet is itself a tree: a single `feed-list` element whose
//! optional `take` attribute caps the number of items (5 by default).
//! Every `rss/channel/item` of the source up to that cap becomes
//! `<li><a href="{link}">{title}</a></li>` in a fresh `<ul>` tree.

use tracing::debug;
use xml_engine_traits::{error::Result, Error, MutableXmlTree, TransformEngine, XmlTree};
use xml_tree::{Node, Tree};

const STYLESHEET_ROOT: &str = "feed-list";
const DEFAULT_TAKE: usize = 5;

/// Compiled form of a `feed-list` stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedListStylesheet {
    pub take: usize,
}

impl Default for FeedListStylesheet {
    fn default() -> Self {
        Self { take: DEFAULT_TAKE }
    }
}

#[derive(Debug, Default)]
pub struct FeedListTransform;

impl FeedListTransform {
    pub fn new() -> Self {
        Self
    }
}

fn text_of(source: &Tree, item: &Node, name: &str) -> Option<String> {
    XmlTree::child_element(source, item, name).and_then(|n| source.node_value(&n))
}

impl TransformEngine for FeedListTransform {
    type Tree = Tree;
    type Stylesheet = FeedListStylesheet;

    fn compile(&mut self, tree: &Tree, root: &Node) -> Result<FeedListStylesheet> {
        let name = tree.node_name(root);
        if name.as_deref() != Some(STYLESHEET_ROOT) {
            return Err(Error::transform_compile(format!(
                "expected a '{}' element, found {:?}",
                STYLESHEET_ROOT, name
            )));
        }
        let take = match XmlTree::attribute_value(tree, root, "take") {
            Some(take) => take.trim().parse().map_err(|_| {
                Error::transform_compile(format!("'take' must be a count, got '{}'", take))
            })?,
            None => DEFAULT_TAKE,
        };
        Ok(FeedListStylesheet { take })
    }

    fn transform(
        &mut self,
        stylesheet: &FeedListStylesheet,
        source: &Tree,
        root: &Node,
    ) -> Result<(Tree, Node)> {
        let channel = XmlTree::child_element(source, root, "channel")
            .ok_or_else(|| Error::transform("source has no 'channel' element"))?;

        let mut result = Tree::default();
        let list = result.create_element("ul")?;
        let mut count = 0;
        for item in source
            .child_elements(&channel)
            .into_iter()
            .filter(|n| source.node_name(n).as_deref() == Some("item"))
            .take(stylesheet.take)
        {
            let entry = result.create_element("li")?;
            let anchor = result.create_element("a")?;
            if let Some(link) = text_of(source, &item, "link") {
                result.set_attribute(&anchor, "href", &link)?;
            }
            if let Some(title) = text_of(source, &item, "title").filter(|t| !t.is_empty()) {
                let text = result.create_text(&title)?;
                result.append_child(&anchor, &text)?;
            }
            result.append_child(&entry, &anchor)?;
            result.append_child(&list, &entry)?;
            count += 1;
        }
        debug!(items = count, take = stylesheet.take, "transformed feed");
        Ok((result, list))
    }
}
