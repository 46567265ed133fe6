use crate::annotation::Annotations;
use crate::error::{Error, Result};
use crate::event::Observers;
use crate::name::validate_name;
use tracing::debug;
use xml_engine_traits::NodeType;

/// Handle to a node in a [`Tree`].
///
/// Handles are cheap to copy and compare; two handles are equal exactly
/// when they refer to the same node. A handle is only meaningful for the
/// tree that created it, and only while that node is alive: once a node is
/// reclaimed its slot may be reused, but the old handle never matches the
/// new occupant.
///
/// # Panics
///
/// Every [`Tree`] method taking a `Node` panics when given a handle of
/// another tree or of a reclaimed node. Use [`Tree::contains`] to check a
/// handle of unknown origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) children: Vec<Node>,
    pub(crate) attributes: Vec<Node>,
    /// `<a></a>` rather than `<a />`; only ever set while `children` is empty
    pub(crate) empty_content: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Attribute {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) enum Value {
    Element(Element),
    Text(String),
    Attribute(Attribute),
}

impl Value {
    pub(crate) fn node_type(&self) -> NodeType {
        match self {
            Value::Element(_) => NodeType::Element,
            Value::Text(_) => NodeType::Text,
            Value::Attribute(_) => NodeType::Attribute,
        }
    }
}

pub(crate) struct NodeData {
    pub(crate) parent: Option<Node>,
    pub(crate) value: Value,
    pub(crate) annotations: Annotations,
}

struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// Arena owning every node, plus the subscriber registry.
///
/// Any number of independent trees can live in one arena. Removing a node
/// only severs its parent link, so it can be attached again. Detached
/// subtrees are reclaimed with [`Tree::prune`]; the text nodes and
/// attributes that the value setters replace are reclaimed as they go.
#[derive(Default)]
pub struct Tree {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    pub(crate) observers: Observers,
}

impl Tree {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached, self-closing element
    pub fn new_element(&mut self, name: &str) -> Result<Node> {
        validate_name(name)?;
        Ok(self.alloc(Value::Element(Element {
            name: name.to_string(),
            children: Vec::new(),
            attributes: Vec::new(),
            empty_content: false,
        })))
    }

    /// Create a detached text node
    pub fn new_text(&mut self, value: &str) -> Node {
        self.alloc(Value::Text(value.to_string()))
    }

    /// Create a detached attribute
    pub fn new_attribute(&mut self, name: &str, value: &str) -> Result<Node> {
        validate_name(name)?;
        Ok(self.alloc(Value::Attribute(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        })))
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `node` is a live node of this tree
    pub fn contains(&self, node: Node) -> bool {
        self.slot(node).is_some()
    }

    /// Reclaim the detached subtree rooted at `node`, attributes included.
    ///
    /// Handles into the subtree become stale and their subscriptions are
    /// dropped. Returns the number of nodes reclaimed.
    pub fn prune(&mut self, node: Node) -> Result<usize> {
        if self.parent(node).is_some() {
            return Err(Error::StillAttached(node));
        }
        Ok(self.reclaim(node))
    }

    pub(crate) fn reclaim(&mut self, node: Node) -> usize {
        let mut doomed = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.element_data(current) {
                stack.extend(element.attributes.iter().chain(&element.children).copied());
            }
            doomed.push(current);
        }
        for &n in &doomed {
            self.observers.forget(n);
            let slot = &mut self.nodes[n.index];
            slot.data = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.index);
        }
        debug!(?node, count = doomed.len(), "reclaimed subtree");
        doomed.len()
    }

    /// Deep copy `node` and everything below it, attributes included.
    ///
    /// The copy is detached. Annotations on `node` are shared with the
    /// copy; annotations on descendants are not copied. Subscriptions are
    /// never copied.
    pub fn clone_node(&mut self, node: Node) -> Node {
        let copy = self.copy_subtree(node);
        let annotations = self.data(node).annotations.clone();
        self.data_mut(copy).annotations = annotations;
        copy
    }

    fn copy_subtree(&mut self, node: Node) -> Node {
        let value = match &self.data(node).value {
            Value::Element(element) => Value::Element(element.clone()),
            Value::Text(text) => Value::Text(text.clone()),
            Value::Attribute(attr) => Value::Attribute(attr.clone()),
        };
        let (children, attributes) = match &value {
            Value::Element(element) => (element.children.clone(), element.attributes.clone()),
            _ => (Vec::new(), Vec::new()),
        };
        let copy = self.alloc(value);
        if children.is_empty() && attributes.is_empty() {
            return copy;
        }

        let attributes: Vec<Node> = attributes
            .into_iter()
            .map(|attr| self.copy_subtree(attr))
            .collect();
        let children: Vec<Node> = children
            .into_iter()
            .map(|child| self.copy_subtree(child))
            .collect();
        for &owned in attributes.iter().chain(children.iter()) {
            self.data_mut(owned).parent = Some(copy);
        }
        let element = self.element_mut(copy);
        element.attributes = attributes;
        element.children = children;
        copy
    }

    fn alloc(&mut self, value: Value) -> Node {
        let data = NodeData {
            parent: None,
            value,
            annotations: Annotations::default(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.nodes[index];
                slot.data = Some(data);
                Node {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.nodes.push(Slot {
                    generation: 0,
                    data: Some(data),
                });
                Node {
                    index: self.nodes.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn slot(&self, node: Node) -> Option<&NodeData> {
        self.nodes
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.data.as_ref())
    }

    pub(crate) fn data(&self, node: Node) -> &NodeData {
        match self.slot(node) {
            Some(data) => data,
            None => panic!("{node:?} is not a live node of this tree"),
        }
    }

    pub(crate) fn data_mut(&mut self, node: Node) -> &mut NodeData {
        match self
            .nodes
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.data.as_mut())
        {
            Some(data) => data,
            None => panic!("{node:?} is not a live node of this tree"),
        }
    }

    pub(crate) fn element_data(&self, node: Node) -> Option<&Element> {
        match &self.data(node).value {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Element payload of a node already known to be an element
    pub(crate) fn element_mut(&mut self, node: Node) -> &mut Element {
        match &mut self.data_mut(node).value {
            Value::Element(element) => element,
            _ => unreachable!("node {node:?} was checked to be an element"),
        }
    }

    pub(crate) fn expect_element(&self, node: Node, operation: &'static str) -> Result<&Element> {
        self.element_data(node).ok_or_else(|| {
            Error::unexpected_kind(operation, "Element", self.data(node).value.node_type())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_validate_names() {
        let mut tree = Tree::new();
        assert!(tree.new_element("ok").is_ok());
        assert!(matches!(tree.new_element("no good"), Err(Error::InvalidName(_))));
        assert!(matches!(tree.new_attribute("1st", "v"), Err(Error::InvalidName(_))));
        // Only the successful element was allocated.
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn clone_is_detached_deep_copy() {
        let mut tree = Tree::new();
        let root = tree.new_element("root").unwrap();
        let child = tree.new_element("child").unwrap();
        tree.add_child(root, child).unwrap();
        tree.set_attribute_value(child, "a", Some("1")).unwrap();
        tree.add_text(child, "text").unwrap();

        let copy = tree.clone_node(child);
        assert_ne!(copy, child);
        assert_eq!(tree.parent(copy), None);
        assert_eq!(tree.parent(child), Some(root));
        assert!(tree.deep_equal(copy, child));

        let copied_attr = tree.attribute(copy, "a").unwrap();
        assert_ne!(Some(copied_attr), tree.attribute(child, "a"));
        assert_eq!(tree.parent(copied_attr), Some(copy));
        assert_eq!(tree.to_xml(copy), r#"<child a="1">text</child>"#);
    }

    #[test]
    fn clone_keeps_empty_content_form() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        tree.set_value(element, "").unwrap();
        let copy = tree.clone_node(element);
        assert_eq!(tree.to_xml(copy), "<e></e>");
    }

    #[test]
    fn repeated_element_set_value_reuses_slots() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();

        for i in 0..10_000 {
            tree.set_value(element, &i.to_string()).unwrap();
        }

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(element).len(), 1);
        assert_eq!(tree.value(element), "9999");
    }

    #[test]
    fn replaced_text_handle_goes_stale() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        tree.set_value(element, "a").unwrap();
        let old = tree.children(element)[0];

        tree.set_value(element, "b").unwrap();
        let new = tree.children(element)[0];

        assert!(!tree.contains(old));
        assert!(tree.contains(new));
        assert_ne!(old, new, "a reused slot gets a fresh handle");
    }

    #[test]
    fn prune_reclaims_detached_subtree_and_its_subscriptions() {
        let mut tree = Tree::new();
        let parent = tree.new_element("parent").unwrap();
        let child = tree.new_element("child").unwrap();
        tree.add_child(parent, child).unwrap();
        tree.set_attribute_value(child, "a", Some("1")).unwrap();
        let text = tree.add_text(child, "t").unwrap();
        let id = tree.on_changed(text, |_, _| Ok(()));

        assert!(matches!(tree.prune(child), Err(Error::StillAttached(n)) if n == child));

        tree.remove(child).unwrap();
        assert_eq!(tree.prune(child).unwrap(), 3);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(child));
        assert!(!tree.contains(text));
        assert!(!tree.unsubscribe(id));
        assert_eq!(tree.to_xml(parent), "<parent />");
    }

    #[test]
    #[should_panic(expected = "is not a live node of this tree")]
    fn foreign_handle_panics() {
        let mut source = Tree::new();
        source.new_element("a").unwrap();
        let node = source.new_element("b").unwrap();

        let other = Tree::new();
        other.kind(node);
    }
}
