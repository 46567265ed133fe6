use tracing::debug;
use xml_engine_traits::NodeType;

use crate::arena::{Node, Tree, Value};
use crate::error::{Error, Result};
use crate::event::ChangeKind;
use crate::name::validate_name;

impl Tree {
    /// Attach `node` to `parent`, copying it first if it is already part of a tree.
    ///
    /// Returns the node that was inserted: `node` itself when it was
    /// detached, otherwise its copy. Same as [`Tree::add_child`].
    pub fn attach(&mut self, node: Node, parent: Node) -> Result<Node> {
        self.add_child(parent, node)
    }

    /// Append `node` as the last child of `parent`, or as an attribute if it is one.
    pub fn add_child(&mut self, parent: Node, node: Node) -> Result<Node> {
        self.expect_element(parent, "add_child")?;
        if self.kind(node) == NodeType::Attribute {
            self.check_attribute_free(parent, node)?;
            let attr = self.resolve_attach(node, parent)?;
            self.insert_attribute(parent, attr)?;
            Ok(attr)
        } else {
            let child = self.resolve_attach(node, parent)?;
            let index = self.children(parent).len();
            self.insert_child(parent, index, child)
        }
    }

    /// Append a new text node holding `value`
    pub fn add_text(&mut self, parent: Node, value: &str) -> Result<Node> {
        self.expect_element(parent, "add_text")?;
        let text = self.new_text(value);
        self.add_child(parent, text)
    }

    /// Insert `content` right before `node` in its parent
    pub fn add_sibling_before(&mut self, node: Node, content: Node) -> Result<Node> {
        self.add_sibling(node, content, 0, "add_sibling_before")
    }

    /// Insert `content` right after `node` in its parent
    pub fn add_sibling_after(&mut self, node: Node, content: Node) -> Result<Node> {
        self.add_sibling(node, content, 1, "add_sibling_after")
    }

    fn add_sibling(
        &mut self,
        node: Node,
        content: Node,
        offset: usize,
        operation: &'static str,
    ) -> Result<Node> {
        let parent = self.parent(node).ok_or(Error::NoParent(node))?;
        for n in [node, content] {
            if self.kind(n) == NodeType::Attribute {
                return Err(Error::unexpected_kind(
                    operation,
                    "Element or Text",
                    NodeType::Attribute,
                ));
            }
        }
        let content = self.resolve_attach(content, parent)?;
        let index = self.child_index(parent, node) + offset;
        self.insert_child(parent, index, content)
    }

    /// Detach `node` (a child or an attribute) from `parent`.
    ///
    /// The removed node keeps its own subtree and can be attached again.
    pub fn remove_child(&mut self, parent: Node, node: Node) -> Result<()> {
        if self.parent(node) != Some(parent) {
            return Err(Error::NotAChild { node, parent });
        }
        let is_attribute = self.kind(node) == NodeType::Attribute;
        debug!(?parent, ?node, "removing");
        self.change(parent, node, ChangeKind::Remove, |tree| {
            let element = tree.element_mut(parent);
            if is_attribute {
                element.attributes.retain(|&a| a != node);
            } else {
                element.children.retain(|&c| c != node);
            }
            tree.data_mut(node).parent = None;
        })
    }

    /// Detach `node` from whatever element owns it
    pub fn remove(&mut self, node: Node) -> Result<()> {
        let parent = self.parent(node).ok_or(Error::NoParent(node))?;
        self.remove_child(parent, node)
    }

    /// Remove every child of `parent`, then add each of `content` in order.
    ///
    /// Attributes of `parent` are kept. Content is attached as it is added,
    /// so a node that was a child a moment ago goes back in without a copy.
    /// Returns the nodes actually inserted.
    pub fn replace_all_children(&mut self, parent: Node, content: &[Node]) -> Result<Vec<Node>> {
        self.expect_element(parent, "replace_all_children")?;
        let mut names: Vec<&str> = Vec::new();
        for &item in content {
            if let Value::Attribute(attr) = &self.data(item).value {
                if self.attribute(parent, &attr.name).is_some() || names.contains(&attr.name.as_str())
                {
                    return Err(Error::DuplicateAttribute(attr.name.clone()));
                }
                names.push(&attr.name);
            }
        }

        let old = self.children(parent).to_vec();
        for child in old {
            self.remove_child(parent, child)?;
        }
        content
            .iter()
            .map(|&item| self.add_child(parent, item))
            .collect()
    }

    /// Set the value of a text node, an attribute or an element.
    ///
    /// Text and attributes are updated in place, and setting the value they
    /// already have does nothing. For an element every child is removed
    /// first, and removed text nodes are reclaimed; a non-empty value then
    /// becomes a single new text child, while the empty value leaves the
    /// element as `<a></a>`. Only an element whose sole child is already the
    /// requested text is left alone.
    pub fn set_value(&mut self, node: Node, value: &str) -> Result<()> {
        if self.is_element(node) {
            return self.set_element_value(node, value);
        }
        let unchanged = match &self.data(node).value {
            Value::Text(text) => text == value,
            Value::Attribute(attr) => attr.value == value,
            Value::Element(_) => false,
        };
        if unchanged {
            return Ok(());
        }
        self.change(node, node, ChangeKind::Value, |tree| {
            match &mut tree.data_mut(node).value {
                Value::Text(text) => *text = value.to_string(),
                Value::Attribute(attr) => attr.value = value.to_string(),
                Value::Element(_) => {}
            }
        })
    }

    fn set_element_value(&mut self, element: Node, value: &str) -> Result<()> {
        let data = self.expect_element(element, "set_value")?;
        let unchanged = !value.is_empty()
            && matches!(
                data.children.as_slice(),
                [only] if matches!(&self.data(*only).value, Value::Text(text) if text == value)
            );
        if unchanged {
            return Ok(());
        }

        let old = data.children.clone();
        for child in old {
            self.remove_child(element, child)?;
            if self.kind(child) == NodeType::Text {
                self.reclaim(child);
            }
        }
        if self.element_data(element).is_some_and(|e| e.empty_content) {
            self.change(element, element, ChangeKind::Value, |tree| {
                tree.element_mut(element).empty_content = false;
            })?;
        }
        if value.is_empty() {
            self.change(element, element, ChangeKind::Value, |tree| {
                tree.element_mut(element).empty_content = true;
            })
        } else {
            let text = self.new_text(value);
            self.insert_child(element, 0, text).map(|_| ())
        }
    }

    /// Add, update or remove the attribute `name`.
    ///
    /// `Some` adds the attribute or updates its value in place; `None`
    /// removes and reclaims it. Nothing happens when removing an absent
    /// attribute.
    pub fn set_attribute_value(
        &mut self,
        element: Node,
        name: &str,
        value: Option<&str>,
    ) -> Result<()> {
        validate_name(name)?;
        self.expect_element(element, "set_attribute_value")?;
        match (self.attribute(element, name), value) {
            (Some(attr), Some(value)) => self.set_value(attr, value),
            (Some(attr), None) => {
                self.remove_child(element, attr)?;
                self.reclaim(attr);
                Ok(())
            }
            (None, Some(value)) => {
                let attr = self.new_attribute(name, value)?;
                self.insert_attribute(element, attr)
            }
            (None, None) => Ok(()),
        }
    }

    /// Add, update or remove the first child element called `name`.
    ///
    /// A missing element is built with its value before it is added, so
    /// observers of `parent` only see the single `Add`.
    pub fn set_child_element_value(
        &mut self,
        parent: Node,
        name: &str,
        value: Option<&str>,
    ) -> Result<()> {
        validate_name(name)?;
        self.expect_element(parent, "set_child_element_value")?;
        match (self.element(parent, name), value) {
            (Some(child), Some(value)) => self.set_value(child, value),
            (Some(child), None) => self.remove_child(parent, child),
            (None, Some(value)) => {
                let child = self.new_element(name)?;
                self.set_value(child, value)?;
                let index = self.children(parent).len();
                self.insert_child(parent, index, child).map(|_| ())
            }
            (None, None) => Ok(()),
        }
    }

    /// Rename an element in place
    pub fn set_name(&mut self, element: Node, name: &str) -> Result<()> {
        validate_name(name)?;
        self.expect_element(element, "set_name")?;
        self.change(element, element, ChangeKind::Name, |tree| {
            tree.element_mut(element).name = name.to_string();
        })
    }

    /// The node to insert below `parent`: `node` itself if it is free,
    /// otherwise a copy.
    fn resolve_attach(&mut self, node: Node, parent: Node) -> Result<Node> {
        let node = if self.parent(node).is_some() || self.is_ancestor_or_self(node, parent) {
            debug!(?node, ?parent, "node is already in a tree, attaching a copy");
            self.clone_node(node)
        } else {
            node
        };
        if self.is_ancestor_or_self(node, parent) {
            return Err(Error::CyclicAttachment { node, parent });
        }
        Ok(node)
    }

    fn check_attribute_free(&self, element: Node, attr: Node) -> Result<()> {
        match self.name(attr) {
            Some(name) if self.attribute(element, name).is_some() => {
                Err(Error::DuplicateAttribute(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn child_index(&self, parent: Node, child: Node) -> usize {
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .unwrap_or_else(|| unreachable!("{child:?} has parent {parent:?} but is not among its children"))
    }

    fn insert_child(&mut self, parent: Node, index: usize, child: Node) -> Result<Node> {
        debug!(?parent, ?child, index, "adding child");
        self.change(parent, child, ChangeKind::Add, |tree| {
            tree.data_mut(child).parent = Some(parent);
            let element = tree.element_mut(parent);
            element.empty_content = false;
            element.children.insert(index, child);
        })?;
        Ok(child)
    }

    fn insert_attribute(&mut self, element: Node, attr: Node) -> Result<()> {
        debug!(?element, ?attr, "adding attribute");
        self.change(element, attr, ChangeKind::Add, |tree| {
            tree.data_mut(attr).parent = Some(element);
            tree.element_mut(element).attributes.push(attr);
        })
    }
}
