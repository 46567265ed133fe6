//! XML tree abstraction traits

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Type of XML node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum NodeType {
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
}

/// Read-only view of an XML tree.
///
/// Engines that consume a tree (schema validators, transform engines)
/// only ever see it through this trait, so they cannot mutate it
/// while they run.
pub trait XmlTree {
    /// Type representing a node handle in this tree
    type Node: Copy + Eq + Hash + Debug;

    /// Get the parent of a node, if it has one
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Get all children of a node, in document order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Get all attribute nodes of an element
    fn attributes(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Get the name of an element or attribute
    fn node_name(&self, node: &Self::Node) -> Option<String>;

    /// Get the text content/value of a node
    fn node_value(&self, node: &Self::Node) -> Option<String>;

    /// Get the type of a node
    fn node_type(&self, node: &Self::Node) -> NodeType;

    /// Serialize a node to an XML string
    fn serialize(&self, node: &Self::Node) -> Result<String>;

    /// Get the child elements of a node
    fn child_elements(&self, node: &Self::Node) -> Vec<Self::Node> {
        self.children(node)
            .into_iter()
            .filter(|child| self.node_type(child) == NodeType::Element)
            .collect()
    }

    /// Get the first child element with the given name
    fn child_element(&self, node: &Self::Node, name: &str) -> Option<Self::Node> {
        self.children(node).into_iter().find(|child| {
            self.node_type(child) == NodeType::Element
                && self.node_name(child).as_deref() == Some(name)
        })
    }

    /// Get the value of the named attribute of an element
    fn attribute_value(&self, node: &Self::Node, name: &str) -> Option<String> {
        self.attributes(node)
            .into_iter()
            .find(|attr| self.node_name(attr).as_deref() == Some(name))
            .and_then(|attr| self.node_value(&attr))
    }
}

/// Helper trait for trees that need mutable access
pub trait MutableXmlTree: XmlTree {
    /// Create a new detached element node
    fn create_element(&mut self, name: &str) -> Result<Self::Node>;

    /// Create a new detached text node
    fn create_text(&mut self, text: &str) -> Result<Self::Node>;

    /// Append a child to a node
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Set an attribute on an element
    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn node_type_names() {
        assert_eq!(NodeType::Element.to_string(), "Element");
        assert_eq!(NodeType::from_str("Attribute").unwrap(), NodeType::Attribute);
    }
}
