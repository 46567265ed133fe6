//! Build trees from a fixed description.
//!
//! [`Fixed`] is a plain owned description of a subtree. It is handy in
//! tests and it is what the JSON loader deserializes into:
//!
//! ```json
//! {"element": {"name": "a", "attributes": [["href", "/"]], "children": [{"text": "home"}]}}
//! ```

use serde::{Deserialize, Serialize};

use crate::arena::{Node, Tree};
use crate::error::Result;

/// Owned description of an element or text subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixed {
    Element {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<(String, String)>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Fixed>,
    },
    Text(String),
}

impl Fixed {
    pub fn element(name: impl Into<String>) -> Self {
        Fixed::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text_node(value: impl Into<String>) -> Self {
        Fixed::Text(value.into())
    }

    /// Add an attribute; ignored on text
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Fixed::Element { attributes, .. } = &mut self {
            attributes.push((name.into(), value.into()));
        }
        self
    }

    /// Add a child; ignored on text
    pub fn child(mut self, child: Fixed) -> Self {
        if let Fixed::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Add a text child
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Fixed::text_node(value))
    }
}

impl Tree {
    /// Build a detached subtree from `fixed` and return its root.
    ///
    /// Names are validated as the tree is built; on error the partially
    /// built nodes are reclaimed.
    pub fn build(&mut self, fixed: &Fixed) -> Result<Node> {
        match fixed {
            Fixed::Text(value) => Ok(self.new_text(value)),
            Fixed::Element {
                name,
                attributes,
                children,
            } => {
                let element = self.new_element(name)?;
                if let Err(err) = self.build_content(element, attributes, children) {
                    self.reclaim(element);
                    return Err(err);
                }
                Ok(element)
            }
        }
    }

    fn build_content(
        &mut self,
        element: Node,
        attributes: &[(String, String)],
        children: &[Fixed],
    ) -> Result<()> {
        for (name, value) in attributes {
            let attr = self.new_attribute(name, value)?;
            self.attach_built(element, attr)?;
        }
        for child in children {
            let child = self.build(child)?;
            self.attach_built(element, child)?;
        }
        Ok(())
    }

    fn attach_built(&mut self, element: Node, node: Node) -> Result<()> {
        if let Err(err) = self.add_child(element, node) {
            self.reclaim(node);
            return Err(err);
        }
        Ok(())
    }
}
