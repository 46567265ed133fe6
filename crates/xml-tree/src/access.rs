use crate::arena::{Node, Tree, Value};
use xml_engine_traits::NodeType;

impl Tree {
    /// Kind of node
    pub fn kind(&self, node: Node) -> NodeType {
        self.data(node).value.node_type()
    }

    pub fn is_element(&self, node: Node) -> bool {
        self.kind(node) == NodeType::Element
    }

    /// Name of an element or attribute; `None` for text
    pub fn name(&self, node: Node) -> Option<&str> {
        match &self.data(node).value {
            Value::Element(element) => Some(&element.name),
            Value::Attribute(attr) => Some(&attr.name),
            Value::Text(_) => None,
        }
    }

    /// Value of a node.
    ///
    /// For text and attributes this is the stored string. For elements it is
    /// the concatenation of all descendant text in document order.
    pub fn value(&self, node: Node) -> String {
        match &self.data(node).value {
            Value::Text(text) => text.clone(),
            Value::Attribute(attr) => attr.value.clone(),
            Value::Element(_) => {
                let mut out = String::new();
                self.collect_text(node, &mut out);
                out
            }
        }
    }

    fn collect_text(&self, node: Node, out: &mut String) {
        match &self.data(node).value {
            Value::Text(text) => out.push_str(text),
            Value::Element(element) => {
                for &child in &element.children {
                    self.collect_text(child, out);
                }
            }
            Value::Attribute(_) => {}
        }
    }

    /// Owning element of a node, if attached
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.data(node).parent
    }

    /// Child nodes in document order; empty for text and attributes
    pub fn children(&self, node: Node) -> &[Node] {
        self.element_data(node)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    /// Attribute nodes in insertion order; empty for non-elements
    pub fn attributes(&self, node: Node) -> &[Node] {
        self.element_data(node)
            .map(|element| element.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// The attribute called `name` on an element
    pub fn attribute(&self, node: Node, name: &str) -> Option<Node> {
        self.attributes(node)
            .iter()
            .copied()
            .find(|&attr| self.name(attr) == Some(name))
    }

    /// Value of the attribute called `name`
    pub fn attribute_value(&self, node: Node, name: &str) -> Option<&str> {
        self.attribute(node, name).and_then(|attr| match &self.data(attr).value {
            Value::Attribute(attr) => Some(attr.value.as_str()),
            _ => None,
        })
    }

    /// Child elements in document order
    pub fn elements(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    /// First child element called `name`
    pub fn element(&self, node: Node, name: &str) -> Option<Node> {
        self.elements(node).find(|&child| self.name(child) == Some(name))
    }

    /// Ancestors from the parent outward
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// Topmost ancestor, or the node itself when detached
    pub fn root(&self, node: Node) -> Node {
        self.ancestors(node).last().unwrap_or(node)
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: Node, node: Node) -> bool {
        ancestor == node || self.ancestors(node).any(|n| n == ancestor)
    }

    /// `node` and every element and text node below it, in document order.
    /// Attributes are not included.
    pub fn descendants_and_self(&self, node: Node) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Structural equality: same kinds, names, values, attributes and
    /// children. Identity and annotations are ignored; so is the
    /// `<a />`/`<a></a>` distinction.
    pub fn deep_equal(&self, a: Node, b: Node) -> bool {
        match (&self.data(a).value, &self.data(b).value) {
            (Value::Text(x), Value::Text(y)) => x == y,
            (Value::Attribute(x), Value::Attribute(y)) => x.name == y.name && x.value == y.value,
            (Value::Element(x), Value::Element(y)) => {
                x.name == y.name
                    && x.attributes.len() == y.attributes.len()
                    && x.children.len() == y.children.len()
                    && x
                        .attributes
                        .iter()
                        .zip(&y.attributes)
                        .all(|(&p, &q)| self.deep_equal(p, q))
                    && x
                        .children
                        .iter()
                        .zip(&y.children)
                        .all(|(&p, &q)| self.deep_equal(p, q))
            }
            _ => false,
        }
    }

    /// Location path of a node, e.g. `/rss/channel/item[2]/@href`.
    ///
    /// Elements get a 1-based position predicate only when siblings share
    /// their name.
    pub fn path(&self, node: Node) -> String {
        let step = match &self.data(node).value {
            Value::Attribute(attr) => format!("@{}", attr.name),
            Value::Text(_) => "text()".to_string(),
            Value::Element(element) => match self.parent(node) {
                Some(parent) => {
                    let same: Vec<Node> = self
                        .elements(parent)
                        .filter(|&e| self.name(e) == Some(element.name.as_str()))
                        .collect();
                    if same.len() > 1 {
                        let position = same.iter().position(|&e| e == node).unwrap_or(0) + 1;
                        format!("{}[{}]", element.name, position)
                    } else {
                        element.name.clone()
                    }
                }
                None => element.name.clone(),
            },
        };
        match self.parent(node) {
            Some(parent) => format!("{}/{}", self.path(parent), step),
            None => format!("/{}", step),
        }
    }
}
