use crate::arena::{Node, Tree, Value};

impl Tree {
    /// Unformatted XML for `node`.
    ///
    /// Childless elements come out as `<a />`, or `<a></a>` once their
    /// value has been set to the empty string. An attribute renders as
    /// `name="value"` and a text node as its escaped text.
    pub fn to_xml(&self, node: Node) -> String {
        let mut out = String::new();
        self.write_xml(node, &mut out);
        out
    }

    fn write_xml(&self, node: Node, out: &mut String) {
        match &self.data(node).value {
            Value::Text(text) => escape_text(text, out),
            Value::Attribute(attr) => {
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_attribute(&attr.value, out);
                out.push('"');
            }
            Value::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for &attr in &element.attributes {
                    out.push(' ');
                    self.write_xml(attr, out);
                }
                if element.children.is_empty() && !element.empty_content {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for &child in &element.children {
                    self.write_xml(child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
