//! Collaborator views of [`Tree`].

use xml_engine_traits::{
    error::Result as EngineResult,
    tree::{MutableXmlTree, NodeType, XmlTree},
    SchemaInfo, ValidationReport,
};

use crate::arena::{Node, Tree};

impl XmlTree for Tree {
    type Node = Node;

    fn parent(&self, node: &Node) -> Option<Node> {
        Tree::parent(self, *node)
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        Tree::children(self, *node).to_vec()
    }

    fn attributes(&self, node: &Node) -> Vec<Node> {
        Tree::attributes(self, *node).to_vec()
    }

    fn node_name(&self, node: &Node) -> Option<String> {
        self.name(*node).map(str::to_string)
    }

    fn node_value(&self, node: &Node) -> Option<String> {
        Some(self.value(*node))
    }

    fn node_type(&self, node: &Node) -> NodeType {
        self.kind(*node)
    }

    fn serialize(&self, node: &Node) -> EngineResult<String> {
        Ok(self.to_xml(*node))
    }
}

impl MutableXmlTree for Tree {
    fn create_element(&mut self, name: &str) -> EngineResult<Node> {
        Ok(self.new_element(name)?)
    }

    fn create_text(&mut self, text: &str) -> EngineResult<Node> {
        Ok(self.new_text(text))
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> EngineResult<()> {
        self.add_child(*parent, *child)?;
        Ok(())
    }

    fn set_attribute(&mut self, element: &Node, name: &str, value: &str) -> EngineResult<()> {
        Ok(self.set_attribute_value(*element, name, Some(value))?)
    }
}

impl Tree {
    /// Turn a validation report for the subtree at `root` into
    /// [`SchemaInfo`] annotations.
    ///
    /// Info left over from an earlier run is cleared first, on the nodes
    /// below `root` and on their attributes.
    pub fn apply_schema_info(&mut self, root: Node, report: &ValidationReport<Node>) {
        self.clear_schema_info(root);
        for &(node, validity) in &report.nodes {
            self.add_annotation(node, SchemaInfo { validity });
        }
    }

    /// Schema info recorded by the last [`Tree::apply_schema_info`]
    pub fn schema_info(&self, node: Node) -> Option<&SchemaInfo> {
        self.annotation::<SchemaInfo>(node)
    }

    /// Drop schema info from `root`, its descendants and their attributes
    pub fn clear_schema_info(&mut self, root: Node) {
        for node in self.descendants_and_self(root) {
            let attributes = Tree::attributes(self, node).to_vec();
            self.remove_annotations_of_type::<SchemaInfo>(node);
            for attr in attributes {
                self.remove_annotations_of_type::<SchemaInfo>(attr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixed;
    use xml_engine_traits::Validity;

    #[test]
    fn read_only_view() {
        let mut tree = Tree::new();
        let root = tree
            .build(&Fixed::element("rss").attr("version", "2.0").child(Fixed::element("channel").text("c")))
            .unwrap();
        let view: &dyn XmlTree<Node = Node> = &tree;

        let channel = view.child_element(&root, "channel").unwrap();
        assert_eq!(view.node_type(&channel), NodeType::Element);
        assert_eq!(view.parent(&channel), Some(root));
        assert_eq!(view.attribute_value(&root, "version").as_deref(), Some("2.0"));
        assert_eq!(view.node_value(&root).as_deref(), Some("c"));
        assert_eq!(view.serialize(&channel).unwrap(), "<channel>c</channel>");
    }

    #[test]
    fn builder_view_maps_errors() {
        let mut tree = Tree::new();
        let ul = tree.create_element("ul").unwrap();
        let li = tree.create_element("li").unwrap();
        tree.append_child(&ul, &li).unwrap();
        tree.set_attribute(&li, "class", "first").unwrap();

        let err = tree.set_attribute(&li, "class", "second");
        assert!(err.is_ok(), "existing attribute is updated in place");
        let err = tree.create_element("not valid").unwrap_err();
        assert!(matches!(err, xml_engine_traits::Error::Tree(_)));
        assert_eq!(tree.to_xml(ul), r#"<ul><li class="second" /></ul>"#);
    }

    #[test]
    fn schema_info_round() {
        let mut tree = Tree::new();
        let root = tree
            .build(&Fixed::element("rss").attr("version", "2.0").child(Fixed::element("channel")))
            .unwrap();
        let version = tree.attribute(root, "version").unwrap();
        let channel = tree.element(root, "channel").unwrap();

        let mut report = ValidationReport::new();
        report.record(root, Validity::Invalid);
        report.record(version, Validity::Valid);
        tree.apply_schema_info(root, &report);

        assert_eq!(tree.schema_info(root).map(|i| i.validity), Some(Validity::Invalid));
        assert_eq!(tree.schema_info(version).map(|i| i.validity), Some(Validity::Valid));
        assert!(tree.schema_info(channel).is_none());

        let mut second = ValidationReport::new();
        second.record(channel, Validity::Valid);
        tree.apply_schema_info(root, &second);
        assert!(tree.schema_info(root).is_none());
        assert!(tree.schema_info(version).is_none());
        assert!(tree.schema_info(channel).is_some());
    }
}
