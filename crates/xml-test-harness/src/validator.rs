//! A tiny content-model validator.
//!
//! Stands in for a real schema engine: per element name it knows which
//! child elements and attributes may appear. Elements it has no rule for
//! are reported as [`Validity::NotKnown`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xml_engine_traits::{error::Result, Error, SchemaValidator, ValidationReport, Validity};
use xml_tree::{Node, NodeType, Tree};

/// What an element may contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRule {
    /// Allowed child element names
    #[serde(default)]
    pub children: Vec<String>,
    /// Allowed optional attribute names
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub required_attributes: Vec<String>,
}

impl ElementRule {
    fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.iter().chain(&self.required_attributes).any(|a| a == name)
    }
}

/// Rules keyed by element name, plus the expected root name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModel {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub elements: BTreeMap<String, ElementRule>,
}

impl ContentModel {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source)
            .map_err(|e| Error::schema(format!("invalid content model: {}", e)))
    }

    /// Add or replace the rule for `name`
    pub fn rule(mut self, name: impl Into<String>, rule: ElementRule) -> Self {
        self.elements.insert(name.into(), rule);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentModelValidator {
    model: ContentModel,
}

impl ContentModelValidator {
    pub fn new(model: ContentModel) -> Self {
        Self { model }
    }

    fn check_element(&self, tree: &Tree, element: Node, report: &mut ValidationReport<Node>) {
        let name = tree.name(element).unwrap_or_default();
        let mut validity = Validity::NotKnown;

        let parent_rule = tree
            .parent(element)
            .and_then(|p| tree.name(p))
            .and_then(|p| self.model.elements.get(p));
        let misplaced = match (tree.parent(element), &self.model.root) {
            (None, Some(root)) => root != name,
            _ => parent_rule.is_some_and(|rule| !rule.children.iter().any(|c| c == name)),
        };
        if misplaced {
            validity = Validity::Invalid;
        }

        if let Some(rule) = self.model.elements.get(name) {
            if validity != Validity::Invalid {
                validity = Validity::Valid;
            }
            for child in tree.elements(element) {
                let child_name = tree.name(child).unwrap_or_default();
                if !rule.children.iter().any(|c| c == child_name) {
                    validity = Validity::Invalid;
                    report.error(
                        format!(
                            "The element '{}' has invalid child element '{}'. List of possible elements expected: {}.",
                            name,
                            child_name,
                            quoted(&rule.children)
                        ),
                        Some(tree.path(child)),
                    );
                }
            }
            for required in &rule.required_attributes {
                if tree.attribute(element, required).is_none() {
                    validity = Validity::Invalid;
                    report.error(
                        format!("The required attribute '{}' is missing.", required),
                        Some(tree.path(element)),
                    );
                }
            }
        } else if misplaced && tree.parent(element).is_none() {
            report.error(
                format!("The root element '{}' is not declared.", name),
                Some(tree.path(element)),
            );
        }

        report.record(element, validity);

        if let Some(rule) = self.model.elements.get(name) {
            for &attr in tree.attributes(element) {
                let attr_name = tree.name(attr).unwrap_or_default();
                let attr_validity = if rule.allows_attribute(attr_name) {
                    Validity::Valid
                } else {
                    report.error(
                        format!("The '{}' attribute is not declared.", attr_name),
                        Some(tree.path(attr)),
                    );
                    Validity::Invalid
                };
                report.record(attr, attr_validity);
            }
        }
    }
}

fn quoted(names: &[String]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SchemaValidator for ContentModelValidator {
    type Tree = Tree;

    fn validate(&self, tree: &Tree, root: &Node) -> Result<ValidationReport<Node>> {
        let mut report = ValidationReport::new();
        for node in tree.descendants_and_self(*root) {
            if tree.kind(node) == NodeType::Element {
                self.check_element(tree, node, &mut report);
            }
        }
        debug!(
            valid = report.valid,
            errors = report.errors.len(),
            "validated content model"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xml_tree::Fixed;

    fn model() -> ContentModel {
        ContentModel {
            root: Some("rss".into()),
            ..Default::default()
        }
        .rule(
            "rss",
            ElementRule {
                children: vec!["channel".into()],
                required_attributes: vec!["version".into()],
                ..Default::default()
            },
        )
        .rule(
            "channel",
            ElementRule {
                children: vec!["title".into(), "link".into(), "item".into()],
                ..Default::default()
            },
        )
        .rule("title", ElementRule::default())
    }

    fn feed(tree: &mut Tree) -> Node {
        let fixed = Fixed::element("rss")
            .attr("version", "2.0")
            .attr("xmlns:media", "http://search.yahoo.com/mrss/")
            .child(
                Fixed::element("channel")
                    .child(Fixed::element("title").text("Photos"))
                    .child(Fixed::element("pubDate").text("today")),
            );
        tree.build(&fixed).unwrap()
    }

    #[test]
    fn reports_invalid_child_and_unknown_elements() {
        let mut tree = Tree::new();
        let rss = feed(&mut tree);
        let validator = ContentModelValidator::new(model());

        let report = validator.validate(&tree, &rss).unwrap();
        tree.apply_schema_info(rss, &report);

        let lines: Vec<String> = tree
            .descendants_and_self(rss)
            .into_iter()
            .filter(|&n| tree.is_element(n))
            .flat_map(|n| std::iter::once(n).chain(tree.attributes(n).iter().copied()))
            .map(|n| {
                let validity = tree
                    .schema_info(n)
                    .map(|info| info.validity.to_string())
                    .unwrap_or_else(|| "null".to_string());
                format!("{} - {}", tree.path(n), validity)
            })
            .collect();

        assert_eq!(
            lines,
            vec![
                "/rss - Valid",
                "/rss/@version - Valid",
                "/rss/@xmlns:media - Invalid",
                "/rss/channel - Invalid",
                "/rss/channel/title - Valid",
                "/rss/channel/pubDate - Invalid",
            ]
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors[1].message,
            "The element 'channel' has invalid child element 'pubDate'. List of possible elements expected: 'title', 'link', 'item'."
        );
        assert_eq!(report.errors[1].path.as_deref(), Some("/rss/channel/pubDate"));
    }

    #[test]
    fn missing_required_attribute_and_wrong_root() {
        let mut tree = Tree::new();
        let root = tree.build(&Fixed::element("feed")).unwrap();
        let report = ContentModelValidator::new(model())
            .validate(&tree, &root)
            .unwrap();
        assert_eq!(report.validity_of(&root), Some(Validity::Invalid));
        assert_eq!(report.errors[0].message, "The root element 'feed' is not declared.");

        let rss = tree.build(&Fixed::element("rss")).unwrap();
        let report = ContentModelValidator::new(model())
            .validate(&tree, &rss)
            .unwrap();
        assert_eq!(report.validity_of(&rss), Some(Validity::Invalid));
        assert_eq!(report.errors[0].message, "The required attribute 'version' is missing.");
    }

    #[test]
    fn model_from_json() {
        let model = ContentModel::from_json(
            r#"{"root": "ul", "elements": {"ul": {"children": ["li"]}, "li": {}}}"#,
        )
        .unwrap();
        assert_eq!(model.root.as_deref(), Some("ul"));
        assert_eq!(model.elements["ul"].children, vec!["li".to_string()]);
        assert!(matches!(
            ContentModel::from_json("[]"),
            Err(Error::Schema(msg)) if msg.starts_with("invalid content model")
        ));
    }
}
