//! Schema validation abstraction trait

use crate::error::Result;
use crate::tree::XmlTree;
use serde::{Deserialize, Serialize};

/// Per-node outcome of a validation run
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Validity {
    /// The validator had nothing to say about this node
    #[default]
    NotKnown,
    Valid,
    Invalid,
}

/// Transient annotation a tree attaches to each node after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub validity: Validity,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    /// Location of the offending node, e.g. `/rss/channel/pubDate`
    pub path: Option<String>,
}

/// Result of validating a tree
#[derive(Debug, Clone)]
pub struct ValidationReport<N> {
    pub valid: bool,
    /// Validity of every node the validator visited, in visit order
    pub nodes: Vec<(N, Validity)>,
    pub errors: Vec<ValidationError>,
}

impl<N> ValidationReport<N> {
    pub fn new() -> Self {
        Self {
            valid: true,
            nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a node outcome
    pub fn record(&mut self, node: N, validity: Validity) {
        if validity == Validity::Invalid {
            self.valid = false;
        }
        self.nodes.push((node, validity));
    }

    /// Record a failure message; marks the report invalid
    pub fn error(&mut self, message: impl Into<String>, path: Option<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            message: message.into(),
            path,
        });
    }

    /// Validity recorded for a node, if it was visited
    pub fn validity_of(&self, node: &N) -> Option<Validity>
    where
        N: PartialEq,
    {
        self.nodes
            .iter()
            .find(|(n, _)| n == node)
            .map(|(_, validity)| *validity)
    }
}

impl<N> Default for ValidationReport<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for schema validation engines.
///
/// Validators read the tree and report; they never touch it. Trees
/// that support annotations turn the report into [`SchemaInfo`]
/// annotations afterwards.
pub trait SchemaValidator {
    /// The XML tree implementation this validator works with
    type Tree: XmlTree;

    /// Validate the subtree rooted at `root`
    fn validate(
        &self,
        tree: &Self::Tree,
        root: &<Self::Tree as XmlTree>::Node,
    ) -> Result<ValidationReport<<Self::Tree as XmlTree>::Node>>;
}
