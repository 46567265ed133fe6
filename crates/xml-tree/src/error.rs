//! Error types for tree operations

use crate::arena::Node;
use xml_engine_traits::NodeType;

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the mutation operations.
///
/// An operation that returns an error has not changed the tree, unless the
/// error came from a subscriber during the `Changed` phase.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Element or attribute name is not a legal XML name
    #[error("Invalid XML name: {0:?}")]
    InvalidName(String),

    /// Element already has an attribute with this name
    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// Node would become its own ancestor
    #[error("Node {node:?} cannot be attached below {parent:?}: it is an ancestor of it")]
    CyclicAttachment { node: Node, parent: Node },

    /// Node is not a child or attribute of the given parent
    #[error("Node {node:?} is not owned by {parent:?}")]
    NotAChild { node: Node, parent: Node },

    /// Operation needs a parent but the node is detached
    #[error("Node {0:?} has no parent")]
    NoParent(Node),

    /// Operation needs a detached node
    #[error("Node {0:?} is still attached")]
    StillAttached(Node),

    /// Operation does not apply to this kind of node
    #[error("Expected {expected} node, found {found} ({operation})")]
    UnexpectedKind {
        operation: &'static str,
        expected: &'static str,
        found: NodeType,
    },

    /// A subscriber failed while a change was being dispatched
    #[error("Subscriber failed: {0}")]
    Observer(String),

    /// A collaborator engine failed
    #[error(transparent)]
    Engine(#[from] xml_engine_traits::Error),
}

impl Error {
    /// Create a new subscriber error, for use inside callbacks
    pub fn observer<S: Into<String>>(msg: S) -> Self {
        Error::Observer(msg.into())
    }

    pub(crate) fn unexpected_kind(
        operation: &'static str,
        expected: &'static str,
        found: NodeType,
    ) -> Self {
        Error::UnexpectedKind {
            operation,
            expected,
            found,
        }
    }
}

impl From<Error> for xml_engine_traits::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Engine(inner) => inner,
            other => xml_engine_traits::Error::Tree(other.to_string()),
        }
    }
}
