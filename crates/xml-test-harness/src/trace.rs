//! Recording notifications.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use xml_tree::{ChangeEvent, ChangeKind, Node, NodeType, Phase, SubscriptionId, Tree};

/// One notification as seen by one watched node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub phase: Phase,
    pub kind: ChangeKind,
    pub sender_type: NodeType,
    /// Sender rendered at dispatch time
    pub sender: String,
    /// Location of the watched node at dispatch time
    pub observer: String,
    /// Watched node rendered at dispatch time
    pub snapshot: String,
}

impl TraceEntry {
    fn capture(tree: &Tree, watched: Node, event: &ChangeEvent) -> Self {
        Self {
            phase: event.phase,
            kind: event.kind,
            sender_type: tree.kind(event.sender),
            sender: tree.to_xml(event.sender),
            observer: tree.path(watched),
            snapshot: tree.to_xml(watched),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.phase {
            Phase::Changing => "Before",
            Phase::Changed => "After",
        };
        write!(
            f,
            "{label} {}: ({} {}) => {}",
            self.kind, self.sender_type, self.sender, self.snapshot
        )
    }
}

/// Shared log that any number of watched nodes append to.
///
/// Cloning the recorder clones the handle, not the log.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    entries: Rc<RefCell<Vec<TraceEntry>>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to both phases on `node`
    pub fn watch(&self, tree: &mut Tree, node: Node) -> [SubscriptionId; 2] {
        let before = Rc::clone(&self.entries);
        let changing = tree.on_changing(node, move |tree, event| {
            before
                .borrow_mut()
                .push(TraceEntry::capture(tree, node, event));
            Ok(())
        });
        let after = Rc::clone(&self.entries);
        let changed = tree.on_changed(node, move |tree, event| {
            after
                .borrow_mut()
                .push(TraceEntry::capture(tree, node, event));
            Ok(())
        });
        [changing, changed]
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.borrow().clone()
    }

    /// Entries rendered with [`TraceEntry`]'s `Display`
    pub fn lines(&self) -> Vec<String> {
        self.entries.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<TraceEntry> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}
