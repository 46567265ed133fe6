//! Change notifications.

use ahash::AHashMap;
use serde::Serialize;
use tracing::trace;

use crate::arena::{Node, Tree};
use crate::error::Result;

/// Category of a single atomic change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString)]
pub enum ChangeKind {
    /// A child or attribute was added; the sender is the added node
    Add,
    /// A child or attribute was removed; the sender is the removed node
    Remove,
    /// The value of the sender changed
    Value,
    /// The name of the sender changed
    Name,
}

/// Which side of the change a notification is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Phase {
    Changing,
    Changed,
}

/// A single notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub sender: Node,
    pub kind: ChangeKind,
    pub phase: Phase,
}

/// Handle returned by [`Tree::on_changing`] and [`Tree::on_changed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&Tree, &ChangeEvent) -> Result<()>>;

struct Subscription {
    id: SubscriptionId,
    phase: Phase,
    callback: Callback,
}

/// Subscriber registry: node identity to subscriptions in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    by_node: AHashMap<Node, Vec<Subscription>>,
}

impl Observers {
    fn subscribe(&mut self, node: Node, phase: Phase, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.by_node.entry(node).or_default().push(Subscription {
            id,
            phase,
            callback,
        });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut found = false;
        for (node, subscriptions) in self.by_node.iter_mut() {
            if let Some(pos) = subscriptions.iter().position(|s| s.id == id) {
                subscriptions.remove(pos);
                found = true;
                if subscriptions.is_empty() {
                    emptied = Some(*node);
                }
                break;
            }
        }
        if let Some(node) = emptied {
            self.by_node.remove(&node);
        }
        found
    }

    /// Drop every subscription on a node that no longer exists
    pub(crate) fn forget(&mut self, node: Node) {
        self.by_node.remove(&node);
    }
}

impl Tree {
    /// Call `callback` before every change to `node` or anything below it
    pub fn on_changing<F>(&mut self, node: Node, callback: F) -> SubscriptionId
    where
        F: Fn(&Tree, &ChangeEvent) -> Result<()> + 'static,
    {
        self.observers
            .subscribe(node, Phase::Changing, Box::new(callback))
    }

    /// Call `callback` after every change to `node` or anything below it
    pub fn on_changed<F>(&mut self, node: Node, callback: F) -> SubscriptionId
    where
        F: Fn(&Tree, &ChangeEvent) -> Result<()> + 'static,
    {
        self.observers
            .subscribe(node, Phase::Changed, Box::new(callback))
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Deliver `event` to subscribers on `origin` and then on each of its
    /// ancestors. The first failing subscriber stops the dispatch.
    pub(crate) fn notify(&self, origin: Node, event: ChangeEvent) -> Result<()> {
        if self.observers.by_node.is_empty() {
            return Ok(());
        }
        let mut current = Some(origin);
        while let Some(node) = current {
            if let Some(subscriptions) = self.observers.by_node.get(&node) {
                for subscription in subscriptions.iter().filter(|s| s.phase == event.phase) {
                    trace!(?node, ?event, "dispatching");
                    (subscription.callback)(self, &event)?;
                }
            }
            current = self.data(node).parent;
        }
        Ok(())
    }

    /// Run one atomic change unit: `Changing`, `apply`, `Changed`.
    ///
    /// `origin` is where dispatch starts: the container for `Add` and
    /// `Remove`, the sender itself for `Value` and `Name`.
    pub(crate) fn change<R>(
        &mut self,
        origin: Node,
        sender: Node,
        kind: ChangeKind,
        apply: impl FnOnce(&mut Tree) -> R,
    ) -> Result<R> {
        self.notify(
            origin,
            ChangeEvent {
                sender,
                kind,
                phase: Phase::Changing,
            },
        )?;
        let result = apply(self);
        self.notify(
            origin,
            ChangeEvent {
                sender,
                kind,
                phase: Phase::Changed,
            },
        )?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(tree: &mut Tree, node: Node, label: &'static str, log: &Rc<RefCell<Vec<String>>>) {
        let before = Rc::clone(log);
        tree.on_changing(node, move |_, e| {
            before.borrow_mut().push(format!("{label} before {}", e.kind));
            Ok(())
        });
        let after = Rc::clone(log);
        tree.on_changed(node, move |_, e| {
            after.borrow_mut().push(format!("{label} after {}", e.kind));
            Ok(())
        });
    }

    #[test]
    fn dispatch_walks_from_origin_to_root() {
        let mut tree = Tree::new();
        let root = tree.new_element("root").unwrap();
        let middle = tree.new_element("middle").unwrap();
        let leaf = tree.new_element("leaf").unwrap();
        tree.add_child(root, middle).unwrap();
        tree.add_child(middle, leaf).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, root, "root", &log);
        record(&mut tree, middle, "middle", &log);
        record(&mut tree, leaf, "leaf", &log);

        tree.set_name(middle, "renamed").unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "middle before Name",
                "root before Name",
                "middle after Name",
                "root after Name",
            ]
        );
    }

    #[test]
    fn subscribers_on_one_node_run_in_registration_order() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            tree.on_changed(element, move |_, _| {
                log.borrow_mut().push(i);
                Ok(())
            });
        }
        tree.set_attribute_value(element, "a", Some("1")).unwrap();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let id = tree.on_changed(element, move |_, _| {
            *seen.borrow_mut() += 1;
            Ok(())
        });

        tree.set_value(element, "one").unwrap();
        assert!(tree.unsubscribe(id));
        assert!(!tree.unsubscribe(id));
        tree.set_value(element, "two").unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn failing_changing_subscriber_aborts_the_change() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        tree.on_changing(element, |_, _| Err(Error::observer("read only")));

        let err = tree.set_attribute_value(element, "a", Some("1")).unwrap_err();

        assert!(matches!(err, Error::Observer(msg) if msg == "read only"));
        assert_eq!(tree.to_xml(element), "<e />");
    }

    #[test]
    fn failing_changed_subscriber_keeps_the_change() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        let later = Rc::new(RefCell::new(false));
        tree.on_changed(element, |_, _| Err(Error::observer("boom")));
        let flag = Rc::clone(&later);
        tree.on_changed(element, move |_, _| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        assert!(tree.set_attribute_value(element, "a", Some("1")).is_err());
        assert_eq!(tree.to_xml(element), r#"<e a="1" />"#);
        assert!(!*later.borrow(), "dispatch stops at the first failure");
    }

    #[test]
    fn subscribers_see_state_on_each_side_of_the_change() {
        let mut tree = Tree::new();
        let element = tree.new_element("e").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let before = Rc::clone(&log);
        tree.on_changing(element, move |tree, _| {
            before.borrow_mut().push(tree.to_xml(element));
            Ok(())
        });
        let after = Rc::clone(&log);
        tree.on_changed(element, move |tree, _| {
            after.borrow_mut().push(tree.to_xml(element));
            Ok(())
        });

        tree.set_value(element, "v").unwrap();

        assert_eq!(*log.borrow(), vec!["<e />", "<e>v</e>"]);
    }
}
