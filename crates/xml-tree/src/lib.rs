//! A mutable XML tree that reports every change.
//!
//! All nodes live in a [`Tree`] arena and are addressed through the
//! lightweight [`Node`] handle. Nodes are created detached and are put
//! into place with the mutation operations on [`Tree`]
//! ([`Tree::add_child`], [`Tree::set_value`],
//! [`Tree::set_attribute_value`], ...).
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use xml_tree::{ChangeKind, Tree};
//!
//! let mut tree = Tree::new();
//! let parent = tree.new_element("parent")?;
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//! tree.on_changed(parent, move |_tree, event| {
//!     log.borrow_mut().push(event.kind);
//!     Ok(())
//! });
//!
//! tree.set_attribute_value(parent, "id", Some("1"))?;
//! tree.set_child_element_value(parent, "child", Some("text"))?;
//!
//! assert_eq!(tree.to_xml(parent), r#"<parent id="1"><child>text</child></parent>"#);
//! assert_eq!(*seen.borrow(), vec![ChangeKind::Add, ChangeKind::Add]);
//! # Ok::<(), xml_tree::Error>(())
//! ```
//!
//! ## Attaching
//!
//! A node has at most one parent. Adding a node that already has a parent,
//! or adding a tree below itself, attaches a deep copy instead and leaves
//! the original where it was. The mutation operations return the node that
//! was actually inserted.
//!
//! ## Reclaiming nodes
//!
//! Removing a node detaches it but keeps it alive, so it can be attached
//! again. [`Tree::prune`] reclaims a detached subtree for good. Text nodes
//! replaced by [`Tree::set_value`] and attributes removed by
//! [`Tree::set_attribute_value`] are reclaimed right away. A handle to a
//! reclaimed node is stale; [`Tree::contains`] tells the two apart.
//!
//! ## Notifications
//!
//! Every atomic change is bracketed by a [`Phase::Changing`] and a
//! [`Phase::Changed`] event. Subscribers registered with
//! [`Tree::on_changing`] and [`Tree::on_changed`] on a node see the changes
//! made to that node and to everything below it. Callbacks get a shared
//! reference to the tree, so they can inspect it but never mutate it in the
//! middle of a change.

mod access;
mod annotation;
mod arena;
mod engine;
mod error;
mod event;
pub mod fixed;
mod mutation;
mod name;
mod serialize;

pub use arena::{Node, Tree};
pub use error::{Error, Result};
pub use event::{ChangeEvent, ChangeKind, Phase, SubscriptionId};
pub use fixed::Fixed;
pub use name::validate_name;

pub use xml_engine_traits::{NodeType, SchemaInfo, Validity};
