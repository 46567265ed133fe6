use std::any::{Any, TypeId};
use std::rc::Rc;

use ahash::AHashMap;

use crate::arena::{Node, Tree};

/// Typed values attached to a node, at most one per type.
///
/// Values are reference counted so that a clone of a node can share its
/// annotations without requiring `T: Clone`.
#[derive(Clone, Default)]
pub(crate) struct Annotations(AHashMap<TypeId, Rc<dyn Any>>);

impl Annotations {
    fn insert<T: Any>(&mut self, value: T) {
        self.0.insert(TypeId::of::<T>(), Rc::new(value));
    }

    fn get<T: Any>(&self) -> Option<&T> {
        self.0
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).downcast_ref::<T>())
    }

    fn remove<T: Any>(&mut self) -> bool {
        self.0.remove(&TypeId::of::<T>()).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl Tree {
    /// Attach `value` to `node`, replacing any annotation of the same type.
    ///
    /// Annotations are invisible to subscribers: adding or removing one is
    /// not a change of the tree.
    pub fn add_annotation<T: Any>(&mut self, node: Node, value: T) {
        self.data_mut(node).annotations.insert(value);
    }

    /// The annotation of type `T` on `node`, if any
    pub fn annotation<T: Any>(&self, node: Node) -> Option<&T> {
        self.data(node).annotations.get::<T>()
    }

    /// All annotations of type `T` on `node`; yields at most one value
    pub fn annotations_of_type<T: Any>(&self, node: Node) -> impl Iterator<Item = &T> + '_ {
        self.annotation::<T>(node).into_iter()
    }

    /// Number of annotations of any type on `node`
    pub fn annotation_count(&self, node: Node) -> usize {
        self.data(node).annotations.len()
    }

    /// Drop the annotation of type `T` from `node`, returning whether one existed
    pub fn remove_annotations_of_type<T: Any>(&mut self, node: Node) -> bool {
        self.data_mut(node).annotations.remove::<T>()
    }
}
