//! Persistent bundle chain.
//!
//! A bundle is a singly-linked list of nodes. The handle points at the
//! newest node and every node points back at its predecessor, so extending
//! only allocates one node and never touches the existing chain. Nodes are
//! reference counted: a sub-bundle nested in several outer bundles is shared,
//! not copied.

use std::fmt;
use std::sync::Arc;

use crate::resolver::Resolver;
use crate::{BundleOption, StructuralError};

/// One entry of a bundle: a plain option or a previously built bundle.
pub enum Item<O> {
    /// A single option.
    Opt(O),
    /// A nested bundle, expanded in place when flattened.
    Bundle(Bundle<O>),
}

impl<O: Clone> Clone for Item<O> {
    fn clone(&self) -> Self {
        match self {
            Item::Opt(opt) => Item::Opt(opt.clone()),
            Item::Bundle(bundle) => Item::Bundle(bundle.clone()),
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for Item<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Opt(opt) => f.debug_tuple("Opt").field(opt).finish(),
            Item::Bundle(bundle) => f.debug_tuple("Bundle").field(bundle).finish(),
        }
    }
}

impl<O> From<Bundle<O>> for Item<O> {
    fn from(bundle: Bundle<O>) -> Self {
        Item::Bundle(bundle)
    }
}

impl<O> From<&Bundle<O>> for Item<O> {
    fn from(bundle: &Bundle<O>) -> Self {
        Item::Bundle(bundle.clone())
    }
}

pub(crate) struct Node<O> {
    pub(crate) item: Item<O>,
    pub(crate) prev: Option<Arc<Node<O>>>,
}

// Unlink predecessors one at a time so releasing a long chain does not
// recurse once per node. Stops at the first node another handle still holds.
impl<O> Drop for Node<O> {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(node) = prev {
            prev = match Arc::into_inner(node) {
                Some(mut node) => node.prev.take(),
                None => None,
            };
        }
    }
}

/// Immutable, composable aggregate of options and nested bundles.
///
/// Cloning a bundle clones the handle only; both handles share the chain.
pub struct Bundle<O> {
    head: Option<Arc<Node<O>>>,
    len: usize,
}

impl<O> Bundle<O> {
    /// Create an empty bundle. Flattening it yields no options.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Build a bundle by linking each item, in the order given.
    pub fn from_items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item<O>>,
    {
        items
            .into_iter()
            .fold(Self::new(), |bundle, item| bundle.extend(item))
    }

    /// Return a new bundle with `item` placed after everything in `self`.
    ///
    /// `self` is left untouched and stays valid.
    #[must_use]
    pub fn extend(&self, item: impl Into<Item<O>>) -> Self {
        let node = Node {
            item: item.into(),
            prev: self.head.clone(),
        };
        Self {
            head: Some(Arc::new(node)),
            len: self.len + 1,
        }
    }

    /// Number of direct items on the chain. A nested bundle counts once.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Direct items in the order they were added. Nested bundles are not
    /// expanded.
    pub fn items(&self) -> Items<'_, O> {
        Items {
            inner: self.chain().into_iter().rev(),
        }
    }

    /// Whether both handles point at the same chain head.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Nodes from newest to oldest.
    pub(crate) fn chain(&self) -> Vec<&Item<O>> {
        let mut nodes = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            nodes.push(&node.item);
            cursor = node.prev.as_deref();
        }
        nodes
    }

    pub(crate) fn head_ptr(&self) -> Option<*const Node<O>> {
        self.head.as_ref().map(Arc::as_ptr)
    }
}

impl<O: BundleOption> Bundle<O> {
    /// Flatten with the default [`Resolver`].
    pub fn flatten(&self, dedup: bool) -> Result<Vec<O>, StructuralError> {
        Resolver::default().flatten(self, dedup)
    }
}

impl<O> Default for Bundle<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for Bundle<O> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for Bundle<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items()).finish()
    }
}

impl<O> FromIterator<Item<O>> for Bundle<O> {
    fn from_iter<I: IntoIterator<Item = Item<O>>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

/// Iterator over the direct items of a bundle, oldest first.
pub struct Items<'a, O> {
    inner: std::iter::Rev<std::vec::IntoIter<&'a Item<O>>>,
}

impl<'a, O> Iterator for Items<'a, O> {
    type Item = &'a Item<O>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<O> ExactSizeIterator for Items<'_, O> {}
