//! Singly-linked chains of key-value nodes used as buckets by the chained map.

use std::fmt;

/// Link to the next node of a chain
type Link<V> = Option<Box<Node<V>>>;

/// A key-value node of a chain
pub struct Node<V> {
    /// The key of the entry
    pub key: String,
    /// The value associated with the key
    pub value: V,
    /// The following node, if any
    next: Link<V>,
}

/// A singly-linked list of `(key, value)` nodes kept in insertion order.
///
/// The list does not enforce key uniqueness by itself; the chained map checks with
/// [`LinkedList::find_mut`] before inserting. Every walk over the chain is a loop, so
/// inserting, removing, cloning and dropping work on chains of any length.
pub struct LinkedList<V> {
    /// First node of the chain
    head: Link<V>,
    /// Number of nodes in the chain
    len: usize,
}

impl<V> Default for LinkedList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LinkedList<V> {
    /// Creates an empty list
    #[must_use]
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Appends a node at the tail of the list
    pub fn insert(&mut self, key: String, value: V) {
        let mut link = &mut self.head;
        while let Some(node) = link {
            link = &mut node.next;
        }
        *link = Some(Box::new(Node { key, value, next: None }));
        self.len = self.len.saturating_add(1);
    }

    /// Returns the node holding `key`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Node<V>> {
        self.iter_nodes().find(|node| node.key == key)
    }

    /// Returns the node holding `key` mutably
    pub fn find_mut(&mut self, key: &str) -> Option<&mut Node<V>> {
        let mut current = self.head.as_deref_mut();
        while let Some(node) = current {
            if node.key == key {
                return Some(node);
            }
            current = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the node holding `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            link = &mut link.as_mut()?.next;
        }

        let Node { value, next, .. } = *link.take()?;
        *link = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Returns the number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates over the nodes from head to tail
    fn iter_nodes(&self) -> NodeIter<'_, V> {
        NodeIter { next: self.head.as_deref() }
    }

    /// Iterates over `(key, value)` pairs from head to tail
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.iter_nodes().map(|node| (node.key.as_str(), &node.value))
    }

    /// Consumes the list, yielding owned `(key, value)` pairs from head to tail
    pub fn into_pairs(mut self) -> IntoPairs<V> {
        IntoPairs { next: self.head.take() }
    }
}

impl<V: Clone> Clone for LinkedList<V> {
    fn clone(&self) -> Self {
        let mut list = Self::new();
        let mut tail = &mut list.head;
        for node in self.iter_nodes() {
            let copy = tail.insert(Box::new(Node { key: node.key.clone(), value: node.value.clone(), next: None }));
            tail = &mut copy.next;
        }
        list.len = self.len;
        list
    }
}

impl<V: fmt::Debug> fmt::Debug for LinkedList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("key", &self.key).field("value", &self.value).finish_non_exhaustive()
    }
}

/// Unlinks a chain node by node so dropping never recurses
fn drop_chain<V>(mut link: Link<V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

impl<V> Drop for LinkedList<V> {
    fn drop(&mut self) {
        drop_chain(self.head.take());
    }
}

/// Borrowing iterator over the nodes of a [`LinkedList`]
#[derive(Debug)]
struct NodeIter<'a, V> {
    /// The next node to yield
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for NodeIter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

/// Owning iterator over the pairs of a [`LinkedList`]
#[derive(Debug)]
pub struct IntoPairs<V> {
    /// The remaining chain
    next: Link<V>,
}

impl<V> Drop for IntoPairs<V> {
    fn drop(&mut self) {
        drop_chain(self.next.take());
    }
}

impl<V> Iterator for IntoPairs<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.take()?;
        let Node { key, value, next } = *node;
        self.next = next;
        Some((key, value))
    }
}

impl<V: fmt::Display> fmt::Display for LinkedList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(" -> ")?;
            }
            write!(f, "({key}: {value})")?;
            first = false;
        }
        Ok(())
    }
}
