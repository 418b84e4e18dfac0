//! Recency list: intrusive doubly-linked list of (key, value) nodes
//!
//! Nodes live in an arena and link to each other by index, so splicing a node
//! out or moving it to the front is O(1) and never reallocates. Handles
//! ([`NodeId`]) carry the id of the list that issued them and the generation
//! of their slot, which makes a handle from another list, or one whose node
//! has been removed, harmless: operations on it report absence instead of
//! touching a reused slot.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a node in a [`RecencyList`]
///
/// Only the list itself creates handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    list: u64,
    index: usize,
    generation: u64,
}

/// Node in the doubly-linked list
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<K, V> {
    generation: u64,
    node: Option<Node<K, V>>,
}

/// Doubly-linked list ordered from most recently used (head) to least
/// recently used (tail)
#[derive(Debug)]
pub struct RecencyList<K, V> {
    id: u64,
    slots: Vec<Slot<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Link a new node at the head and return its handle
    pub fn push_front(&mut self, key: K, value: V) -> NodeId {
        let idx = self.alloc_node(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        self.id_of(idx)
    }

    /// Splice a node out of the list and hand back its entry
    ///
    /// Returns `None` if `id` does not refer to a live node of this list.
    pub fn remove(&mut self, id: NodeId) -> Option<(K, V)> {
        let idx = self.resolve(id)?;
        self.unlink(idx);
        let slot = &mut self.slots[idx];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    /// Move a node to the head without reallocating it
    ///
    /// Returns `false` if `id` is stale.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        let Some(idx) = self.resolve(id) else {
            return false;
        };
        if self.head == Some(idx) {
            return true; // Already at front
        }
        self.unlink(idx);
        self.link_front(idx);
        true
    }

    /// Remove the tail (least recently used) node
    pub fn remove_last(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.remove(self.id_of(idx))
    }

    /// Check whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Borrow the entry behind `id`
    pub fn get(&self, id: NodeId) -> Option<(&K, &V)> {
        let idx = self.resolve(id)?;
        self.node(idx).map(|node| (&node.key, &node.value))
    }

    /// Mutably borrow the value behind `id`
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut V> {
        let idx = self.resolve(id)?;
        self.slots[idx].node.as_mut().map(|node| &mut node.value)
    }

    /// Handle of the head node
    pub fn front_id(&self) -> Option<NodeId> {
        self.head.map(|idx| self.id_of(idx))
    }

    /// Handle of the tail node
    pub fn back_id(&self) -> Option<NodeId> {
        self.tail.map(|idx| self.id_of(idx))
    }

    /// Entry at the head (most recently used)
    pub fn front(&self) -> Option<(&K, &V)> {
        self.head
            .and_then(|idx| self.node(idx))
            .map(|node| (&node.key, &node.value))
    }

    /// Entry at the tail (least recently used)
    pub fn back(&self) -> Option<(&K, &V)> {
        self.tail
            .and_then(|idx| self.node(idx))
            .map(|node| (&node.key, &node.value))
    }

    /// Iterate entries from head to tail
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Drop every node
    ///
    /// Slots are kept for reuse, but every outstanding handle goes stale.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list = (0..self.slots.len()).rev().collect();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn resolve(&self, id: NodeId) -> Option<usize> {
        if id.list != self.id {
            return None;
        }
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }

    fn id_of(&self, idx: usize) -> NodeId {
        NodeId {
            list: self.id,
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(|slot| slot.node.as_mut())
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.node_mut(head_idx) {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].node = Some(node);
            idx
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    /// Walk the list both ways and check the links agree with `len`
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.len == 0 {
            if self.head.is_some() || self.tail.is_some() {
                return Err("empty list has an endpoint".to_string());
            }
            return Ok(());
        }

        let head = self.head.ok_or("non-empty list has no head")?;
        let tail = self.tail.ok_or("non-empty list has no tail")?;
        if self.node(head).and_then(|n| n.prev).is_some() {
            return Err("head has a prev link".to_string());
        }
        if self.node(tail).and_then(|n| n.next).is_some() {
            return Err("tail has a next link".to_string());
        }

        let mut count = 0;
        let mut prev = None;
        let mut cursor = Some(head);
        while let Some(idx) = cursor {
            let node = self.node(idx).ok_or("link to a free slot")?;
            if node.prev != prev {
                return Err(format!("node {idx} has a broken prev link"));
            }
            count += 1;
            if count > self.len {
                return Err("cycle in next links".to_string());
            }
            prev = Some(idx);
            cursor = node.next;
        }
        if prev != Some(tail) {
            return Err("forward walk does not end at tail".to_string());
        }
        if count != self.len {
            return Err(format!("walked {count} nodes, len is {}", self.len));
        }
        Ok(())
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
