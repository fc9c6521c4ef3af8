//! Intrusive doubly linked list backed by `SlotArena`.
//!
//! Nodes live in a `SlotArena` and are linked by `SlotId`, so a handle stays
//! valid while its node is in the list and promotion never moves data.
//!
//! ## Layout
//!
//! ```text
//!   slots:  0            1            2            3 (free)
//!         ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐
//!         │ "x"      │ │ "y"      │ │ "z"      │ │          │
//!         │ prev: 2  │ │ prev: -  │ │ prev: 1  │ │          │
//!         │ next: -  │ │ next: 2  │ │ next: 0  │ │          │
//!         └──────────┘ └──────────┘ └──────────┘ └──────────┘
//!
//!   head = 1 (most recent)          tail = 0 (next to go)
//! ```
//!
//! Slot order says nothing about list order; freed slots are reused by the
//! next push.
//!
//! ## Performance
//! - `push_front` / `pop_back` / `remove`: O(1)
//! - `move_to_front`: O(1)
//! - `iter`: O(n)

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Recency list: values in arena slots, linked front (newest) to back (oldest).
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the value at the back (LRU) of the list.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Returns an iterator from front to back.
    pub fn iter(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator of SlotIds from front to back.
    pub fn iter_ids(&self) -> IntrusiveListIdIter<'_, T> {
        IntrusiveListIdIter {
            list: self,
            current: self.head,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Mutable access to every value in storage order, not list order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.arena.iter_mut().map(|(_, node)| &mut node.value)
    }

    /// Inserts a new node at the front and returns its `SlotId`.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|head| self.arena.get_mut(head)) {
            Some(old_head) => old_head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Removes the back node, returning the slot it occupied and its value.
    pub fn pop_back(&mut self) -> Option<(SlotId, T)> {
        let id = self.tail?;
        self.remove(id).map(|value| (id, value))
    }

    /// Removes the node `id` from the list and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front; returns `false` if `id` is not present.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Clears the list and frees all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev.and_then(|prev_id| self.arena.get_mut(prev_id)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }

        match next.and_then(|next_id| self.arena.get_mut(next_id)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, id: SlotId) -> Option<()> {
        let old_head = self.head;
        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = old_head;

        match old_head.and_then(|head| self.arena.get_mut(head)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        Some(())
    }

    /// Walks the list from head to tail and verifies every back link,
    /// the tail pointer and the node count.
    pub fn check_links(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() || !self.is_empty() {
                return Err(InvariantError::new(format!(
                    "list of {} nodes has head {:?} and tail {:?}",
                    self.len(),
                    self.head,
                    self.tail
                )));
            }
            return Ok(());
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("stale SlotId {:?} in list", id)))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "node {:?} has prev {:?}, expected {:?}",
                    id, node.prev, prev
                )));
            }
            if node.next.is_none() && self.tail != Some(id) {
                return Err(InvariantError::new(format!(
                    "last reachable node {:?} is not the tail {:?}",
                    id, self.tail
                )));
            }

            count += 1;
            if count > self.len() {
                return Err(InvariantError::new("cycle detected in list"));
            }
            prev = Some(id);
            current = node.next;
        }

        if count != self.len() {
            return Err(InvariantError::new(format!(
                "walked {} nodes but arena holds {}",
                count,
                self.len()
            )));
        }
        Ok(())
    }
}

pub struct IntrusiveListIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IntrusiveListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over SlotIds from front to back.
pub struct IntrusiveListIdIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IntrusiveListIdIter<'a, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(id)
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Copy>(list: &IntrusiveList<T>) -> Vec<T> {
        list.iter().copied().collect()
    }

    #[test]
    fn push_front_orders_newest_first() {
        let mut list = IntrusiveList::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(values(&list), vec![3, 2, 1]);
        assert_eq!(list.iter().next(), Some(&3));
        assert_eq!(list.back(), Some(&1));
        list.check_links().unwrap();
    }

    #[test]
    fn move_to_front_from_middle_and_tail() {
        let mut list = IntrusiveList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        list.push_front("c");
        // c, b, a

        assert!(list.move_to_front(b));
        assert_eq!(values(&list), vec!["b", "c", "a"]);

        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec!["a", "b", "c"]);
        assert_eq!(list.back(), Some(&"c"));

        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec!["a", "b", "c"]);
        list.check_links().unwrap();
    }

    #[test]
    fn remove_middle_and_ends() {
        let mut list = IntrusiveList::new();
        let c = list.push_front("c");
        let b = list.push_front("b");
        let a = list.push_front("a");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(values(&list), vec!["a", "c"]);

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(values(&list), vec!["c"]);
        assert_eq!(list.back(), Some(&"c"));

        assert_eq!(list.remove(c), Some("c"));
        assert!(list.is_empty());
        assert_eq!(list.back(), None);
        assert!(list.get(a).is_none());
        list.check_links().unwrap();
    }

    #[test]
    fn pop_back_drains_oldest_first() {
        let mut list = IntrusiveList::new();
        let ids: Vec<_> = (0..4).map(|i| list.push_front(i)).collect();
        for (i, id) in (0..4).zip(ids) {
            assert_eq!(list.pop_back(), Some((id, i)));
        }
        assert_eq!(list.pop_back(), None);
        list.check_links().unwrap();
    }

    #[test]
    fn stale_id_operations_are_rejected() {
        let mut list = IntrusiveList::new();
        let a = list.push_front(1);
        list.remove(a);
        assert!(!list.move_to_front(a));
        assert_eq!(list.remove(a), None);
        assert!(list.get(a).is_none());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut list = IntrusiveList::new();
        let id = list.push_front(10);
        list.push_front(20);
        if let Some(value) = list.get_mut(id) {
            *value = 11;
        }
        assert_eq!(values(&list), vec![20, 11]);
    }

    #[test]
    fn values_mut_reaches_every_node() {
        let mut list = IntrusiveList::new();
        list.push_front(1);
        let mid = list.push_front(2);
        list.push_front(3);
        list.remove(mid);
        for value in list.values_mut() {
            *value += 100;
        }
        assert_eq!(values(&list), vec![103, 101]);
    }

    #[test]
    fn id_iter_matches_value_iter() {
        let mut list = IntrusiveList::new();
        let a = list.push_front('a');
        let b = list.push_front('b');
        let ids: Vec<_> = list.iter_ids().collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn clear_resets_state() {
        let mut list = IntrusiveList::with_capacity(8);
        list.push_front(1);
        list.push_front(2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter_ids().next(), None);
        assert_eq!(list.pop_back(), None);
        list.check_links().unwrap();
    }
}
