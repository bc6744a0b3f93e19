//! Access-ordered key/value store
//!
//! Nodes live in a slab (`Vec<Option<Node>>`) and are chained into a
//! doubly-linked list by index, so promoting a key to the most-recently-used
//! end and peeking the least-recently-used one are both O(1).
//!
//! The store has no locking and no size logic; the cache controller
//! serializes all access.

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use ahash::RandomState;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    /// Towards the most-recently-used end
    prev: Option<usize>,
    /// Towards the least-recently-used end
    next: Option<usize>,
}

/// Map whose iteration order is access order
pub(crate) struct RecencyStore<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    /// Most recently used
    head: Option<usize>,
    /// Least recently used
    tail: Option<usize>,
    free_list: Vec<usize>,
}

impl<K, V> RecencyStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
        }
    }

    /// Place `key` at the MRU end, returning the value it replaced
    pub fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            let previous = self.nodes[idx]
                .as_mut()
                .map(|node| mem::replace(&mut node.value, value));
            self.move_to_front(idx);
            return previous;
        }

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        None
    }

    /// Look up `key` and move it to the MRU end
    pub fn touch(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Look up `key` without changing its position
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Remove `key`, returning its value
    pub fn remove_entry(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.free_node(idx);
        self.nodes[idx].take().map(|node| node.value)
    }

    /// The least-recently-used entry, left in place
    pub fn oldest(&self) -> Option<(&K, &V)> {
        let idx = self.tail?;
        self.nodes[idx].as_ref().map(|node| (&node.key, &node.value))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Copy of every entry, least recently used first
    pub fn ordered_snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let mut entries = Vec::with_capacity(self.len());
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            match &self.nodes[idx] {
                Some(node) => {
                    entries.push((node.key.clone(), node.value.clone()));
                    cursor = node.prev;
                }
                None => break,
            }
        }
        entries
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}
