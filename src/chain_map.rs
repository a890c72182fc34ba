//! ChainHashMap: separate-chaining table over a prime-sized bucket array.
//!
//! Structure:
//! - `buckets` is a plain `Vec` of optional chain heads; its length is the
//!   table capacity and the whole array is replaced on growth.
//! - Nodes live in a `SlotMap` arena and link to each other by slot key,
//!   so chains are singly linked without per-node boxes and teardown never
//!   recurses down a chain.
//! - `len()` is the arena length; every live slot is linked into exactly
//!   one chain.
//!
//! Growth doubles the capacity and advances it to the next prime (see
//! `prime`), then relinks every node into the new heads. The load check
//! runs before the pending insert is counted, so a table at capacity 7
//! grows on the insert that finds `len == 7`, not the one that produces it.

use crate::mix::MixHash;
use crate::prime::{is_prime, next_prime_capacity};
use core::mem;
use slotmap::{DefaultKey, SlotMap};

/// Buckets at or above this occupancy percentage trigger growth.
const FILL_FACTOR_PCT: usize = 90;

/// Default number of buckets for an empty table.
const INITIAL_CAPACITY: usize = 7;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Mix of `key`, computed once at insert; rehash reuses it so `mix`
    /// never runs again for a stored node.
    hash: u64,
    next: Option<DefaultKey>,
}

/// A map from integer-like keys to values, resolving collisions with LIFO
/// chains and growing through prime capacities.
///
/// Keys need `MixHash + Eq`; mixing selects the bucket, `Eq` decides
/// matches. All operations are average O(1) under uniform mixing and
/// O(chain) in the worst case. The table never shrinks.
#[derive(Debug)]
pub struct ChainHashMap<K, V> {
    buckets: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node<K, V>>, // storage using generational keys
}

impl<K, V> ChainHashMap<K, V>
where
    K: MixHash + Eq,
{
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a table with `capacity` buckets (clamped to at least 1).
    /// The capacity is used as given; only grown capacities are primes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity.max(1)],
            nodes: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, key: &K) -> usize {
        (key.mix() % self.buckets.len() as u64) as usize
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let mut cursor = self.buckets[self.bucket_index(key)];
        while let Some(node_key) = cursor {
            let node = &self.nodes[node_key];
            if node.key == *key {
                return Some(&node.value);
            }
            cursor = node.next;
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert `value` under `key`. An existing key has its value replaced
    /// in place (the node keeps its chain position) and the previous value
    /// is returned; a new key is linked at the head of its chain.
    ///
    /// May grow the table first: the load check uses the size before this
    /// insert is counted.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.nodes.len() * 100 / self.buckets.len() >= FILL_FACTOR_PCT {
            self.grow();
        }

        let hash = key.mix();
        let index = (hash % self.buckets.len() as u64) as usize;

        let mut cursor = self.buckets[index];
        while let Some(node_key) = cursor {
            let node = &mut self.nodes[node_key];
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
            cursor = node.next;
        }

        let node_key = self.nodes.insert(Node {
            key,
            value,
            hash,
            next: self.buckets[index],
        });
        self.buckets[index] = Some(node_key);
        None
    }

    /// Remove `key`'s entry and return its value, or `None` if absent.
    /// Never shrinks the bucket array.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];

        while let Some(node_key) = cursor {
            if self.nodes[node_key].key == *key {
                let next = self.nodes[node_key].next;
                match prev {
                    Some(prev_key) => self.nodes[prev_key].next = next,
                    None => self.buckets[index] = next,
                }
                let node = self
                    .nodes
                    .remove(node_key)
                    .expect("chained slot key is live");
                return Some(node.value);
            }
            prev = cursor;
            cursor = self.nodes[node_key].next;
        }
        None
    }

    /// Replace the bucket array with one of the next prime capacity and
    /// relink every node. Chains are walked head to tail and nodes pushed
    /// onto their new heads, which reverses relative order within a chain;
    /// nodes themselves stay in place in the arena.
    fn grow(&mut self) {
        let new_capacity = next_prime_capacity(self.buckets.len());
        debug_assert!(is_prime(new_capacity));

        let old_heads = mem::replace(&mut self.buckets, vec![None; new_capacity]);
        for head in old_heads {
            let mut cursor = head;
            while let Some(node_key) = cursor {
                let next = self.nodes[node_key].next;
                let index = (self.nodes[node_key].hash % new_capacity as u64) as usize;
                self.nodes[node_key].next = self.buckets[index];
                self.buckets[index] = Some(node_key);
                cursor = next;
            }
        }
    }

    /// Count nodes reachable through the buckets. Equals `len()` whenever
    /// the structure is consistent; test-only.
    #[cfg(test)]
    pub(crate) fn linked_len(&self) -> usize {
        let mut count = 0;
        for head in &self.buckets {
            let mut cursor = *head;
            while let Some(node_key) = cursor {
                count += 1;
                cursor = self.nodes[node_key].next;
            }
        }
        count
    }
}

impl<K, V> Default for ChainHashMap<K, V>
where
    K: MixHash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two distinct i64 keys whose mixes share a bucket at `capacity`.
    fn colliding_pair(capacity: usize) -> (i64, i64) {
        let target = 0i64.mix() % capacity as u64;
        let other = (1i64..)
            .find(|k| k.mix() % capacity as u64 == target)
            .unwrap();
        (0, other)
    }

    /// Invariant: a chain is LIFO; the most recently inserted colliding
    /// key sits at the head and is found without touching the older node.
    #[test]
    fn colliding_keys_chain_lifo() {
        let mut m: ChainHashMap<i64, &str> = ChainHashMap::with_capacity(7);
        let (first, second) = colliding_pair(7);

        m.insert(first, "first");
        m.insert(second, "second");
        assert_eq!(m.len(), 2);

        let index = m.bucket_index(&first);
        assert_eq!(index, m.bucket_index(&second));

        // Head is the later insert; its next is the earlier one.
        let head = m.buckets[index].expect("chain populated");
        assert_eq!(m.nodes[head].key, second);
        let tail = m.nodes[head].next.expect("older node linked behind head");
        assert_eq!(m.nodes[tail].key, first);
        assert_eq!(m.nodes[tail].next, None);
    }

    /// Invariant: upsert rewrites the value in place without relocating
    /// the node within its chain.
    #[test]
    fn upsert_keeps_chain_position() {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(7);
        let (first, second) = colliding_pair(7);

        m.insert(first, 1);
        m.insert(second, 2);
        assert_eq!(m.insert(first, 10), Some(1));

        let index = m.bucket_index(&first);
        let head = m.buckets[index].unwrap();
        assert_eq!(m.nodes[head].key, second, "head unchanged by upsert");
        assert_eq!(m.get(&first), Some(&10));
        assert_eq!(m.len(), 2);
    }

    /// Invariant: removing a middle or head node relinks its neighbors.
    #[test]
    fn remove_relinks_chain() {
        // Capacity large enough that three colliding inserts stay under
        // the load check and the chain is purely collision-made.
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(100);
        let target = 0i64.mix() % 100;
        let chain: Vec<i64> = (0i64..)
            .filter(|k| k.mix() % 100 == target)
            .take(3)
            .collect();
        for &k in &chain {
            m.insert(k, k * 10);
        }

        // Remove the middle of the three (second inserted).
        assert_eq!(m.remove(&chain[1]), Some(chain[1] * 10));
        assert_eq!(m.len(), 2);
        assert_eq!(m.linked_len(), 2);
        assert_eq!(m.get(&chain[0]), Some(&(chain[0] * 10)));
        assert_eq!(m.get(&chain[2]), Some(&(chain[2] * 10)));

        // Remove the head, then the last.
        assert_eq!(m.remove(&chain[2]), Some(chain[2] * 10));
        assert_eq!(m.remove(&chain[0]), Some(chain[0] * 10));
        assert!(m.is_empty());
        assert_eq!(m.linked_len(), 0);
    }

    /// Invariant: growth fires on the insert that observes `len == capacity
    /// * 90%`, one insert later than a post-insert check would fire.
    #[test]
    fn growth_timing_matches_pre_insert_check() {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(7);
        for k in 1..=7 {
            m.insert(k, k);
        }
        // Seventh insert saw 6*100/7 == 85 < 90: still at capacity 7.
        assert_eq!(m.len(), 7);
        assert_eq!(m.capacity(), 7);

        // Eighth insert sees 100 >= 90 and grows to the next prime >= 14.
        m.insert(8, 8);
        assert_eq!(m.capacity(), 17);
        assert_eq!(m.len(), 8);
        for k in 1..=8 {
            assert_eq!(m.get(&k), Some(&k));
        }
    }

    /// Invariant: every node survives growth, relinked against the new
    /// capacity, and the buckets stay consistent with the arena.
    #[test]
    fn growth_relinks_every_node() {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(7);
        for k in 0..200 {
            m.insert(k, -k);
        }
        assert!(m.capacity() > 7);
        assert!(is_prime(m.capacity()));
        assert_eq!(m.len(), 200);
        assert_eq!(m.linked_len(), 200);
        for k in 0..200 {
            assert_eq!(m.get(&k), Some(&-k));
        }
    }

    #[test]
    fn tiny_capacities_grow_through_primes() {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(1);
        for k in 0..50 {
            m.insert(k, k);
        }
        assert!(is_prime(m.capacity()));
        assert_eq!(m.len(), 50);
        for k in 0..50 {
            assert_eq!(m.get(&k), Some(&k));
        }
    }

    #[test]
    fn zero_capacity_request_clamps_to_one() {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::with_capacity(0);
        assert_eq!(m.capacity(), 1);
        assert_eq!(m.insert(5, 50), None);
        assert_eq!(m.get(&5), Some(&50));
    }
}
