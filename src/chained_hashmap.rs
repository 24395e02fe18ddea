use std::{fmt, mem};

use tracing::debug;

use crate::{
    dynamic_array::DynamicArray,
    hash_fn::{CharSumHash, HashFn, bucket_index},
    linked_list::LinkedList,
    prime::{next_prime, prime_at_least},
};

/// Load factor at which `put` grows the table before inserting
pub const CHAINED_LOAD_LIMIT: f64 = 1.0;

/// Capacity used by [`Default`], matching the usual textbook starting size
const DEFAULT_CAPACITY: usize = 11;

/// A hash map resolving collisions by separate chaining.
///
/// Every bucket owns a singly-linked chain of entries. The bucket count is always prime and
/// the table doubles (rounded up to the next prime) once the load factor reaches
/// [`CHAINED_LOAD_LIMIT`].
///
/// Note: This implementation is not thread-safe, and iterating while mutating is not supported.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<V, H = CharSumHash> {
    /// One chain per bucket
    buckets: DynamicArray<LinkedList<V>>,
    /// Number of live entries across all chains
    size: usize,
    /// Number of buckets, always prime
    capacity: usize,
    /// Injected hash function
    hash_fn: H,
}

impl<V, H> Default for ChainedHashMap<V, H>
where
    H: HashFn + Default,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, H::default())
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<V, H>
where
    K: Into<String>,
    H: HashFn,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V, H> ChainedHashMap<V, H>
where
    H: HashFn,
{
    /// Creates a map with at least `capacity` buckets, rounded up to the next prime
    pub fn new(capacity: usize, hash_fn: H) -> Self {
        let capacity = next_prime(capacity);
        Self {
            buckets: DynamicArray::filled_with(capacity, LinkedList::new),
            size: 0,
            capacity,
            hash_fn,
        }
    }

    /// Computes the bucket a key belongs to under the current capacity
    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(self.hash_fn.hash(key), self.capacity)
    }

    /// Inserts or updates a key-value pair
    ///
    /// Grows the table first if the load factor has reached [`CHAINED_LOAD_LIMIT`]. An existing
    /// key keeps its position in its chain and only has its value replaced.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) {
        if self.table_load() >= CHAINED_LOAD_LIMIT {
            self.resize_table(self.capacity.saturating_mul(2));
        }

        let key = key.into();
        let index = self.bucket_of(&key);
        let Ok(bucket) = self.buckets.get_mut(index) else { return };

        if let Some(node) = bucket.find_mut(&key) {
            node.value = value;
            return;
        }

        bucket.insert(key, value);
        self.size = self.size.saturating_add(1);
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let bucket = self.buckets.get(self.bucket_of(key)).ok()?;
        bucket.find(key).map(|node| &node.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        let bucket = self.buckets.get_mut(index).ok()?;
        bucket.find_mut(key).map(|node| &mut node.value)
    }

    /// Returns true if the map contains `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` and returns its value; missing keys leave the map untouched
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        let removed = self.buckets.get_mut(index).ok()?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `new_capacity` buckets, rounded up to a prime.
    ///
    /// Does nothing when `new_capacity` is zero. If the requested capacity would leave the
    /// load factor above 1.0, it keeps doubling (and re-priming) until the entries fit.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }

        let mut capacity = prime_at_least(new_capacity);
        while self.size > capacity {
            capacity = next_prime(capacity.saturating_mul(2));
        }

        debug!(
            old_capacity = self.capacity,
            new_capacity = capacity,
            size = self.size,
            "resizing chained hash map"
        );

        let old_buckets =
            mem::replace(&mut self.buckets, DynamicArray::filled_with(capacity, LinkedList::new));
        self.capacity = capacity;

        for (key, value) in old_buckets.into_iter().flat_map(LinkedList::into_pairs) {
            let index = self.bucket_of(&key);
            if let Ok(bucket) = self.buckets.get_mut(index) {
                bucket.insert(key, value);
            }
        }
    }

    /// Returns the current load factor (entries per bucket)
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity as f64
    }

    /// Counts the buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_empty()).count()
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every entry while keeping the current capacity
    pub fn clear(&mut self) {
        debug!(capacity = self.capacity, size = self.size, "clearing chained hash map");
        self.buckets = DynamicArray::filled_with(self.capacity, LinkedList::new);
        self.size = 0;
    }

    /// Iterates over entries bucket by bucket, following each chain from head to tail
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets.iter().flat_map(|bucket| bucket.iter())
    }
}

impl<V, H> ChainedHashMap<V, H>
where
    V: Clone,
    H: HashFn,
{
    /// Collects every entry as an owned `(key, value)` pair, in [`ChainedHashMap::iter`] order
    #[must_use]
    pub fn get_keys_and_values(&self) -> DynamicArray<(String, V)> {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }
}

impl<V: fmt::Display, H> fmt::Display for ChainedHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {bucket}")?;
        }
        Ok(())
    }
}
