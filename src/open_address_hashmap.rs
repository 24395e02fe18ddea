use std::{fmt, iter::FusedIterator, mem};

use tracing::{debug, trace, warn};

use crate::{
    dynamic_array::DynamicArray,
    hash_fn::{CharSumHash, HashFn, bucket_index},
    prime::{next_prime, prime_at_least},
};

/// Load factor at which `put` grows the table before inserting
pub const OPEN_ADDRESS_LOAD_LIMIT: f64 = 0.5;

/// Capacity used by [`Default`]
const DEFAULT_CAPACITY: usize = 11;

/// A key-value pair stored in a single slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HashEntry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// The state of one slot of the table
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<V> {
    /// Never held an entry since the last rebuild; ends every probe sequence
    Empty,
    /// Holds a live entry
    Occupied(HashEntry<V>),
    /// Held the given key until it was removed; probes continue past it
    Tombstone(String),
}

impl<V> Slot<V> {
    /// Turns an occupied slot into a tombstone and returns the evicted value
    fn bury(&mut self) -> Option<V> {
        match mem::replace(self, Self::Empty) {
            Self::Occupied(HashEntry { key, value }) => {
                *self = Self::Tombstone(key);
                Some(value)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Returns true for slots that can take a new entry
    fn is_vacant(&self) -> bool {
        !matches!(self, Self::Occupied(_))
    }
}

/// Quadratic probe sequence: `start, start + 1, start + 4, start + 9, ...` modulo capacity.
///
/// Successive offsets grow by the odd numbers 1, 3, 5, ..., so the `i`-th index is
/// `start + i²`. Yields at most `capacity` indices.
#[derive(Debug, Clone)]
struct QuadraticProbe {
    /// Next index to yield
    index: usize,
    /// Distance to the index after that
    addend: usize,
    /// Table size the indices wrap around
    capacity: usize,
    /// Indices left before the sequence ends
    remaining: usize,
}

impl QuadraticProbe {
    /// Starts a probe sequence at `start` over a table of `capacity` slots
    fn new(start: usize, capacity: usize) -> Self {
        Self { index: start, addend: 1, capacity, remaining: capacity }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.index;
        // `remaining > 0` implies `capacity > 0`
        self.index = self.index.saturating_add(self.addend % self.capacity) % self.capacity;
        self.addend = self.addend.saturating_add(2);
        Some(current)
    }
}

/// A hash map resolving collisions by open addressing with quadratic probing.
///
/// Each slot holds at most one entry. Removal leaves a tombstone so that probe sequences
/// passing through the slot still reach keys stored further along; tombstones are only
/// cleared by [`OpenAddressHashMap::resize_table`] and [`OpenAddressHashMap::clear`].
/// The table grows (to the next prime at or above double its size) once the load factor
/// reaches [`OPEN_ADDRESS_LOAD_LIMIT`], so there is always a free slot on every probe path.
///
/// Note: This implementation is not thread-safe, and iterating while mutating is not supported.
#[derive(Debug, Clone)]
pub struct OpenAddressHashMap<V, H = CharSumHash> {
    /// The slots of the table
    buckets: DynamicArray<Slot<V>>,
    /// Number of live (non-tombstone) entries
    size: usize,
    /// Number of slots, always prime
    capacity: usize,
    /// Injected hash function
    hash_fn: H,
}

impl<V, H> Default for OpenAddressHashMap<V, H>
where
    H: HashFn + Default,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, H::default())
    }
}

impl<K, V, H> Extend<(K, V)> for OpenAddressHashMap<V, H>
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

impl<V, H> OpenAddressHashMap<V, H>
where
    H: HashFn,
{
    /// Creates a map with at least `capacity` slots, rounded up to the next prime
    pub fn new(capacity: usize, hash_fn: H) -> Self {
        let capacity = next_prime(capacity);
        Self { buckets: DynamicArray::filled_with(capacity, || Slot::Empty), size: 0, capacity, hash_fn }
    }

    /// Returns the probe sequence for `key` under the current capacity
    fn probe(&self, key: &str) -> QuadraticProbe {
        QuadraticProbe::new(bucket_index(self.hash_fn.hash(key), self.capacity), self.capacity)
    }

    /// Finds the slot holding the live entry for `key`.
    ///
    /// Stops at the first never-used slot; tombstones and other keys are skipped.
    fn find_index(&self, key: &str) -> Option<usize> {
        for (probes, index) in self.probe(key).enumerate() {
            match self.buckets.get(index).ok()? {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => {
                    trace!(probes, index, "found key");
                    return Some(index);
                }
                Slot::Occupied(_) | Slot::Tombstone(_) => {}
            }
        }
        None
    }

    /// Inserts or updates a key-value pair
    ///
    /// Grows the table first if the load factor has reached [`OPEN_ADDRESS_LOAD_LIMIT`]. The
    /// probe continues past tombstones until it reaches either the key itself (updated in
    /// place) or a never-used slot; a new key then takes the first tombstone seen, or that
    /// empty slot if there was none.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) {
        if self.table_load() >= OPEN_ADDRESS_LOAD_LIMIT {
            self.resize_table(self.capacity.saturating_mul(2));
        }

        let key = key.into();
        let mut first_tombstone = None;
        let mut empty = None;

        for index in self.probe(&key) {
            let Ok(slot) = self.buckets.get_mut(index) else { break };
            match slot {
                Slot::Empty => {
                    empty = Some(index);
                    break;
                }
                Slot::Tombstone(_) => {
                    first_tombstone = first_tombstone.or(Some(index));
                }
                Slot::Occupied(entry) if entry.key == key => {
                    entry.value = value;
                    return;
                }
                Slot::Occupied(_) => {}
            }
        }

        let Some(target) = first_tombstone.or(empty) else {
            warn!(capacity = self.capacity, size = self.size, "probe found no vacant slot");
            return;
        };

        if let Ok(slot) = self.buckets.get_mut(target) {
            *slot = Slot::Occupied(HashEntry { key, value });
            self.size = self.size.saturating_add(1);
        }
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.find_index(key)?;
        match self.buckets.get(index) {
            Ok(Slot::Occupied(entry)) => Some(&entry.value),
            _ => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_index(key)?;
        match self.buckets.get_mut(index) {
            Ok(Slot::Occupied(entry)) => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Returns true if the map contains `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes `key` and returns its value, leaving a tombstone in its slot.
    ///
    /// Missing keys leave the map untouched.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find_index(key)?;
        let removed = self.buckets.get_mut(index).ok()?.bury()?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `new_capacity` slots, rounded up to a prime.
    ///
    /// Does nothing when `new_capacity` is zero or smaller than the number of entries.
    /// Live entries are re-inserted in slot order, which drops every tombstone and may
    /// grow the table further if the new capacity leaves the load factor at or above
    /// [`OPEN_ADDRESS_LOAD_LIMIT`].
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 || new_capacity < self.size {
            return;
        }

        let capacity = prime_at_least(new_capacity);
        debug!(
            old_capacity = self.capacity,
            new_capacity = capacity,
            size = self.size,
            "resizing open-address hash map"
        );

        let old_buckets =
            mem::replace(&mut self.buckets, DynamicArray::filled_with(capacity, || Slot::Empty));
        self.capacity = capacity;
        self.size = 0;

        for slot in old_buckets {
            if let Slot::Occupied(HashEntry { key, value }) = slot {
                self.put(key, value);
            }
        }
    }

    /// Returns the current load factor (live entries per slot)
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity as f64
    }

    /// Counts the slots without a live entry, tombstones included
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|slot| slot.is_vacant()).count()
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

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every entry and tombstone while keeping the current capacity
    pub fn clear(&mut self) {
        debug!(capacity = self.capacity, size = self.size, "clearing open-address hash map");
        self.buckets = DynamicArray::filled_with(self.capacity, || Slot::Empty);
        self.size = 0;
    }

    /// Iterates over live entries in ascending slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V, H> {
        Iter { map: self, cursor: Cursor::new() }
    }
}

impl<V, H> OpenAddressHashMap<V, H>
where
    V: Clone,
    H: HashFn,
{
    /// Collects every live entry as an owned `(key, value)` pair, in slot order
    #[must_use]
    pub fn get_keys_and_values(&self) -> DynamicArray<(String, V)> {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }
}

impl<V: fmt::Display, H> fmt::Display for OpenAddressHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: {} => {}", entry.key, entry.value)?,
                Slot::Tombstone(key) => writeln!(f, "{index}: {key} (removed)")?,
            }
        }
        Ok(())
    }
}

/// A restartable position over the slots of an [`OpenAddressHashMap`].
///
/// The cursor holds nothing but a slot index, so it does not borrow the map between steps.
/// Once it runs past the last slot it stays exhausted. Mutating the map between steps is a
/// caller error: entries may be skipped or repeated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the next slot to inspect
    index: usize,
}

impl Cursor {
    /// Creates a cursor positioned before slot 0
    #[must_use]
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Returns true once the cursor has run past the end of a table
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.index == usize::MAX
    }

    /// Advances to the next live entry of `map`, or returns `None` at the end of the table
    pub fn next_entry<'a, V, H>(&mut self, map: &'a OpenAddressHashMap<V, H>) -> Option<(&'a str, &'a V)> {
        loop {
            let Ok(slot) = map.buckets.get(self.index) else {
                self.index = usize::MAX;
                return None;
            };
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
    }
}

/// Iterator over the live entries of an [`OpenAddressHashMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V, H> {
    /// The map being iterated
    map: &'a OpenAddressHashMap<V, H>,
    /// Current position in the iteration
    cursor: Cursor,
}

impl<'a, V, H> Iterator for Iter<'a, V, H> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_entry(self.map)
    }
}

impl<V, H> FusedIterator for Iter<'_, V, H> {}

impl<'a, V, H> IntoIterator for &'a OpenAddressHashMap<V, H>
where
    H: HashFn,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_fn::WeightedCharSumHash;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn round2(x: f64) -> f64 {
        (x * 100.0).round() / 100.0
    }

    #[test]
    fn test_put_and_get() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("key1", 1);
        map.put("key2", 2);
        map.put("key3", 3);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
        assert!(map.contains_key("key2"));
        assert!(!map.contains_key("key4"));
    }

    fn check_resize_keeps_single_entry<H: HashFn>(hash_fn: H) {
        let mut map = OpenAddressHashMap::new(20, hash_fn);
        map.put("key1", 10);

        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), 23);
        assert_eq!(map.get("key1"), Some(&10));

        map.resize_table(30);

        assert_eq!(map.capacity(), 31);
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));
    }

    #[test]
    fn test_resize_keeps_single_entry() {
        check_resize_keeps_single_entry(CharSumHash);
        check_resize_keeps_single_entry(WeightedCharSumHash);
    }

    #[test]
    fn test_put_grows_at_half_load() {
        // (empty buckets, load, size, capacity) sampled every 25 puts
        let expected: [(usize, f64, usize, usize); 6] = [
            (28, 0.47, 25, 53),
            (57, 0.47, 50, 107),
            (148, 0.34, 75, 223),
            (123, 0.45, 100, 223),
            (324, 0.28, 125, 449),
            (299, 0.33, 150, 449),
        ];

        let mut map = OpenAddressHashMap::new(53, CharSumHash);
        let mut samples = Vec::new();
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
            if i % 25 == 24 {
                samples.push((map.empty_buckets(), round2(map.table_load()), map.len(), map.capacity()));
            }
            assert!(map.len() < map.capacity());
        }

        assert_eq!(samples, expected);
    }

    #[test]
    fn test_empty_buckets_track_updates() {
        let mut map = OpenAddressHashMap::new(101, CharSumHash);
        assert_eq!((map.empty_buckets(), map.len(), map.capacity()), (101, 0, 101));

        map.put("key1", 10);
        assert_eq!((map.empty_buckets(), map.len(), map.capacity()), (100, 1, 101));
        map.put("key2", 20);
        assert_eq!((map.empty_buckets(), map.len(), map.capacity()), (99, 2, 101));
        map.put("key1", 30);
        assert_eq!((map.empty_buckets(), map.len(), map.capacity()), (99, 2, 101));
        map.put("key4", 40);
        assert_eq!((map.empty_buckets(), map.len(), map.capacity()), (98, 3, 101));
    }

    #[test]
    fn test_tombstone_keeps_probe_chain_intact() {
        // anagrams collide under CharSumHash: 294 % 11 == 8, so the keys land in slots 8, 9, 1
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("abc", 1);
        map.put("cab", 2);
        map.put("bca", 3);

        assert_eq!(map.remove("abc"), Some(1));

        assert_eq!(map.get("abc"), None);
        assert_eq!(map.get("cab"), Some(&2));
        assert_eq!(map.get("bca"), Some(&3));
        assert_eq!(map.len(), 2);
        assert_eq!(map.empty_buckets(), 9);
    }

    #[test]
    fn test_put_after_tombstone_does_not_duplicate() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("abc", 1);
        map.put("cab", 2);
        map.put("bca", 3);
        map.remove("abc");

        // "bca" lives past the tombstone in slot 8 and must be updated, not re-inserted
        map.put("bca", 30);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("bca"), Some(&30));

        map.remove("bca");
        assert_eq!(map.get("bca"), None);
        assert!(!map.contains_key("bca"));

        // a genuinely new key reuses the first tombstone on its path
        map.put("abc", 5);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["abc", "cab"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut map = OpenAddressHashMap::new(11, WeightedCharSumHash);
        map.put("key1", 1);
        map.put("key2", 2);

        assert_eq!(map.remove("key1"), Some(1));
        let after_first = map.get_keys_and_values();
        let empty_after_first = map.empty_buckets();

        assert_eq!(map.remove("key1"), None);

        assert_eq!(map.get_keys_and_values(), after_first);
        assert_eq!(map.empty_buckets(), empty_after_first);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_resize_below_size_is_ignored() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        for i in 0..4 {
            map.put(format!("key{i}"), i);
        }

        map.resize_table(3);
        assert_eq!(map.capacity(), 11);
        map.resize_table(0);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_resize_keeps_contents() {
        let mut map = OpenAddressHashMap::new(75, WeightedCharSumHash);
        let keys: Vec<i32> = (25..1000).step_by(13).collect();
        for key in &keys {
            map.put(key.to_string(), key * 42);
        }
        assert_eq!((map.len(), map.capacity()), (75, 163));

        let expected_capacities = [227, 229, 347, 463, 587, 701, 821, 937];
        for (capacity, expected) in (111..1000).step_by(117).zip(expected_capacities) {
            map.resize_table(capacity);
            assert_eq!(map.capacity(), expected);

            map.put("some key", -1);
            assert!(map.contains_key("some key"));
            map.remove("some key");

            for key in &keys {
                assert_eq!(map.get(&key.to_string()), Some(&(key * 42)));
                assert!(!map.contains_key(&(key + 1).to_string()));
            }
            assert_eq!(map.len(), 75);
        }
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("abc", 1);
        map.put("cab", 2);
        map.remove("abc");
        assert_eq!(map.to_string().matches("(removed)").count(), 1);

        map.resize_table(11);

        assert!(!map.to_string().contains("(removed)"));
        assert_eq!(map.get("cab"), Some(&2));
        assert_eq!(map.empty_buckets(), 10);
    }

    #[test]
    fn test_get_mut() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("key1", 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert!(map.get_mut("key2").is_none());
    }

    #[test]
    fn test_clear() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("key1", 1);
        map.put("key2", 2);
        map.remove("key2");

        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.empty_buckets(), 11);
        assert_eq!(map.get("key1"), None);
    }

    #[test]
    fn test_cursor_is_restartable_and_stays_exhausted() {
        let mut map = OpenAddressHashMap::new(11, CharSumHash);
        map.put("abc", 1);
        map.put("cab", 2);
        map.put("bca", 3);
        map.put("zz", 4);
        map.remove("zz");

        let mut cursor = Cursor::new();
        // slots 1, 8, 9 in ascending order
        assert_eq!(cursor.next_entry(&map), Some(("bca", &3)));
        assert_eq!(cursor.next_entry(&map), Some(("abc", &1)));
        assert_eq!(cursor.next_entry(&map), Some(("cab", &2)));
        assert_eq!(cursor.next_entry(&map), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_entry(&map), None);

        let mut fresh = Cursor::new();
        assert!(!fresh.is_exhausted());
        assert_eq!(fresh.next_entry(&map), Some(("bca", &3)));
    }

    #[test]
    fn test_iter() {
        let mut map = OpenAddressHashMap::new(11, WeightedCharSumHash);
        map.put("key1", 1);
        map.put("key2", 2);
        map.put("key3", 3);

        let mut count = 0;
        let mut sum = 0;
        for (_, &value) in &map {
            count += 1;
            sum += value;
        }

        assert_eq!(count, 3);
        assert_eq!(sum, 6);
        let first_pass: Vec<_> = map.iter().collect();
        let second_pass: Vec<_> = map.iter().collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_display() {
        let mut map = OpenAddressHashMap::new(3, CharSumHash);
        map.put("a", 1);
        assert_eq!(map.to_string(), "0: None\n1: a => 1\n2: None\n");

        map.remove("a");
        assert_eq!(map.to_string(), "0: None\n1: a (removed)\n2: None\n");
    }

    #[test]
    fn test_probe_sequence_is_quadratic() {
        let indices: Vec<usize> = QuadraticProbe::new(3, 11).take(5).collect();
        // 3, 3+1, 3+4, 3+9, 3+16 modulo 11
        assert_eq!(indices, vec![3, 4, 7, 1, 8]);
        assert_eq!(QuadraticProbe::new(0, 7).count(), 7);
    }

    proptest! {
        #[test]
        fn behaves_like_std_hash_map(
            ops in prop::collection::vec((0u8..3, "[a-d]{1,2}", any::<i32>()), 0..300)
        ) {
            let mut map = OpenAddressHashMap::new(3, CharSumHash);
            let mut model = HashMap::new();

            for (op, key, value) in ops {
                if op == 0 {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                } else {
                    map.put(key.clone(), value);
                    model.insert(key, value);
                }
                prop_assert!(map.len() < map.capacity());
                prop_assert_eq!(map.len(), model.len());
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            prop_assert_eq!(map.iter().count(), model.len());
        }

        #[test]
        fn resize_preserves_entries(
            keys in prop::collection::hash_set("[a-z]{1,6}", 0..40),
            target in 0usize..200,
        ) {
            let mut map = OpenAddressHashMap::new(7, WeightedCharSumHash);
            for (i, key) in keys.iter().enumerate() {
                map.put(key.clone(), i);
            }
            let before: HashMap<String, usize> = map.get_keys_and_values().into_iter().collect();
            let capacity_before = map.capacity();

            map.resize_table(target);

            let after: HashMap<String, usize> = map.get_keys_and_values().into_iter().collect();
            prop_assert_eq!(before, after);
            if target < keys.len() || target == 0 {
                prop_assert_eq!(map.capacity(), capacity_before);
            }
            prop_assert!(map.len() < map.capacity());
        }
    }
}
