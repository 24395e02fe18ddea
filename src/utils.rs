//! The contract shared by both map implementations

use crate::{
    ChainedHashMap, OpenAddressHashMap,
    dynamic_array::DynamicArray,
    hash_fn::HashFn,
};

/// Common interface of the chained and open-addressing maps
///
/// Lets callers (and the report binary) drive either collision strategy through one API.
pub trait HashTable<V> {
    /// Inserts or updates a key-value pair
    fn put(&mut self, key: String, value: V);

    /// Retrieve a value for a given key
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns true if the table contains the given key
    fn contains_key(&self, key: &str) -> bool;

    /// Removes a key, returning its value if it was present
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Rebuilds the table with (at least) the given number of buckets
    fn resize_table(&mut self, new_capacity: usize);

    /// Returns the current load factor
    fn table_load(&self) -> f64;

    /// Returns the number of buckets without a live entry
    fn empty_buckets(&self) -> usize;

    /// Returns the number of entries
    fn len(&self) -> usize;

    /// Returns true if the table holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets
    fn capacity(&self) -> usize;

    /// Removes every entry, keeping the capacity
    fn clear(&mut self);

    /// Collects every entry as owned pairs
    fn get_keys_and_values(&self) -> DynamicArray<(String, V)>;
}

/// Forwards every [`HashTable`] method to the inherent method of the same name
macro_rules! impl_hash_table {
    ($map:ident) => {
        impl<V, H> HashTable<V> for $map<V, H>
        where
            V: Clone,
            H: HashFn,
        {
            fn put(&mut self, key: String, value: V) {
                $map::put(self, key, value);
            }

            fn get(&self, key: &str) -> Option<&V> {
                $map::get(self, key)
            }

            fn contains_key(&self, key: &str) -> bool {
                $map::contains_key(self, key)
            }

            fn remove(&mut self, key: &str) -> Option<V> {
                $map::remove(self, key)
            }

            fn resize_table(&mut self, new_capacity: usize) {
                $map::resize_table(self, new_capacity);
            }

            fn table_load(&self) -> f64 {
                $map::table_load(self)
            }

            fn empty_buckets(&self) -> usize {
                $map::empty_buckets(self)
            }

            fn len(&self) -> usize {
                $map::len(self)
            }

            fn capacity(&self) -> usize {
                $map::capacity(self)
            }

            fn clear(&mut self) {
                $map::clear(self);
            }

            fn get_keys_and_values(&self) -> DynamicArray<(String, V)> {
                $map::get_keys_and_values(self)
            }
        }
    };
}

impl_hash_table!(ChainedHashMap);
impl_hash_table!(OpenAddressHashMap);

/// Fills `table` from an iterator of key-value pairs
pub fn from_pairs<T, K, V, I>(mut table: T, pairs: I) -> T
where
    T: HashTable<V>,
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in pairs {
        table.put(key.into(), value);
    }
    table
}
