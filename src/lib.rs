//! # Prime Hash
//!
//! Hash maps built directly on a resizable array, with prime-sized tables.
//!
//! This crate provides two hash map implementations with the same contract:
//!
//! - `ChainedHashMap`: each bucket owns a singly-linked chain; grows at load factor 1.0
//! - `OpenAddressHashMap`: one entry per slot, quadratic probing and tombstones; grows at
//!   load factor 0.5
//!
//! Both take an injected [`HashFn`] and keep their capacity prime so that reducing a hash
//! modulo the capacity spreads keys evenly. [`find_mode`] builds on `ChainedHashMap` to find
//! the most frequent values of a sequence.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primehash::{ChainedHashMap, CharSumHash};
//!
//! // Create a new hash map; 20 is rounded up to the prime 23
//! let mut map = ChainedHashMap::new(20, CharSumHash);
//! assert_eq!(map.capacity(), 23);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Open Addressing
//!
//! ```rust
//! use primehash::{Cursor, OpenAddressHashMap, WeightedCharSumHash};
//!
//! let mut map = OpenAddressHashMap::new(20, WeightedCharSumHash);
//! map.put("key1", 10);
//! map.resize_table(30);
//! assert_eq!(map.capacity(), 31);
//! assert_eq!(map.get("key1"), Some(&10));
//!
//! // A cursor only remembers a slot index, so it can be restarted at any time
//! let mut cursor = Cursor::new();
//! assert_eq!(cursor.next_entry(&map), Some(("key1", &10)));
//! assert_eq!(cursor.next_entry(&map), None);
//! ```
//!
//! ## Finding the Mode
//!
//! ```rust
//! use primehash::find_mode;
//!
//! let mode = find_mode(&["apple", "apple", "grape", "melon", "peach"]).unwrap();
//! assert_eq!(mode.frequency, 2);
//! assert_eq!(mode.values.as_slice(), ["apple".to_string()]);
//! ```

/// Module implementing the separate-chaining hash map
mod chained_hashmap;
/// Module implementing the bounds-checked resizable array
mod dynamic_array;
/// Module implementing the injectable hash functions
mod hash_fn;
/// Module implementing the singly-linked bucket chains
mod linked_list;
/// Module implementing mode detection over a frequency table
mod mode;
/// Module implementing the open-addressing hash map with quadratic probing
mod open_address_hashmap;
/// Prime number helpers used to size the tables
pub mod prime;
/// The contract shared by both hash maps
mod utils;

pub use chained_hashmap::{CHAINED_LOAD_LIMIT, ChainedHashMap};
pub use dynamic_array::{DynamicArray, DynamicArrayError};
pub use hash_fn::{CharSumHash, HashFn, WeightedCharSumHash};
pub use linked_list::{IntoPairs, LinkedList, Node};
pub use mode::{Mode, ModeError, find_mode, find_mode_with};
pub use open_address_hashmap::{Cursor, Iter, OPEN_ADDRESS_LOAD_LIMIT, OpenAddressHashMap};
pub use utils::{HashTable, from_pairs};
