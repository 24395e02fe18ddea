//! Hash functions injected into the maps.

/// A pure hash function mapping a string key to a non-negative integer.
///
/// Implementations must be deterministic: the same key always hashes to the same value,
/// otherwise entries become unreachable after they are stored.
pub trait HashFn {
    /// Hashes `key`.
    fn hash(&self, key: &str) -> u64;
}

impl<F> HashFn for F
where
    F: Fn(&str) -> u64,
{
    fn hash(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sums the code points of the key's characters.
///
/// Anagrams collide, which makes this a useful function for exercising collision
/// handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharSumHash;

impl HashFn for CharSumHash {
    fn hash(&self, key: &str) -> u64 {
        key.chars().fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)))
    }
}

/// Sums each character's code point weighted by its one-based position.
///
/// Spreads keys better than [`CharSumHash`] because reordering characters changes the hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedCharSumHash;

impl HashFn for WeightedCharSumHash {
    fn hash(&self, key: &str) -> u64 {
        key.chars().zip(1u64..).fold(0u64, |acc, (c, weight)| {
            acc.wrapping_add(weight.wrapping_mul(u64::from(c)))
        })
    }
}

/// Reduces a hash to a bucket index in `0..capacity`.
///
/// `capacity` must be non-zero; both maps guarantee this by keeping it prime.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index called with zero capacity");
    // the remainder is below `capacity`, so the cast back to usize is lossless
    (hash % (capacity as u64)) as usize
}
