//! Mode (most frequent value) detection backed by a [`ChainedHashMap`] frequency table.

use thiserror::Error;
use tracing::debug;

use crate::{
    chained_hashmap::ChainedHashMap,
    dynamic_array::DynamicArray,
    hash_fn::{CharSumHash, HashFn},
};

/// Errors returned by [`find_mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    /// The input had no values, so no mode exists
    #[error("cannot compute the mode of an empty sequence")]
    EmptyInput,
}

/// The most frequent value(s) of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    /// Every value reaching the highest frequency, in frequency-table iteration order
    pub values: DynamicArray<String>,
    /// How often each of `values` occurs
    pub frequency: usize,
}

/// Finds the mode(s) of `values` using [`CharSumHash`] for the frequency table.
///
/// # Errors
///
/// Returns [`ModeError::EmptyInput`] if `values` is empty.
pub fn find_mode<S: AsRef<str>>(values: &[S]) -> Result<Mode, ModeError> {
    find_mode_with(values, CharSumHash)
}

/// Finds the mode(s) of `values`, hashing the frequency table with `hash_fn`.
///
/// All values tied at the highest frequency are returned. Their order follows the
/// frequency table's bucket order and is otherwise unspecified.
///
/// # Errors
///
/// Returns [`ModeError::EmptyInput`] if `values` is empty.
pub fn find_mode_with<S, H>(values: &[S], hash_fn: H) -> Result<Mode, ModeError>
where
    S: AsRef<str>,
    H: HashFn,
{
    if values.is_empty() {
        return Err(ModeError::EmptyInput);
    }

    let mut counts: ChainedHashMap<usize, H> = ChainedHashMap::new(values.len(), hash_fn);
    for value in values {
        let value = value.as_ref();
        let count = counts.get(value).copied().unwrap_or_default();
        counts.put(value, count.saturating_add(1));
    }

    let mut modes = DynamicArray::new();
    let mut highest_frequency = 1;
    for (value, &count) in counts.iter() {
        if count > highest_frequency {
            modes = DynamicArray::new();
            highest_frequency = count;
        }
        if count == highest_frequency {
            modes.push(value.to_owned());
        }
    }

    debug!(distinct = counts.len(), modes = modes.len(), highest_frequency, "computed mode");
    Ok(Mode { values: modes, frequency: highest_frequency })
}
