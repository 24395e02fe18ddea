//! Prime sizing for hash table capacities.
//!
//! Both maps keep their bucket count prime so that `hash % capacity` spreads keys
//! evenly even when the hash function has poor low-order bits.

/// Returns true if `n` is a prime number.
///
/// Uses trial division by odd factors up to `sqrt(n)`.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    // `checked_mul` returning None means factor² already exceeds any usize
    while factor.checked_mul(factor).is_some_and(|square| square <= n) {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }
    true
}

/// Returns the smallest odd prime greater than or equal to `n`.
///
/// Even inputs are bumped to the next odd number before searching, so the result is
/// never `2`: `next_prime(2) == 3`.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// Returns `n` unchanged when it is already prime, otherwise `next_prime(n)`.
pub(crate) fn prime_at_least(n: usize) -> usize {
    if is_prime(n) { n } else { next_prime(n) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_prime_small_values() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(5));
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(is_prime(97));
        assert!(!is_prime(221)); // 13 * 17
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(20), 23);
        assert_eq!(next_prime(30), 31);
        assert_eq!(next_prime(11), 11);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(106), 107);
    }

    #[test]
    fn test_next_prime_never_returns_two() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(1), 3);
        assert_eq!(next_prime(2), 3);
    }

    #[test]
    fn test_prime_at_least_keeps_primes() {
        assert_eq!(prime_at_least(2), 2);
        assert_eq!(prime_at_least(7), 7);
        assert_eq!(prime_at_least(8), 11);
        assert_eq!(prime_at_least(1), 3);
    }

    proptest! {
        #[test]
        fn next_prime_is_smallest_odd_prime_at_or_above(n in 0usize..50_000) {
            let p = next_prime(n);
            prop_assert!(p >= n);
            prop_assert!(p % 2 == 1);
            prop_assert!(is_prime(p));
            let start = if n % 2 == 0 { n + 1 } else { n };
            for candidate in (start..p).step_by(2) {
                prop_assert!(!is_prime(candidate));
            }
        }
    }
}
