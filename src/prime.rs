//! Prime capacities for the bucket arrays.
//!
//! Both maps index with `hash % capacity`; a prime modulus spreads weak hashes
//! (such as a plain character sum) across the whole array and guarantees that
//! the first `(capacity + 1) / 2` quadratic probes hit distinct slots.

/// Returns `true` if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }
    let mut factor = 3usize;
    while factor.saturating_mul(factor) <= n {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Smallest odd prime `>= n`.
///
/// Even requests are first rounded up to the next odd number, then advanced
/// in steps of two until a prime is found. The result is never even and never
/// 1, so requests of 0, 1 and 2 all yield 3.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}
