//! Hash strategies injected into the maps at construction.
//!
//! A map only ever uses its strategy as `hash_key(key) % capacity`, so any
//! function from a key to a non-negative integer will do. Two string hashes
//! with different distributions are provided, plus an adapter for
//! `BuildHasher` implementations and a blanket impl for closures.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Maps a key to a bucket-independent hash value.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Sum of the key's Unicode scalar values.
///
/// Anagrams collide, which makes it a useful worst case for tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSum;

impl<K> KeyHasher<K> for CharSum
where
    K: ?Sized + AsRef<str>,
{
    fn hash_key(&self, key: &K) -> u64 {
        key.as_ref()
            .chars()
            .fold(0u64, |acc, c| acc.wrapping_add(c as u64))
    }
}

/// Position-weighted sum: `sum((i + 1) * c_i)` over the key's characters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightedCharSum;

impl<K> KeyHasher<K> for WeightedCharSum
where
    K: ?Sized + AsRef<str>,
{
    fn hash_key(&self, key: &K) -> u64 {
        key.as_ref()
            .chars()
            .zip(1u64..)
            .fold(0u64, |acc, (c, weight)| {
                acc.wrapping_add(weight.wrapping_mul(c as u64))
            })
    }
}

/// Adapts a [`BuildHasher`] so any `K: Hash` can be stored.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = RandomState>(pub S);

impl<S> StdHash<S> {
    pub fn new(build: S) -> Self {
        StdHash(build)
    }
}

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}
