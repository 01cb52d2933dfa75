//! ChainingMap: separate chaining over a prime-length bucket array.

use crate::chain::{self, ChainBuckets};
use crate::hasher::{CharSum, KeyHasher};
use crate::prime::next_prime;
use crate::DEFAULT_CAPACITY;
use core::borrow::Borrow;
use core::fmt;
use log::{debug, trace};

/// `put` grows the table first once `table_load()` reaches this value.
pub const MAX_LOAD: f64 = 1.0;

/// Hash map resolving collisions with one linked chain per bucket.
///
/// The table doubles (to the next prime) before any `put` that finds
/// `table_load() >= 1.0`, so chains stay short on average while the array
/// is never resized by anything other than `put` and `resize_table`.
pub struct ChainingMap<K, V, H = CharSum> {
    buckets: ChainBuckets<K, V>,
    hasher: H,
}

impl<K, V> ChainingMap<K, V>
where
    K: Eq + AsRef<str>,
{
    /// Empty map with 11 buckets and the [`CharSum`] hash.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty map with at least `capacity` buckets, rounded up to a prime.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, CharSum)
    }
}

impl<K, V> Default for ChainingMap<K, V>
where
    K: Eq + AsRef<str>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the live entries of a [`ChainingMap`], bucket by bucket.
pub struct Iter<'a, K, V> {
    inner: chain::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K, V, H> ChainingMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            buckets: ChainBuckets::new(next_prime(capacity)),
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.entries()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets; always prime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        (self.hasher.hash_key(q) % self.capacity() as u64) as usize
    }

    /// Inserts `key -> value`, overwriting the value if `key` is present.
    pub fn put(&mut self, key: K, value: V) {
        if self.table_load() >= MAX_LOAD {
            self.resize_table(2 * self.capacity());
        }
        let bucket = self.bucket_of(&key);
        self.buckets.upsert(bucket, key, value);
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        self.buckets.find(self.bucket_of(q), q).map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let bucket = self.bucket_of(q);
        self.buckets.find_mut(bucket, q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        !self.is_empty() && self.buckets.find(self.bucket_of(q), q).is_some()
    }

    /// Removes `q` and returns its value; absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let bucket = self.bucket_of(q);
        self.buckets.remove(bucket, q).map(|(_, v)| v)
    }

    /// `len / capacity`, rounded to two decimal places.
    pub fn table_load(&self) -> f64 {
        crate::round_load(self.len(), self.capacity())
    }

    pub fn empty_buckets(&self) -> usize {
        (0..self.capacity())
            .filter(|&i| self.buckets.is_empty_chain(i))
            .count()
    }

    /// Drops every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        trace!("clearing {} entries", self.len());
        self.buckets = ChainBuckets::new(self.capacity());
    }

    /// Rehashes every entry into `next_prime(new_capacity)` buckets.
    ///
    /// A request for zero buckets is ignored. Entries are moved out of the old
    /// array and reinserted through [`put`](Self::put), so a target smaller
    /// than `len()` grows again while the entries are placed.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            trace!("ignoring resize to {new_capacity} buckets");
            return;
        }
        let capacity = next_prime(new_capacity);
        debug!(
            "resizing chaining table {} -> {} buckets ({} entries)",
            self.capacity(),
            capacity,
            self.len()
        );
        let old = core::mem::replace(&mut self.buckets, ChainBuckets::new(capacity));
        for (key, value) in old.into_entries() {
            self.put(key, value);
        }
    }

    /// Every live `(key, value)` pair, in bucket then chain order.
    pub fn get_keys_and_values(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.buckets.iter(),
        }
    }

    /// Mutable access to every value. Unlike [`iter`](Self::iter), entries
    /// come in node-arena order, not bucket order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.buckets.iter_mut()
    }
}

impl<'a, K, V, H> IntoIterator for &'a ChainingMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> Extend<(K, V)> for ChainingMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainingMap<K, V>
where
    K: Eq + AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

impl<K, V, H> fmt::Debug for ChainingMap<K, V, H>
where
    K: Eq + fmt::Debug,
    V: fmt::Debug,
    H: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per bucket: `index: [k1: v1 -> k2: v2]`.
impl<K, V, H> fmt::Display for ChainingMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in 0..self.buckets.len() {
            write!(f, "{bucket}: [")?;
            for (i, (k, v)) in self.buckets.chain(bucket).enumerate() {
                if i > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "{k}: {v}")?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}
