//! ProbingMap: open addressing with quadratic probing and tombstones.
//!
//! Each slot of the bucket array is empty or holds one entry. Removal leaves
//! the entry in place marked as a tombstone, so that probe sequences passing
//! through the slot still reach entries placed further along. Tombstones are
//! only reclaimed by a later `put` that lands on them, by `clear`, or by a
//! resize (which reinserts live entries only).
//!
//! `put` stops at the first tombstone on the probe path and reuses it, even
//! when a live entry with the same key sits further along that path. The key
//! then has two live copies; lookups return the one reached first, and
//! removing it exposes the older one again.

use crate::hasher::{CharSum, KeyHasher};
use crate::prime::next_prime;
use crate::probe::QuadraticProbe;
use crate::DEFAULT_CAPACITY;
use core::borrow::Borrow;
use core::fmt;
use log::{debug, trace};

/// `put` grows the table first once `table_load()` reaches this value.
pub const MAX_LOAD: f64 = 0.5;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    tombstone: bool,
}

type Slot<K, V> = Option<Entry<K, V>>;

fn empty_slots<K, V>(len: usize) -> Vec<Slot<K, V>> {
    core::iter::repeat_with(|| None).take(len).collect()
}

/// Hash map resolving collisions by quadratic probing over a prime-length
/// array, growing before any `put` that finds `table_load() >= 0.5`.
pub struct ProbingMap<K, V, H = CharSum> {
    slots: Vec<Slot<K, V>>,
    size: usize,
    hasher: H,
}

impl<K, V> ProbingMap<K, V>
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

impl<K, V> Default for ProbingMap<K, V>
where
    K: Eq + AsRef<str>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the live entries of a [`ProbingMap`] in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(e) = slot {
                if !e.tombstone {
                    self.remaining -= 1;
                    return Some((&e.key, &e.value));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Mutable iterator over the live entries of a [`ProbingMap`] in slot order.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(e) = slot {
                if !e.tombstone {
                    self.remaining -= 1;
                    return Some((&e.key, &mut e.value));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<K, V, H> ProbingMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            slots: empty_slots(next_prime(capacity)),
            size: 0,
            hasher,
        }
    }

    /// Number of live (non-tombstone) entries.
    pub fn len(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots; always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn probe<Q>(&self, q: &Q) -> core::iter::Take<QuadraticProbe>
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        let cap = self.capacity();
        QuadraticProbe::new(self.hasher.hash_key(q), cap).take(cap)
    }

    // Slot holding the first live entry for `q`. Stops at an empty slot or
    // after `capacity` probes; tombstones are stepped over, never matched.
    fn find_index<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        for i in self.probe(q) {
            match &self.slots[i] {
                None => return None,
                Some(e) if !e.tombstone && e.key.borrow() == q => return Some(i),
                Some(_) => {}
            }
        }
        None
    }

    /// Inserts `key -> value`, overwriting a live entry with the same key or
    /// reusing the first tombstone on the probe path, whichever comes first.
    pub fn put(&mut self, key: K, value: V) {
        if self.table_load() >= MAX_LOAD {
            self.resize_table(2 * self.capacity());
        }

        for i in self.probe(&key) {
            let slot = &mut self.slots[i];
            match slot {
                None => {
                    *slot = Some(Entry {
                        key,
                        value,
                        tombstone: false,
                    });
                    self.size += 1;
                    return;
                }
                Some(e) if e.tombstone => {
                    e.key = key;
                    e.value = value;
                    e.tombstone = false;
                    self.size += 1;
                    return;
                }
                Some(e) if e.key == key => {
                    e.value = value;
                    return;
                }
                Some(_) => {}
            }
        }

        // Below half load a prime-length quadratic probe always reaches a free
        // slot within its first (capacity + 1) / 2 steps.
        unreachable!(
            "probe sequence exhausted with {} of {} slots live",
            self.size,
            self.capacity()
        );
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let i = self.find_index(q)?;
        self.slots[i].as_ref().map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let i = self.find_index(q)?;
        self.slots[i].as_mut().map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        self.find_index(q).is_some()
    }

    /// Marks the live entry for `q` as a tombstone. Returns `false` if absent.
    ///
    /// The key and value stay in the slot until it is reused or cleared.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let Some(i) = self.find_index(q) else {
            return false;
        };
        let entry = self.slots[i]
            .as_mut()
            .expect("find_index returns occupied slots");
        entry.tombstone = true;
        self.size -= 1;
        true
    }

    /// `len / capacity`, rounded to two decimal places.
    pub fn table_load(&self) -> f64 {
        crate::round_load(self.size, self.capacity())
    }

    /// `capacity - len`: every slot not holding a live entry.
    pub fn empty_buckets(&self) -> usize {
        self.capacity() - self.size
    }

    /// Number of slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Some(e) if e.tombstone))
            .count()
    }

    /// Drops every entry and tombstone, keeping the current capacity.
    pub fn clear(&mut self) {
        trace!("clearing {} entries", self.size);
        self.slots = empty_slots(self.capacity());
        self.size = 0;
    }

    /// Rehashes every live entry into `next_prime(new_capacity)` slots.
    ///
    /// Requests below `len()` are ignored. Tombstones are dropped; live
    /// entries are moved out of the old array and reinserted through
    /// [`put`](Self::put).
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < self.size {
            trace!(
                "ignoring resize to {new_capacity} slots below {} live entries",
                self.size
            );
            return;
        }
        let capacity = next_prime(new_capacity);
        debug!(
            "resizing probing table {} -> {} slots ({} entries, {} tombstones)",
            self.capacity(),
            capacity,
            self.size,
            self.tombstones()
        );
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.size = 0;
        for e in old.into_iter().flatten().filter(|e| !e.tombstone) {
            self.put(e.key, e.value);
        }
    }

    /// Every live `(key, value)` pair in slot order.
    pub fn get_keys_and_values(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Walks the slots from index 0, skipping empty slots and tombstones.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.size,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.size,
        }
    }
}

impl<'a, K, V, H> IntoIterator for &'a ProbingMap<K, V, H>
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

impl<'a, K, V, H> IntoIterator for &'a mut ProbingMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, H> Extend<(K, V)> for ProbingMap<K, V, H>
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

impl<K, V> FromIterator<(K, V)> for ProbingMap<K, V>
where
    K: Eq + AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

impl<K, V, H> fmt::Debug for ProbingMap<K, V, H>
where
    K: Eq + fmt::Debug,
    V: fmt::Debug,
    H: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per slot: `index: None`, `index: k: v`, or `index: k: v (removed)`.
impl<K, V, H> fmt::Display for ProbingMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                None => writeln!(f, "{i}: None")?,
                Some(e) if e.tombstone => writeln!(f, "{i}: {}: {} (removed)", e.key, e.value)?,
                Some(e) => writeln!(f, "{i}: {}: {}", e.key, e.value)?,
            }
        }
        Ok(())
    }
}
