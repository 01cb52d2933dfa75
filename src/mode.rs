//! Most frequent values of a sequence, counted in a [`ChainingMap`].

use crate::chaining_map::ChainingMap;
use crate::hasher::{CharSum, KeyHasher};
use crate::DEFAULT_CAPACITY;
use log::trace;

/// Returns every value that occurs most often in `items`, together with that
/// frequency. Ties are all kept; their order is unspecified.
///
/// An empty input yields `(vec![], 0)`.
pub fn find_mode<T>(items: &[T]) -> (Vec<&T>, usize)
where
    T: Eq + AsRef<str>,
{
    find_mode_with_hasher(items, CharSum)
}

/// [`find_mode`] with an explicit hash strategy for the counting map.
pub fn find_mode_with_hasher<T, H>(items: &[T], hasher: H) -> (Vec<&T>, usize)
where
    T: Eq,
    H: KeyHasher<T>,
{
    let by_ref = move |item: &&T| hasher.hash_key(*item);
    let mut counts = ChainingMap::with_capacity_and_hasher(DEFAULT_CAPACITY, by_ref);
    for item in items {
        match counts.get_mut(&item) {
            Some(n) => *n += 1,
            None => counts.put(item, 1usize),
        }
    }

    let mut modes = Vec::new();
    let mut frequency = 0;
    for (&item, &count) in counts.iter() {
        if count > frequency {
            frequency = count;
            modes.clear();
            modes.push(item);
        } else if count == frequency {
            modes.push(item);
        }
    }
    trace!(
        "{} distinct of {} items, {} mode(s) at frequency {}",
        counts.len(),
        items.len(),
        modes.len(),
        frequency
    );
    (modes, frequency)
}
