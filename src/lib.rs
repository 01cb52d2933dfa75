//! prime-hashmap: single-threaded hash maps over a prime-length bucket array,
//! in two collision-resolution flavours.
//!
//! Internal Design:
//!
//! Summary
//! - `ChainingMap<K, V, H>`: separate chaining. Each bucket heads a singly
//!   linked chain; nodes for every chain share one generational arena.
//!   Grows before a `put` that finds `table_load() >= 1.0`.
//! - `ProbingMap<K, V, H>`: open addressing with quadratic probing
//!   (`(home + k^2) % capacity`) and tombstone deletion. Grows before a
//!   `put` that finds `table_load() >= 0.5`.
//! - `find_mode`: most frequent values of a slice, counted in a
//!   `ChainingMap`.
//!
//! Constraints
//! - Capacity is always prime: requests are rounded up to odd, then stepped
//!   by two until prime. Requests are corrected, never rejected.
//! - The hash strategy `H: KeyHasher<K>` is injected at construction; the map
//!   only ever uses it as `hash % capacity`. `CharSum` and `WeightedCharSum`
//!   are the reference string hashes; `StdHash` adapts any `BuildHasher`.
//! - Resizing is stop-the-world: the old array is moved out, every live
//!   entry is reinserted through `put`, and the old array is dropped.
//! - Absence is reported with `Option`/`bool`. `resize_table` targets that
//!   are out of range are ignored. Broken internal invariants panic.
//!
//! Notes and non-goals
//! - Not `Send`/`Sync`-aware beyond what `K`, `V` and `H` provide; callers
//!   serialise shared access.
//! - Iteration order is bucket order and carries no other guarantee.
//! - Probing `put` reuses the first tombstone on its path, even ahead of a
//!   live entry with the same key (see [`probing_map`]).

mod chain;
pub mod chaining_map;
pub mod hasher;
pub mod mode;
pub mod prime;
mod probe;
pub mod probing_map;
#[cfg(test)]
mod probing_map_proptest;

/// Bucket count used by `new()` and by [`find_mode`].
pub const DEFAULT_CAPACITY: usize = 11;

// `size / capacity` rounded to two decimal places.
fn round_load(size: usize, capacity: usize) -> f64 {
    (size as f64 / capacity as f64 * 100.0).round() / 100.0
}

// Public surface
pub use chaining_map::ChainingMap;
pub use hasher::{CharSum, KeyHasher, StdHash, WeightedCharSum};
pub use mode::{find_mode, find_mode_with_hasher};
pub use probing_map::ProbingMap;
