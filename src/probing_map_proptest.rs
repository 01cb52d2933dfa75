#![cfg(test)]

// Property tests for ProbingMap kept inside the crate so they can compare
// slot-level state (tombstones, slot order) with a naive reference table.

use crate::hasher::{CharSum, KeyHasher};
use crate::prime::{is_prime, next_prime};
use crate::probing_map::ProbingMap;
use proptest::prelude::*;

// Reference table: closed-form probe `(home + k * k) % cap`, linear scans,
// and the same tombstone-first `put` policy.
struct NaiveTable {
    slots: Vec<Option<(String, i32, bool)>>,
    size: usize,
}

impl NaiveTable {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; next_prime(capacity)],
            size: 0,
        }
    }

    fn home(&self, key: &str) -> usize {
        (CharSum.hash_key(key) % self.slots.len() as u64) as usize
    }

    fn put(&mut self, key: String, value: i32) {
        if crate::round_load(self.size, self.slots.len()) >= 0.5 {
            self.resize(2 * self.slots.len());
        }
        let cap = self.slots.len();
        let home = self.home(&key);
        for k in 0..cap {
            let i = (home + k * k) % cap;
            let slot = &mut self.slots[i];
            match slot {
                None => {
                    *slot = Some((key, value, false));
                    self.size += 1;
                    return;
                }
                Some(entry) if entry.2 => {
                    *entry = (key, value, false);
                    self.size += 1;
                    return;
                }
                Some(entry) if entry.0 == key => {
                    entry.1 = value;
                    return;
                }
                Some(_) => {}
            }
        }
        panic!("naive table found no slot");
    }

    fn find(&self, key: &str) -> Option<usize> {
        let cap = self.slots.len();
        let home = self.home(key);
        for k in 0..cap {
            let i = (home + k * k) % cap;
            match &self.slots[i] {
                None => return None,
                Some((kk, _, false)) if kk == key => return Some(i),
                Some(_) => {}
            }
        }
        None
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.find(key) {
            Some(i) => {
                if let Some(slot) = self.slots[i].as_mut() {
                    slot.2 = true;
                }
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    fn resize(&mut self, new_capacity: usize) {
        if new_capacity < self.size {
            return;
        }
        let live: Vec<(String, i32)> = self
            .slots
            .drain(..)
            .flatten()
            .filter(|s| !s.2)
            .map(|(k, v, _)| (k, v))
            .collect();
        self.slots = vec![None; next_prime(new_capacity)];
        self.size = 0;
        for (k, v) in live {
            self.put(k, v);
        }
    }

    fn live(&self) -> Vec<(String, i32)> {
        self.slots
            .iter()
            .flatten()
            .filter(|s| !s.2)
            .map(|(k, v, _)| (k.clone(), *v))
            .collect()
    }

    fn tombstones(&self) -> usize {
        self.slots.iter().flatten().filter(|s| s.2).count()
    }
}

#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Resize(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, usize, Vec<Op>)> {
    // A tiny alphabet makes CharSum collide constantly.
    (proptest::collection::vec("[abc]{1,3}", 1..=12), 0usize..24).prop_flat_map(
        |(pool, capacity)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
                3 => idx.clone().prop_map(Op::Remove),
                3 => idx.prop_map(Op::Get),
                1 => (0usize..48).prop_map(Op::Resize),
                1 => Just(Op::Clear),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), capacity, ops))
        },
    )
}

fn live_pairs(m: &ProbingMap<String, i32>) -> Vec<(String, i32)> {
    m.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

// Property: slot-for-slot equivalence with the naive reference table.
// Invariants exercised across random operation sequences:
// - Same capacity (always prime), same live entries in the same slot order.
// - Same tombstone count; `len` equals the number of live slots.
// - `get`/`contains_key`/`remove` agree, including keys shadowed by a
//   reused tombstone.
// - `empty_buckets == capacity - len`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_naive_table((pool, capacity, ops) in arb_scenario()) {
        let mut sut: ProbingMap<String, i32> = ProbingMap::with_capacity(capacity);
        let mut naive = NaiveTable::new(capacity);

        for op in ops {
            match op {
                Op::Put(i, v) => {
                    sut.put(pool[i].clone(), v);
                    naive.put(pool[i].clone(), v);
                    prop_assert_eq!(sut.get(pool[i].as_str()), Some(&v));
                }
                Op::Remove(i) => {
                    prop_assert_eq!(sut.remove(pool[i].as_str()), naive.remove(&pool[i]));
                }
                Op::Get(i) => {
                    let want = naive.find(&pool[i]).and_then(|s| naive.slots[s].as_ref().map(|e| e.1));
                    prop_assert_eq!(sut.get(pool[i].as_str()).copied(), want);
                    prop_assert_eq!(sut.contains_key(pool[i].as_str()), want.is_some());
                }
                Op::Resize(c) => {
                    sut.resize_table(c);
                    naive.resize(c);
                }
                Op::Clear => {
                    let cap = sut.capacity();
                    sut.clear();
                    naive = NaiveTable { slots: vec![None; cap], size: 0 };
                }
            }

            prop_assert!(is_prime(sut.capacity()));
            prop_assert_eq!(sut.capacity(), naive.slots.len());
            prop_assert_eq!(sut.len(), naive.size);
            prop_assert_eq!(sut.tombstones(), naive.tombstones());
            prop_assert_eq!(sut.empty_buckets(), sut.capacity() - sut.len());
            prop_assert_eq!(live_pairs(&sut), naive.live());
            prop_assert_eq!(sut.iter().count(), sut.len());
        }
    }
}

// Property: every entry survives a resize to any size the table accepts,
// and the table never holds more live entries than half its slots plus one.
proptest! {
    #[test]
    fn prop_resize_preserves_entries(
        keys in proptest::collection::btree_set("[a-z]{1,6}", 0..60),
        target in 0usize..200,
    ) {
        let mut m: ProbingMap<String, usize> = ProbingMap::with_capacity(3);
        for (i, k) in keys.iter().enumerate() {
            m.put(k.clone(), i);
            prop_assert!(2 * m.len() <= m.capacity() + 1);
        }
        let mut before = live_pairs_usize(&m);
        m.resize_table(target);
        let mut after = live_pairs_usize(&m);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
        prop_assert!(is_prime(m.capacity()));
        if target >= keys.len() {
            prop_assert!(m.capacity() >= next_prime(target));
        }
        prop_assert_eq!(m.tombstones(), 0);
    }
}

fn live_pairs_usize(m: &ProbingMap<String, usize>) -> Vec<(String, usize)> {
    m.iter().map(|(k, v)| (k.clone(), *v)).collect()
}
