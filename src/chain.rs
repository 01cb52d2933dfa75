//! Bucket array for separate chaining.
//!
//! Every bucket is the head of a singly-linked chain. Chain nodes for all
//! buckets live in one `SlotMap` arena and link to each other through
//! generational keys, so the whole array is plain safe indexing and a stale
//! link can never alias a node created later.

use core::borrow::Borrow;
use slotmap::{DefaultKey, SlotMap};

type Link = Option<DefaultKey>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    next: Link,
}

/// Fixed-length array of chains; its length never changes after construction.
pub(crate) struct ChainBuckets<K, V> {
    heads: Vec<Link>,
    nodes: SlotMap<DefaultKey, Node<K, V>>,
}

impl<K, V> ChainBuckets<K, V> {
    pub fn new(len: usize) -> Self {
        Self {
            heads: vec![None; len],
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Total number of entries across all chains.
    pub fn entries(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty_chain(&self, bucket: usize) -> bool {
        self.heads[bucket].is_none()
    }

    #[cfg(test)]
    pub fn chain_len(&self, bucket: usize) -> usize {
        self.chain(bucket).count()
    }

    fn node(&self, link: DefaultKey) -> &Node<K, V> {
        self.nodes
            .get(link)
            .expect("chain link must point at a live node")
    }

    fn node_mut(&mut self, link: DefaultKey) -> &mut Node<K, V> {
        self.nodes
            .get_mut(link)
            .expect("chain link must point at a live node")
    }

    fn find_link<Q>(&self, bucket: usize, q: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.heads[bucket];
        while let Some(link) = cur {
            let node = self.node(link);
            if node.key.borrow() == q {
                return Some(link);
            }
            cur = node.next;
        }
        None
    }

    pub fn find<Q>(&self, bucket: usize, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let link = self.find_link(bucket, q)?;
        let node = self.node(link);
        Some((&node.key, &node.value))
    }

    pub fn find_mut<Q>(&mut self, bucket: usize, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let link = self.find_link(bucket, q)?;
        Some(&mut self.node_mut(link).value)
    }

    /// Overwrites the value of `key` in `bucket`, or appends a new node at
    /// the chain tail. Returns `true` if a node was appended.
    pub fn upsert(&mut self, bucket: usize, key: K, value: V) -> bool
    where
        K: Eq,
    {
        let mut tail: Link = None;
        let mut cur = self.heads[bucket];
        while let Some(link) = cur {
            let node = self.node_mut(link);
            if node.key == key {
                node.value = value;
                return false;
            }
            tail = Some(link);
            cur = node.next;
        }

        let new = self.nodes.insert(Node {
            key,
            value,
            next: None,
        });
        match tail {
            Some(link) => self.node_mut(link).next = Some(new),
            None => self.heads[bucket] = Some(new),
        }
        true
    }

    /// Unlinks the first node in `bucket` whose key matches.
    pub fn remove<Q>(&mut self, bucket: usize, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut prev: Link = None;
        let mut cur = self.heads[bucket];
        while let Some(link) = cur {
            let node = self.node(link);
            if node.key.borrow() == q {
                let next = node.next;
                match prev {
                    Some(p) => self.node_mut(p).next = next,
                    None => self.heads[bucket] = next,
                }
                let node = self
                    .nodes
                    .remove(link)
                    .expect("unlinked node must still be in the arena");
                return Some((node.key, node.value));
            }
            prev = Some(link);
            cur = node.next;
        }
        None
    }

    /// Forward traversal of one chain.
    pub fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            nodes: &self.nodes,
            cur: self.heads[bucket],
        }
    }

    /// Every entry, bucket by bucket, each chain front to back.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self,
            next_bucket: 0,
            chain: None,
        }
    }

    /// Mutable counterpart of [`ChainBuckets::iter`]; order is arena order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.nodes
            .values_mut()
            .map(|node| (&node.key, &mut node.value))
    }

    /// Consumes the array, yielding owned entries in bucket then chain order.
    pub fn into_entries(mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for bucket in 0..self.heads.len() {
            let mut cur = self.heads[bucket].take();
            while let Some(link) = cur {
                let node = self
                    .nodes
                    .remove(link)
                    .expect("chain link must point at a live node");
                cur = node.next;
                out.push((node.key, node.value));
            }
        }
        debug_assert!(self.nodes.is_empty(), "every node belongs to a chain");
        out
    }
}

/// Iterator over a single chain.
pub(crate) struct Chain<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    cur: Link,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cur?;
        let node = self
            .nodes
            .get(link)
            .expect("chain link must point at a live node");
        self.cur = node.next;
        Some((&node.key, &node.value))
    }
}

/// Iterator over every chain of a [`ChainBuckets`] in bucket order.
pub(crate) struct Iter<'a, K, V> {
    buckets: &'a ChainBuckets<K, V>,
    next_bucket: usize,
    chain: Option<Chain<'a, K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(|c| c.next()) {
                return Some(item);
            }
            if self.next_bucket >= self.buckets.len() {
                return None;
            }
            self.chain = Some(self.buckets.chain(self.next_bucket));
            self.next_bucket += 1;
        }
    }
}
