// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node and link sets fed to the simulation.

use alloc::{vec, vec::Vec};
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use tracing::debug;

/// An undirected graph over caller-chosen keys.
///
/// Construction is forgiving: repeated nodes keep their first position,
/// self-loops and repeated links (in either direction) are dropped, and links
/// naming unknown nodes are ignored.
#[derive(Clone, Debug)]
pub struct Graph<K> {
    keys: Vec<K>,
    index: HashMap<K, usize>,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) degree: Vec<usize>,
}

impl<K: Copy + Eq + Hash + Debug> Graph<K> {
    /// Build a graph from nodes and `(source, target)` links.
    pub fn new(
        nodes: impl IntoIterator<Item = K>,
        links: impl IntoIterator<Item = (K, K)>,
    ) -> Self {
        let mut keys = Vec::new();
        let mut index = HashMap::new();
        for key in nodes {
            if let Entry::Vacant(slot) = index.entry(key) {
                slot.insert(keys.len());
                keys.push(key);
            }
        }

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut degree = vec![0; keys.len()];
        let mut dropped = 0_usize;
        for (source, target) in links {
            let (Some(&s), Some(&t)) = (index.get(&source), index.get(&target)) else {
                dropped += 1;
                continue;
            };
            if s == t || !seen.insert((s.min(t), s.max(t))) {
                dropped += 1;
                continue;
            }
            edges.push((s, t));
            degree[s] += 1;
            degree[t] += 1;
        }
        if dropped > 0 {
            debug!(dropped, "ignored self-loops, repeated and dangling links");
        }

        Self {
            keys,
            index,
            edges,
            degree,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Node keys in insertion order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns true if `key` is a node of the graph.
    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    pub(crate) fn index_of(&self, key: K) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Kept links as `(source, target)` pairs.
    pub fn links(&self) -> impl Iterator<Item = (K, K)> + '_ {
        self.edges
            .iter()
            .map(|&(s, t)| (self.keys[s], self.keys[t]))
    }

    /// Number of kept links.
    pub fn link_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of links touching `key`.
    pub fn degree(&self, key: K) -> usize {
        self.index_of(key).map_or(0, |i| self.degree[i])
    }
}
