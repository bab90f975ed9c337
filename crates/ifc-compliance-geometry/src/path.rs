// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shortest travel paths over a connectivity graph

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Undirected graph with physical distances as edge weights
///
/// Nodes are element ids (spaces, doors); edges are walkable links between
/// them. Node and neighbor order follow insertion order, which keeps path
/// selection deterministic when several paths have the same length.
#[derive(Clone, Debug)]
pub struct ConnectivityGraph<N> {
    nodes: Vec<N>,
    index: FxHashMap<N, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_count: usize,
}

/// A path found by [`ConnectivityGraph::shortest_path`]
#[derive(Clone, Debug, PartialEq)]
pub struct TravelPath<N> {
    /// Visited nodes, start first
    pub nodes: Vec<N>,
    /// Sum of edge weights along the path
    pub distance: f64,
}

#[derive(Debug)]
struct QueueEntry {
    idx: usize,
    cost: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on cost, lower index first on ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl<N: Copy + Eq + Hash> Default for ConnectivityGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash> ConnectivityGraph<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    /// Add a node, returning its index; adding an existing node is a no-op
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(node, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Link two nodes in both directions, adding them if needed
    ///
    /// # Errors
    /// `Degenerate` for a negative or non-finite weight.
    pub fn add_edge(&mut self, a: N, b: N, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::degenerate(format!("invalid edge weight {weight}")));
        }
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        self.adjacency[ia].push((ib, weight));
        if ia != ib {
            self.adjacency[ib].push((ia, weight));
        }
        self.edge_count += 1;
        Ok(())
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Neighbors of a node with edge weights
    pub fn neighbors(&self, node: &N) -> Vec<(N, f64)> {
        self.index
            .get(node)
            .map(|&idx| {
                self.adjacency[idx]
                    .iter()
                    .map(|&(j, w)| (self.nodes[j], w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shortest path between two nodes (Dijkstra)
    ///
    /// `None` when either node is absent or no path connects them. A path
    /// from a node to itself is `Some` with distance 0.
    pub fn shortest_path(&self, start: &N, end: &N) -> Option<TravelPath<N>> {
        let end_idx = *self.index.get(end)?;
        self.search(start, |idx| idx == end_idx)
    }

    /// Length of the shortest path, `None` when unreachable
    pub fn shortest_path_distance(&self, start: &N, end: &N) -> Option<f64> {
        self.shortest_path(start, end).map(|p| p.distance)
    }

    /// Shortest path from `start` to whichever of `targets` is closest
    pub fn nearest_target(&self, start: &N, targets: &[N]) -> Option<TravelPath<N>> {
        let mut is_target = vec![false; self.nodes.len()];
        for target in targets {
            if let Some(&idx) = self.index.get(target) {
                is_target[idx] = true;
            }
        }
        self.search(start, |idx| is_target[idx])
    }

    fn search(&self, start: &N, is_target: impl Fn(usize) -> bool) -> Option<TravelPath<N>> {
        let start_idx = *self.index.get(start)?;
        let n = self.nodes.len();

        let mut dist = vec![f64::INFINITY; n];
        let mut came_from = vec![usize::MAX; n];
        let mut settled = vec![false; n];
        let mut open = BinaryHeap::new();

        dist[start_idx] = 0.0;
        open.push(QueueEntry {
            idx: start_idx,
            cost: 0.0,
        });

        while let Some(QueueEntry { idx, cost }) = open.pop() {
            if settled[idx] {
                continue;
            }
            settled[idx] = true;

            if is_target(idx) {
                let mut nodes = Vec::new();
                let mut c = idx;
                while c != usize::MAX {
                    nodes.push(self.nodes[c]);
                    c = came_from[c];
                }
                nodes.reverse();
                return Some(TravelPath {
                    nodes,
                    distance: cost,
                });
            }

            for &(next, weight) in &self.adjacency[idx] {
                if settled[next] {
                    continue;
                }
                let tentative = cost + weight;
                if tentative < dist[next] {
                    dist[next] = tentative;
                    came_from[next] = idx;
                    open.push(QueueEntry {
                        idx: next,
                        cost: tentative,
                    });
                }
            }
        }

        None
    }
}
