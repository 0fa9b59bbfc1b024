//! Graph induction: collapse each community into a single node.

use super::partition::Partition;
use super::traits::{VertexKey, WeightedGraph};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Weighted super-graph whose nodes are the communities of a finer level.
///
/// The adjacency never holds self-loops. Weight between members of the same
/// community is kept per node as internal weight: it counts toward the
/// node's degree but is never offered as a neighbor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InducedGraph {
    adjacency: BTreeMap<VertexKey, BTreeMap<VertexKey, f64>>,
    internal: BTreeMap<VertexKey, f64>,
}

impl InducedGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` with no neighbors if absent.
    pub fn add_node(&mut self, node: VertexKey) {
        let _ = self.adjacency.entry(node).or_default();
        let _ = self.internal.entry(node).or_insert(0.0);
    }

    /// Accumulate `weight` on the directed entry `from -> to`.
    ///
    /// `from == to` folds the weight into the node's internal weight.
    pub fn add_weight(&mut self, from: VertexKey, to: VertexKey, weight: f64) {
        self.add_node(from);
        self.add_node(to);
        if from == to {
            self.add_internal(from, weight);
            return;
        }
        let row = self.adjacency.entry(from).or_default();
        *row.entry(to).or_insert(0.0) += weight;
    }

    /// Accumulate `weight` on both `a -> b` and `b -> a`.
    pub fn add_edge(&mut self, a: VertexKey, b: VertexKey, weight: f64) {
        self.add_weight(a, b, weight);
        self.add_weight(b, a, weight);
    }

    /// Accumulate internal weight on `node`.
    pub fn add_internal(&mut self, node: VertexKey, weight: f64) {
        self.add_node(node);
        *self.internal.entry(node).or_insert(0.0) += weight;
    }

    /// Node keys in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// True if the graph has no node.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Outgoing entries of `node`, ordered by neighbor key.
    pub fn neighbors(&self, node: VertexKey) -> Option<&BTreeMap<VertexKey, f64>> {
        self.adjacency.get(&node)
    }

    /// Accumulated weight on `from -> to` (0 if absent).
    pub fn weight(&self, from: VertexKey, to: VertexKey) -> f64 {
        self.adjacency
            .get(&from)
            .and_then(|row| row.get(&to))
            .copied()
            .unwrap_or(0.0)
    }

    /// Internal weight of `node` (0 if absent).
    pub fn internal(&self, node: VertexKey) -> f64 {
        self.internal.get(&node).copied().unwrap_or(0.0)
    }

    /// Out-weight plus internal weight of `node`.
    pub fn degree(&self, node: VertexKey) -> f64 {
        let out: f64 = self
            .adjacency
            .get(&node)
            .map(|row| row.values().sum())
            .unwrap_or(0.0);
        out + self.internal(node)
    }

    /// Sum of all node degrees.
    pub fn degree_sum(&self) -> f64 {
        self.nodes().map(|node| self.degree(node)).sum()
    }

    /// Total edge weight `m` of this level (half the degree sum).
    pub fn edge_weight(&self) -> f64 {
        self.degree_sum() / 2.0
    }

    /// Weight of edges between distinct nodes, each undirected edge once.
    pub fn cross_weight(&self) -> f64 {
        let out: f64 = self.adjacency.values().flat_map(|row| row.values()).sum();
        out / 2.0
    }

    /// Sum of internal weights over all nodes.
    pub fn internal_weight(&self) -> f64 {
        self.internal.values().sum()
    }
}

impl WeightedGraph for InducedGraph {
    fn for_each_vertex<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(VertexKey, &[(VertexKey, f64)]) -> Result<()>,
    {
        let mut scratch: Vec<(VertexKey, f64)> = Vec::new();
        for (&node, row) in &self.adjacency {
            scratch.clear();
            scratch.extend(row.iter().map(|(&neighbor, &weight)| (neighbor, weight)));
            visit(node, &scratch)?;
        }
        Ok(())
    }

    fn internal_weight(&self, vertex: VertexKey) -> f64 {
        self.internal(vertex)
    }
}

fn community(partition: &Partition, vertex: VertexKey) -> Result<VertexKey> {
    partition
        .get(&vertex)
        .copied()
        .ok_or(Error::UnknownVertex { key: vertex })
}

/// Build the super-graph of `graph` under `partition`.
///
/// Every community in `partition` becomes a node, even when it has no
/// outgoing weight. An entry `(u, v, w)` with both ends in the same community
/// is added to that community's internal weight; otherwise `w` accumulates on
/// `community(u) -> community(v)`. Neighbor lists are symmetric, so the
/// result is too.
pub fn induce<G: WeightedGraph>(graph: &mut G, partition: &Partition) -> Result<InducedGraph> {
    let mut induced = InducedGraph::new();
    for (&vertex, &owner) in partition {
        induced.add_internal(owner, graph.internal_weight(vertex));
    }

    graph.for_each_vertex(|vertex, neighbors| {
        let owner = community(partition, vertex)?;
        for &(neighbor, weight) in neighbors {
            let other = community(partition, neighbor)?;
            if owner == other {
                induced.add_internal(owner, weight);
            } else {
                induced.add_weight(owner, other, weight);
            }
        }
        Ok(())
    })?;

    Ok(induced)
}
