//! Partition and degree bookkeeping for one level of the hierarchy.

use super::induce::InducedGraph;
use super::traits::VertexKey;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Vertex key to community key.
///
/// Ordered so that every scan over it (and every floating-point sum taken
/// along it) happens in the same order on every run.
pub type Partition = BTreeMap<VertexKey, VertexKey>;

/// Aggregate degrees of one community.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommunityDegree {
    /// Weight of member edges landing inside the community, maintained incrementally.
    pub in_degree: f64,
    /// Sum of member weighted degrees.
    pub tot_degree: f64,
}

/// Partition plus per-vertex and per-community degrees.
///
/// Every community key present in `partition` has an entry in `communities`.
#[derive(Debug, Clone, Default)]
pub struct DegreeState {
    /// Current community of every vertex.
    pub partition: Partition,
    /// Weighted degree of every vertex.
    pub degrees: HashMap<VertexKey, f64>,
    /// Aggregates of every community.
    pub communities: HashMap<VertexKey, CommunityDegree>,
}

impl DegreeState {
    /// Empty state with room for `n` vertices.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            partition: Partition::new(),
            degrees: HashMap::with_capacity(n),
            communities: HashMap::with_capacity(n),
        }
    }

    /// Identity partition over the nodes of an induced graph.
    ///
    /// A node's degree is its out-weight plus its internal weight; the
    /// internal weight also seeds the community's `in_degree`.
    pub fn from_induced(graph: &InducedGraph) -> Self {
        let mut state = Self::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let internal = graph.internal(node);
            state.seed(node, graph.degree(node), internal);
        }
        state
    }

    /// Add one vertex as its own community.
    pub fn insert(&mut self, vertex: VertexKey, degree: f64) -> Result<()> {
        if !degree.is_finite() || degree < 0.0 {
            return Err(Error::InvalidDegree {
                key: vertex,
                degree,
            });
        }
        self.seed(vertex, degree, 0.0);
        Ok(())
    }

    /// Add a batch of vertices with their degrees, as returned by a store.
    pub fn insert_batch(&mut self, vertices: &[VertexKey], degrees: &[f64]) -> Result<()> {
        if vertices.len() != degrees.len() {
            return Err(Error::DimensionMismatch {
                expected: vertices.len(),
                found: degrees.len(),
            });
        }
        for (&vertex, &degree) in vertices.iter().zip(degrees) {
            self.insert(vertex, degree)?;
        }
        Ok(())
    }

    fn seed(&mut self, vertex: VertexKey, degree: f64, internal: f64) {
        let _ = self.partition.insert(vertex, vertex);
        let _ = self.degrees.insert(vertex, degree);
        let _ = self.communities.insert(
            vertex,
            CommunityDegree {
                in_degree: internal,
                tot_degree: degree,
            },
        );
    }

    /// Number of vertices tracked.
    pub fn len(&self) -> usize {
        self.partition.len()
    }

    /// True if no vertex is tracked.
    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }

    /// Current community of `vertex`.
    pub fn community_of(&self, vertex: VertexKey) -> Result<VertexKey> {
        self.partition
            .get(&vertex)
            .copied()
            .ok_or(Error::UnknownVertex { key: vertex })
    }

    /// Weighted degree of `vertex`.
    pub fn degree_of(&self, vertex: VertexKey) -> Result<f64> {
        self.degrees
            .get(&vertex)
            .copied()
            .ok_or(Error::UnknownVertex { key: vertex })
    }

    /// Aggregates of `community`.
    pub fn community(&self, community: VertexKey) -> Result<CommunityDegree> {
        self.communities
            .get(&community)
            .copied()
            .ok_or(Error::UnknownVertex { key: community })
    }

    /// Sum of all vertex degrees.
    pub fn degree_sum(&self) -> f64 {
        self.partition
            .keys()
            .filter_map(|vertex| self.degrees.get(vertex))
            .sum()
    }

    /// Move `vertex` (degree `k_i`) from `from` to `to`.
    ///
    /// `k_from` and `k_to` are the vertex's edge weights into the old and the
    /// new community, measured before the move.
    pub(crate) fn move_vertex(
        &mut self,
        vertex: VertexKey,
        k_i: f64,
        from: (VertexKey, f64),
        to: (VertexKey, f64),
    ) {
        let (old, k_old) = from;
        let (new, k_new) = to;
        {
            let record = self.communities.entry(old).or_default();
            record.tot_degree -= k_i - k_old;
            record.in_degree -= k_old;
        }
        {
            let record = self.communities.entry(new).or_default();
            record.tot_degree += k_i - k_new;
            record.in_degree += k_new;
        }
        let _ = self.partition.insert(vertex, new);
    }

    /// Number of distinct communities.
    pub fn community_count(&self) -> usize {
        let mut seen: Vec<VertexKey> = self.partition.values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
