//! Community detection traits and the graph store capability.

use crate::error::Result;
use petgraph::graph::UnGraph;

/// Identifier of a vertex (or of a community, named by its representative vertex).
pub type VertexKey = u64;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph.
    ///
    /// Returns a mapping from node index to community ID.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>;

    /// Get the resolution parameter (if applicable).
    fn resolution(&self) -> f64 {
        1.0
    }
}

/// Restartable cursor over the vertex keys of a graph store, read in batches.
///
/// A freshly created stream is positioned on its first batch.
pub trait VertexStream {
    /// Rewind to the first batch. Must be repeatable any number of times.
    fn seek_to_first(&mut self) -> Result<()>;

    /// Advance to the next batch.
    fn seek_to_next_batch(&mut self) -> Result<()>;

    /// Keys of the current batch. Empty once the stream is exhausted.
    fn keys_batch(&self) -> &[VertexKey];

    /// True once every batch has been consumed.
    fn is_end(&self) -> bool;
}

/// Read-only capability exposed by an external graph store.
///
/// Edges are undirected and unweighted: every incident edge of a vertex
/// appears once in its neighbor list (self-loops appear twice), so
/// `neighbors(v).len() == degrees(&[v])[0]`.
pub trait GraphStore {
    /// Cursor type produced by [`GraphStore::vertex_stream`].
    type Stream<'s>: VertexStream
    where
        Self: 's;

    /// Open a stream over every vertex key.
    fn vertex_stream(&self) -> Result<Self::Stream<'_>>;

    /// One entry per incident edge, multiplicities preserved.
    fn neighbors(&self, vertex: VertexKey) -> Result<Vec<VertexKey>>;

    /// Degree of every vertex in `vertices`, same order.
    fn degrees(&self, vertices: &[VertexKey]) -> Result<Vec<f64>>;

    /// Number of vertices in the whole graph.
    fn number_of_vertices(&self) -> Result<usize>;

    /// Number of (undirected) edges in the whole graph.
    fn number_of_edges(&self) -> Result<usize>;
}

/// Sequential scan over a weighted graph, shared by the local move optimizer
/// and the graph inducer so that each is written once for both the
/// store-backed and the in-memory representation.
pub trait WeightedGraph {
    /// Visit every vertex with its weighted neighbor entries.
    ///
    /// Vertex order and neighbor order must be the same on every call.
    /// Self-weight that is not listed as a neighbor is reported by
    /// [`WeightedGraph::internal_weight`] instead.
    fn for_each_vertex<F>(&mut self, visit: F) -> Result<()>
    where
        F: FnMut(VertexKey, &[(VertexKey, f64)]) -> Result<()>;

    /// Weight folded into `vertex` by earlier coarsening.
    fn internal_weight(&self, _vertex: VertexKey) -> f64 {
        0.0
    }
}
