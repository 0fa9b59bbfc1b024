//! In-memory [`GraphStore`] backed by adjacency lists.

use crate::community::{GraphStore, VertexKey, VertexStream};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Default number of keys per stream batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Undirected multigraph held in memory.
///
/// Vertices stream in ascending key order; neighbor lists keep edge
/// insertion order. A self-loop adds its vertex to its own list twice.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    adjacency: BTreeMap<VertexKey, Vec<VertexKey>>,
    edge_count: usize,
    batch_size: usize,
}

impl MemoryGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
            edge_count: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Graph holding the given undirected edges and their endpoints.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexKey, VertexKey)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Set the number of keys per stream batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter {
                name: "batch_size",
                message: "must be at least 1",
            });
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Add `vertex` without edges if absent.
    pub fn add_vertex(&mut self, vertex: VertexKey) {
        let _ = self.adjacency.entry(vertex).or_default();
    }

    /// Add an undirected edge; parallel edges are kept.
    pub fn add_edge(&mut self, a: VertexKey, b: VertexKey) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
        self.edge_count += 1;
    }

    /// Vertex keys in stream order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.adjacency.keys().copied()
    }

    fn adjacent(&self, vertex: VertexKey) -> Result<&[VertexKey]> {
        self.adjacency
            .get(&vertex)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownVertex { key: vertex })
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Batched cursor over a snapshot of vertex keys.
#[derive(Debug, Clone)]
pub struct BatchStream {
    keys: Vec<VertexKey>,
    batch_size: usize,
    offset: usize,
}

impl BatchStream {
    /// Stream over `keys`, `batch_size` at a time.
    pub fn new(keys: Vec<VertexKey>, batch_size: usize) -> Self {
        Self {
            keys,
            batch_size: batch_size.max(1),
            offset: 0,
        }
    }
}

impl VertexStream for BatchStream {
    fn seek_to_first(&mut self) -> Result<()> {
        self.offset = 0;
        Ok(())
    }

    fn seek_to_next_batch(&mut self) -> Result<()> {
        self.offset = (self.offset + self.batch_size).min(self.keys.len());
        Ok(())
    }

    fn keys_batch(&self) -> &[VertexKey] {
        let end = (self.offset + self.batch_size).min(self.keys.len());
        &self.keys[self.offset..end]
    }

    fn is_end(&self) -> bool {
        self.offset >= self.keys.len()
    }
}

impl GraphStore for MemoryGraph {
    type Stream<'s>
        = BatchStream
    where
        Self: 's;

    fn vertex_stream(&self) -> Result<BatchStream> {
        Ok(BatchStream::new(self.vertices().collect(), self.batch_size))
    }

    fn neighbors(&self, vertex: VertexKey) -> Result<Vec<VertexKey>> {
        Ok(self.adjacent(vertex)?.to_vec())
    }

    fn degrees(&self, vertices: &[VertexKey]) -> Result<Vec<f64>> {
        vertices
            .iter()
            .map(|&vertex| Ok(self.adjacent(vertex)?.len() as f64))
            .collect()
    }

    fn number_of_vertices(&self) -> Result<usize> {
        Ok(self.adjacency.len())
    }

    fn number_of_edges(&self) -> Result<usize> {
        Ok(self.edge_count)
    }
}
