//! Store-backed scan over an external graph.

use super::traits::{GraphStore, VertexKey, VertexStream, WeightedGraph};
use crate::error::Result;

/// [`WeightedGraph`] over a [`GraphStore`].
///
/// Holds one vertex stream for its whole lifetime and rewinds it at the
/// start of every scan. Each scan issues exactly one `neighbors` query per
/// vertex; every neighbor entry carries weight `1.0`.
pub struct StoreView<'a, S: GraphStore + 'a> {
    store: &'a S,
    stream: S::Stream<'a>,
    scratch: Vec<(VertexKey, f64)>,
}

impl<'a, S: GraphStore + 'a> StoreView<'a, S> {
    /// Open a vertex stream on `store`.
    pub fn open(store: &'a S) -> Result<Self> {
        let stream = store.vertex_stream()?;
        Ok(Self {
            store,
            stream,
            scratch: Vec::new(),
        })
    }

    /// Visit every batch of vertex keys from the start of the stream.
    pub fn for_each_batch<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&[VertexKey]) -> Result<()>,
    {
        self.stream.seek_to_first()?;
        while !self.stream.is_end() {
            visit(self.stream.keys_batch())?;
            self.stream.seek_to_next_batch()?;
        }
        Ok(())
    }
}

impl<'a, S: GraphStore + 'a> WeightedGraph for StoreView<'a, S> {
    fn for_each_vertex<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(VertexKey, &[(VertexKey, f64)]) -> Result<()>,
    {
        self.stream.seek_to_first()?;
        while !self.stream.is_end() {
            for &vertex in self.stream.keys_batch() {
                let neighbors = self.store.neighbors(vertex)?;
                self.scratch.clear();
                self.scratch
                    .extend(neighbors.into_iter().map(|neighbor| (neighbor, 1.0)));
                visit(vertex, &self.scratch)?;
            }
            self.stream.seek_to_next_batch()?;
        }
        Ok(())
    }
}
