//! [`GraphStore`] for `petgraph` undirected graphs.
//!
//! Vertex keys are node indices. Edge weights are ignored: every edge counts
//! once, like an edge of an external store.

use super::memory::{BatchStream, DEFAULT_BATCH_SIZE};
use crate::community::{GraphStore, VertexKey};
use crate::error::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

fn node_index<N, E>(graph: &UnGraph<N, E>, vertex: VertexKey) -> Result<NodeIndex> {
    usize::try_from(vertex)
        .ok()
        .filter(|&index| index < graph.node_count())
        .map(NodeIndex::new)
        .ok_or(Error::UnknownVertex { key: vertex })
}

impl<N, E> GraphStore for UnGraph<N, E> {
    type Stream<'s>
        = BatchStream
    where
        Self: 's;

    fn vertex_stream(&self) -> Result<BatchStream> {
        let keys = (0..self.node_count() as VertexKey).collect();
        Ok(BatchStream::new(keys, DEFAULT_BATCH_SIZE))
    }

    fn neighbors(&self, vertex: VertexKey) -> Result<Vec<VertexKey>> {
        let node = node_index(self, vertex)?;
        let mut out = Vec::new();
        for edge in self.edges(node) {
            let (source, target) = (edge.source(), edge.target());
            if source == target {
                // petgraph yields a self-loop once; list it twice like any store.
                out.push(source.index() as VertexKey);
                out.push(source.index() as VertexKey);
            } else {
                let other = if source == node { target } else { source };
                out.push(other.index() as VertexKey);
            }
        }
        Ok(out)
    }

    fn degrees(&self, vertices: &[VertexKey]) -> Result<Vec<f64>> {
        vertices
            .iter()
            .map(|&vertex| Ok(GraphStore::neighbors(self, vertex)?.len() as f64))
            .collect()
    }

    fn number_of_vertices(&self) -> Result<usize> {
        Ok(self.node_count())
    }

    fn number_of_edges(&self) -> Result<usize> {
        Ok(self.edge_count())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::community::VertexStream;

    #[test]
    fn test_neighbors_and_degrees() {
        let mut graph = UnGraph::<(), f32>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, 0.5);
        graph.add_edge(b, c, 2.0);
        graph.add_edge(c, c, 1.0);

        let mut around_b = GraphStore::neighbors(&graph, 1).unwrap();
        around_b.sort_unstable();
        assert_eq!(around_b, vec![0, 2]);

        let mut around_c = GraphStore::neighbors(&graph, 2).unwrap();
        around_c.sort_unstable();
        assert_eq!(around_c, vec![1, 2, 2]);

        assert_eq!(graph.degrees(&[0, 1, 2]).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(GraphStore::number_of_edges(&graph).unwrap(), 3);
    }

    #[test]
    fn test_stream_covers_indices() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        for _ in 0..3 {
            graph.add_node(());
        }
        let stream = graph.vertex_stream().unwrap();
        assert_eq!(stream.keys_batch(), &[0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_vertex() {
        let graph = UnGraph::<(), ()>::new_undirected();
        assert_eq!(
            GraphStore::neighbors(&graph, 0).unwrap_err(),
            Error::UnknownVertex { key: 0 }
        );
    }
}
