//! Graph stores usable as Louvain input.
//!
//! Real deployments implement [`GraphStore`](crate::community::GraphStore)
//! over their storage engine. The stores here cover tests, demos and graphs
//! that already fit in memory:
//!
//! - [`MemoryGraph`]: adjacency lists keyed by [`VertexKey`](crate::community::VertexKey)
//! - `petgraph::graph::UnGraph`: node indices as keys, edge weights ignored

mod memory;
mod petgraph_store;

pub use memory::{BatchStream, MemoryGraph, DEFAULT_BATCH_SIZE};
