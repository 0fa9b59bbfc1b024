//! Community detection for graphs that live in a store.
//!
//! Given a graph, find natural groupings where nodes within groups are
//! densely connected, and connections between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! Louvain optimizes **modularity** Q, which compares the actual number of
//! edges within communities to the expected number in a random graph with
//! the same degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - m = total edge weight (sum of all edges)
//! - A_ij = edge weight between i and j
//! - k_i = degree of node i
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! The optimizer never evaluates Q directly. It tracks per-community degree
//! aggregates and computes the *change* in Q for each candidate move, which
//! keeps every vertex visit proportional to its degree.
//!
//! ## Layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`partition`] | partition + vertex/community degrees |
//! | [`local_move`] | greedy local moves (phase 1) |
//! | [`modularity`] | level score and textbook modularity |
//! | [`induce`] | community super-graph (phase 2) |
//! | [`hierarchy`] | retained levels and their composition |
//! | [`Louvain`] | the level loop |
//!
//! Phase 1 and phase 2 are written once against [`WeightedGraph`]. The
//! original graph is read through a [`GraphStore`] via [`StoreView`];
//! coarser levels are [`InducedGraph`]s.
//!
//! ## Usage
//!
//! ```rust
//! use louvain_store::community::Louvain;
//! use louvain_store::store::MemoryGraph;
//!
//! let graph = MemoryGraph::from_edges([
//!     (1, 2), (1, 3), (2, 3),
//!     (4, 5), (4, 6), (5, 6),
//!     (3, 4),
//! ]);
//!
//! let partition = Louvain::new().best_partition(&graph).unwrap();
//! assert_eq!(partition[&1], partition[&2]);
//! assert_ne!(partition[&1], partition[&4]);
//! ```
//!
//! ## References
//!
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

pub mod hierarchy;
pub mod induce;
pub mod local_move;
mod louvain;
pub mod modularity;
pub mod partition;
mod traits;
mod view;

pub use hierarchy::{Level, PartitionHierarchy};
pub use induce::{induce, InducedGraph};
pub use louvain::{best_partition, Louvain, DEFAULT_MIN_MODULARITY_GROWTH};
pub use modularity::standard_modularity;
pub use partition::{CommunityDegree, DegreeState, Partition};
pub use traits::{CommunityDetection, GraphStore, VertexKey, VertexStream, WeightedGraph};
pub use view::StoreView;
