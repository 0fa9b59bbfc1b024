//! # louvain-store
//!
//! Multi-level Louvain community detection over graphs held in an external
//! store.
//!
//! The original graph is never loaded as a whole: level 0 streams vertex
//! keys in batches from a [`GraphStore`] and asks it for neighbors one vertex
//! at a time. Only the coarsened community graphs of later levels are held in
//! memory.
//!
//! **Default build** includes the storage configuration loader (`config`
//! feature). The algorithm itself has no optional parts.

pub mod community;
#[cfg(feature = "config")]
pub mod config;
/// Error types used across `louvain-store`.
pub mod error;
pub mod store;

pub use community::{
    best_partition, CommunityDetection, GraphStore, Louvain, Partition, PartitionHierarchy,
    VertexKey, VertexStream, DEFAULT_MIN_MODULARITY_GROWTH,
};
pub use error::{Error, Result};
pub use store::MemoryGraph;

#[cfg(feature = "config")]
pub use config::{ByteSize, DatabaseConfig, DiskConfig};
