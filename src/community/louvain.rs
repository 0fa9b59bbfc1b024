//! Louvain algorithm for community detection over a graph store.
//!
//! Fast modularity optimization through local node moves and graph aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! Louvain is a multi-level, greedy modularity optimization algorithm:
//!
//! 1. **Phase 1 (Local Moving)**: Start with each node in its own community.
//!    Repeatedly move nodes to the neighboring community with the highest
//!    modularity gain until a full pass moves nothing.
//!
//! 2. **Phase 2 (Aggregation)**: Build a meta-graph where communities become
//!    single nodes. Edge weights are sums of edges between communities;
//!    edges inside a community become the node's internal weight.
//!
//! 3. **Iterate**: Repeat phases 1-2 on the meta-graph until the level score
//!    stops improving by more than `min_modularity_growth`.
//!
//! Level 0 streams the original graph out of a [`GraphStore`]: the vertex
//! stream is rewound for every pass and each vertex's neighbors are fetched
//! once per pass. Every coarser level lives in memory as an
//! [`InducedGraph`]. Both go through the same optimizer and inducer.
//!
//! The retained levels form a [`PartitionHierarchy`]; composing it yields
//! the final vertex → community mapping. Community keys are always keys of
//! original vertices.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

use super::hierarchy::PartitionHierarchy;
use super::induce::{induce, InducedGraph};
use super::local_move::optimize;
use super::modularity;
use super::partition::{DegreeState, Partition};
use super::traits::{CommunityDetection, GraphStore};
use super::view::StoreView;
use crate::error::{Error, Result};
use petgraph::graph::UnGraph;
use tracing::debug;

/// Default threshold a coarser level's score must beat the previous one by.
pub const DEFAULT_MIN_MODULARITY_GROWTH: f64 = 1e-7;

/// Louvain community detection algorithm.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Minimum score improvement for a coarser level to be kept.
    min_modularity_growth: f64,
    /// Maximum local-move passes per level.
    max_passes: usize,
    /// Maximum number of retained levels.
    max_levels: usize,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    ///
    /// Passes and levels are unbounded: every level runs until a pass moves
    /// nothing, and levels are added while the score keeps growing.
    pub fn new() -> Self {
        Self {
            min_modularity_growth: DEFAULT_MIN_MODULARITY_GROWTH,
            max_passes: usize::MAX,
            max_levels: usize::MAX,
        }
    }

    /// Set the minimum score growth required to keep a coarser level.
    pub fn with_min_modularity_growth(mut self, growth: f64) -> Self {
        self.min_modularity_growth = growth;
        self
    }

    /// Set maximum local-move passes per level.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set maximum number of retained levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    /// Minimum score growth required to keep a coarser level.
    pub fn min_modularity_growth(&self) -> f64 {
        self.min_modularity_growth
    }

    fn validate(&self) -> Result<()> {
        if !self.min_modularity_growth.is_finite() {
            return Err(Error::InvalidParameter {
                name: "min_modularity_growth",
                message: "must be finite",
            });
        }
        if self.max_passes == 0 {
            return Err(Error::InvalidParameter {
                name: "max_passes",
                message: "must be at least 1",
            });
        }
        if self.max_levels == 0 {
            return Err(Error::InvalidParameter {
                name: "max_levels",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Run every level and return the retained partitions, finest first.
    ///
    /// Any store failure aborts the run and is returned as is.
    pub fn hierarchy<S: GraphStore>(&self, store: &S) -> Result<PartitionHierarchy> {
        self.validate()?;

        let vertex_count = store.number_of_vertices()?;
        let edge_count = store.number_of_edges()?;
        let mut view = StoreView::open(store)?;

        let mut state = DegreeState::with_capacity(vertex_count);
        view.for_each_batch(|batch| {
            let degrees = store.degrees(batch)?;
            state.insert_batch(batch, &degrees)
        })?;

        let m = edge_count as f64;
        debug!(vertices = state.len(), edges = edge_count, "level 0 initialized");

        let mut improvement = optimize(&mut view, &mut state, m, self.max_passes)?;
        let mut previous = modularity::score(&state.partition, &state.communities, 2.0 * m)?;
        debug!(
            level = 0,
            communities = state.community_count(),
            score = previous,
            improvement,
            "level optimized"
        );

        let mut hierarchy = PartitionHierarchy::new();
        if !improvement {
            hierarchy.push(state.partition, previous);
            return Ok(hierarchy);
        }

        let mut graph = induce(&mut view, &state.partition)?;
        hierarchy.push(state.partition, previous);

        while improvement && hierarchy.len() < self.max_levels {
            let (state, next_improvement, score) = self.optimize_level(&mut graph)?;
            improvement = next_improvement;

            let level = hierarchy.len();
            if !improvement || score - previous <= self.min_modularity_growth {
                debug!(
                    level,
                    score,
                    previous,
                    improvement,
                    "level discarded, stopping"
                );
                break;
            }

            debug!(
                level,
                nodes = graph.node_count(),
                communities = state.community_count(),
                score,
                "level retained"
            );
            graph = induce(&mut graph, &state.partition)?;
            hierarchy.push(state.partition, score);
            previous = score;
        }

        Ok(hierarchy)
    }

    /// Identity partition over `graph`, local moves, score.
    fn optimize_level(&self, graph: &mut InducedGraph) -> Result<(DegreeState, bool, f64)> {
        let mut state = DegreeState::from_induced(graph);
        let degree_sum = graph.degree_sum();
        let improvement = optimize(graph, &mut state, degree_sum / 2.0, self.max_passes)?;
        let score = modularity::score(&state.partition, &state.communities, degree_sum)?;
        Ok((state, improvement, score))
    }

    /// Map every vertex of `store` to its top-level community.
    pub fn best_partition<S: GraphStore>(&self, store: &S) -> Result<Partition> {
        Ok(self.hierarchy(store)?.flatten())
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Map every vertex of `store` to its top-level community, keeping coarser
/// levels only while their score grows by more than `min_modularity_growth`
/// (use [`DEFAULT_MIN_MODULARITY_GROWTH`] when in doubt).
pub fn best_partition<S: GraphStore>(store: &S, min_modularity_growth: f64) -> Result<Partition> {
    Louvain::new()
        .with_min_modularity_growth(min_modularity_growth)
        .best_partition(store)
}

impl CommunityDetection for Louvain {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let partition = self.best_partition(graph)?;
        let mut labels = Vec::with_capacity(n);
        for node in 0..n as u64 {
            let community = partition
                .get(&node)
                .copied()
                .ok_or(Error::UnknownVertex { key: node })?;
            labels.push(community);
        }

        // Renumber to consecutive integers
        let mut unique = labels.clone();
        unique.sort_unstable();
        unique.dedup();

        Ok(labels
            .iter()
            .map(|c| unique.binary_search(c).unwrap_or(0))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::store::MemoryGraph;
    use petgraph::graph::UnGraph;

    #[test]
    fn test_louvain_triangle() {
        // Simple triangle - should be one community
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let n0 = graph.add_node(());
        let n1 = graph.add_node(());
        let n2 = graph.add_node(());

        let _ = graph.add_edge(n0, n1, ());
        let _ = graph.add_edge(n1, n2, ());
        let _ = graph.add_edge(n0, n2, ());

        let louvain = Louvain::new();
        let communities = louvain.detect(&graph).unwrap();

        assert_eq!(communities.len(), 3);
        assert_eq!(communities[0], communities[1]);
        assert_eq!(communities[1], communities[2]);
    }

    #[test]
    fn test_louvain_two_cliques() {
        // Two triangles connected by a single edge
        let mut graph = UnGraph::<(), ()>::new_undirected();

        let a0 = graph.add_node(());
        let a1 = graph.add_node(());
        let a2 = graph.add_node(());
        let _ = graph.add_edge(a0, a1, ());
        let _ = graph.add_edge(a1, a2, ());
        let _ = graph.add_edge(a0, a2, ());

        let b0 = graph.add_node(());
        let b1 = graph.add_node(());
        let b2 = graph.add_node(());
        let _ = graph.add_edge(b0, b1, ());
        let _ = graph.add_edge(b1, b2, ());
        let _ = graph.add_edge(b0, b2, ());

        // Bridge
        let _ = graph.add_edge(a2, b0, ());

        let louvain = Louvain::new();
        let communities = louvain.detect(&graph).unwrap();

        assert_eq!(communities.len(), 6);
        assert_eq!(communities[0], communities[1]);
        assert_eq!(communities[1], communities[2]);
        assert_eq!(communities[3], communities[4]);
        assert_eq!(communities[4], communities[5]);
        assert_ne!(communities[0], communities[3]);
    }

    #[test]
    fn test_louvain_empty_graph() {
        let graph = UnGraph::<(), ()>::new_undirected();
        let louvain = Louvain::new();
        let result = louvain.detect(&graph);
        assert!(result.is_err());
    }

    #[test]
    fn test_louvain_single_node() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let _ = graph.add_node(());

        let louvain = Louvain::new();
        let communities = louvain.detect(&graph).unwrap();

        assert_eq!(communities, vec![0]);
    }

    #[test]
    fn test_louvain_disconnected() {
        // Two isolated nodes
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let _ = graph.add_node(());
        let _ = graph.add_node(());

        let louvain = Louvain::new();
        let communities = louvain.detect(&graph).unwrap();

        assert_eq!(communities.len(), 2);
        assert_ne!(communities[0], communities[1]);
    }

    #[test]
    fn test_two_triangles_hierarchy_stops_after_level_zero() {
        let graph = MemoryGraph::from_edges([
            (1, 2),
            (1, 3),
            (2, 3),
            (4, 5),
            (4, 6),
            (5, 6),
            (3, 4),
        ]);

        let hierarchy = Louvain::new().hierarchy(&graph).unwrap();

        // Level 1 cannot merge the two dense super-nodes, so it is discarded.
        assert_eq!(hierarchy.len(), 1);
        let flat = hierarchy.flatten();
        assert_eq!(flat[&1], 2);
        assert_eq!(flat[&3], 2);
        assert_eq!(flat[&4], 5);
        assert_eq!(flat[&6], 5);
    }

    /// Sixteen triangles, each joined to the next by one bridge, closed into a ring.
    fn triangle_ring() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        for t in 0..16u64 {
            let base = t * 3;
            graph.add_edge(base, base + 1);
            graph.add_edge(base, base + 2);
            graph.add_edge(base + 1, base + 2);
            graph.add_edge(base + 2, (base + 3) % 48);
        }
        graph
    }

    fn community_count(partition: &Partition) -> usize {
        let mut seen: Vec<_> = partition.values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    #[test]
    fn test_triangle_ring_keeps_second_level() {
        let hierarchy = Louvain::new().hierarchy(&triangle_ring()).unwrap();

        assert!(hierarchy.len() >= 2);
        let scores: Vec<f64> = hierarchy.levels().iter().map(|level| level.score).collect();
        for pair in scores.windows(2) {
            assert!(pair[1] - pair[0] > DEFAULT_MIN_MODULARITY_GROWTH);
        }

        let fine = hierarchy.flatten_to(0);
        let coarse = hierarchy.flatten();
        assert_eq!(coarse.len(), 48);
        assert!(community_count(&coarse) < community_count(&fine));
    }

    #[test]
    fn test_max_levels_bounds_hierarchy() {
        let graph = triangle_ring();
        let open = Louvain::new().hierarchy(&graph).unwrap();

        let bounded = Louvain::new().with_max_levels(1).hierarchy(&graph).unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded.level(0), open.level(0));
    }

    #[test]
    fn test_growth_threshold_discards_moving_level() {
        let graph = triangle_ring();
        let strict = Louvain::new().with_min_modularity_growth(1e9);
        assert_eq!(strict.min_modularity_growth(), 1e9);

        let hierarchy = strict.hierarchy(&graph).unwrap();
        assert_eq!(hierarchy.len(), 1);
        assert_eq!(hierarchy.flatten(), hierarchy.level(0).unwrap().partition);
        assert_eq!(
            hierarchy.flatten(),
            Louvain::new().hierarchy(&graph).unwrap().flatten_to(0)
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let graph = MemoryGraph::from_edges([(1, 2)]);
        assert!(matches!(
            Louvain::new().with_max_passes(0).best_partition(&graph),
            Err(Error::InvalidParameter { name: "max_passes", .. })
        ));
        assert!(matches!(
            Louvain::new().with_max_levels(0).best_partition(&graph),
            Err(Error::InvalidParameter { name: "max_levels", .. })
        ));
        assert!(matches!(
            Louvain::new()
                .with_min_modularity_growth(f64::NAN)
                .best_partition(&graph),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_free_function_matches_builder() {
        let graph = MemoryGraph::from_edges([(1, 2), (2, 3), (3, 1), (3, 4)]);
        let a = best_partition(&graph, DEFAULT_MIN_MODULARITY_GROWTH).unwrap();
        let b = Louvain::default().best_partition(&graph).unwrap();
        assert_eq!(a, b);
    }
}
