//! Hierarchy of per-level partitions produced by the level loop.

use super::partition::Partition;

/// One retained level: its partition and the score it achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Nodes of this level to their community.
    pub partition: Partition,
    /// Comparison score of the partition (see [`crate::community::modularity::score`]).
    pub score: f64,
}

/// Partitions indexed by level, finest first.
///
/// Level 0 maps original vertices to level-1 communities; level `k` maps
/// level-`k` community keys to level-`k+1` community keys. [`push`] appends
/// at the coarse end.
///
/// [`push`]: PartitionHierarchy::push
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionHierarchy {
    levels: Vec<Level>,
}

impl PartitionHierarchy {
    /// Empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level coarser than every level already held.
    pub fn push(&mut self, partition: Partition, score: f64) {
        self.levels.push(Level { partition, score });
    }

    /// Number of retained levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True if no level was retained.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level `depth` (0 = finest).
    pub fn level(&self, depth: usize) -> Option<&Level> {
        self.levels.get(depth)
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Score of the coarsest level.
    pub fn final_score(&self) -> Option<f64> {
        self.levels.last().map(|level| level.score)
    }

    /// Original vertices mapped to their community after `depth + 1` levels.
    ///
    /// Composition starts at level `depth` and walks toward level 0: each
    /// finer entry `v -> c` becomes `v -> coarser(c)`. A key the coarser map
    /// does not know stays its own community. `depth` past the coarsest level
    /// is clamped; an empty hierarchy yields an empty partition.
    pub fn flatten_to(&self, depth: usize) -> Partition {
        let Some(last) = self.levels.len().checked_sub(1) else {
            return Partition::new();
        };
        let depth = depth.min(last);

        let mut composed = self.levels[depth].partition.clone();
        for finer in self.levels[..depth].iter().rev() {
            composed = finer
                .partition
                .iter()
                .map(|(&vertex, &community)| {
                    (vertex, composed.get(&community).copied().unwrap_or(community))
                })
                .collect();
        }
        composed
    }

    /// Original vertices mapped to their top-level community.
    pub fn flatten(&self) -> Partition {
        self.flatten_to(usize::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;

    fn partition(pairs: &[(u64, u64)]) -> Partition {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_hierarchy() {
        let hierarchy = PartitionHierarchy::new();
        assert!(hierarchy.is_empty());
        assert!(hierarchy.flatten().is_empty());
        assert_eq!(hierarchy.final_score(), None);
    }

    #[test]
    fn test_single_level_is_unchanged() {
        let mut hierarchy = PartitionHierarchy::new();
        let level0 = partition(&[(1, 2), (2, 2), (3, 3)]);
        hierarchy.push(level0.clone(), -1.0);
        assert_eq!(hierarchy.flatten(), level0);
    }

    #[test]
    fn test_three_levels_compose() {
        let mut hierarchy = PartitionHierarchy::new();
        hierarchy.push(
            partition(&[(1, 2), (2, 2), (3, 4), (4, 4), (5, 6), (6, 6)]),
            -20.0,
        );
        hierarchy.push(partition(&[(2, 4), (4, 4), (6, 6)]), -10.0);
        hierarchy.push(partition(&[(4, 6), (6, 6)]), -5.0);

        let flat = hierarchy.flatten();
        assert_eq!(flat.len(), 6);
        assert!(flat.values().all(|&c| c == 6));

        let mid = hierarchy.flatten_to(1);
        assert_eq!(mid[&1], 4);
        assert_eq!(mid[&3], 4);
        assert_eq!(mid[&5], 6);

        assert_eq!(hierarchy.flatten_to(0), hierarchy.level(0).unwrap().partition);
        assert_eq!(hierarchy.final_score(), Some(-5.0));
    }

    #[test]
    fn test_missing_coarse_key_keeps_community() {
        let mut hierarchy = PartitionHierarchy::new();
        hierarchy.push(partition(&[(1, 1), (2, 1), (3, 3)]), 0.0);
        hierarchy.push(partition(&[(1, 1)]), 1.0);

        let flat = hierarchy.flatten();
        assert_eq!(flat[&3], 3);
        assert_eq!(flat[&2], 1);
    }
}
