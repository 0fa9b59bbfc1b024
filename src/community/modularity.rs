//! Partition quality scores.
//!
//! Two functions live here and they are **not** interchangeable:
//!
//! - [`score`] is the statistic the level loop uses to decide whether a
//!   coarser level improved enough to keep going. It adds its second term
//!   once per vertex rather than once per community, so its absolute value
//!   is not modularity and must not be reported as such. Only differences
//!   between consecutive levels carry meaning.
//! - [`standard_modularity`] is the Newman–Girvan modularity
//!
//! ```text
//! Q = Σ_C [ L_C / m − (d_C / 2m)² ]
//! ```
//!
//! where `L_C` is the weight inside community `C` and `d_C` the sum of its
//! member degrees. Use it when reporting partition quality.

use super::partition::{CommunityDegree, Partition};
use super::traits::{VertexKey, WeightedGraph};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Level comparison score of `partition`.
///
/// With `m = degree_sum / 2`, accumulates `(tot_C − in_C) / m − degree_sum² / m²`
/// for every vertex, `C` being that vertex's community. Returns `0.0` when
/// `m` is zero.
pub fn score(
    partition: &Partition,
    communities: &HashMap<VertexKey, CommunityDegree>,
    degree_sum: f64,
) -> Result<f64> {
    let m = degree_sum / 2.0;
    if m <= 0.0 {
        return Ok(0.0);
    }

    let norm = 1.0 / (m * m);
    let mut res = 0.0;
    for &community in partition.values() {
        let record = communities
            .get(&community)
            .ok_or(Error::UnknownVertex { key: community })?;
        res += ((record.tot_degree - record.in_degree) / m) - (degree_sum * degree_sum * norm);
    }
    Ok(res)
}

/// Newman–Girvan modularity of `partition` over `graph`.
///
/// Internal weight reported by the graph counts as weight inside the
/// owning community. Returns `0.0` for a graph without edges.
pub fn standard_modularity<G: WeightedGraph>(graph: &mut G, partition: &Partition) -> Result<f64> {
    // community -> (weight inside, degree sum)
    let mut totals: BTreeMap<VertexKey, (f64, f64)> = BTreeMap::new();
    for (&vertex, &community) in partition {
        let internal = graph.internal_weight(vertex);
        let entry = totals.entry(community).or_insert((0.0, 0.0));
        entry.0 += internal;
        entry.1 += internal;
    }

    graph.for_each_vertex(|vertex, neighbors| {
        let owner = partition
            .get(&vertex)
            .copied()
            .ok_or(Error::UnknownVertex { key: vertex })?;
        let mut inside = 0.0;
        let mut degree = 0.0;
        for &(neighbor, weight) in neighbors {
            let other = partition
                .get(&neighbor)
                .ok_or(Error::UnknownVertex { key: neighbor })?;
            if *other == owner {
                inside += weight;
            }
            degree += weight;
        }
        let entry = totals.entry(owner).or_insert((0.0, 0.0));
        entry.0 += inside;
        entry.1 += degree;
        Ok(())
    })?;

    let total: f64 = totals.values().map(|(_, degree)| degree).sum();
    if total <= 0.0 {
        return Ok(0.0);
    }

    Ok(totals
        .values()
        .map(|&(inside, degree)| inside / total - (degree / total).powi(2))
        .sum())
}
