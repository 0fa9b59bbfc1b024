//! Phase 1 of Louvain: greedy local moves.
//!
//! Vertices are visited one at a time in the graph's scan order. Each vertex
//! moves to the neighboring community with the largest positive modularity
//! gain, and the move is visible to every vertex visited after it in the same
//! pass. Passes repeat until one of them moves nothing.
//!
//! The gain is computed from cached community aggregates only:
//!
//! ```text
//! delta(C) = (k_i,C − k_i,own) / m − k_i / (2m²) · (k_i + Σtot_C − Σtot_own)
//! ```
//!
//! so no pass ever recomputes global modularity.

use super::partition::DegreeState;
use super::traits::{VertexKey, WeightedGraph};
use crate::error::Result;
use std::collections::HashMap;
use tracing::trace;

/// Modularity gain of moving a vertex of degree `k_i` from its community
/// (aggregate `tot_own`, edge weight `k_own` into it) to a community with
/// aggregate `tot_c` and edge weight `k_c` into it. `m` must be positive.
pub(crate) fn delta_modularity(
    k_i: f64,
    k_own: f64,
    k_c: f64,
    tot_own: f64,
    tot_c: f64,
    m: f64,
) -> f64 {
    (1.0 / m) * (k_c - k_own) - (k_i / (2.0 * (m * m))) * (k_i + tot_c - tot_own)
}

/// Run local-move passes over `graph` until a pass makes no move, or until
/// `max_passes` passes have run.
///
/// `m` is the total edge weight of the level. Returns `true` if any vertex
/// changed community during the call. A graph without edges (`m == 0`) is
/// already converged and is not scanned.
pub fn optimize<G: WeightedGraph>(
    graph: &mut G,
    state: &mut DegreeState,
    m: f64,
    max_passes: usize,
) -> Result<bool> {
    if m <= 0.0 {
        trace!("no edge weight, skipping local moves");
        return Ok(false);
    }

    let mut improvement = false;
    let mut degree_in_coms: HashMap<VertexKey, f64> = HashMap::new();

    for pass in 0..max_passes {
        let mut moves = 0usize;
        graph.for_each_vertex(|vertex, neighbors| {
            if move_to_best(vertex, neighbors, state, &mut degree_in_coms, m)? {
                moves += 1;
            }
            Ok(())
        })?;

        trace!(pass, moves, "local move pass");
        if moves == 0 {
            break;
        }
        improvement = true;
    }

    Ok(improvement)
}

fn move_to_best(
    vertex: VertexKey,
    neighbors: &[(VertexKey, f64)],
    state: &mut DegreeState,
    degree_in_coms: &mut HashMap<VertexKey, f64>,
    m: f64,
) -> Result<bool> {
    let k_i = state.degree_of(vertex)?;
    let own = state.community_of(vertex)?;
    let tot_own = state.community(own)?.tot_degree;

    degree_in_coms.clear();
    for &(neighbor, weight) in neighbors {
        *degree_in_coms
            .entry(state.community_of(neighbor)?)
            .or_insert(0.0) += weight;
    }
    let k_own = degree_in_coms.get(&own).copied().unwrap_or(0.0);

    // Strictly greater: on ties the first community met in scan order wins.
    let mut best_delta = 0.0;
    let mut best = own;
    for &(neighbor, _) in neighbors {
        let candidate = state.community_of(neighbor)?;
        if candidate == own {
            continue;
        }
        let tot_c = state.community(candidate)?.tot_degree;
        let k_c = degree_in_coms.get(&candidate).copied().unwrap_or(0.0);
        let delta = delta_modularity(k_i, k_own, k_c, tot_own, tot_c, m);
        if delta > best_delta {
            best_delta = delta;
            best = candidate;
        }
    }

    if best == own {
        return Ok(false);
    }

    let k_new = degree_in_coms.get(&best).copied().unwrap_or(0.0);
    state.move_vertex(vertex, k_i, (own, k_own), (best, k_new));
    Ok(true)
}
