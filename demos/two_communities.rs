//! Louvain over two dense groups joined by a single bridge.
//!
//! Run with: `RUST_LOG=louvain_store=debug cargo run --example two_communities`

use louvain_store::community::{standard_modularity, StoreView};
use louvain_store::{Louvain, MemoryGraph};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Two 4-cliques (1..=4 and 5..=8) plus the bridge 4 - 5.
    let mut graph = MemoryGraph::new();
    for group in [[1, 2, 3, 4], [5, 6, 7, 8]] {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                graph.add_edge(a, b);
            }
        }
    }
    graph.add_edge(4, 5);
    let graph = graph.with_batch_size(3)?;

    let hierarchy = Louvain::new().hierarchy(&graph)?;
    for (depth, level) in hierarchy.levels().iter().enumerate() {
        println!("level {depth}: score {:.4}", level.score);
    }

    let partition = hierarchy.flatten();
    for (vertex, community) in &partition {
        println!("{vertex} -> {community}");
    }

    let q = standard_modularity(&mut StoreView::open(&graph)?, &partition)?;
    println!("modularity: {q:.4}");

    Ok(())
}
