//! graph-analytics-core: In-memory graph model and social-network analytics.
//!
//! A pure Rust library that keeps an arena-backed adjacency list and answers
//! structural questions about it: lazy breadth-first distances, connected
//! components, articulation points, friend recommendation, majority-threshold
//! diffusion, shortest-path centrality, diameter and clustering.
//!
//! Every analysis borrows the graph immutably, so it cannot be mutated while
//! a traversal is in progress. The crate has no I/O; the `cli` and `bench`
//! crates build on it.

mod analytics;
mod bfs;
mod connectivity;
mod error;
mod graph;
mod topk;

#[cfg(test)]
mod fixtures;

pub use analytics::{
    average_clustering, centrality, centrality_scores, clustering, diameter, diffuse,
    distances_by_level, recommend, shortest_path,
};
pub use bfs::{Bfs, LevelOrder};
pub use connectivity::{articulation_points, components, connected_components};
pub use error::{GraphError, Result};
pub use graph::{Graph, NodeId, Vertex, VertexKey};
pub use topk::top_k;
