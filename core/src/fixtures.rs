//! Small graphs shared by the unit tests.

use crate::graph::Graph;

pub fn from_edges(vertices: u32, edges: &[(u32, u32)]) -> Graph<u32> {
    let mut g = Graph::undirected();
    for i in 0..vertices {
        g.add_vertex(i, ()).unwrap();
    }
    for (a, b) in edges {
        g.add_edge(a, b, ()).unwrap();
    }
    g
}

/// Directed counterpart of [`from_edges`]: each pair is an arc `a -> b`.
pub fn from_arcs(vertices: u32, arcs: &[(u32, u32)]) -> Graph<u32> {
    let mut g = Graph::directed();
    for i in 0..vertices {
        g.add_vertex(i, ()).unwrap();
    }
    for (a, b) in arcs {
        g.add_edge(a, b, ()).unwrap();
    }
    g
}

pub fn make_chain(n: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
    from_edges(n, &edges)
}

pub fn make_cycle(n: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    from_edges(n, &edges)
}

/// Hub 0 connected to leaves 1..=leaves.
pub fn make_star(leaves: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (1..=leaves).map(|i| (0, i)).collect();
    from_edges(leaves + 1, &edges)
}

/// Two triangles {0,1,2} and {3,4,5} joined by the bridge 2-3.
pub fn make_bowtie_bridge() -> Graph<u32> {
    from_edges(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)])
}

pub fn ids<'a, V: 'a, E: 'a>(
    vertices: impl IntoIterator<Item = &'a crate::graph::Vertex<u32, V, E>>,
) -> Vec<u32> {
    vertices.into_iter().map(|v| *v.id()).collect()
}
