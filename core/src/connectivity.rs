use tracing::debug;

use crate::graph::{Graph, NodeId, Vertex, VertexKey};

/// Vertices of every connected component, in DFS launch order.
///
/// A DFS is launched from each vertex (in insertion order) not yet reached;
/// each launch is one component. On a directed graph the search follows
/// outgoing edges only.
pub fn components<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Vec<Vec<&Vertex<K, V, E>>> {
    let mut visited = vec![false; graph.slot_count()];
    let mut groups = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();

    for start in graph.vertices() {
        let start = start.node_id();
        if visited[start.index()] {
            continue;
        }

        let mut members = Vec::new();
        visited[start.index()] = true;
        stack.push(start);
        while let Some(current) = stack.pop() {
            members.push(&graph[current]);
            for neighbor in graph[current].neighbors() {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    stack.push(neighbor);
                }
            }
        }
        groups.push(members);
    }

    debug!(components = groups.len(), "components computed");
    groups
}

/// Sizes of all connected components, largest first. Empty graph gives an
/// empty result.
pub fn connected_components<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Vec<usize> {
    let mut sizes: Vec<usize> = components(graph).iter().map(Vec::len).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// Articulation points (cut vertices), each reported once.
///
/// Low-link DFS per component. `disc` is the discovery tick, `low` the
/// smallest tick reachable from the subtree through one back edge. A non-root
/// vertex `v` is a cut vertex when some tree child `c` has
/// `low[c] >= disc[v]`; the root is one when it has two or more tree
/// children. The edge back to the DFS parent is not a back edge.
///
/// Vertices are reported in the order they are identified. Meant for
/// undirected graphs; on a directed graph it runs over outgoing edges.
pub fn articulation_points<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Vec<&Vertex<K, V, E>> {
    let slots = graph.slot_count();
    let mut disc = vec![0usize; slots];
    let mut low = vec![0usize; slots];
    let mut visited = vec![false; slots];
    let mut is_cut = vec![false; slots];
    let mut points = Vec::new();
    let mut tick = 0usize;

    // Frame: (vertex, DFS parent, position in its neighbor list)
    let mut stack: Vec<(NodeId, Option<NodeId>, usize)> = Vec::new();

    for root in graph.vertices() {
        let root = root.node_id();
        if visited[root.index()] {
            continue;
        }

        tick += 1;
        visited[root.index()] = true;
        disc[root.index()] = tick;
        low[root.index()] = tick;
        let mut root_children = 0usize;
        stack.push((root, None, 0));

        while let Some((node, parent, cursor)) = stack.last_mut() {
            let node = *node;
            let parent = *parent;
            let vertex = &graph[node];

            if let Some(child) = vertex.neighbor_at(*cursor) {
                *cursor += 1;

                if Some(child) == parent {
                    continue;
                }
                if visited[child.index()] {
                    low[node.index()] = low[node.index()].min(disc[child.index()]);
                } else {
                    tick += 1;
                    visited[child.index()] = true;
                    disc[child.index()] = tick;
                    low[child.index()] = tick;
                    if node == root {
                        root_children += 1;
                    }
                    stack.push((child, Some(node), 0));
                }
                continue;
            }

            stack.pop();
            if let Some(up) = parent {
                low[up.index()] = low[up.index()].min(low[node.index()]);
                if up != root && low[node.index()] >= disc[up.index()] && !is_cut[up.index()] {
                    is_cut[up.index()] = true;
                    points.push(&graph[up]);
                }
            }
        }

        if root_children >= 2 {
            is_cut[root.index()] = true;
            points.push(&graph[root]);
        }
    }

    debug!(points = points.len(), "articulation points computed");
    points
}
