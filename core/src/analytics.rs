use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::bfs::Bfs;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId, Vertex, VertexKey};
use crate::topk::top_k;

/// Resolve an id for an analytics entry point.
fn resolve<K, V, E, Q>(graph: &Graph<K, V, E>, id: &Q) -> Result<NodeId>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    graph
        .node_id(id)
        .map_err(|_| GraphError::not_in_graph(id))
}

/// Recommend vertices two hops away from `source`.
///
/// Every vertex reachable through one intermediate neighbor scores one point
/// per such path. `source` and its direct neighbors are excluded. Returns the
/// `k` best scores, best first; ties keep the order candidates were first
/// met.
pub fn recommend<'g, K, V, E, Q>(
    graph: &'g Graph<K, V, E>,
    source: &Q,
    k: usize,
) -> Result<Vec<&'g Vertex<K, V, E>>>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    let source = resolve(graph, source)?;
    let origin = &graph[source];

    let mut scores: Vec<(NodeId, usize)> = Vec::new();
    let mut position: HashMap<NodeId, usize> = HashMap::new();
    for neighbor in origin.neighbors() {
        for candidate in graph[neighbor].neighbors() {
            if candidate == source || origin.is_connected_to(candidate) {
                continue;
            }
            match position.entry(candidate) {
                Entry::Occupied(slot) => scores[*slot.get()].1 += 1,
                Entry::Vacant(slot) => {
                    slot.insert(scores.len());
                    scores.push((candidate, 1));
                }
            }
        }
    }

    debug!(candidates = scores.len(), k, "recommendation scored");
    Ok(top_k(scores.into_iter().map(|(n, s)| (&graph[n], s)), k))
}

/// Simulate a majority-threshold cascade from `seeds`.
///
/// A vertex adopts once strictly more than half of its neighbors have
/// adopted. Each round only the neighbors of the previous round's adopters
/// are re-examined (the seeds act as round zero), until a round adds nobody.
/// Returns the adopters in adoption order; seeds are not included and
/// repeated seed ids count once.
pub fn diffuse<'g, 'q, K, V, E, Q, I>(graph: &'g Graph<K, V, E>, seeds: I) -> Result<Vec<&'g Vertex<K, V, E>>>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized + 'q,
    I: IntoIterator<Item = &'q Q>,
{
    let slots = graph.slot_count();
    let mut adopted = vec![false; slots];
    let mut frontier = Vec::new();
    for id in seeds {
        let node = resolve(graph, id)?;
        if !adopted[node.index()] {
            adopted[node.index()] = true;
            frontier.push(node);
        }
    }

    let mut informed = vec![0usize; slots];
    let mut adopters = Vec::new();
    let mut rounds = 0usize;
    while !frontier.is_empty() {
        rounds += 1;
        let mut next = Vec::new();
        for &spreader in &frontier {
            for neighbor in graph[spreader].neighbors() {
                let slot = neighbor.index();
                if adopted[slot] {
                    continue;
                }
                informed[slot] += 1;
                if 2 * informed[slot] > graph[neighbor].degree() {
                    adopted[slot] = true;
                    next.push(neighbor);
                }
            }
        }
        adopters.extend(next.iter().map(|&n| &graph[n]));
        frontier = next;
    }

    debug!(adopters = adopters.len(), rounds, "diffusion reached fixpoint");
    Ok(adopters)
}

/// Run one BFS per vertex and hand every later vertex to `visit`.
///
/// Pairs are unordered: for vertices in insertion order, source `i` only
/// visits targets `j > i`. A single engine is re-rooted for every source.
fn sweep_pairs<'g, K, V, E, F>(graph: &'g Graph<K, V, E>, mut visit: F) -> usize
where
    K: VertexKey,
    F: FnMut(&mut Bfs<'g, K, V, E>, NodeId),
{
    let order: Vec<NodeId> = graph.vertices().map(Vertex::node_id).collect();
    let Some(&first) = order.first() else {
        return 0;
    };

    let mut bfs = Bfs::from_node(graph, first);
    let mut pairs = 0usize;
    for (i, &source) in order.iter().enumerate() {
        bfs.reset(source);
        for &target in &order[i + 1..] {
            visit(&mut bfs, target);
            pairs += 1;
        }
    }
    pairs
}

/// Shortest-path pass-through tally for every vertex, in insertion order.
///
/// For each unordered pair one shortest path is taken from a BFS rooted at
/// the earlier vertex; each vertex strictly inside that path gains a point.
/// O(V) traversals, O(V·E) overall.
pub fn centrality_scores<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Vec<(&Vertex<K, V, E>, usize)> {
    let mut tally = vec![0usize; graph.slot_count()];
    let pairs = sweep_pairs(graph, |bfs, target| {
        let path = bfs.path_to_node(target);
        if path.len() > 2 {
            for inner in &path[1..path.len() - 1] {
                tally[inner.index()] += 1;
            }
        }
    });

    debug!(vertices = graph.vertex_count(), pairs, "centrality computed");
    graph
        .vertices()
        .map(|v| (v, tally[v.node_id().index()]))
        .collect()
}

/// The `k` vertices crossed by the most shortest paths, most central first.
pub fn centrality<K: VertexKey, V, E>(graph: &Graph<K, V, E>, k: usize) -> Vec<&Vertex<K, V, E>> {
    top_k(centrality_scores(graph), k)
}

/// The longest shortest path in the graph, endpoints included.
///
/// Ties keep the first maximum met while sweeping pairs in insertion order.
/// Empty when no two vertices are connected.
pub fn diameter<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Vec<&Vertex<K, V, E>> {
    let mut longest = 0usize;
    let mut path: Vec<NodeId> = Vec::new();
    let pairs = sweep_pairs(graph, |bfs, target| {
        if let Some(distance) = bfs.distance_to_node(target) {
            if distance > longest {
                longest = distance;
                path = bfs.path_to_node(target);
            }
        }
    });

    debug!(pairs, hops = longest, "diameter computed");
    path.into_iter().map(|n| &graph[n]).collect()
}

/// Share of ordered neighbor pairs that are themselves connected.
fn coefficient<K, V, E>(graph: &Graph<K, V, E>, vertex: &Vertex<K, V, E>) -> Option<f64> {
    let degree = vertex.degree();
    if degree < 2 {
        return None;
    }

    let linked: usize = vertex
        .neighbors()
        .map(|n| {
            graph[n]
                .neighbors()
                .filter(|m| vertex.is_connected_to(*m))
                .count()
        })
        .sum();
    Some(linked as f64 / (degree * (degree - 1)) as f64)
}

/// Local clustering coefficient of the vertex `id`.
///
/// `None` when the vertex has fewer than two neighbors and the coefficient
/// is undefined.
pub fn clustering<K, V, E, Q>(graph: &Graph<K, V, E>, id: &Q) -> Result<Option<f64>>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    let node = resolve(graph, id)?;
    Ok(coefficient(graph, &graph[node]))
}

/// Mean local clustering over the vertices where it is defined.
///
/// `None` when no vertex has a defined coefficient.
pub fn average_clustering<K: VertexKey, V, E>(graph: &Graph<K, V, E>) -> Option<f64> {
    let (sum, defined) = graph
        .vertices()
        .filter_map(|v| coefficient(graph, v))
        .fold((0.0, 0usize), |(sum, n), c| (sum + c, n + 1));

    (defined > 0).then(|| sum / defined as f64)
}

/// Vertices grouped by hop distance from `source`: levels 1, 2, … up to the
/// last non-empty one.
pub fn distances_by_level<'g, K, V, E, Q>(
    graph: &'g Graph<K, V, E>,
    source: &Q,
) -> Result<Vec<Vec<&'g Vertex<K, V, E>>>>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    let mut bfs = Bfs::new(graph, source)?;
    let mut levels = Vec::new();
    for level in 1.. {
        let at = bfs.vertices_at_level(level);
        if at.is_empty() {
            break;
        }
        levels.push(at);
    }
    Ok(levels)
}

/// One shortest path from `from` to `to`, endpoints included. Empty when
/// `to` is unreachable or equal to `from`.
pub fn shortest_path<'g, K, V, E, Q>(
    graph: &'g Graph<K, V, E>,
    from: &Q,
    to: &Q,
) -> Result<Vec<&'g Vertex<K, V, E>>>
where
    K: VertexKey + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    let start = resolve(graph, from)?;
    let target = resolve(graph, to)?;
    let mut bfs = Bfs::from_node(graph, start);
    Ok(bfs
        .path_to_node(target)
        .into_iter()
        .map(|n| &graph[n])
        .collect())
}
