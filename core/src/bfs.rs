use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId, Vertex, VertexKey};

/// Lazy, resumable breadth-first traversal from a single root.
///
/// The queue and the per-vertex state live as long as the engine. Each query
/// advances the traversal only as far as it needs to answer, so asking many
/// questions of one engine never repeats work. The engine borrows the graph,
/// which therefore cannot be mutated while any query is pending.
///
/// Neighbors are discovered in adjacency order, which fixes the order inside
/// each level and the parent chosen for every vertex.
pub struct Bfs<'g, K, V = (), E = ()> {
    graph: &'g Graph<K, V, E>,
    root: NodeId,
    distance: Vec<Option<usize>>,
    parent: Vec<Option<NodeId>>,
    levels: Vec<Vec<NodeId>>,
    queue: VecDeque<(NodeId, usize)>,
}

impl<'g, K: VertexKey, V, E> Bfs<'g, K, V, E> {
    /// Root the traversal at the vertex with id `root`.
    pub fn new<Q>(graph: &'g Graph<K, V, E>, root: &Q) -> Result<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let node = graph
            .node_id(root)
            .map_err(|_| GraphError::not_in_graph(root))?;
        Ok(Self::from_node(graph, node))
    }

    /// Root the traversal at `root`, which must be a vertex of `graph`.
    pub fn from_vertex(graph: &'g Graph<K, V, E>, root: &Vertex<K, V, E>) -> Result<Self> {
        if !graph.contains_vertex(root) {
            return Err(GraphError::not_in_graph(root.id()));
        }
        Ok(Self::from_node(graph, root.node_id()))
    }

    pub(crate) fn from_node(graph: &'g Graph<K, V, E>, root: NodeId) -> Self {
        let slots = graph.slot_count();
        let mut bfs = Self {
            graph,
            root,
            distance: vec![None; slots],
            parent: vec![None; slots],
            levels: Vec::new(),
            queue: VecDeque::new(),
        };
        bfs.reset(root);
        bfs
    }

    /// Restart from a new root, reusing the per-vertex buffers.
    pub fn reroot(&mut self, root: &Vertex<K, V, E>) -> Result<()> {
        if !self.graph.contains_vertex(root) {
            return Err(GraphError::not_in_graph(root.id()));
        }
        self.reset(root.node_id());
        Ok(())
    }

    pub(crate) fn reset(&mut self, root: NodeId) {
        self.distance.fill(None);
        self.parent.fill(None);
        self.levels.clear();
        self.queue.clear();

        self.root = root;
        self.distance[root.index()] = Some(0);
        self.levels.push(vec![root]);
        self.queue.push_back((root, 0));
        trace!(root = ?self.graph[root].id(), "bfs rooted");
    }

    pub fn root(&self) -> &'g Vertex<K, V, E> {
        let graph = self.graph;
        &graph[self.root]
    }

    /// Number of vertices discovered so far (root included).
    pub fn visited_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// True once the queue has drained and every reachable vertex is known.
    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// Hop count from the root, or `None` if `target` is unreachable.
    pub fn distance_to(&mut self, target: &Vertex<K, V, E>) -> Result<Option<usize>> {
        let node = self.member(target)?;
        Ok(self.distance_to_node(node))
    }

    /// Vertices on one shortest path from the root to `target`, both
    /// included. Empty if `target` is the root or unreachable.
    pub fn shortest_path_to(&mut self, target: &Vertex<K, V, E>) -> Result<Vec<&'g Vertex<K, V, E>>> {
        let node = self.member(target)?;
        let graph = self.graph;
        Ok(self
            .path_to_node(node)
            .into_iter()
            .map(|n| &graph[n])
            .collect())
    }

    /// Vertices exactly `level` hops from the root, in discovery order.
    pub fn vertices_at_level(&mut self, level: usize) -> Vec<&'g Vertex<K, V, E>> {
        self.run_until_level(level);
        let graph = self.graph;
        self.levels
            .get(level)
            .map(|nodes| nodes.iter().map(|&n| &graph[n]).collect())
            .unwrap_or_default()
    }

    pub fn count_at_level(&mut self, level: usize) -> usize {
        self.run_until_level(level);
        self.levels.get(level).map_or(0, Vec::len)
    }

    /// Finish the traversal and walk every reachable vertex level by level.
    pub fn iter(&mut self) -> impl Iterator<Item = &'g Vertex<K, V, E>> + '_ {
        self.run_to_end();
        let graph = self.graph;
        self.levels.iter().flatten().map(move |&n| &graph[n])
    }

    pub(crate) fn distance_to_node(&mut self, node: NodeId) -> Option<usize> {
        self.run_until_visited(node);
        self.distance[node.index()]
    }

    pub(crate) fn path_to_node(&mut self, node: NodeId) -> Vec<NodeId> {
        self.run_until_visited(node);
        if self.parent[node.index()].is_none() {
            return Vec::new();
        }

        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent[current.index()] {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    fn member(&self, vertex: &Vertex<K, V, E>) -> Result<NodeId> {
        if self.graph.contains_vertex(vertex) {
            Ok(vertex.node_id())
        } else {
            Err(GraphError::not_in_graph(vertex.id()))
        }
    }

    fn run_until_visited(&mut self, node: NodeId) {
        while self.distance[node.index()].is_none() && self.step() {}
    }

    fn run_until_level(&mut self, level: usize) {
        while self.levels.len() <= level.saturating_add(1) && self.step() {}
    }

    fn run_to_end(&mut self) {
        while self.step() {}
    }

    /// Expand one queued vertex. Returns false once the queue is empty.
    fn step(&mut self) -> bool {
        let Some((current, depth)) = self.queue.pop_front() else {
            return false;
        };

        let graph = self.graph;
        let next = depth + 1;
        for neighbor in graph[current].neighbors() {
            let slot = neighbor.index();
            if self.distance[slot].is_some() {
                continue;
            }
            self.distance[slot] = Some(next);
            self.parent[slot] = Some(current);
            if self.levels.len() <= next {
                self.levels.push(Vec::new());
            }
            self.levels[next].push(neighbor);
            self.queue.push_back((neighbor, next));
        }
        true
    }
}

/// Owning level-order iterator produced by `Bfs::into_iter`.
pub struct LevelOrder<'g, K, V, E> {
    graph: &'g Graph<K, V, E>,
    nodes: std::iter::Flatten<std::vec::IntoIter<Vec<NodeId>>>,
}

impl<'g, K, V, E> Iterator for LevelOrder<'g, K, V, E> {
    type Item = &'g Vertex<K, V, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        self.nodes.next().map(|n| &graph[n])
    }
}

impl<'g, K: VertexKey, V, E> IntoIterator for Bfs<'g, K, V, E> {
    type Item = &'g Vertex<K, V, E>;
    type IntoIter = LevelOrder<'g, K, V, E>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.run_to_end();
        LevelOrder {
            graph: self.graph,
            nodes: self.levels.into_iter().flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{from_edges, ids, make_chain, make_cycle, make_star};

    #[test]
    fn test_chain_distances() {
        let g = make_chain(5);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        let end = g.vertex(&4).unwrap();
        assert_eq!(bfs.distance_to(end).unwrap(), Some(4));
        assert_eq!(bfs.distance_to(g.vertex(&0).unwrap()).unwrap(), Some(0));
    }

    #[test]
    fn test_chain_shortest_path() {
        let g = make_chain(5);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        let path = bfs.shortest_path_to(g.vertex(&4).unwrap()).unwrap();
        assert_eq!(ids(path), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_path_to_root_is_empty() {
        let g = make_chain(3);
        let mut bfs = Bfs::new(&g, &1).unwrap();
        assert!(bfs.shortest_path_to(g.vertex(&1).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_vertex() {
        let g = from_edges(4, &[(0, 1), (2, 3)]);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        let far = g.vertex(&3).unwrap();
        assert_eq!(bfs.distance_to(far).unwrap(), None);
        assert!(bfs.shortest_path_to(far).unwrap().is_empty());
        assert!(bfs.is_complete());
    }

    #[test]
    fn test_root_not_in_graph() {
        let g = make_chain(3);
        assert!(matches!(
            Bfs::new(&g, &99),
            Err(GraphError::VertexNotInGraph(_))
        ));

        let other = make_chain(3);
        assert!(matches!(
            Bfs::from_vertex(&g, other.vertex(&0).unwrap()),
            Err(GraphError::VertexNotInGraph(_))
        ));
    }

    #[test]
    fn test_query_vertex_not_in_graph() {
        let g = make_chain(3);
        let other = make_chain(5);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        assert!(matches!(
            bfs.distance_to(other.vertex(&4).unwrap()),
            Err(GraphError::VertexNotInGraph(_))
        ));
    }

    #[test]
    fn test_levels_star() {
        let g = make_star(4);
        let mut bfs = Bfs::new(&g, &1).unwrap();
        assert_eq!(bfs.count_at_level(0), 1);
        assert_eq!(ids(bfs.vertices_at_level(1)), vec![0]);
        assert_eq!(ids(bfs.vertices_at_level(2)), vec![2, 3, 4]);
        assert_eq!(bfs.count_at_level(3), 0);
        assert!(bfs.vertices_at_level(10).is_empty());
    }

    #[test]
    fn test_cycle_levels_no_infinite_loop() {
        let g = make_cycle(6);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        assert_eq!(ids(bfs.vertices_at_level(1)), vec![1, 5]);
        assert_eq!(ids(bfs.vertices_at_level(3)), vec![3]);
        assert_eq!(bfs.iter().count(), 6);
    }

    #[test]
    fn test_queries_resume_without_rework() {
        let g = make_chain(10);
        let mut bfs = Bfs::new(&g, &0).unwrap();

        bfs.distance_to(g.vertex(&2).unwrap()).unwrap();
        assert_eq!(bfs.visited_count(), 3);
        assert!(!bfs.is_complete());

        // Already answered by the work done above
        assert_eq!(bfs.count_at_level(1), 1);
        assert_eq!(bfs.visited_count(), 3);

        assert_eq!(bfs.distance_to(g.vertex(&9).unwrap()).unwrap(), Some(9));
        assert_eq!(bfs.visited_count(), 10);
    }

    #[test]
    fn test_level_order_iteration() {
        let g = from_edges(6, &[(0, 2), (0, 1), (1, 3), (2, 4), (4, 5)]);
        let bfs = Bfs::new(&g, &0).unwrap();
        let order: Vec<u32> = bfs.into_iter().map(|v| *v.id()).collect();
        assert_eq!(order, vec![0, 2, 1, 4, 3, 5]);
    }

    #[test]
    fn test_parent_follows_adjacency_order() {
        // Square 0-1-3, 0-2-3: vertex 3 is reached first through 1
        let g = from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        let path = bfs.shortest_path_to(g.vertex(&3).unwrap()).unwrap();
        assert_eq!(ids(path), vec![0, 1, 3]);
    }

    #[test]
    fn test_directed_follows_outgoing_only() {
        let mut g: Graph<u32> = Graph::directed();
        for i in 0..3 {
            g.add_vertex(i, ()).unwrap();
        }
        g.add_edge(&0, &1, ()).unwrap();
        g.add_edge(&1, &2, ()).unwrap();

        let mut forward = Bfs::new(&g, &0).unwrap();
        assert_eq!(forward.distance_to(g.vertex(&2).unwrap()).unwrap(), Some(2));

        let mut backward = Bfs::new(&g, &2).unwrap();
        assert_eq!(backward.distance_to(g.vertex(&0).unwrap()).unwrap(), None);
    }

    #[test]
    fn test_reroot_reuses_engine() {
        let g = make_chain(5);
        let mut bfs = Bfs::new(&g, &0).unwrap();
        assert_eq!(bfs.distance_to(g.vertex(&4).unwrap()).unwrap(), Some(4));

        bfs.reroot(g.vertex(&2).unwrap()).unwrap();
        assert_eq!(*bfs.root().id(), 2);
        assert_eq!(bfs.distance_to(g.vertex(&4).unwrap()).unwrap(), Some(2));
        assert_eq!(bfs.distance_to(g.vertex(&0).unwrap()).unwrap(), Some(2));
        assert_eq!(bfs.count_at_level(1), 2);
    }

    #[test]
    fn test_removed_vertices_are_skipped() {
        let mut g = make_chain(5);
        g.remove_vertex(&2).unwrap();
        let mut bfs = Bfs::new(&g, &0).unwrap();
        assert_eq!(bfs.distance_to(g.vertex(&3).unwrap()).unwrap(), None);
        assert_eq!(bfs.iter().count(), 2);
    }

    #[test]
    fn test_traversal_through_reused_slot() {
        let mut g = make_chain(5);
        g.remove_vertex(&2).unwrap();
        g.add_vertex(9, ()).unwrap();
        g.add_edge(&1, &9, ()).unwrap();
        g.add_edge(&9, &3, ()).unwrap();

        let mut bfs = Bfs::new(&g, &0).unwrap();
        let far = g.vertex(&4).unwrap();
        assert_eq!(bfs.distance_to(far).unwrap(), Some(4));
        assert_eq!(ids(bfs.shortest_path_to(far).unwrap()), vec![0, 1, 9, 3, 4]);
    }
}
