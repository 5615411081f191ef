use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Index;

use crate::error::{GraphError, Result};

/// Arena handle for a vertex. Only meaningful for the graph that issued it,
/// and only while that vertex is live: the slot of a removed vertex is
/// handed to the next vertex added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the vertex slot inside the graph arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bounds required of an external vertex identity.
pub trait VertexKey: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> VertexKey for T {}

/// A vertex record owned by a [`Graph`].
///
/// Adjacency holds `NodeId` handles resolved through the owning graph, never
/// the neighbor records themselves. For directed graphs the adjacency is the
/// set of outgoing edges.
#[derive(Debug, Clone)]
pub struct Vertex<K, V = (), E = ()> {
    id: K,
    data: V,
    node: NodeId,
    adjacent: HashMap<NodeId, E>,
    order: Vec<NodeId>,
}

impl<K, V, E> Vertex<K, V, E> {
    fn new(id: K, data: V, node: NodeId) -> Self {
        Self {
            id,
            data,
            node,
            adjacent: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn data(&self) -> &V {
        &self.data
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Neighbor handles in the order their edges were added.
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Neighbor handles paired with the edge payload, in edge insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &E)> + '_ {
        self.order.iter().map(move |n| (*n, &self.adjacent[n]))
    }

    pub(crate) fn neighbor_at(&self, position: usize) -> Option<NodeId> {
        self.order.get(position).copied()
    }

    pub fn degree(&self) -> usize {
        self.order.len()
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.adjacent.contains_key(&other)
    }

    pub fn edge_data(&self, other: NodeId) -> Option<&E> {
        self.adjacent.get(&other)
    }

    // Mutation goes through Graph only, so the edge count stays correct.

    fn connect(&mut self, other: NodeId, data: E) {
        if self.adjacent.insert(other, data).is_none() {
            self.order.push(other);
        }
    }

    fn disconnect(&mut self, other: NodeId) -> Option<E> {
        let data = self.adjacent.remove(&other)?;
        self.order.retain(|n| *n != other);
        Some(data)
    }
}

/// In-memory graph: an arena of vertex slots plus an id index.
///
/// Directedness is fixed at construction. Undirected edges are installed in
/// both endpoints with the same payload and counted once. Parallel edges are
/// rejected. Removing a vertex detaches it from every neighbor and puts its
/// slot on a free list for reuse, so the arena never outgrows the largest
/// live vertex count. Iteration order is tracked apart from slot positions
/// and stays insertion order.
#[derive(Debug, Clone)]
pub struct Graph<K, V = (), E = ()> {
    directed: bool,
    slots: Vec<Option<Vertex<K, V, E>>>,
    free: Vec<NodeId>,
    order: Vec<NodeId>,
    index: HashMap<K, NodeId>,
    edge_count: usize,
}

impl<K, V, E> Graph<K, V, E> {
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All live vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<K, V, E>> + '_ {
        self.order.iter().map(move |&n| &self[n])
    }

    /// Resolve a handle. `None` if the vertex has been removed.
    pub fn vertex_at(&self, node: NodeId) -> Option<&Vertex<K, V, E>> {
        self.slots.get(node.index()).and_then(Option::as_ref)
    }

    /// Neighbors of `vertex`, resolved through this graph.
    pub fn neighbors<'a>(
        &'a self,
        vertex: &'a Vertex<K, V, E>,
    ) -> impl Iterator<Item = &'a Vertex<K, V, E>> + 'a {
        vertex.neighbors().map(move |n| &self[n])
    }

    /// Number of arena slots, live or not. Per-vertex working state in the
    /// algorithms is sized by this and indexed by `NodeId::index`.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let slots_mem = self.slots.len() * size_of::<Option<Vertex<K, V, E>>>();
        let index_mem = self.index.len() * (size_of::<K>() + size_of::<NodeId>() + 8);
        let order_mem = (self.order.len() + self.free.len()) * size_of::<NodeId>();
        let adjacency_mem: usize = self
            .vertices()
            .map(|v| v.degree() * (2 * size_of::<NodeId>() + size_of::<E>() + 8))
            .sum();

        slots_mem + index_mem + order_mem + adjacency_mem
    }

    fn slot_mut(&mut self, node: NodeId) -> &mut Vertex<K, V, E> {
        self.slots
            .get_mut(node.index())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("{:?} is not a live vertex of this graph", node))
    }
}

impl<K: VertexKey, V, E> Graph<K, V, E> {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            index: HashMap::new(),
            edge_count: 0,
        }
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(directed: bool, vertex_count: usize) -> Self {
        Self {
            directed,
            slots: Vec::with_capacity(vertex_count),
            free: Vec::new(),
            order: Vec::with_capacity(vertex_count),
            index: HashMap::with_capacity(vertex_count),
            edge_count: 0,
        }
    }

    /// Insert a vertex. Fails with `DuplicateVertex` if the id is taken.
    ///
    /// Reuses the slot of a removed vertex when one is free.
    pub fn add_vertex(&mut self, id: K, data: V) -> Result<NodeId> {
        if self.index.contains_key(&id) {
            return Err(GraphError::duplicate_vertex(&id));
        }

        let node = match self.free.pop() {
            Some(node) => node,
            None => {
                assert!(
                    self.slots.len() < u32::MAX as usize,
                    "graph exceeded maximum of {} vertex slots",
                    u32::MAX
                );
                self.slots.push(None);
                NodeId((self.slots.len() - 1) as u32)
            }
        };
        self.index.insert(id.clone(), node);
        self.slots[node.index()] = Some(Vertex::new(id, data, node));
        self.order.push(node);
        Ok(node)
    }

    /// Connect `from` to `to` (both ways when undirected) with `data` as the
    /// edge payload.
    pub fn add_edge<Q>(&mut self, from: &Q, to: &Q, data: E) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
        E: Clone,
    {
        let a = self.node_id(from)?;
        let b = self.node_id(to)?;
        if self[a].is_connected_to(b) {
            return Err(GraphError::duplicate_edge(from, to));
        }

        if !self.directed && a != b {
            self.slot_mut(b).connect(a, data.clone());
        }
        self.slot_mut(a).connect(b, data);
        self.edge_count += 1;
        Ok(())
    }

    /// Remove a vertex and every edge touching it. Returns its payload.
    ///
    /// O(V): the insertion-order list is compacted, and directed graphs do not
    /// index incoming edges, so every vertex is scanned for them.
    pub fn remove_vertex<Q>(&mut self, id: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let node = self.node_id(id)?;
        let vertex = self
            .slots
            .get_mut(node.index())
            .and_then(Option::take)
            .ok_or_else(|| GraphError::unknown_vertex(id))?;
        self.index.remove(id);
        self.order.retain(|&n| n != node);
        self.free.push(node);

        if self.directed {
            for other in self.slots.iter_mut().flatten() {
                if other.disconnect(node).is_some() {
                    self.edge_count -= 1;
                }
            }
        } else {
            for neighbor in vertex.neighbors() {
                if let Some(other) = self.slots[neighbor.index()].as_mut() {
                    other.disconnect(node);
                }
            }
        }
        self.edge_count -= vertex.degree();

        Ok(vertex.data)
    }

    /// Remove the edge `from -> to` (and its mirror when undirected).
    /// Returns the edge payload.
    pub fn remove_edge<Q>(&mut self, from: &Q, to: &Q) -> Result<E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let a = self.node_id(from)?;
        let b = self.node_id(to)?;
        if !self[a].is_connected_to(b) {
            return Err(GraphError::unknown_edge(from, to));
        }

        if !self.directed && a != b {
            self.slot_mut(b).disconnect(a);
        }
        let data = self
            .slot_mut(a)
            .disconnect(b)
            .ok_or_else(|| GraphError::unknown_edge(from, to))?;
        self.edge_count -= 1;
        Ok(data)
    }

    /// Resolve an external id to its arena handle.
    pub fn node_id<Q>(&self, id: &Q) -> Result<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::unknown_vertex(id))
    }

    pub fn vertex<Q>(&self, id: &Q) -> Result<&Vertex<K, V, E>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.node_id(id).map(|node| &self[node])
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(id)
    }

    /// True if `vertex` is a live record of this graph (not merely a vertex
    /// with an equal id from another graph).
    pub fn contains_vertex(&self, vertex: &Vertex<K, V, E>) -> bool {
        self.index.get(&vertex.id) == Some(&vertex.node)
            && self
                .vertex_at(vertex.node)
                .is_some_and(|v| std::ptr::eq(v, vertex))
    }

    pub fn edge_data<Q>(&self, from: &Q, to: &Q) -> Result<&E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let a = self.node_id(from)?;
        let b = self.node_id(to)?;
        self[a]
            .edge_data(b)
            .ok_or_else(|| GraphError::unknown_edge(from, to))
    }

    pub fn is_adjacent<Q>(&self, from: &Q, to: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let a = self.node_id(from)?;
        let b = self.node_id(to)?;
        Ok(self[a].is_connected_to(b))
    }
}

impl<K: VertexKey, V, E> Default for Graph<K, V, E> {
    fn default() -> Self {
        Self::undirected()
    }
}

impl<K, V, E> Index<NodeId> for Graph<K, V, E> {
    type Output = Vertex<K, V, E>;

    /// Panics if `node` was removed or belongs to another graph.
    fn index(&self, node: NodeId) -> &Self::Output {
        self.vertex_at(node)
            .unwrap_or_else(|| panic!("{:?} is not a live vertex of this graph", node))
    }
}
