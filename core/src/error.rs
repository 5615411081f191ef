use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by graph mutation and analysis.
///
/// Keys are carried in their `Debug` rendering so the error type stays
/// independent of the graph's key type. A failed operation leaves the graph
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {0} already exists")]
    DuplicateVertex(String),

    #[error("vertex {0} does not exist")]
    UnknownVertex(String),

    #[error("edge {0} -> {1} already exists")]
    DuplicateEdge(String, String),

    #[error("edge {0} -> {1} does not exist")]
    UnknownEdge(String, String),

    #[error("vertex {0} is not part of the graph")]
    VertexNotInGraph(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

impl GraphError {
    pub(crate) fn duplicate_vertex<K: Debug + ?Sized>(key: &K) -> Self {
        Self::DuplicateVertex(render(key))
    }

    pub(crate) fn unknown_vertex<K: Debug + ?Sized>(key: &K) -> Self {
        Self::UnknownVertex(render(key))
    }

    pub(crate) fn duplicate_edge<K: Debug + ?Sized>(from: &K, to: &K) -> Self {
        Self::DuplicateEdge(render(from), render(to))
    }

    pub(crate) fn unknown_edge<K: Debug + ?Sized>(from: &K, to: &K) -> Self {
        Self::UnknownEdge(render(from), render(to))
    }

    pub(crate) fn not_in_graph<K: Debug + ?Sized>(key: &K) -> Self {
        Self::VertexNotInGraph(render(key))
    }
}

fn render<K: Debug + ?Sized>(key: &K) -> String {
    format!("{:?}", key)
}
