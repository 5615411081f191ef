//! Flat-file graph loader.
//!
//! ```text
//! <vertex count>
//! <vertex id> <label>                  (vertex count records)
//! <edge count>
//! <edge id> <source id> <target id>    (edge count records)
//! ```
//!
//! Fields are separated by commas and/or whitespace; blank lines are skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use graph_analytics_core::{Graph, GraphError};
use thiserror::Error;
use tracing::{info, trace};

/// Upper bound on up-front reservation; larger graphs grow as records arrive.
const PREALLOCATE_LIMIT: usize = 1 << 16;

/// Vertex ids and labels, edge ids as edge payloads.
pub type Network = Graph<String, String, String>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read graph: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: count must be a non-negative integer")]
    InvalidCount { line: usize },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("expected {expected} records, found {found}")]
    Truncated { expected: u64, found: u64 },

    #[error("line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },

    #[error("graph declares {count} vertices, limit is {limit}")]
    TooLarge { count: u64, limit: u64 },
}

/// A loaded graph plus the label → vertex id index used to resolve the
/// names typed at the prompt.
#[derive(Debug)]
pub struct NetworkGraph {
    graph: Network,
    names: HashMap<String, String>,
}

impl NetworkGraph {
    pub fn graph(&self) -> &Network {
        &self.graph
    }

    /// Vertex id carrying `name` as its label. A label repeated in the
    /// file resolves to its last vertex.
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }
}

/// Non-blank records with their 1-based line numbers.
struct Records<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Records<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_record(&mut self) -> Result<Option<(usize, Vec<String>)>, LoadError> {
        for text in self.lines.by_ref() {
            let text = text?;
            self.line += 1;
            let fields: Vec<String> = text
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .map(str::to_owned)
                .collect();
            if !fields.is_empty() {
                return Ok(Some((self.line, fields)));
            }
        }
        Ok(None)
    }

    fn count(&mut self, field: &'static str) -> Result<u64, LoadError> {
        let (line, fields) = self.next_record()?.ok_or(LoadError::MissingField {
            line: self.line + 1,
            field,
        })?;
        parse_count(&fields[0]).ok_or(LoadError::InvalidCount { line })
    }

    /// Next record of a section holding `expected` records, `found` so far.
    fn section_record(
        &mut self,
        expected: u64,
        found: u64,
    ) -> Result<(usize, std::vec::IntoIter<String>), LoadError> {
        let (line, fields) = self
            .next_record()?
            .ok_or(LoadError::Truncated { expected, found })?;
        Ok((line, fields.into_iter()))
    }
}

fn parse_count(text: &str) -> Option<u64> {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

fn field(
    fields: &mut impl Iterator<Item = String>,
    line: usize,
    name: &'static str,
) -> Result<String, LoadError> {
    fields
        .next()
        .ok_or(LoadError::MissingField { line, field: name })
}

fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(PREALLOCATE_LIMIT, |n| n.min(PREALLOCATE_LIMIT))
}

/// Build a graph from the flat format read from `reader`.
pub fn load<R: BufRead>(reader: R, directed: bool, max_vertices: u64) -> Result<NetworkGraph, LoadError> {
    let mut records = Records::new(reader);

    let vertex_count = records.count("vertex count")?;
    if vertex_count > max_vertices {
        return Err(LoadError::TooLarge {
            count: vertex_count,
            limit: max_vertices,
        });
    }

    // The declared count is untrusted until the records back it up
    let reserve = initial_capacity(vertex_count);
    let mut graph = Graph::with_capacity(directed, reserve);
    let mut names = HashMap::with_capacity(reserve);
    for found in 0..vertex_count {
        let (line, mut fields) = records.section_record(vertex_count, found)?;
        let id = field(&mut fields, line, "vertex id")?;
        let label = field(&mut fields, line, "vertex label")?;
        trace!(line, %id, %label, "vertex record");

        graph
            .add_vertex(id.clone(), label.clone())
            .map_err(|source| LoadError::Graph { line, source })?;
        names.insert(label, id);
    }

    let edge_count = records.count("edge count")?;
    for found in 0..edge_count {
        let (line, mut fields) = records.section_record(edge_count, found)?;
        let edge_id = field(&mut fields, line, "edge id")?;
        let source = field(&mut fields, line, "source id")?;
        let target = field(&mut fields, line, "target id")?;
        trace!(line, %edge_id, %source, %target, "edge record");

        graph
            .add_edge(source.as_str(), target.as_str(), edge_id)
            .map_err(|source| LoadError::Graph { line, source })?;
    }

    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        directed,
        "graph loaded"
    );
    Ok(NetworkGraph { graph, names })
}

/// Open `path` and load it with [`load`].
pub fn load_file(path: &Path, directed: bool, max_vertices: u64) -> Result<NetworkGraph, LoadError> {
    let file = File::open(path)?;
    load(BufReader::new(file), directed, max_vertices)
}
