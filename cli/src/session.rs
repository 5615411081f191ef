use std::io::{self, BufRead, Write};

use graph_analytics_core::{
    articulation_points, average_clustering, centrality, clustering, connected_components,
    diameter, diffuse, distances_by_level, recommend, shortest_path, Vertex,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::{self, Command, CommandError};
use crate::config::OutputFormat;
use crate::load::NetworkGraph;

/// Result of one command, ready for either output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    Recommend { names: Vec<String> },
    Diffuse { count: usize, names: Vec<String> },
    Centrality { names: Vec<String> },
    /// `hops` is `None` when unreachable, `Some(0)` for the same vertex.
    Path { hops: Option<usize>, names: Vec<String> },
    Diameter { hops: usize, names: Vec<String> },
    Clustering { name: Option<String>, coefficient: Option<f64> },
    Distances { levels: Vec<Vec<String>> },
    Components { sizes: Vec<usize> },
    Articulation { names: Vec<String> },
}

fn labels<'a, I>(vertices: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Vertex<String, String, String>>,
{
    vertices.into_iter().map(|v| v.data().clone()).collect()
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Twelve significant digits, trailing zeros trimmed, at least one decimal:
/// `0.0`, `0.5`, `0.333333333333`.
fn format_coefficient(c: f64) -> String {
    if c == 0.0 || !c.is_finite() {
        return format!("{:.1}", c);
    }
    let magnitude = c.abs().log10().floor() as i32;
    let decimals = (11 - magnitude).max(1) as usize;
    let mut text = format!("{:.*}", decimals, c);
    let trimmed = text.trim_end_matches('0').len();
    text.truncate(trimmed);
    if text.ends_with('.') {
        text.push('0');
    }
    text
}

fn write_coefficient<W: Write>(out: &mut W, coefficient: Option<f64>) -> io::Result<()> {
    match coefficient {
        Some(c) => writeln!(out, "{}", format_coefficient(c)),
        None => writeln!(out, "-1"),
    }
}

impl Report {
    /// Plain-text rendering, one item per line.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Report::Recommend { names }
            | Report::Centrality { names }
            | Report::Articulation { names } => write_lines(out, names),
            Report::Diffuse { count, names } => {
                writeln!(out, "{}", count)?;
                write_lines(out, names)
            }
            Report::Path { hops: None, .. } => writeln!(out, "no path"),
            Report::Path { hops: Some(0), .. } => writeln!(out, "same vertex"),
            Report::Path { names, .. } => write_lines(out, names),
            Report::Diameter { hops, names } => {
                writeln!(out, "{}", hops)?;
                write_lines(out, names)
            }
            Report::Clustering { coefficient, .. } => write_coefficient(out, *coefficient),
            Report::Distances { levels } => {
                for level in levels {
                    writeln!(out, "{}:", level.len())?;
                    writeln!(out, "{}", level.join(" "))?;
                }
                Ok(())
            }
            Report::Components { sizes } => {
                for size in sizes {
                    writeln!(out, "{}", size)?;
                }
                Ok(())
            }
        }
    }
}

/// Executes commands against one loaded network and writes their results.
pub struct Session<'n, W> {
    network: &'n NetworkGraph,
    format: OutputFormat,
    out: W,
}

impl<'n, W: Write> Session<'n, W> {
    pub fn new(network: &'n NetworkGraph, format: OutputFormat, out: W) -> Self {
        Self {
            network,
            format,
            out,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn resolve(&self, name: &str) -> Result<&'n str, CommandError> {
        self.network
            .id_of(name)
            .ok_or_else(|| CommandError::UnknownName(name.to_string()))
    }

    /// Run one parsed command.
    pub fn execute(&self, command: &Command) -> Result<Report, CommandError> {
        let graph = self.network.graph();
        let report = match command {
            Command::Recommend { name, count } => {
                let id = self.resolve(name)?;
                Report::Recommend {
                    names: labels(recommend(graph, id, *count)?),
                }
            }
            Command::Diffuse { names } => {
                let ids = names
                    .iter()
                    .map(|name| self.resolve(name))
                    .collect::<Result<Vec<_>, _>>()?;
                let adopters = diffuse(graph, ids)?;
                Report::Diffuse {
                    count: adopters.len(),
                    names: labels(adopters),
                }
            }
            Command::Centrality { count } => Report::Centrality {
                names: labels(centrality(graph, *count)),
            },
            Command::Path { from, to } => {
                let from = self.resolve(from)?;
                let to = self.resolve(to)?;
                let path = shortest_path(graph, from, to)?;
                let hops = if from == to {
                    Some(0)
                } else {
                    path.len().checked_sub(1)
                };
                Report::Path {
                    hops,
                    names: labels(path),
                }
            }
            Command::Diameter => {
                let path = diameter(graph);
                Report::Diameter {
                    hops: path.len().saturating_sub(1),
                    names: labels(path),
                }
            }
            Command::Clustering { name: Some(name) } => {
                let id = self.resolve(name)?;
                Report::Clustering {
                    name: Some(name.clone()),
                    coefficient: clustering(graph, id)?,
                }
            }
            Command::Clustering { name: None } => Report::Clustering {
                name: None,
                coefficient: average_clustering(graph),
            },
            Command::Distances { name } => {
                let id = self.resolve(name)?;
                Report::Distances {
                    levels: distances_by_level(graph, id)?
                        .into_iter()
                        .map(labels)
                        .collect(),
                }
            }
            Command::Components => Report::Components {
                sizes: connected_components(graph),
            },
            Command::Articulation => Report::Articulation {
                names: labels(articulation_points(graph)),
            },
        };
        Ok(report)
    }

    fn emit(&mut self, report: &Report) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => report.write_text(&mut self.out),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)
            }
        }
    }

    fn emit_error(&mut self, error: &CommandError) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", error),
            OutputFormat::Json => {
                let document = serde_json::json!({ "error": error.to_string() });
                serde_json::to_writer(&mut self.out, &document)?;
                writeln!(self.out)
            }
        }
    }

    /// Read commands from `input` until EOF or a line with no tokens.
    ///
    /// A failing command reports its error and the loop moves on. Returns
    /// the number of commands that succeeded.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<usize> {
        let mut succeeded = 0usize;
        for line in input.lines() {
            let line = line?;
            let outcome = match command::parse(&line) {
                Ok(None) => break,
                Ok(Some(command)) => self.execute(&command),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(report) => {
                    self.emit(&report)?;
                    succeeded += 1;
                }
                Err(e) => {
                    warn!(input = %line, error = %e, "command failed");
                    self.emit_error(&e)?;
                }
            }
        }

        self.out.flush()?;
        debug!(succeeded, "session finished");
        Ok(succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load;
    use std::io::Cursor;

    // ana - beto - carla - dario, plus eva hanging off beto and an
    // isolated fede
    const NETWORK: &str = "\
6
1 ana
2 beto
3 carla
4 dario
5 eva
6 fede
4
10 1 2
11 2 3
12 3 4
13 2 5
";

    fn network() -> NetworkGraph {
        load(Cursor::new(NETWORK), false, 100).unwrap()
    }

    fn run_text(input: &str) -> String {
        let network = network();
        let mut session = Session::new(&network, OutputFormat::Text, Vec::new());
        session.run(Cursor::new(input)).unwrap();
        String::from_utf8(session.into_inner()).unwrap()
    }

    #[test]
    fn test_recommend_and_centrality() {
        assert_eq!(run_text("recomendar ana 5\n"), "carla\neva\n");
        assert_eq!(run_text("centralidad 2\n"), "beto\ncarla\n");
    }

    #[test]
    fn test_path_outputs() {
        assert_eq!(run_text("camino ana dario\n"), "ana\nbeto\ncarla\ndario\n");
        assert_eq!(run_text("camino ana ana\n"), "same vertex\n");
        assert_eq!(run_text("camino ana fede\n"), "no path\n");
    }

    #[test]
    fn test_diameter_and_distances() {
        assert_eq!(run_text("diametro\n"), "3\nana\nbeto\ncarla\ndario\n");
        assert_eq!(run_text("distancias ana\n"), "1:\nbeto\n2:\ncarla eva\n1:\ndario\n");
    }

    #[test]
    fn test_components_and_articulation() {
        assert_eq!(run_text("subgrupos\n"), "5\n1\n");
        let out = run_text("articulacion\n");
        let mut cuts: Vec<&str> = out.lines().collect();
        cuts.sort_unstable();
        assert_eq!(cuts, vec!["beto", "carla"]);
    }

    #[test]
    fn test_clustering_outputs() {
        assert_eq!(run_text("agrupamiento ana\n"), "-1\n");
        assert_eq!(run_text("agrupamiento beto\n"), "0.0\n");
        assert_eq!(run_text("agrupamiento\n"), "0.0\n");
    }

    #[test]
    fn test_coefficient_formatting() {
        assert_eq!(format_coefficient(0.0), "0.0");
        assert_eq!(format_coefficient(1.0), "1.0");
        assert_eq!(format_coefficient(0.5), "0.5");
        assert_eq!(format_coefficient(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_coefficient(7.0 / 9.0), "0.777777777778");
    }

    #[test]
    fn test_clustering_of_triangle_member() {
        // ana, beto, carla form a triangle; dario hangs off ana
        let text = "4\n1 ana\n2 beto\n3 carla\n4 dario\n4\n1 1 2\n2 2 3\n3 3 1\n4 1 4\n";
        let network = load(Cursor::new(text), false, 100).unwrap();
        let mut session = Session::new(&network, OutputFormat::Text, Vec::new());
        session
            .run(Cursor::new("agrupamiento ana\nagrupamiento beto\nagrupamiento\n"))
            .unwrap();
        let out = String::from_utf8(session.into_inner()).unwrap();
        assert_eq!(out, "0.333333333333\n1.0\n0.777777777778\n");
    }

    #[test]
    fn test_diffuse_output() {
        // dario follows carla alone; carla and eva together tip beto, who
        // then tips ana
        assert_eq!(run_text("difundir carla eva\n"), "3\ndario\nbeto\nana\n");
        assert_eq!(run_text("difundir carla, eva, carla\n"), "3\ndario\nbeto\nana\n");
        assert_eq!(run_text("difundir fede\n"), "0\n");
    }

    #[test]
    fn test_errors_do_not_stop_session() {
        let out = run_text("volar\nrecomendar nadie 2\ncentralidad x\nsubgrupos\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "unknown command \"volar\"");
        assert_eq!(lines[1], "no vertex named \"nadie\"");
        assert!(lines[2].starts_with("count must be"));
        assert_eq!(&lines[3..], &["5", "1"]);
    }

    #[test]
    fn test_blank_line_ends_session() {
        let network = network();
        let mut session = Session::new(&network, OutputFormat::Text, Vec::new());
        let succeeded = session
            .run(Cursor::new("subgrupos\n\nsubgrupos\n"))
            .unwrap();
        assert_eq!(succeeded, 1);
    }

    #[test]
    fn test_json_output() {
        let network = network();
        let mut session = Session::new(&network, OutputFormat::Json, Vec::new());
        session
            .run(Cursor::new("camino ana fede\nsubgrupos\nagrupamiento eva\nvolar\n"))
            .unwrap();
        let out = String::from_utf8(session.into_inner()).unwrap();
        let docs: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(docs[0]["command"], "path");
        assert!(docs[0]["hops"].is_null());
        assert_eq!(docs[1], serde_json::json!({ "command": "components", "sizes": [5, 1] }));
        assert!(docs[2]["coefficient"].is_null());
        assert_eq!(docs[3]["error"], "unknown command \"volar\"");
    }
}
