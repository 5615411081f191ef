use std::fmt;

use graph_analytics_core::GraphError;
use thiserror::Error;

/// How many arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::AtMost(n) => count <= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::AtMost(n) => write!(f, "at most {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Recommend,
    Diffuse,
    Centrality,
    Path,
    Diameter,
    Clustering,
    Distances,
    Components,
    Articulation,
}

impl CommandKind {
    pub const ALL: [CommandKind; 9] = [
        CommandKind::Recommend,
        CommandKind::Diffuse,
        CommandKind::Centrality,
        CommandKind::Path,
        CommandKind::Diameter,
        CommandKind::Clustering,
        CommandKind::Distances,
        CommandKind::Components,
        CommandKind::Articulation,
    ];

    /// Primary keyword accepted at the prompt.
    pub fn keyword(self) -> &'static str {
        match self {
            CommandKind::Recommend => "recomendar",
            CommandKind::Diffuse => "difundir",
            CommandKind::Centrality => "centralidad",
            CommandKind::Path => "camino",
            CommandKind::Diameter => "diametro",
            CommandKind::Clustering => "agrupamiento",
            CommandKind::Distances => "distancias",
            CommandKind::Components => "subgrupos",
            CommandKind::Articulation => "articulacion",
        }
    }

    /// English alias for the keyword.
    pub fn alias(self) -> &'static str {
        match self {
            CommandKind::Recommend => "recommend",
            CommandKind::Diffuse => "diffuse",
            CommandKind::Centrality => "centrality",
            CommandKind::Path => "path",
            CommandKind::Diameter => "diameter",
            CommandKind::Clustering => "clustering",
            CommandKind::Distances => "distances",
            CommandKind::Components => "components",
            CommandKind::Articulation => "articulation",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            CommandKind::Recommend | CommandKind::Path => Arity::Exactly(2),
            CommandKind::Diffuse => Arity::AtLeast(1),
            CommandKind::Centrality | CommandKind::Distances => Arity::Exactly(1),
            CommandKind::Clustering => Arity::AtMost(1),
            CommandKind::Diameter | CommandKind::Components | CommandKind::Articulation => {
                Arity::Exactly(0)
            }
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword() == word || kind.alias() == word)
    }
}

/// A parsed command line. Names are still unresolved labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Recommend { name: String, count: usize },
    Diffuse { names: Vec<String> },
    Centrality { count: usize },
    Path { from: String, to: String },
    Diameter,
    Clustering { name: Option<String> },
    Distances { name: String },
    Components,
    Articulation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),

    #[error("{keyword} takes {expected} argument(s), got {found}")]
    Arity {
        keyword: &'static str,
        expected: Arity,
        found: usize,
    },

    #[error("count must be a non-negative integer, got {0:?}")]
    InvalidCount(String),

    #[error("no vertex named {0:?}")]
    UnknownName(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn parse_count(token: &str) -> Result<usize, CommandError> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(count) = token.parse() {
            return Ok(count);
        }
    }
    Err(CommandError::InvalidCount(token.to_string()))
}

/// Parse one input line. Commas count as whitespace; the first token is the
/// keyword. `Ok(None)` for a line with no tokens.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut tokens = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };
    let kind = CommandKind::from_keyword(keyword)
        .ok_or_else(|| CommandError::Unknown(keyword.to_string()))?;

    let args: Vec<String> = tokens.map(str::to_owned).collect();
    let expected = kind.arity();
    let arity_error = || CommandError::Arity {
        keyword: kind.keyword(),
        expected,
        found: args.len(),
    };
    if !expected.accepts(args.len()) {
        return Err(arity_error());
    }

    let command = match (kind, args.as_slice()) {
        (CommandKind::Recommend, [name, count]) => Command::Recommend {
            name: name.clone(),
            count: parse_count(count)?,
        },
        (CommandKind::Diffuse, names) => Command::Diffuse {
            names: names.to_vec(),
        },
        (CommandKind::Centrality, [count]) => Command::Centrality {
            count: parse_count(count)?,
        },
        (CommandKind::Path, [from, to]) => Command::Path {
            from: from.clone(),
            to: to.clone(),
        },
        (CommandKind::Diameter, []) => Command::Diameter,
        (CommandKind::Clustering, [name]) => Command::Clustering {
            name: Some(name.clone()),
        },
        (CommandKind::Clustering, []) => Command::Clustering { name: None },
        (CommandKind::Distances, [name]) => Command::Distances { name: name.clone() },
        (CommandKind::Components, []) => Command::Components,
        (CommandKind::Articulation, []) => Command::Articulation,
        _ => return Err(arity_error()),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords_and_aliases() {
        assert_eq!(
            parse("recomendar ana 3").unwrap(),
            Some(Command::Recommend { name: "ana".into(), count: 3 })
        );
        assert_eq!(
            parse("recommend ana 3").unwrap(),
            parse("recomendar ana 3").unwrap()
        );
        assert_eq!(parse("diametro").unwrap(), Some(Command::Diameter));
        assert_eq!(parse("components").unwrap(), Some(Command::Components));
        assert_eq!(parse("articulacion").unwrap(), Some(Command::Articulation));
    }

    #[test]
    fn test_commas_are_whitespace() {
        assert_eq!(
            parse("difundir ana,beto, carla").unwrap(),
            Some(Command::Diffuse {
                names: vec!["ana".into(), "beto".into(), "carla".into()]
            })
        );
        assert_eq!(
            parse("camino,ana,beto").unwrap(),
            Some(Command::Path { from: "ana".into(), to: "beto".into() })
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("  , ").unwrap(), None);
    }

    #[test]
    fn test_optional_argument() {
        assert_eq!(
            parse("agrupamiento").unwrap(),
            Some(Command::Clustering { name: None })
        );
        assert_eq!(
            parse("agrupamiento ana").unwrap(),
            Some(Command::Clustering { name: Some("ana".into()) })
        );
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(
            parse("recomendar ana").unwrap_err(),
            CommandError::Arity { keyword: "recomendar", expected: Arity::Exactly(2), found: 1 }
        );
        assert!(matches!(parse("difundir"), Err(CommandError::Arity { found: 0, .. })));
        assert!(matches!(parse("agrupamiento a b"), Err(CommandError::Arity { .. })));
        assert!(matches!(parse("diameter x"), Err(CommandError::Arity { .. })));
    }

    #[test]
    fn test_invalid_count() {
        assert_eq!(
            parse("centralidad -1").unwrap_err(),
            CommandError::InvalidCount("-1".into())
        );
        assert!(matches!(parse("centralidad +2"), Err(CommandError::InvalidCount(_))));
        assert!(matches!(parse("recomendar ana dos"), Err(CommandError::InvalidCount(_))));
        assert_eq!(
            parse("centralidad 0").unwrap(),
            Some(Command::Centrality { count: 0 })
        );
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(
            parse("debilidad").unwrap_err(),
            CommandError::Unknown("debilidad".into())
        );
    }

    #[test]
    fn test_arity_display() {
        let err = parse("camino ana").unwrap_err();
        assert_eq!(err.to_string(), "camino takes exactly 2 argument(s), got 1");
    }
}
