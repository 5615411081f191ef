use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Rendering used for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain lines, one name or number per line
    #[default]
    Text,
    /// One JSON document per command
    Json,
}

/// Query shell over a social graph loaded from a flat file.
///
/// Commands are read from standard input, one per line, until EOF or an
/// empty line.
#[derive(Debug, Parser)]
#[command(name = "graph-analytics")]
#[command(version)]
#[command(about = "Query shell for social-network graph analytics", long_about = None)]
pub struct Settings {
    /// Graph file: vertex count, vertex records, edge count, edge records
    #[arg(env = "GRAPH_ANALYTICS_FILE")]
    pub graph_file: PathBuf,

    /// Treat edges as directed
    #[arg(long, env = "GRAPH_ANALYTICS_DIRECTED")]
    pub directed: bool,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "GRAPH_ANALYTICS_FORMAT")]
    pub format: OutputFormat,

    /// Refuse graph files declaring more vertices than this
    #[arg(
        long,
        default_value_t = 1_000_000,
        value_parser = clap::value_parser!(u64).range(1..=50_000_000),
        env = "GRAPH_ANALYTICS_MAX_VERTICES"
    )]
    pub max_vertices: u64,

    /// Tracing filter directive, e.g. `graph_analytics_core=debug`
    #[arg(long, env = "GRAPH_ANALYTICS_LOG")]
    pub log_filter: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Settings {
    /// Filter directive for the subscriber. An explicit filter wins over
    /// `--verbose`.
    pub fn log_directive(&self) -> &str {
        match &self.log_filter {
            Some(filter) => filter,
            None if self.verbose => "debug",
            None => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["graph-analytics", "net.txt"]).unwrap();
        assert_eq!(settings.graph_file, PathBuf::from("net.txt"));
        assert!(!settings.directed);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.max_vertices, 1_000_000);
        assert_eq!(settings.log_directive(), "info");
    }

    #[test]
    fn test_flags() {
        let settings = Settings::try_parse_from([
            "graph-analytics",
            "net.txt",
            "--directed",
            "--format",
            "json",
            "--max-vertices",
            "10",
            "-v",
        ])
        .unwrap();
        assert!(settings.directed);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.max_vertices, 10);
        assert_eq!(settings.log_directive(), "debug");
    }

    #[test]
    fn test_log_filter_overrides_verbose() {
        let settings = Settings::try_parse_from([
            "graph-analytics",
            "net.txt",
            "-v",
            "--log-filter",
            "warn",
        ])
        .unwrap();
        assert_eq!(settings.log_directive(), "warn");
    }

    #[test]
    fn test_max_vertices_range() {
        assert!(Settings::try_parse_from(["graph-analytics", "net.txt", "--max-vertices", "0"]).is_err());
        assert!(
            Settings::try_parse_from(["graph-analytics", "net.txt", "--max-vertices", "50000001"])
                .is_err()
        );
    }
}
