//! graph-analytics: query shell over a social graph.
//!
//! Loads a flat-file graph, then answers commands read from standard input
//! (recommend, diffuse, centrality, path, diameter, clustering, distances,
//! components, articulation) until EOF or an empty line.

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod command;
mod config;
mod load;
mod session;

use config::Settings;
use session::Session;

fn main() {
    let settings = Settings::parse();

    // Logs go to stderr so command output on stdout stays clean
    let filter = EnvFilter::try_new(settings.log_directive()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    if let Err(e) = run(&settings) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let network = load::load_file(&settings.graph_file, settings.directed, settings.max_vertices)
        .with_context(|| format!("failed to load graph from {}", settings.graph_file.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&network, settings.format, stdout.lock());
    session
        .run(stdin.lock())
        .context("failed to read commands")?;
    Ok(())
}
