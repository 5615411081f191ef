use clap::{Parser, ValueEnum};
use graph_analytics_core::{
    articulation_points, average_clustering, centrality, connected_components, diameter, diffuse,
    recommend, Bfs, Graph, GraphError,
};
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run all generators and benchmark each
    All,
    /// Fractal branching tree (deep paths)
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Two dense cliques connected by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

/// Synthetic-topology benchmark for graph-analytics-core.
#[derive(Debug, Parser)]
#[command(name = "graph-analytics-bench", version)]
struct Args {
    /// Which generator to run
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Number of vertices to generate
    #[arg(default_value_t = 200_000)]
    node_count: u64,

    /// Largest graph on which the all-pairs analyses (centrality, diameter) run
    #[arg(long, default_value_t = 2_000)]
    all_pairs_limit: u64,
}

type BenchGraph = Graph<u64>;

fn main() {
    let args = Args::parse();

    println!("graph-analytics-bench");
    println!("=====================");
    println!();

    let generators: Vec<(&str, fn(u64) -> BenchGraph)> = match args.mode {
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("L-system tree", gen_lsystem as fn(u64) -> BenchGraph),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, args.node_count, args.all_pairs_limit);
    }
}

fn millis(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_benchmark(name: &str, generator: fn(u64) -> BenchGraph, node_count: u64, all_pairs_limit: u64) {
    println!("--- {} ---", name);
    println!("Target: {} vertices", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    println!(
        "Generated in {:.2}s: {} vertices, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    if graph.is_empty() {
        println!();
        return;
    }

    // Level sizes from vertex 0, resuming one lazy traversal
    println!();
    println!("{:>8} {:>12} {:>12} {:>10}", "level", "found", "visited", "time");
    println!("{:->8} {:->12} {:->12} {:->10}", "", "", "", "");

    let t = Instant::now();
    let mut bfs = match Bfs::new(&graph, &0) {
        Ok(bfs) => bfs,
        Err(e) => {
            eprintln!("Cannot root traversal: {}", e);
            return;
        }
    };
    for level in [1, 2, 3, 5, 10, 20, 50] {
        let found = bfs.count_at_level(level);
        println!(
            "{:>8} {:>12} {:>12} {:>8.1}ms",
            level,
            found,
            bfs.visited_count(),
            millis(t)
        );
        if bfs.is_complete() && found == 0 {
            println!("{:>8} (entire component reached)", "");
            break;
        }
    }

    // Shortest path: vertex 0 to the last vertex
    let far_node = graph.vertex_count() as u64 - 1;
    println!();
    let t = Instant::now();
    match graph.vertex(&far_node).and_then(|far| bfs.shortest_path_to(far)) {
        Ok(path) if !path.is_empty() => println!(
            "Shortest path 0 -> {}: {} hops in {:.1}ms",
            far_node,
            path.len() - 1,
            millis(t)
        ),
        Ok(_) => println!("Shortest path 0 -> {}: no path ({:.1}ms)", far_node, millis(t)),
        Err(e) => println!("Shortest path 0 -> {}: {}", far_node, e),
    }

    println!();
    println!("{:<24} {:>16} {:>10}", "analysis", "result", "time");
    println!("{:-<24} {:->16} {:->10}", "", "", "");

    let t = Instant::now();
    let sizes = connected_components(&graph);
    report("components", sizes.len(), t);

    let t = Instant::now();
    let cuts = articulation_points(&graph);
    report("articulation points", cuts.len(), t);

    let t = Instant::now();
    let avg = average_clustering(&graph);
    println!(
        "{:<24} {:>16} {:>8.1}ms",
        "average clustering",
        avg.map_or_else(|| "-1".to_string(), |c| format!("{:.4}", c)),
        millis(t)
    );

    let t = Instant::now();
    match recommend(&graph, &0, 10) {
        Ok(picks) => report("recommend(0, 10)", picks.len(), t),
        Err(e) => println!("{:<24} {}", "recommend(0, 10)", e),
    }

    let seeds: Vec<u64> = (0..node_count.min(16)).collect();
    let t = Instant::now();
    match diffuse(&graph, &seeds) {
        Ok(adopters) => report("diffuse(16 seeds)", adopters.len(), t),
        Err(e) => println!("{:<24} {}", "diffuse(16 seeds)", e),
    }

    if node_count <= all_pairs_limit {
        let t = Instant::now();
        let top = centrality(&graph, 10);
        report("centrality(10)", top.len(), t);

        let t = Instant::now();
        let path = diameter(&graph);
        report("diameter (hops)", path.len().saturating_sub(1), t);
    } else {
        println!(
            "{:<24} skipped above {} vertices",
            "centrality / diameter", all_pairs_limit
        );
    }
    println!();
}

fn report(label: &str, value: usize, started: Instant) {
    println!("{:<24} {:>16} {:>8.1}ms", label, value, millis(started));
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn with_vertices(count: u64) -> BenchGraph {
    let mut graph = Graph::with_capacity(false, count as usize);
    for i in 0..count {
        if let Err(e) = graph.add_vertex(i, ()) {
            panic!("generator produced a bad vertex: {}", e);
        }
    }
    graph
}

/// Undirected edge, tolerating the self-loops and repeats random sampling
/// produces. Returns whether a new edge was added.
fn link(graph: &mut BenchGraph, a: u64, b: u64) -> bool {
    if a == b {
        return false;
    }
    match graph.add_edge(&a, &b, ()) {
        Ok(()) => true,
        Err(GraphError::DuplicateEdge(..)) => false,
        Err(e) => panic!("generator produced a bad edge: {}", e),
    }
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each vertex spawns `branching` children. Produces deep paths (log depth)
/// with exponential width. Every inner vertex is an articulation point.
fn gen_lsystem(node_count: u64) -> BenchGraph {
    let mut graph = with_vertices(node_count);
    let branching = 3u64;

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                link(&mut graph, parent, child);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random existing edge and connecting
/// to one of its endpoints. Vertices with more edges are more likely picked.
fn gen_scale_free(node_count: u64) -> BenchGraph {
    let edges_per_node = 10u64;
    let mut graph = with_vertices(node_count);
    let mut rng = FastRng::new(12345);

    // Edge list for O(1) preferential attachment sampling
    let mut edge_endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64.min(node_count);
    for i in 0..seed {
        for j in (i + 1)..seed {
            link(&mut graph, i, j);
            edge_endpoints.push(i);
            edge_endpoints.push(j);
        }
    }
    if edge_endpoints.is_empty() {
        return graph;
    }

    for new_node in seed..node_count {
        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            let idx = rng.next(edge_endpoints.len() as u64) as usize;
            let target = edge_endpoints[idx];
            if link(&mut graph, new_node, target) {
                edge_endpoints.push(new_node);
                edge_endpoints.push(target);
            }
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// High clustering with short path lengths.
fn gen_small_world(node_count: u64) -> BenchGraph {
    let k = 10u64; // neighbors on each side
    let p = 0.05f64; // rewire probability
    let mut graph = with_vertices(node_count);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if !link(&mut graph, i, rewired) {
                    link(&mut graph, i, neighbor);
                }
            } else {
                link(&mut graph, i, neighbor);
            }
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniform random edges per vertex, no structure.
fn gen_random(node_count: u64) -> BenchGraph {
    let mut graph = with_vertices(node_count);
    let mut rng = FastRng::new(54321);

    for _ in 0..node_count * 10 {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        link(&mut graph, from, to);
    }

    graph
}

/// Barbell: two dense clusters joined by a chain of ~10 bridge vertices.
///
/// Every bridge vertex is an articulation point and dominates centrality.
fn gen_barbell(node_count: u64) -> BenchGraph {
    let bridge_len = 10u64.min(node_count);
    let clique_size = (node_count - bridge_len) / 2;
    let mut graph = with_vertices(node_count);
    let mut rng = FastRng::new(99999);

    let b_start = clique_size + bridge_len;
    for base in [0, b_start] {
        for i in 0..clique_size {
            for _ in 0..20u64.min(clique_size.saturating_sub(1)) {
                let target = rng.next(clique_size);
                link(&mut graph, base + i, base + target);
            }
        }
    }

    // Bridge: chain from last vertex of A through to first vertex of B
    for id in clique_size..b_start {
        if id > 0 {
            link(&mut graph, id - 1, id);
        }
    }
    if clique_size > 0 {
        link(&mut graph, b_start - 1, b_start);
    }

    graph
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new vertex attaches to a random vertex on a bounded "surface" of
/// recent additions, with occasional long-range jumps.
fn gen_dla(node_count: u64) -> BenchGraph {
    let mut graph = with_vertices(node_count);
    let mut rng = FastRng::new(77777);

    // VecDeque for O(1) pop_front when evicting the oldest surface vertex
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        link(&mut graph, new_node, attach_to);

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            link(&mut graph, new_node, other);
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    graph
}
