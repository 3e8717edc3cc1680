use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use bibfs_core::{Graph, Interleave, Path, PathEngine, SearchConfig, SearchStats};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compare standard and bidirectional BFS on synthetic topologies.
#[derive(Parser, Debug)]
#[command(name = "bibfs-bench", version)]
struct Cli {
    /// Topology to generate.
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Number of nodes per generated graph.
    #[arg(default_value_t = 1_000_000, value_parser = clap::value_parser!(u64).range(20..))]
    node_count: u64,

    /// Random query pairs to run in addition to 0 → last node.
    #[arg(long, default_value_t = 4)]
    pairs: usize,

    /// JSON search config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interleaving policy; overrides the config file.
    #[arg(long)]
    interleave: Option<Interleave>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Run all generators and benchmark each.
    All,
    /// Fractal branching tree (deep paths).
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke).
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts.
    Smallworld,
    /// Erdos-Renyi uniform random edges.
    Random,
    /// Two dense cliques connected by a thin bridge.
    Barbell,
    /// Diffusion-limited aggregation (organic branching).
    Dla,
}

type Generator = fn(u64) -> Graph<u64>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_path(path)
            .with_context(|| format!("loading --config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(interleave) = cli.interleave {
        config = config.with_interleave(interleave);
    }
    info!(interleave = %config.interleave, "search config");

    let generators: Vec<(&str, Generator)> = match cli.mode {
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("L-system tree", gen_lsystem as Generator),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    println!("bibfs-bench (interleave: {})", config.interleave);
    println!("===========");
    println!();

    for (name, generator) in generators {
        run_benchmark(name, generator, cli.node_count, cli.pairs, config);
    }

    Ok(())
}

fn run_benchmark(name: &str, generator: Generator, node_count: u64, pairs: usize, config: SearchConfig) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s — {} nodes, {} edges, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    let engine = PathEngine::with_config(&graph, config);
    let far_node = graph.node_count() as u64 - 1;
    let mut rng = FastRng::new(node_count ^ 0x5eed);
    let mut queries = vec![(0, far_node)];
    queries.extend((0..pairs).map(|_| (rng.next(node_count), rng.next(node_count))));

    println!();
    println!(
        "{:>18} {:>6} {:>10} {:>10} {:>6} {:>10} {:>10}",
        "query", "hops", "visited", "standard", "hops", "visited", "bidir"
    );
    println!(
        "{:->18} {:->6} {:->10} {:->10} {:->6} {:->10} {:->10}",
        "", "", "", "", "", "", ""
    );

    for (start, end) in queries {
        let (standard, standard_stats, standard_time) =
            timed(|| engine.standard_bfs_with_stats(&start, &end));
        let (bidir, bidir_stats, bidir_time) =
            timed(|| engine.bidirectional_bfs_with_stats(&start, &end));

        println!(
            "{:>18} {:>6} {:>10} {:>8.1}ms {:>6} {:>10} {:>8.1}ms",
            format!("{} → {}", start, end),
            hops_str(&standard),
            standard_stats.nodes_visited,
            standard_time.as_secs_f64() * 1000.0,
            hops_str(&bidir),
            bidir_stats.nodes_visited,
            bidir_time.as_secs_f64() * 1000.0,
        );

        if standard.hops() != bidir.hops() {
            warn!(
                start,
                end,
                standard = ?standard.hops(),
                bidirectional = ?bidir.hops(),
                "path lengths differ"
            );
        }
    }
    println!();
}

fn timed<F>(search: F) -> (Path<u64>, SearchStats, Duration)
where
    F: FnOnce() -> (Path<u64>, SearchStats),
{
    let t = Instant::now();
    let (path, stats) = search();
    (path, stats, t.elapsed())
}

fn hops_str(path: &Path<u64>) -> String {
    path.hops().map_or_else(|| "-".to_string(), |h| h.to_string())
}

// ---------------------------------------------------------------------------
// Generators — all O(n) or O(n + edges), single-threaded, deterministic
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

/// L-system fractal tree: each node spawns three children.
///
/// Log depth, exponential width. The far node is a leaf on the last layer.
fn gen_lsystem(node_count: u64) -> Graph<u64> {
    let mut graph = Graph::with_capacity(node_count as usize, node_count as usize);
    let branching = 3u64;
    graph.add_node(0);

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
                graph.add_edge(parent, child);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Picking a random endpoint from the edge list is proportional to degree.
fn gen_scale_free(node_count: u64) -> Graph<u64> {
    let edges_per_node = 10u64;
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * edges_per_node) as usize);
    let mut rng = FastRng::new(12345);

    let mut edge_endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64;
    for i in 0..seed {
        for j in (i + 1)..seed {
            graph.add_edge(i, j);
            edge_endpoints.push(i);
            edge_endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        graph.add_node(new_node);

        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            let idx = rng.next(edge_endpoints.len() as u64) as usize;
            let target = edge_endpoints[idx];
            if target != new_node {
                graph.add_edge(new_node, target);
                edge_endpoints.push(new_node);
                edge_endpoints.push(target);
            }
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
fn gen_small_world(node_count: u64) -> Graph<u64> {
    let k = 10u64; // neighbors on each side
    let p = 0.05f64; // rewire probability
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * k) as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        graph.add_node(i);
    }

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                graph.add_edge(i, if rewired != i { rewired } else { neighbor });
            } else {
                graph.add_edge(i, neighbor);
            }
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniform random edges per node, no structure.
fn gen_random(node_count: u64) -> Graph<u64> {
    let target_edges = node_count * 10;
    let mut graph = Graph::with_capacity(node_count as usize, target_edges as usize);
    let mut rng = FastRng::new(54321);

    for i in 0..node_count {
        graph.add_node(i);
    }

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            graph.add_edge(from, to);
        }
    }

    graph
}

/// Barbell: two dense clusters joined by a 10-node bridge.
///
/// Node 0 sits in the first cluster and the far node in the second, so
/// every path crosses the bottleneck.
fn gen_barbell(node_count: u64) -> Graph<u64> {
    let bridge_len = 10u64;
    let clique_size = (node_count - bridge_len) / 2;
    let mut graph = Graph::with_capacity(node_count as usize, (clique_size * 40 + bridge_len) as usize);
    let mut rng = FastRng::new(99999);

    for i in 0..clique_size {
        graph.add_node(i);
    }
    for i in 0..clique_size {
        for _ in 0..20u64.min(clique_size - 1) {
            let target = rng.next(clique_size);
            if target != i {
                graph.add_edge(i, target);
            }
        }
    }

    // Bridge: chain from last node of A to first node of B
    let bridge_start = clique_size;
    for i in 0..bridge_len {
        let id = bridge_start + i;
        if i == 0 {
            graph.add_edge(clique_size - 1, id);
        } else {
            graph.add_edge(id - 1, id);
        }
    }

    let b_start = bridge_start + bridge_len;
    for i in 0..clique_size {
        graph.add_node(b_start + i);
    }
    graph.add_edge(b_start - 1, b_start);

    for i in 0..clique_size {
        for _ in 0..20u64.min(clique_size - 1) {
            let target = rng.next(clique_size);
            if target != i {
                graph.add_edge(b_start + i, b_start + target);
            }
        }
    }

    graph
}

/// DLA (Diffusion-Limited Aggregation): organic, tree-like growth.
///
/// Each new node attaches to a recent "surface" node, with an occasional
/// long-range second edge that creates loops.
fn gen_dla(node_count: u64) -> Graph<u64> {
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * 2) as usize);
    let mut rng = FastRng::new(77777);

    graph.add_node(0);

    let surface_max = 10000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        graph.add_edge(new_node, attach_to);

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                graph.add_edge(new_node, other);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: u64 = 500;

    fn all_generators() -> [(&'static str, Generator); 6] {
        [
            ("lsystem", gen_lsystem),
            ("scalefree", gen_scale_free),
            ("smallworld", gen_small_world),
            ("random", gen_random),
            ("barbell", gen_barbell),
            ("dla", gen_dla),
        ]
    }

    #[test]
    fn test_generators_produce_every_node() {
        for (name, generator) in all_generators() {
            let g = generator(SMALL);
            assert_eq!(g.node_count() as u64, SMALL, "{name}");
            assert!(g.contains(&(SMALL - 1)), "{name}");
        }
    }

    #[test]
    fn test_generators_are_deterministic() {
        for (name, generator) in all_generators() {
            let a: Vec<_> = generator(SMALL).edges().map(|(x, y, _)| (*x, *y)).collect();
            let b: Vec<_> = generator(SMALL).edges().map(|(x, y, _)| (*x, *y)).collect();
            assert_eq!(a, b, "{name}");
        }
    }

    #[test]
    fn test_per_layer_agrees_with_standard() {
        for (name, generator) in all_generators() {
            let g = generator(SMALL);
            let engine = PathEngine::new(&g);
            let standard = engine.standard_bfs(&0, &(SMALL - 1));
            let bidir = engine.bidirectional_bfs(&0, &(SMALL - 1));
            assert_eq!(standard.hops(), bidir.hops(), "{name}");
            assert!(bidir.is_walk_in(&g), "{name}");
        }
    }

    #[test]
    fn test_barbell_crosses_bridge() {
        let g = gen_barbell(SMALL);
        let path = PathEngine::new(&g).bidirectional_bfs(&0, &(SMALL - 1));
        let bridge_start = (SMALL - 10) / 2;
        for id in bridge_start..bridge_start + 10 {
            assert!(path.nodes().contains(&id), "missing bridge node {id}");
        }
    }

    #[test]
    fn test_cli_parses_interleave() {
        let cli = Cli::try_parse_from(["bibfs-bench", "dla", "100", "--interleave", "per_node"]).unwrap();
        assert!(matches!(cli.mode, Mode::Dla));
        assert_eq!(cli.node_count, 100);
        assert_eq!(cli.interleave, Some(Interleave::PerNode));
    }

    #[test]
    fn test_cli_rejects_tiny_graphs() {
        assert!(Cli::try_parse_from(["bibfs-bench", "random", "5"]).is_err());
    }
}
