//! Standard vs bidirectional BFS on a grid and on a long cycle.

use bibfs_core::{Graph, Interleave, PathEngine, SearchConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_grid(side: u64) -> Graph<u64> {
    let mut g = Graph::with_capacity((side * side) as usize, (2 * side * side) as usize);
    for r in 0..side {
        for c in 0..side {
            let id = r * side + c;
            if c + 1 < side {
                g.add_edge(id, id + 1);
            }
            if r + 1 < side {
                g.add_edge(id, id + side);
            }
        }
    }
    g
}

fn make_cycle(n: u64) -> Graph<u64> {
    let mut g = Graph::with_capacity(n as usize, n as usize);
    for i in 0..n {
        g.add_edge(i, (i + 1) % n);
    }
    g
}

fn bench_grid(c: &mut Criterion) {
    let g = make_grid(200);
    let far = 200 * 200 - 1;
    let per_layer = PathEngine::new(&g);
    let per_node = PathEngine::with_config(&g, SearchConfig::default().with_interleave(Interleave::PerNode));

    c.bench_function("grid_200_standard", |b| {
        b.iter(|| black_box(per_layer.standard_bfs(&0, &far)))
    });
    c.bench_function("grid_200_bidirectional_per_layer", |b| {
        b.iter(|| black_box(per_layer.bidirectional_bfs(&0, &far)))
    });
    c.bench_function("grid_200_bidirectional_per_node", |b| {
        b.iter(|| black_box(per_node.bidirectional_bfs(&0, &far)))
    });
}

fn bench_cycle(c: &mut Criterion) {
    let g = make_cycle(100_000);
    let engine = PathEngine::new(&g);

    c.bench_function("cycle_100k_standard", |b| {
        b.iter(|| black_box(engine.standard_bfs(&0, &50_000)))
    });
    c.bench_function("cycle_100k_bidirectional", |b| {
        b.iter(|| black_box(engine.bidirectional_bfs(&0, &50_000)))
    });
}

criterion_group!(benches, bench_grid, bench_cycle);
criterion_main!(benches);
