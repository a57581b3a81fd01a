// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use rankmap_ls::{
    acceptance::greedy_descent::GreedyDescent, cache::ContributionCache,
    engine::LocalSearchEngine, monitor::no_op::NoOperationMonitor,
    search_space::windowed::WindowedSearchSpace, undo::UndoLog,
};
use rankmap_model::{
    assignment::identity_assignment,
    distance::HierarchicalDistance,
    graph::{CommGraph, CommGraphBuilder},
    index::{NodeIndex, RankIndex},
};
use std::hint::black_box;

const SIDES: [usize; 3] = [16, 32, 64];
const PAIRS_PER_ITER: usize = 1024;

/// A `side x side` grid with unit volumes, the typical stencil pattern.
fn grid(side: usize) -> CommGraph<i64> {
    let mut b = CommGraphBuilder::new(side * side);
    for r in 0..side {
        for c in 0..side {
            let u = NodeIndex::new(r * side + c);
            if c + 1 < side {
                b.add_edge(u, NodeIndex::new(r * side + c + 1), 1);
            }
            if r + 1 < side {
                b.add_edge(u, NodeIndex::new((r + 1) * side + c), 1);
            }
        }
    }
    b.build().unwrap()
}

/// Four cores per processor, eight processors per node, the rest in nodes.
fn machine(num_ranks: usize) -> HierarchicalDistance<i64> {
    HierarchicalDistance::new(vec![4, 8, num_ranks / 32], vec![1, 10, 100]).unwrap()
}

fn shuffled(n: usize, seed: u64) -> Vec<RankIndex> {
    let mut ranks = identity_assignment(n);
    ranks.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    ranks
}

fn bench_swap_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_evaluation");

    for side in SIDES {
        let n = side * side;
        let graph = grid(side);
        let distance = machine(n);
        let mut ranks = shuffled(n, 42);

        let mut cache = ContributionCache::preallocated(n);
        cache.initialize(&graph, &distance, &ranks).unwrap();
        let mut undo = UndoLog::new();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pairs: Vec<(NodeIndex, NodeIndex)> = (0..PAIRS_PER_ITER)
            .map(|_| {
                let a = rng.random_range(0..n);
                let b = (a + 1 + rng.random_range(0..n - 1)) % n;
                (NodeIndex::new(a), NodeIndex::new(b))
            })
            .collect();

        group.throughput(Throughput::Elements(PAIRS_PER_ITER as u64));
        group.bench_with_input(BenchmarkId::new("grid", n), &n, |bencher, _| {
            bencher.iter(|| {
                for &(a, b) in &pairs {
                    // SAFETY: pairs are distinct and in bounds, ranks stay a
                    // permutation and the grid objective fits in i64.
                    let total = unsafe {
                        cache.apply_swap_unchecked(
                            &graph,
                            &distance,
                            &mut ranks,
                            black_box(a),
                            black_box(b),
                            &mut undo,
                        )
                    };
                    black_box(total);
                    undo.apply_rollback(&mut cache, &mut ranks);
                }
            })
        });
    }
    group.finish();
}

fn bench_windowed_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_run");
    group.sample_size(10);

    for side in SIDES {
        let n = side * side;
        let graph = grid(side);
        let distance = machine(n);
        let start = shuffled(n, 42);
        let mut engine = LocalSearchEngine::preallocated(n);

        group.bench_with_input(BenchmarkId::new("grid", n), &n, |bencher, _| {
            bencher.iter(|| {
                let mut ranks = start.clone();
                let outcome = engine
                    .run(
                        &graph,
                        &distance,
                        &mut ranks,
                        &mut WindowedSearchSpace::new(n, 8).unwrap(),
                        &mut GreedyDescent::new(),
                        &mut NoOperationMonitor::new(),
                    )
                    .unwrap();
                black_box(outcome.final_objective())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_swap_evaluation, bench_windowed_run);
criterion_main!(benches);
