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

use proptest::prelude::*;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    acceptance::greedy_descent::GreedyDescent,
    cache::ContributionCache,
    engine::LocalSearchEngine,
    monitor::no_op::NoOperationMonitor,
    search_space::{exhaustive::ExhaustiveSearchSpace, random::RandomSearchSpace},
    undo::UndoLog,
};
use rankmap_metrics::qap::{node_contribution, total_qap};
use rankmap_model::{
    assignment::{identity_assignment, validate_rank_assignment},
    distance::DenseDistanceMatrix,
    graph::{CommGraph, CommGraphBuilder},
    index::{NodeIndex, RankIndex},
};

type Instance = (CommGraph<i64>, DenseDistanceMatrix<i64>, Vec<RankIndex>);

fn build_instance(n: usize, links: &[(usize, usize, i64)], seed: u64) -> Instance {
    let mut builder = CommGraphBuilder::new(n);
    for &(u, v, w) in links {
        if u != v {
            builder.add_edge(NodeIndex::new(u), NodeIndex::new(v), w);
        }
    }
    let graph = builder.build().unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut values = vec![0i64; n * n];
    for a in 0..n {
        for b in (a + 1)..n {
            let d = rng.random_range(1..50);
            values[a * n + b] = d;
            values[b * n + a] = d;
        }
    }
    let distance = DenseDistanceMatrix::new(n, values).unwrap();

    let mut ranks = identity_assignment(n);
    ranks.shuffle(&mut rng);
    (graph, distance, ranks)
}

fn instance_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, i64)>, u64)> {
    (2usize..12).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 1i64..20), 0..40),
            any::<u64>(),
        )
    })
}

fn assert_cache_matches(
    cache: &ContributionCache<i64>,
    graph: &CommGraph<i64>,
    distance: &DenseDistanceMatrix<i64>,
    ranks: &[RankIndex],
) {
    assert_eq!(cache.total(), total_qap(graph, distance, ranks));
    for u in graph.nodes() {
        assert_eq!(
            cache.contribution(u),
            node_contribution(graph, distance, ranks, u),
            "contribution of {} diverged",
            u
        );
    }
}

proptest! {
    #[test]
    fn cache_agrees_with_reference_after_every_swap(
        (n, links, seed) in instance_strategy(),
        swaps in prop::collection::vec((any::<u16>(), any::<u16>(), any::<bool>()), 1..30),
    ) {
        let (graph, distance, mut ranks) = build_instance(n, &links, seed);
        let mut cache = ContributionCache::new();
        let mut undo = UndoLog::new();
        cache.initialize(&graph, &distance, &ranks).unwrap();

        for (x, y, keep) in swaps {
            let a = x as usize % n;
            let b = y as usize % n;
            if a == b {
                continue;
            }
            let before_cache = cache.clone();
            let before_ranks = ranks.clone();

            // SAFETY: a != b, both < n, ranks form a permutation of 0..n.
            let total = unsafe {
                cache.apply_swap_unchecked(
                    &graph,
                    &distance,
                    &mut ranks,
                    NodeIndex::new(a),
                    NodeIndex::new(b),
                    &mut undo,
                )
            };
            prop_assert_eq!(total, total_qap(&graph, &distance, &ranks));
            assert_cache_matches(&cache, &graph, &distance, &ranks);

            if keep {
                undo.clear();
            } else {
                undo.apply_rollback(&mut cache, &mut ranks);
                prop_assert_eq!(&cache, &before_cache);
                prop_assert_eq!(&ranks, &before_ranks);
            }
            prop_assert!(undo.is_empty());
        }
    }

    #[test]
    fn greedy_never_worsens_and_keeps_a_bijection(
        (n, links, seed) in instance_strategy(),
    ) {
        let (graph, distance, mut ranks) = build_instance(n, &links, seed);
        let initial = total_qap(&graph, &distance, &ranks);

        let outcome = LocalSearchEngine::new()
            .run(
                &graph,
                &distance,
                &mut ranks,
                &mut ExhaustiveSearchSpace::new(n),
                &mut GreedyDescent::new(),
                &mut NoOperationMonitor::new(),
            )
            .unwrap();

        prop_assert_eq!(outcome.initial_objective(), initial);
        prop_assert!(outcome.final_objective() <= initial);
        prop_assert_eq!(outcome.final_objective(), total_qap(&graph, &distance, &ranks));
        prop_assert!(validate_rank_assignment(&ranks, n).is_ok());

        let stats = outcome.statistics();
        prop_assert_eq!(
            stats.iterations,
            stats.skipped_swaps + stats.accepted_swaps + stats.rejected_swaps
        );
    }

    #[test]
    fn exhaustive_result_is_a_swap_local_optimum(
        (n, links, seed) in instance_strategy(),
    ) {
        let (graph, distance, mut ranks) = build_instance(n, &links, seed);
        let outcome = LocalSearchEngine::new()
            .run(
                &graph,
                &distance,
                &mut ranks,
                &mut ExhaustiveSearchSpace::new(n),
                &mut GreedyDescent::new(),
                &mut NoOperationMonitor::new(),
            )
            .unwrap();

        let best = outcome.final_objective();
        for a in 0..n {
            for b in (a + 1)..n {
                let mut swapped = ranks.clone();
                swapped.swap(a, b);
                prop_assert!(total_qap(&graph, &distance, &swapped) >= best);
            }
        }
    }

    #[test]
    fn random_search_is_reproducible(
        (n, links, seed) in instance_strategy(),
    ) {
        let (graph, distance, start) = build_instance(n, &links, seed);
        let mut results = Vec::new();
        for _ in 0..2 {
            let mut ranks = start.clone();
            let mut space =
                RandomSearchSpace::new(n, 50, ChaCha8Rng::seed_from_u64(seed)).unwrap();
            LocalSearchEngine::new()
                .run(
                    &graph,
                    &distance,
                    &mut ranks,
                    &mut space,
                    &mut GreedyDescent::new(),
                    &mut NoOperationMonitor::new(),
                )
                .unwrap();
            results.push(ranks);
        }
        prop_assert_eq!(&results[0], &results[1]);
    }
}
