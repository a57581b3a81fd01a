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

//! Configuration driven mapping refinement.
//!
//! `MappingRefiner` owns a validated `LocalSearchConfig` and a reusable
//! engine. Each call to `refine` builds a fresh search space and acceptance
//! criterion from the configuration, so two calls with the same inputs and
//! configuration produce the same assignment.

use crate::error::RankmapError;
use rankmap_core::num::CostNumeric;
use rankmap_ls::{
    config::LocalSearchConfig,
    engine::LocalSearchEngine,
    monitor::{
        composite::CompositeLocalSearchMonitor, local_search_monitor::LocalSearchMonitor,
        log::LogMonitor,
    },
    result::LocalSearchOutcome,
};
use rankmap_model::{distance::DistanceProvider, graph::CommGraph, index::RankIndex};

/// Clock checks of the progress log every 4096 pairs.
const LOG_CLOCK_CHECK_MASK: u64 = 0x0FFF;

#[derive(Debug, Clone)]
pub struct MappingRefiner<T> {
    config: LocalSearchConfig,
    engine: LocalSearchEngine<T>,
}

impl<T> MappingRefiner<T>
where
    T: CostNumeric,
{
    /// Creates a refiner for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RankmapError::Config`] if the configuration is invalid.
    pub fn new(config: LocalSearchConfig) -> Result<Self, RankmapError> {
        config.validate()?;
        Ok(Self {
            config,
            engine: LocalSearchEngine::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Refines `ranks` in place and returns the run's outcome.
    ///
    /// Progress is reported through the `log` facade if the configuration
    /// has a log interval.
    ///
    /// # Errors
    ///
    /// See [`LocalSearchEngine::run`]; every error except an objective
    /// mismatch leaves `ranks` untouched.
    pub fn refine<D>(
        &mut self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &mut [RankIndex],
    ) -> Result<LocalSearchOutcome<T>, RankmapError>
    where
        D: DistanceProvider<T> + ?Sized,
    {
        self.refine_with_monitors(graph, distance, ranks, Vec::new())
    }

    /// Like [`MappingRefiner::refine`], additionally reporting every event to
    /// `monitors`.
    ///
    /// # Errors
    ///
    /// See [`MappingRefiner::refine`].
    pub fn refine_with_monitors<'a, D>(
        &mut self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &mut [RankIndex],
        monitors: Vec<Box<dyn LocalSearchMonitor<T> + 'a>>,
    ) -> Result<LocalSearchOutcome<T>, RankmapError>
    where
        D: DistanceProvider<T> + ?Sized,
    {
        let mut search_space = self.config.build_search_space(graph)?;
        let mut acceptance = self.config.build_acceptance::<T>()?;

        let mut monitor = CompositeLocalSearchMonitor::with_capacity(monitors.len() + 1);
        if let Some(interval) = self.config.log_interval() {
            monitor.add_monitor(LogMonitor::new(interval, LOG_CLOCK_CHECK_MASK));
        }
        for m in monitors {
            monitor.add_boxed_monitor(m);
        }

        log::debug!("refining mapping with {} on {}", search_space.name(), distance.name());
        let outcome = self.engine.run(
            graph,
            distance,
            ranks,
            &mut search_space,
            &mut acceptance,
            &mut monitor,
        )?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmap_core::utils::index::typed_vec;
    use rankmap_ls::{
        config::{AcceptanceKind, SearchSpaceKind},
        error::LocalSearchError,
        stats::LocalSearchStatistics,
    };
    use rankmap_metrics::qap::total_qap;
    use rankmap_model::{
        assignment::validate_rank_assignment,
        distance::{DenseDistanceMatrix, HierarchicalDistance},
        error::ConfigError,
        graph::CommGraphBuilder,
        index::NodeIndex,
        matrix::DenseMatrix,
    };
    use std::time::Duration;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring(len: usize, weight: i64) -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(len);
        for i in 0..len {
            b.add_edge(n(i), n((i + 1) % len), weight);
        }
        b.build().unwrap()
    }

    fn quiet(kind: SearchSpaceKind) -> LocalSearchConfig {
        LocalSearchConfig::default()
            .with_search_space(kind)
            .with_log_interval(None)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = quiet(SearchSpaceKind::Windowed { window: 0 });
        assert!(matches!(
            MappingRefiner::<i64>::new(config),
            Err(RankmapError::Config(ConfigError::ZeroWindow))
        ));
    }

    #[test]
    fn test_every_search_space_improves_interleaved_ring() {
        let g = ring(8, 10);
        let machine = HierarchicalDistance::new(vec![4, 2], vec![1i64, 10]).unwrap();
        let start: Vec<RankIndex> = typed_vec(&[0, 4, 1, 5, 2, 6, 3, 7]);
        let start_cost = total_qap(&g, &machine, &start);

        for kind in [
            SearchSpaceKind::Exhaustive,
            SearchSpaceKind::Windowed { window: 3 },
            SearchSpaceKind::Random {
                max_unsuccessful: 200,
            },
            SearchSpaceKind::CommunicationGraph { depth: 2 },
        ] {
            let mut ranks = start.clone();
            let mut refiner = MappingRefiner::new(quiet(kind).with_seed(42)).unwrap();
            let outcome = refiner.refine(&g, &machine, &mut ranks).unwrap();

            assert_eq!(outcome.initial_objective(), start_cost, "{}", kind);
            assert!(outcome.final_objective() < start_cost, "{}", kind);
            assert_eq!(outcome.final_objective(), total_qap(&g, &machine, &ranks));
            validate_rank_assignment(&ranks, 8).unwrap();
        }
    }

    #[test]
    fn test_refine_is_deterministic_for_a_seed() {
        let g = ring(12, 3);
        let d = DenseDistanceMatrix::from_matrix(DenseMatrix::from_fn(12, 12, |a, b| {
            (a as i64 - b as i64).abs()
        }))
        .unwrap();
        let start: Vec<RankIndex> = typed_vec(&[5, 11, 0, 7, 2, 9, 4, 1, 10, 3, 8, 6]);
        let config = quiet(SearchSpaceKind::Random {
            max_unsuccessful: 100,
        })
        .with_seed(7);

        let mut first = start.clone();
        let mut second = start.clone();
        MappingRefiner::new(config.clone())
            .unwrap()
            .refine(&g, &d, &mut first)
            .unwrap();
        MappingRefiner::new(config)
            .unwrap()
            .refine(&g, &d, &mut second)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_budget_limits_the_run() {
        let g = ring(10, 1);
        let d = DenseDistanceMatrix::from_matrix(DenseMatrix::from_fn(10, 10, |a, b| {
            (a as i64 - b as i64).abs()
        }))
        .unwrap();
        let mut ranks: Vec<RankIndex> = typed_vec(&[9, 0, 8, 1, 7, 2, 6, 3, 5, 4]);
        let config = quiet(SearchSpaceKind::Exhaustive)
            .with_max_evaluations(5)
            .with_time_limit(Duration::from_secs(60));
        let outcome = MappingRefiner::new(config)
            .unwrap()
            .refine(&g, &d, &mut ranks)
            .unwrap();
        assert_eq!(outcome.statistics().iterations, 5);
    }

    #[test]
    fn test_annealing_never_returns_worse_than_start() {
        let g = ring(8, 10);
        let machine = HierarchicalDistance::new(vec![2, 2, 2], vec![1i64, 5, 20]).unwrap();
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 7, 1, 6, 2, 5, 3, 4]);
        let start_cost = total_qap(&g, &machine, &ranks);
        let config = quiet(SearchSpaceKind::Random {
            max_unsuccessful: 500,
        })
        .with_acceptance(AcceptanceKind::SimulatedAnnealing {
            initial_temperature: 50.0,
            cooling_rate: 0.99,
            min_temperature: 0.1,
        })
        .with_seed(3);

        let outcome = MappingRefiner::new(config)
            .unwrap()
            .refine(&g, &machine, &mut ranks)
            .unwrap();
        assert!(outcome.final_objective() <= start_cost);
        assert_eq!(outcome.final_objective(), total_qap(&g, &machine, &ranks));
    }

    struct Counter<'c> {
        accepted: &'c mut u64,
    }

    impl LocalSearchMonitor<i64> for Counter<'_> {
        fn name(&self) -> &str {
            "Counter"
        }

        fn on_start(&mut self, _initial_objective: i64) {}

        fn on_end(&mut self, _final_objective: i64, statistics: &LocalSearchStatistics) {
            *self.accepted = statistics.accepted_swaps;
        }
    }

    #[test]
    fn test_extra_monitors_observe_the_run() {
        let g = ring(8, 10);
        let machine = HierarchicalDistance::new(vec![4, 2], vec![1i64, 10]).unwrap();
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 4, 1, 5, 2, 6, 3, 7]);
        let mut accepted = 0;
        let counter: Box<dyn LocalSearchMonitor<i64> + '_> = Box::new(Counter {
            accepted: &mut accepted,
        });

        let outcome = MappingRefiner::new(
            LocalSearchConfig::default().with_search_space(SearchSpaceKind::Exhaustive),
        )
        .unwrap()
        .refine_with_monitors(&g, &machine, &mut ranks, vec![counter])
        .unwrap();

        assert!(accepted > 0);
        assert_eq!(accepted, outcome.statistics().accepted_swaps);
    }

    #[test]
    fn test_engine_errors_are_forwarded() {
        let g = ring(4, 1);
        let machine = HierarchicalDistance::new(vec![2, 4], vec![1i64, 10]).unwrap();
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 1, 2, 3]);
        let err = MappingRefiner::new(quiet(SearchSpaceKind::Exhaustive))
            .unwrap()
            .refine(&g, &machine, &mut ranks)
            .unwrap_err();
        assert_eq!(
            err,
            RankmapError::LocalSearch(LocalSearchError::RankCountMismatch { nodes: 4, ranks: 8 })
        );
    }
}
