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

//! Swap-based local search driver.
//!
//! The engine refines a rank assignment in place. A run has four phases:
//!
//! 1. **Initializing**: every input is checked before anything is touched,
//!    then the contribution cache is filled from scratch.
//! 2. **Searching**: the search space proposes pairs until it reports done.
//!    Pairs whose ranks share the innermost location are skipped without
//!    evaluation. Every other pair is swapped tentatively, the cache is
//!    updated incrementally and the acceptance criterion decides whether the
//!    swap stays or is rolled back from the undo log.
//! 3. **Validating**: the running total is compared with a full recomputation
//!    of the QAP cost. If the best assignment is restored afterwards, its
//!    recomputed cost must equal the best running total seen. A mismatch is
//!    returned as an error, never ignored.
//! 4. **Done**: the outcome with statistics is returned; the refined
//!    assignment is left in the caller's buffer.
//!
//! Criteria that accept worsening swaps may end a run above the best
//! assignment they passed through. The engine snapshots the assignment the
//! moment the search first leaves its best state and restores the snapshot
//! at the end, so the returned assignment is always the best one seen.
//!
//! Cache, undo log and snapshot buffer are kept between runs, so repeated
//! runs on graphs of similar size do not reallocate.

use crate::{
    acceptance::AcceptanceCriterion, cache::ContributionCache, error::LocalSearchError,
    monitor::local_search_monitor::LocalSearchMonitor, result::LocalSearchOutcome,
    search_space::SearchSpace, stats::LocalSearchStatistics, undo::UndoLog,
};
use rankmap_core::num::CostNumeric;
use rankmap_metrics::qap::total_qap;
use rankmap_model::{
    assignment::validate_rank_assignment, distance::DistanceProvider, graph::CommGraph,
    index::RankIndex,
};
use std::time::Instant;

/// Where the engine currently is, or stopped, in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EnginePhase {
    #[default]
    Initializing,
    Searching,
    Validating,
    Done,
}

impl std::fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnginePhase::Initializing => write!(f, "Initializing"),
            EnginePhase::Searching => write!(f, "Searching"),
            EnginePhase::Validating => write!(f, "Validating"),
            EnginePhase::Done => write!(f, "Done"),
        }
    }
}

/// Upper bound on the absolute value of any contribution, total or swap
/// delta: the sum of all directed edge weights times the largest distance.
/// `None` if the bound does not fit in `T`.
fn objective_bound<T, D>(graph: &CommGraph<T>, distance: &D) -> Option<T>
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    let mut weight_sum = T::zero();
    for u in graph.nodes() {
        for (_, w) in graph.out_edges(u) {
            weight_sum = weight_sum.checked_add(&w)?;
        }
    }
    weight_sum.checked_mul(&distance.max_distance())
}

#[derive(Debug, Clone)]
pub struct LocalSearchEngine<T> {
    cache: ContributionCache<T>,
    undo: UndoLog<T>,
    best_ranks: Vec<RankIndex>,
    phase: EnginePhase,
}

impl<T> Default for LocalSearchEngine<T>
where
    T: CostNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LocalSearchEngine<T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            cache: ContributionCache::new(),
            undo: UndoLog::new(),
            best_ranks: Vec::new(),
            phase: EnginePhase::Initializing,
        }
    }

    /// Creates an engine whose buffers are sized for `num_nodes` nodes.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            cache: ContributionCache::preallocated(num_nodes),
            undo: UndoLog::new(),
            best_ranks: Vec::with_capacity(num_nodes),
            phase: EnginePhase::Initializing,
        }
    }

    /// Returns the phase the last run reached.
    #[inline]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Returns the contribution cache of the last run.
    #[inline]
    pub fn cache(&self) -> &ContributionCache<T> {
        &self.cache
    }

    #[inline]
    fn enter(&mut self, phase: EnginePhase) {
        log::debug!("local search phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn check_inputs<D, S>(
        &self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &[RankIndex],
        search_space: &S,
    ) -> Result<(), LocalSearchError>
    where
        D: DistanceProvider<T> + ?Sized,
        S: SearchSpace + ?Sized,
    {
        let num_nodes = graph.num_nodes();
        if num_nodes == 0 {
            return Err(LocalSearchError::EmptyGraph);
        }
        if ranks.len() != num_nodes {
            return Err(LocalSearchError::AssignmentLengthMismatch {
                nodes: num_nodes,
                assignment: ranks.len(),
            });
        }
        if distance.num_ranks() != num_nodes {
            return Err(LocalSearchError::RankCountMismatch {
                nodes: num_nodes,
                ranks: distance.num_ranks(),
            });
        }
        if search_space.num_nodes() != num_nodes {
            return Err(LocalSearchError::SearchSpaceSizeMismatch {
                name: search_space.name().to_string(),
                nodes: num_nodes,
                search_space: search_space.num_nodes(),
            });
        }
        validate_rank_assignment(ranks, distance.num_ranks())?;

        let min_distance = distance.min_distance();
        if min_distance < T::zero() {
            return Err(LocalSearchError::NegativeDistance(min_distance.to_string()));
        }
        if objective_bound(graph, distance).is_none() {
            return Err(LocalSearchError::ObjectiveOverflow);
        }
        Ok(())
    }

    /// Refines `ranks` in place by pairwise rank swaps.
    ///
    /// `ranks[u]` is the rank node `u` runs on and must be a bijection onto
    /// the ranks of `distance`. The search space decides which pairs are
    /// tried and when to stop, the acceptance criterion which swaps stay, and
    /// the monitor observes every step.
    ///
    /// # Errors
    ///
    /// Every variant of [`LocalSearchError`] except `ObjectiveMismatch` is
    /// returned before `ranks` is modified. `ObjectiveMismatch` means the
    /// incremental total disagrees with the recomputed cost after the search;
    /// `ranks` is then still a valid bijection.
    ///
    /// # Panics
    ///
    /// Panics if the search space returns a pair of equal nodes or a node out
    /// of bounds.
    pub fn run<D, S, A, M>(
        &mut self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &mut [RankIndex],
        search_space: &mut S,
        acceptance: &mut A,
        monitor: &mut M,
    ) -> Result<LocalSearchOutcome<T>, LocalSearchError>
    where
        D: DistanceProvider<T> + ?Sized,
        S: SearchSpace + ?Sized,
        A: AcceptanceCriterion<T> + ?Sized,
        M: LocalSearchMonitor<T> + ?Sized,
    {
        let start_time = Instant::now();
        let mut stats = LocalSearchStatistics::default();
        self.enter(EnginePhase::Initializing);
        self.undo.clear();

        self.check_inputs(graph, distance, ranks, search_space)?;
        self.cache.initialize(graph, distance, ranks)?;

        let num_nodes = graph.num_nodes();
        let initial_objective = self.cache.total();
        let same_location = distance.same_location_distance();
        let mut best_objective = initial_objective;
        let mut best_is_current = true;

        log::debug!(
            "local search over {} nodes with {} and {}, initial objective {}",
            num_nodes,
            search_space.name(),
            acceptance.name(),
            initial_objective
        );

        monitor.on_start(initial_objective);
        search_space.on_start();
        acceptance.on_start();

        self.enter(EnginePhase::Searching);
        while !search_space.done() {
            let (a, b) = search_space.next_pair();
            let (ai, bi) = (a.get(), b.get());
            assert!(
                ai != bi && ai < num_nodes && bi < num_nodes,
                "called `LocalSearchEngine::run` with search space `{}` returning invalid pair ({}, {}) for {} nodes",
                search_space.name(),
                ai,
                bi,
                num_nodes
            );
            stats.on_iteration();

            // SAFETY: `ranks` is a validated bijection onto `0..num_ranks`.
            let pair_distance = unsafe { distance.distance_unchecked(ranks[ai], ranks[bi]) };
            if pair_distance == same_location {
                stats.on_skipped_swap();
                search_space.commit_status(false);
                monitor.on_swap_skipped(a, b, &stats);
                continue;
            }

            let current = self.cache.total();
            // SAFETY: the cache was initialized for these inputs, the pair is
            // distinct and in bounds, ranks are valid, the objective bound was
            // checked and the undo log is empty after every step.
            let candidate = unsafe {
                self.cache
                    .apply_swap_unchecked(graph, distance, ranks, a, b, &mut self.undo)
            };

            if acceptance.should_accept(current, candidate) {
                if candidate < best_objective {
                    best_objective = candidate;
                    best_is_current = true;
                } else if best_is_current {
                    // leaving the best assignment: keep a copy of it
                    self.best_ranks.clear();
                    self.best_ranks.extend_from_slice(ranks);
                    self.best_ranks.swap(ai, bi);
                    best_is_current = false;
                }
                self.undo.clear();
                stats.on_accepted_swap();
                acceptance.on_accept();
                search_space.commit_status(true);
                monitor.on_swap_accepted(a, b, candidate, &stats);
            } else {
                self.undo.apply_rollback(&mut self.cache, ranks);
                stats.on_rejected_swap();
                acceptance.on_reject();
                search_space.commit_status(false);
                monitor.on_swap_rejected(a, b, candidate, &stats);
            }
        }

        self.enter(EnginePhase::Validating);
        let incremental = self.cache.total();
        let reference = total_qap(graph, distance, ranks);
        if incremental != reference {
            log::error!(
                "objective mismatch: incremental {} but recomputed {}",
                incremental,
                reference
            );
            return Err(LocalSearchError::ObjectiveMismatch {
                incremental: incremental.to_string(),
                reference: reference.to_string(),
            });
        }

        if !best_is_current {
            log::debug!(
                "restoring best assignment with objective {} (current {})",
                best_objective,
                incremental
            );
            ranks.copy_from_slice(&self.best_ranks);
            self.cache.initialize(graph, distance, ranks)?;
            let restored = self.cache.total();
            if restored != best_objective {
                log::error!(
                    "objective mismatch: best seen {} but restored assignment costs {}",
                    best_objective,
                    restored
                );
                return Err(LocalSearchError::ObjectiveMismatch {
                    incremental: best_objective.to_string(),
                    reference: restored.to_string(),
                });
            }
        }
        let final_objective = self.cache.total();

        stats.set_total_time(start_time.elapsed());
        monitor.on_end(final_objective, &stats);
        self.enter(EnginePhase::Done);

        log::debug!(
            "local search finished: {} -> {} after {} iterations",
            initial_objective,
            final_objective,
            stats.iterations
        );
        Ok(LocalSearchOutcome::new(
            initial_objective,
            final_objective,
            stats,
        ))
    }
}
