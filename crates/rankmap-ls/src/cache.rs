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

//! # Node Contribution Cache
//!
//! For every node `u` the cache holds
//! `contribution[u] = sum over out-edges (u -> v, w) of w * D(rank[u], rank[v])`
//! together with the running total of all contributions, which equals the QAP
//! cost of the current assignment.
//!
//! ## Swap update
//!
//! Swapping the ranks of nodes `a` and `b` changes
//!
//! * the contributions of `a` and `b` themselves, which are recomputed over
//!   their out-edges, and
//! * the contribution of every other neighbor `v` of `a` (or `b`), but only in
//!   the single term of its edge back into `a` (or `b`). Since edges are
//!   symmetric that term has the weight `w` of `a -> v`, so the update is
//!   `w * (D(rank[v], new rank[a]) - D(rank[v], old rank[a]))`.
//!
//! Every overwritten value goes to an [`UndoLog`], which restores the exact
//! previous state on rejection. The cost is `O(deg(a) + deg(b))`.
//!
//! ## Arithmetic
//!
//! `initialize` computes with checked arithmetic. The engine additionally
//! verifies that `sum of directed weights * max distance` fits in `T`; every
//! contribution, every total and every delta of any assignment is bounded by
//! that product in absolute value, so the swap update uses plain arithmetic.

use crate::{error::LocalSearchError, undo::UndoLog};
use rankmap_core::num::CostNumeric;
use rankmap_model::{
    distance::DistanceProvider,
    graph::CommGraph,
    index::{NodeIndex, RankIndex},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionCache<T> {
    contributions: Vec<T>, // len = num_nodes
    total: T,
}

impl<T> Default for ContributionCache<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ContributionCache<T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            contributions: Vec::new(),
            total: T::zero(),
        }
    }

    /// Creates an empty cache with room for `num_nodes` contributions.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            contributions: Vec::with_capacity(num_nodes),
            total: T::zero(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(contributions: Vec<T>, total: T) -> Self {
        Self {
            contributions,
            total,
        }
    }

    /// Computes every contribution and the total for `ranks` from scratch.
    ///
    /// Fails with [`LocalSearchError::ObjectiveOverflow`] if any partial sum
    /// leaves the range of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `ranks.len() != graph.num_nodes()` or a rank is out of range
    /// for `distance`.
    pub fn initialize<D>(
        &mut self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &[RankIndex],
    ) -> Result<(), LocalSearchError>
    where
        D: DistanceProvider<T> + ?Sized,
    {
        assert_eq!(
            ranks.len(),
            graph.num_nodes(),
            "called `ContributionCache::initialize` with an assignment of length {} for a graph with {} nodes",
            ranks.len(),
            graph.num_nodes()
        );

        self.contributions.clear();
        self.contributions.reserve(graph.num_nodes());
        self.total = T::zero();

        for u in graph.nodes() {
            let ru = ranks[u.get()];
            let mut contribution = T::zero();
            for (v, w) in graph.out_edges(u) {
                let term = w
                    .checked_mul(&distance.distance(ru, ranks[v.get()]))
                    .ok_or(LocalSearchError::ObjectiveOverflow)?;
                contribution = contribution
                    .checked_add(&term)
                    .ok_or(LocalSearchError::ObjectiveOverflow)?;
            }
            self.contributions.push(contribution);
            self.total = self
                .total
                .checked_add(&contribution)
                .ok_or(LocalSearchError::ObjectiveOverflow)?;
        }
        Ok(())
    }

    /// Returns the sum of all contributions.
    #[inline]
    pub fn total(&self) -> T {
        self.total
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Returns the contribution of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn contribution(&self, node: NodeIndex) -> T {
        assert!(
            node.get() < self.contributions.len(),
            "called `ContributionCache::contribution` with node index out of bounds: the len is {} but the index is {}",
            self.contributions.len(),
            node.get()
        );
        self.contributions[node.get()]
    }

    #[inline]
    pub fn contributions(&self) -> &[T] {
        &self.contributions
    }

    #[inline(always)]
    pub(crate) fn restore_contribution(&mut self, node: usize, value: T) {
        debug_assert!(
            node < self.contributions.len(),
            "called `ContributionCache::restore_contribution` with node index out of bounds: the len is {} but the index is {}",
            self.contributions.len(),
            node
        );
        self.contributions[node] = value;
    }

    #[inline(always)]
    pub(crate) fn restore_total(&mut self, total: T) {
        self.total = total;
    }

    #[inline(always)]
    fn overwrite(&mut self, node: usize, value: T, undo: &mut UndoLog<T>) {
        let old = self.contributions[node];
        undo.push_contribution(node, old);
        self.contributions[node] = value;
        self.total = self.total - old + value;
    }

    /// Swaps the ranks of `a` and `b`, updates all affected contributions and
    /// the total, records every change in `undo` and returns the new total.
    ///
    /// # Safety
    ///
    /// The caller must ensure that
    /// * the cache was initialized for `graph`, `distance` and `ranks`,
    /// * `a != b` and both are `< graph.num_nodes()`,
    /// * every rank in `ranks` is `< distance.num_ranks()`,
    /// * the objective bound `sum of directed weights * max distance` fits in `T`,
    /// * `undo` is empty.
    pub unsafe fn apply_swap_unchecked<D>(
        &mut self,
        graph: &CommGraph<T>,
        distance: &D,
        ranks: &mut [RankIndex],
        a: NodeIndex,
        b: NodeIndex,
        undo: &mut UndoLog<T>,
    ) -> T
    where
        D: DistanceProvider<T> + ?Sized,
    {
        let (ai, bi) = (a.get(), b.get());
        debug_assert!(
            ai != bi && ai < graph.num_nodes() && bi < graph.num_nodes(),
            "called `ContributionCache::apply_swap_unchecked` with invalid pair ({}, {}) for a graph with {} nodes",
            ai,
            bi,
            graph.num_nodes()
        );
        debug_assert!(
            undo.is_empty(),
            "called `ContributionCache::apply_swap_unchecked` with a non-empty undo log"
        );

        let old_ra = ranks[ai];
        let old_rb = ranks[bi];
        undo.push_swap(ai, bi, self.total);
        ranks.swap(ai, bi);

        // neighbors: only the edge back into the moved node changes
        for (moved, old_rank, other) in [(a, old_ra, bi), (b, old_rb, ai)] {
            let new_rank = ranks[moved.get()];
            // SAFETY: `moved` is in bounds by the caller contract.
            for (v, w) in unsafe { graph.out_edges_unchecked(moved) } {
                let vi = v.get();
                if vi == other {
                    continue;
                }
                let rv = ranks[vi];
                // SAFETY: all ranks are < num_ranks by the caller contract.
                let delta = unsafe {
                    distance.distance_unchecked(rv, new_rank)
                        - distance.distance_unchecked(rv, old_rank)
                };
                if delta != T::zero() {
                    let updated = self.contributions[vi] + w * delta;
                    self.overwrite(vi, updated, undo);
                }
            }
        }

        // the moved nodes themselves
        for moved in [a, b] {
            let rm = ranks[moved.get()];
            let mut contribution = T::zero();
            // SAFETY: `moved` is in bounds; ranks are < num_ranks.
            for (v, w) in unsafe { graph.out_edges_unchecked(moved) } {
                contribution = contribution
                    + w * unsafe { distance.distance_unchecked(rm, ranks[v.get()]) };
            }
            self.overwrite(moved.get(), contribution, undo);
        }

        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmap_core::utils::index::typed_vec;
    use rankmap_metrics::qap::{node_contribution, total_qap};
    use rankmap_model::{
        distance::{DenseDistanceMatrix, HierarchicalDistance},
        graph::CommGraphBuilder,
        matrix::DenseMatrix,
    };

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring(len: usize) -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(len);
        for i in 0..len {
            b.add_edge(n(i), n((i + 1) % len), 1);
        }
        b.build().unwrap()
    }

    fn linear(k: usize) -> DenseDistanceMatrix<i64> {
        DenseDistanceMatrix::from_matrix(DenseMatrix::from_fn(k, k, |a, b| {
            (a as i64 - b as i64).abs()
        }))
        .unwrap()
    }

    fn assert_matches_reference(
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

    #[test]
    fn test_initialize_ring() {
        let g = ring(4);
        let d = linear(4);
        let ranks: Vec<RankIndex> = typed_vec(&[0, 1, 2, 3]);
        let mut cache = ContributionCache::new();
        cache.initialize(&g, &d, &ranks).unwrap();
        assert_eq!(cache.total(), 12);
        assert_eq!(cache.contributions(), &[4, 2, 2, 4]);
    }

    #[test]
    fn test_swap_update_matches_reference() {
        let mut b = CommGraphBuilder::<i64>::new(6);
        b.add_edge(n(0), n(1), 3)
            .add_edge(n(0), n(2), 1)
            .add_edge(n(1), n(2), 5)
            .add_edge(n(2), n(3), 2)
            .add_edge(n(3), n(4), 4)
            .add_edge(n(4), n(5), 1)
            .add_edge(n(5), n(0), 7)
            .add_edge(n(1), n(4), 2);
        let g = b.build().unwrap();
        let d = DenseDistanceMatrix::from_provider(
            &HierarchicalDistance::new(vec![2, 3], vec![1, 10]).unwrap(),
        );
        let mut ranks: Vec<RankIndex> = typed_vec(&[5, 0, 3, 1, 4, 2]);
        let mut cache = ContributionCache::new();
        let mut undo = UndoLog::new();
        cache.initialize(&g, &d, &ranks).unwrap();

        for (a, b) in [(0, 1), (1, 2), (0, 5), (3, 4), (2, 5), (4, 1)] {
            let total = unsafe { cache.apply_swap_unchecked(&g, &d, &mut ranks, n(a), n(b), &mut undo) };
            assert_eq!(total, cache.total());
            assert_matches_reference(&cache, &g, &d, &ranks);
            undo.clear();
        }
    }

    #[test]
    fn test_rollback_restores_exact_state() {
        let g = ring(5);
        let d = linear(5);
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 3, 1, 4, 2]);
        let mut cache = ContributionCache::new();
        let mut undo = UndoLog::new();
        cache.initialize(&g, &d, &ranks).unwrap();

        let before = cache.clone();
        let ranks_before = ranks.clone();

        unsafe { cache.apply_swap_unchecked(&g, &d, &mut ranks, n(1), n(3), &mut undo) };
        assert_ne!(ranks, ranks_before);
        undo.apply_rollback(&mut cache, &mut ranks);

        assert_eq!(cache, before);
        assert_eq!(ranks, ranks_before);
    }

    #[test]
    fn test_swap_of_adjacent_nodes() {
        let g = ring(4);
        let d = linear(4);
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 2, 1, 3]);
        let mut cache = ContributionCache::new();
        let mut undo = UndoLog::new();
        cache.initialize(&g, &d, &ranks).unwrap();
        assert_eq!(cache.total(), 16);

        let total = unsafe { cache.apply_swap_unchecked(&g, &d, &mut ranks, n(1), n(2), &mut undo) };
        assert_eq!(total, 12);
        assert_matches_reference(&cache, &g, &d, &ranks);
    }

    #[test]
    fn test_initialize_reports_overflow() {
        let mut b = CommGraphBuilder::<i8>::new(2);
        b.add_edge(n(0), n(1), 100);
        let g = b.build().unwrap();
        let d = DenseDistanceMatrix::<i8>::new(2, vec![0, 2, 2, 0]).unwrap();
        let ranks: Vec<RankIndex> = typed_vec(&[0, 1]);
        let mut cache = ContributionCache::new();
        assert_eq!(
            cache.initialize(&g, &d, &ranks),
            Err(LocalSearchError::ObjectiveOverflow)
        );
    }
}
