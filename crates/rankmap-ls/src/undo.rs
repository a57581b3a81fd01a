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

//! Undo support for tentative swaps.
//!
//! A swap touches the ranks of two nodes, the contributions of both nodes and
//! of all their neighbors, and the running total. The log records the swapped
//! pair, the previous total and every overwritten contribution, then restores
//! them in reverse order on rejection. A node adjacent to both swapped nodes
//! is recorded twice; restoring in LIFO order still yields its original value.
//!
//! The contribution stacks are `SmallVec`s sized for typical degrees, so a
//! swap between low-degree nodes never touches the heap. The log is cleared,
//! not dropped, between swaps and keeps whatever capacity it grew to.

use crate::cache::ContributionCache;
use rankmap_core::num::CostNumeric;
use rankmap_model::index::RankIndex;
use smallvec::SmallVec;

const INLINE_ENTRIES: usize = 32;

#[derive(Debug, Clone)]
pub struct UndoLog<T> {
    swapped: Option<(usize, usize)>,
    old_total: Option<T>,
    nodes: SmallVec<[usize; INLINE_ENTRIES]>, // LIFO stack of touched nodes
    values: SmallVec<[T; INLINE_ENTRIES]>,    // LIFO stack of their previous contributions
}

impl<T> Default for UndoLog<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UndoLog<T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            swapped: None,
            old_total: None,
            nodes: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    /// Forgets every recorded change.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.swapped = None;
        self.old_total = None;
        self.nodes.clear();
        self.values.clear();
    }

    /// Returns `true` if nothing has been recorded since the last clear.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.swapped.is_none() && self.nodes.is_empty()
    }

    /// Returns the number of recorded contribution changes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Records the swap of nodes `a` and `b` and the total before it.
    #[inline(always)]
    pub fn push_swap(&mut self, a: usize, b: usize, old_total: T) {
        debug_assert!(
            self.swapped.is_none(),
            "called `UndoLog::push_swap` while a swap of {:?} is already recorded",
            self.swapped
        );
        self.swapped = Some((a, b));
        self.old_total = Some(old_total);
    }

    /// Records the contribution of `node` before it is overwritten.
    #[inline(always)]
    pub fn push_contribution(&mut self, node: usize, old_value: T) {
        debug_assert_eq!(
            self.nodes.len(),
            self.values.len(),
            "called `UndoLog::push_contribution` with unbalanced stacks"
        );
        self.nodes.push(node);
        self.values.push(old_value);
    }

    /// Restores contributions, total and ranks to their state before the
    /// recorded swap, leaving the log empty.
    #[inline]
    pub fn apply_rollback(&mut self, cache: &mut ContributionCache<T>, ranks: &mut [RankIndex]) {
        debug_assert_eq!(
            self.nodes.len(),
            self.values.len(),
            "called `UndoLog::apply_rollback` with unbalanced stacks"
        );

        while let (Some(node), Some(value)) = (self.nodes.pop(), self.values.pop()) {
            cache.restore_contribution(node, value);
        }
        if let Some(total) = self.old_total.take() {
            cache.restore_total(total);
        }
        if let Some((a, b)) = self.swapped.take() {
            ranks.swap(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmap_core::utils::index::typed_vec;

    #[test]
    fn test_rollback_restores_in_lifo_order() {
        let mut cache = ContributionCache::<i64>::from_parts(vec![1, 2, 3], 6);
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 1, 2]);
        let mut log = UndoLog::new();

        log.push_swap(0, 2, cache.total());
        ranks.swap(0, 2);

        // node 1 is touched twice
        log.push_contribution(1, 2);
        cache.restore_contribution(1, 5);
        log.push_contribution(1, 5);
        cache.restore_contribution(1, 9);
        log.push_contribution(0, 1);
        cache.restore_contribution(0, 4);
        cache.restore_total(16);
        assert_eq!(log.len(), 3);

        log.apply_rollback(&mut cache, &mut ranks);

        assert!(log.is_empty());
        assert_eq!(cache.contributions(), &[1, 2, 3]);
        assert_eq!(cache.total(), 6);
        assert_eq!(ranks, typed_vec(&[0, 1, 2]));
    }

    #[test]
    fn test_clear_discards_records() {
        let mut log = UndoLog::<i64>::new();
        log.push_swap(0, 1, 10);
        log.push_contribution(0, 3);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_grows_past_inline_capacity() {
        let mut cache = ContributionCache::<i64>::from_parts(vec![0; 100], 0);
        let mut ranks: Vec<RankIndex> = typed_vec(&[0, 1]);
        let mut log = UndoLog::new();
        log.push_swap(0, 1, 0);
        for node in 0..100 {
            log.push_contribution(node, 0);
            cache.restore_contribution(node, node as i64);
        }
        log.apply_rollback(&mut cache, &mut ranks);
        assert!(cache.contributions().iter().all(|&c| c == 0));
    }
}
