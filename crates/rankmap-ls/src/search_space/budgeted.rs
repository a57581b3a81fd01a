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

//! Evaluation budget for any search space.
//!
//! Counts every pair handed out by the inner space, skipped or not, and
//! reports `done` once the budget is used up.

use crate::search_space::SearchSpace;
use rankmap_model::index::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetedSearchSpace<S> {
    inner: S,
    max_evaluations: u64,
    evaluations: u64,
}

impl<S> BudgetedSearchSpace<S>
where
    S: SearchSpace,
{
    /// Wraps `inner`, allowing at most `max_evaluations` pairs per run.
    #[inline]
    pub fn new(inner: S, max_evaluations: u64) -> Self {
        Self {
            inner,
            max_evaluations,
            evaluations: 0,
        }
    }

    #[inline]
    pub fn max_evaluations(&self) -> u64 {
        self.max_evaluations
    }

    /// Returns the number of pairs drawn since the last start.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    #[inline]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> SearchSpace for BudgetedSearchSpace<S>
where
    S: SearchSpace,
{
    fn name(&self) -> &str {
        "BudgetedSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn on_start(&mut self) {
        self.evaluations = 0;
        self.inner.on_start();
    }

    #[inline]
    fn done(&self) -> bool {
        self.evaluations >= self.max_evaluations || self.inner.done()
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        self.evaluations += 1;
        self.inner.next_pair()
    }

    #[inline]
    fn commit_status(&mut self, accepted: bool) {
        self.inner.commit_status(accepted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_space::exhaustive::ExhaustiveSearchSpace;

    #[test]
    fn test_stops_at_budget() {
        let mut space = BudgetedSearchSpace::new(ExhaustiveSearchSpace::new(10), 7);
        space.on_start();
        let mut steps = 0;
        while !space.done() {
            space.next_pair();
            // keep the inner space alive forever
            space.commit_status(true);
            steps += 1;
        }
        assert_eq!(steps, 7);
        assert_eq!(space.evaluations(), 7);
    }

    #[test]
    fn test_inner_termination_wins() {
        let mut space = BudgetedSearchSpace::new(ExhaustiveSearchSpace::new(3), 1000);
        space.on_start();
        let mut steps = 0;
        while !space.done() {
            space.next_pair();
            space.commit_status(false);
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_restart_resets_budget() {
        let mut space = BudgetedSearchSpace::new(ExhaustiveSearchSpace::new(4), 2);
        space.on_start();
        space.next_pair();
        space.commit_status(false);
        space.next_pair();
        space.commit_status(false);
        assert!(space.done());
        space.on_start();
        assert!(!space.done());
        assert_eq!(space.evaluations(), 0);
    }

    #[test]
    fn test_zero_budget_is_done() {
        let space = BudgetedSearchSpace::new(ExhaustiveSearchSpace::new(4), 0);
        assert!(space.done());
    }
}
