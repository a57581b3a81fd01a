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

//! Monitoring interface for local search runs.
//!
//! Monitors are told when a run starts and ends and what happened to every
//! drawn pair: skipped because both ranks share a location, accepted, or
//! rolled back. They observe only; when to stop is decided by the search
//! space. The swap hooks default to doing nothing, so a monitor only
//! implements what it cares about.

use crate::stats::LocalSearchStatistics;
use rankmap_core::num::CostNumeric;
use rankmap_model::index::NodeIndex;

/// A monitor for local search runs.
pub trait LocalSearchMonitor<T>
where
    T: CostNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called after initialization with the objective of the initial assignment.
    fn on_start(&mut self, initial_objective: T);

    /// Called with the final objective and the complete statistics.
    fn on_end(&mut self, final_objective: T, statistics: &LocalSearchStatistics);

    /// Called when the pair `(a, b)` was not evaluated because both ranks
    /// share the same location.
    fn on_swap_skipped(&mut self, _a: NodeIndex, _b: NodeIndex, _statistics: &LocalSearchStatistics) {}

    /// Called after the swap of `a` and `b` was kept; `objective` is the new total.
    fn on_swap_accepted(
        &mut self,
        _a: NodeIndex,
        _b: NodeIndex,
        _objective: T,
        _statistics: &LocalSearchStatistics,
    ) {
    }

    /// Called after the swap of `a` and `b` was rolled back; `candidate` is
    /// the total the swap would have produced.
    fn on_swap_rejected(
        &mut self,
        _a: NodeIndex,
        _b: NodeIndex,
        _candidate: T,
        _statistics: &LocalSearchStatistics,
    ) {
    }
}

impl<T, M> LocalSearchMonitor<T> for Box<M>
where
    T: CostNumeric,
    M: LocalSearchMonitor<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_start(&mut self, initial_objective: T) {
        (**self).on_start(initial_objective)
    }

    #[inline]
    fn on_end(&mut self, final_objective: T, statistics: &LocalSearchStatistics) {
        (**self).on_end(final_objective, statistics)
    }

    #[inline]
    fn on_swap_skipped(&mut self, a: NodeIndex, b: NodeIndex, statistics: &LocalSearchStatistics) {
        (**self).on_swap_skipped(a, b, statistics)
    }

    #[inline]
    fn on_swap_accepted(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        objective: T,
        statistics: &LocalSearchStatistics,
    ) {
        (**self).on_swap_accepted(a, b, objective, statistics)
    }

    #[inline]
    fn on_swap_rejected(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        candidate: T,
        statistics: &LocalSearchStatistics,
    ) {
        (**self).on_swap_rejected(a, b, candidate, statistics)
    }
}

impl<T> std::fmt::Debug for dyn LocalSearchMonitor<T> + '_
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn LocalSearchMonitor<T> + '_
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor: {}", self.name())
    }
}
