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

use crate::{monitor::local_search_monitor::LocalSearchMonitor, stats::LocalSearchStatistics};
use rankmap_core::num::CostNumeric;
use rankmap_model::index::NodeIndex;

/// Forwards every event to a list of monitors, in insertion order.
#[derive(Default)]
pub struct CompositeLocalSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    monitors: Vec<Box<dyn LocalSearchMonitor<T> + 'a>>,
}

impl<'a, T> CompositeLocalSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: LocalSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_boxed_monitor(&mut self, monitor: Box<dyn LocalSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn monitors(&self) -> &[Box<dyn LocalSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<T> std::fmt::Debug for CompositeLocalSearchMonitor<'_, T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeLocalSearchMonitor")
            .field("monitors", &self.monitors)
            .finish()
    }
}

impl<T> LocalSearchMonitor<T> for CompositeLocalSearchMonitor<'_, T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "CompositeLocalSearchMonitor"
    }

    fn on_start(&mut self, initial_objective: T) {
        for m in &mut self.monitors {
            m.on_start(initial_objective);
        }
    }

    fn on_end(&mut self, final_objective: T, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_end(final_objective, statistics);
        }
    }

    fn on_swap_skipped(&mut self, a: NodeIndex, b: NodeIndex, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_swap_skipped(a, b, statistics);
        }
    }

    fn on_swap_accepted(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        objective: T,
        statistics: &LocalSearchStatistics,
    ) {
        for m in &mut self.monitors {
            m.on_swap_accepted(a, b, objective, statistics);
        }
    }

    fn on_swap_rejected(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        candidate: T,
        statistics: &LocalSearchStatistics,
    ) {
        for m in &mut self.monitors {
            m.on_swap_rejected(a, b, candidate, statistics);
        }
    }
}
