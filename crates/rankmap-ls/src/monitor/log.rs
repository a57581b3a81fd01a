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

//! Progress reporting through the `log` facade.
//!
//! `LogMonitor` writes a header when a run starts, a throttled table line
//! while it searches and a summary when it ends, all at `info` level. Table
//! lines are emitted at most once per `log_interval`, and the clock is only
//! read when the iteration counter masked with `clock_check_mask` is zero.

use crate::{monitor::local_search_monitor::LocalSearchMonitor, stats::LocalSearchStatistics};
use rankmap_core::num::CostNumeric;
use rankmap_model::index::NodeIndex;
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 78;

#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    current_objective: Option<T>,
    best_objective: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: CostNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            current_objective: None,
            best_objective: None,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    /// Returns the lowest objective seen in the current run.
    #[inline]
    pub fn best_objective(&self) -> Option<T> {
        self.best_objective
    }

    #[inline(always)]
    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<12} | {:<10} | {:<10} | {:<12} | {:<12}",
            "Elapsed",
            "Iterations",
            "Accepted",
            "Skipped",
            "Current",
            "Best"
        );
        log::info!("{}", "-".repeat(RULE_WIDTH));
    }

    fn log_line(&mut self, stats: &LocalSearchStatistics) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let current = self
            .current_objective
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        let best = self
            .best_objective
            .map_or_else(|| "-".to_string(), |v| v.to_string());

        log::info!(
            "{:<9} | {:<12} | {:<10} | {:<10} | {:<12} | {:<12}",
            elapsed,
            stats.iterations,
            stats.accepted_swaps,
            stats.skipped_swaps,
            current,
            best
        );
        self.last_log_time = now;
    }

    #[inline(always)]
    fn maybe_log(&mut self, stats: &LocalSearchStatistics) {
        if (stats.iterations & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(stats);
        }
    }
}

impl<T> Default for LogMonitor<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {:?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> LocalSearchMonitor<T> for LogMonitor<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, initial_objective: T) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.current_objective = Some(initial_objective);
        self.best_objective = Some(initial_objective);
        log::info!("Local search started at objective {}", initial_objective);
        self.log_header();
    }

    fn on_end(&mut self, final_objective: T, statistics: &LocalSearchStatistics) {
        log::info!("{}", "-".repeat(RULE_WIDTH));
        log::info!(
            "Local search finished at objective {} after {} iterations ({} accepted, {} rejected, {} skipped) in {:?}",
            final_objective,
            statistics.iterations,
            statistics.accepted_swaps,
            statistics.rejected_swaps,
            statistics.skipped_swaps,
            statistics.time_total
        );
    }

    fn on_swap_skipped(&mut self, _a: NodeIndex, _b: NodeIndex, statistics: &LocalSearchStatistics) {
        self.maybe_log(statistics);
    }

    fn on_swap_accepted(
        &mut self,
        _a: NodeIndex,
        _b: NodeIndex,
        objective: T,
        statistics: &LocalSearchStatistics,
    ) {
        self.current_objective = Some(objective);
        if self.best_objective.is_none_or(|best| objective < best) {
            self.best_objective = Some(objective);
        }
        self.maybe_log(statistics);
    }

    fn on_swap_rejected(
        &mut self,
        _a: NodeIndex,
        _b: NodeIndex,
        _candidate: T,
        statistics: &LocalSearchStatistics,
    ) {
        self.maybe_log(statistics);
    }
}
