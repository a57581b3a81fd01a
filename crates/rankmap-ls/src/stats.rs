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

//! Counters collected during a local search run.
//!
//! Updates saturate instead of overflowing so they are safe in the hot loop.
//! Every iteration ends in exactly one of the three outcomes skipped,
//! accepted or rejected.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocalSearchStatistics {
    /// Number of candidate pairs drawn from the search space.
    pub iterations: u64,

    /// Pairs skipped because both ranks share the innermost location.
    pub skipped_swaps: u64,

    /// Swaps that were evaluated and kept.
    pub accepted_swaps: u64,

    /// Swaps that were evaluated and rolled back.
    pub rejected_swaps: u64,

    /// Wall-clock time of the whole run, including validation.
    pub time_total: Duration,
}

impl LocalSearchStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_skipped_swap(&mut self) {
        self.skipped_swaps = self.skipped_swaps.saturating_add(1);
    }

    #[inline]
    pub fn on_accepted_swap(&mut self) {
        self.accepted_swaps = self.accepted_swaps.saturating_add(1);
    }

    #[inline]
    pub fn on_rejected_swap(&mut self) {
        self.rejected_swaps = self.rejected_swaps.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Returns the number of swaps whose cost was actually evaluated.
    #[inline]
    pub fn evaluated_swaps(&self) -> u64 {
        self.accepted_swaps.saturating_add(self.rejected_swaps)
    }
}

impl std::fmt::Display for LocalSearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rankmap-LS Statistics:")?;
        writeln!(f, "   Iterations:       {}", self.iterations)?;
        writeln!(f, "   Skipped Swaps:    {}", self.skipped_swaps)?;
        writeln!(f, "   Accepted Swaps:   {}", self.accepted_swaps)?;
        writeln!(f, "   Rejected Swaps:   {}", self.rejected_swaps)?;
        writeln!(f, "   Total Time:       {:?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = LocalSearchStatistics::default();
        stats.on_iteration();
        stats.on_iteration();
        stats.on_iteration();
        stats.on_skipped_swap();
        stats.on_accepted_swap();
        stats.on_rejected_swap();
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.evaluated_swaps(), 2);
        assert_eq!(
            stats.iterations,
            stats.skipped_swaps + stats.accepted_swaps + stats.rejected_swaps
        );
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = LocalSearchStatistics {
            iterations: u64::MAX,
            ..Default::default()
        };
        stats.on_iteration();
        assert_eq!(stats.iterations, u64::MAX);
    }

    #[test]
    fn test_display_lists_counters() {
        let stats = LocalSearchStatistics {
            accepted_swaps: 7,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("Rankmap-LS Statistics:"));
        assert!(text.contains("Accepted Swaps:   7"));
    }
}
