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

//! Result of a completed local search run.
//!
//! The refined assignment itself is written back into the caller's buffer;
//! the outcome carries the objective before and after the run together with
//! the run statistics.

use crate::stats::LocalSearchStatistics;
use rankmap_core::num::CostNumeric;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchOutcome<T> {
    initial_objective: T,
    final_objective: T,
    statistics: LocalSearchStatistics,
}

impl<T> LocalSearchOutcome<T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new(initial_objective: T, final_objective: T, statistics: LocalSearchStatistics) -> Self {
        Self {
            initial_objective,
            final_objective,
            statistics,
        }
    }

    /// Returns the QAP cost of the assignment the run started from.
    #[inline]
    pub fn initial_objective(&self) -> T {
        self.initial_objective
    }

    /// Returns the verified QAP cost of the assignment left in the buffer.
    #[inline]
    pub fn final_objective(&self) -> T {
        self.final_objective
    }

    #[inline]
    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    /// Returns `initial - final`, positive when the run improved the mapping.
    #[inline]
    pub fn improvement(&self) -> T {
        self.initial_objective - self.final_objective
    }
}

impl<T> std::fmt::Display for LocalSearchOutcome<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Local Search Outcome:")?;
        writeln!(f, "   Initial Objective: {}", self.initial_objective)?;
        writeln!(f, "   Final Objective:   {}", self.final_objective)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement() {
        let outcome = LocalSearchOutcome::new(16i64, 12, LocalSearchStatistics::default());
        assert_eq!(outcome.initial_objective(), 16);
        assert_eq!(outcome.final_objective(), 12);
        assert_eq!(outcome.improvement(), 4);
        assert!(outcome.to_string().contains("Final Objective:   12"));
    }
}
