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

//! Pairs of nodes with nearby indices.
//!
//! Initial mappings are often produced by a partitioner that numbers tasks of
//! one block consecutively, so nodes with close indices tend to be close in
//! the communication graph. The windowed space cycles through all pairs
//! `(i, j)` with `0 < j - i <= window` in lexicographic order and stops after
//! one full cycle in which every pair was rejected.

use crate::search_space::SearchSpace;
use rankmap_model::{error::ConfigError, index::NodeIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedSearchSpace {
    num_nodes: usize,
    window: usize,
    num_pairs: u64,
    i: usize,
    j: usize,
    unsuccessful: u64,
}

/// Number of pairs `(i, j)` with `i < j < n` and `j - i <= window`.
fn count_pairs(num_nodes: usize, window: usize) -> u64 {
    if num_nodes < 2 {
        return 0;
    }
    let w = window.min(num_nodes - 1) as u64;
    let n = num_nodes as u64;
    // w full rows shrink at the end: sum_{d=1..w} (n - d)
    w * n - w * (w + 1) / 2
}

impl WindowedSearchSpace {
    /// Creates a windowed space over `num_nodes` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWindow`] if `window == 0`.
    pub fn new(num_nodes: usize, window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self::with_window(num_nodes, window))
    }

    /// Creates the space for an already validated, positive `window`.
    #[inline]
    pub(super) fn with_window(num_nodes: usize, window: usize) -> Self {
        debug_assert!(
            window > 0,
            "called `WindowedSearchSpace::with_window` with a zero window"
        );
        Self {
            num_nodes,
            window,
            num_pairs: count_pairs(num_nodes, window),
            i: 0,
            j: 1,
            unsuccessful: 0,
        }
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the number of distinct pairs in one cycle.
    #[inline]
    pub fn num_pairs(&self) -> u64 {
        self.num_pairs
    }

    #[inline]
    fn advance(&mut self) {
        self.j += 1;
        if self.j >= self.num_nodes || self.j - self.i > self.window {
            self.i += 1;
            if self.i + 1 >= self.num_nodes {
                self.i = 0;
            }
            self.j = self.i + 1;
        }
    }
}

impl SearchSpace for WindowedSearchSpace {
    fn name(&self) -> &str {
        "WindowedSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn on_start(&mut self) {
        self.i = 0;
        self.j = 1;
        self.unsuccessful = 0;
    }

    #[inline]
    fn done(&self) -> bool {
        self.unsuccessful >= self.num_pairs
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        debug_assert!(
            !self.done(),
            "called `WindowedSearchSpace::next_pair` after the search space is done"
        );
        let pair = (NodeIndex::new(self.i), NodeIndex::new(self.j));
        self.advance();
        pair
    }

    #[inline]
    fn commit_status(&mut self, accepted: bool) {
        if accepted {
            self.unsuccessful = 0;
        } else {
            self.unsuccessful += 1;
        }
    }
}
