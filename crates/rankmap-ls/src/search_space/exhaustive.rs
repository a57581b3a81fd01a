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

//! Every pair of nodes, in lexicographic order.
//!
//! Terminates after `N (N - 1) / 2` consecutive rejections, at which point
//! the assignment is a local optimum of the swap neighborhood (for greedy
//! acceptance). Each full cycle costs `O(N^2)` evaluations, so this space is
//! best suited for small and medium graphs.

use crate::search_space::{windowed::WindowedSearchSpace, SearchSpace};
use rankmap_model::index::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustiveSearchSpace {
    inner: WindowedSearchSpace,
}

impl ExhaustiveSearchSpace {
    pub fn new(num_nodes: usize) -> Self {
        // a window spanning the whole index range covers every pair
        let window = num_nodes.saturating_sub(1).max(1);
        Self {
            inner: WindowedSearchSpace::with_window(num_nodes, window),
        }
    }

    /// Returns `N (N - 1) / 2`.
    #[inline]
    pub fn num_pairs(&self) -> u64 {
        self.inner.num_pairs()
    }
}

impl SearchSpace for ExhaustiveSearchSpace {
    fn name(&self) -> &str {
        "ExhaustiveSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn on_start(&mut self) {
        self.inner.on_start();
    }

    #[inline]
    fn done(&self) -> bool {
        self.inner.done()
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        self.inner.next_pair()
    }

    #[inline]
    fn commit_status(&mut self, accepted: bool) {
        self.inner.commit_status(accepted);
    }
}
