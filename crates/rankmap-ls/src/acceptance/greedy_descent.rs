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

//! Greedy descent (first improvement).
//!
//! Keeps a swap only if it strictly lowers the objective. Since the engine
//! commits the first improving swap it finds, this is a first-improvement hill
//! climber: deterministic for a deterministic search space, and finished once
//! the search space has seen a full round of rejections, i.e. at a local
//! optimum of the swap neighborhood. Equal-cost swaps are rejected so the
//! search never wanders on plateaus.

use crate::acceptance::AcceptanceCriterion;
use rankmap_core::num::CostNumeric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyDescent;

impl GreedyDescent {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> AcceptanceCriterion<T> for GreedyDescent
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "GreedyDescent"
    }

    #[inline(always)]
    fn should_accept(&mut self, current: T, candidate: T) -> bool {
        candidate < current
    }
}
