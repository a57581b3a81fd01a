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

//! Uniformly random pairs.
//!
//! Draws two distinct nodes uniformly at random from an owned generator and
//! stops after a configurable number of consecutive rejections. Seeding the
//! generator makes runs reproducible.

use crate::search_space::SearchSpace;
use rand::Rng;
use rankmap_model::{error::ConfigError, index::NodeIndex};

#[derive(Debug, Clone)]
pub struct RandomSearchSpace<R> {
    num_nodes: usize,
    max_unsuccessful: u64,
    unsuccessful: u64,
    rng: R,
}

impl<R> RandomSearchSpace<R>
where
    R: Rng,
{
    /// Creates a random space over `num_nodes` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroMaxUnsuccessful`] if `max_unsuccessful == 0`.
    pub fn new(num_nodes: usize, max_unsuccessful: u64, rng: R) -> Result<Self, ConfigError> {
        if max_unsuccessful == 0 {
            return Err(ConfigError::ZeroMaxUnsuccessful);
        }
        Ok(Self {
            num_nodes,
            max_unsuccessful,
            unsuccessful: 0,
            rng,
        })
    }

    #[inline]
    pub fn max_unsuccessful(&self) -> u64 {
        self.max_unsuccessful
    }
}

impl<R> SearchSpace for RandomSearchSpace<R>
where
    R: Rng,
{
    fn name(&self) -> &str {
        "RandomSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn on_start(&mut self) {
        self.unsuccessful = 0;
    }

    #[inline]
    fn done(&self) -> bool {
        self.num_nodes < 2 || self.unsuccessful >= self.max_unsuccessful
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        debug_assert!(
            self.num_nodes >= 2,
            "called `RandomSearchSpace::next_pair` with fewer than two nodes"
        );
        let a = self.rng.random_range(0..self.num_nodes);
        // draw from n - 1 slots and skip over `a`
        let mut b = self.rng.random_range(0..self.num_nodes - 1);
        if b >= a {
            b += 1;
        }
        (NodeIndex::new(a), NodeIndex::new(b))
    }

    #[inline]
    fn commit_status(&mut self, accepted: bool) {
        if accepted {
            self.unsuccessful = 0;
        } else {
            self.unsuccessful = self.unsuccessful.saturating_add(1);
        }
    }
}
