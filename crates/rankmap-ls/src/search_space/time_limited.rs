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

//! Wall-clock limit for any search space.
//!
//! The clock is read only every `clock_check_mask + 1` drawn pairs, so the
//! wrapper adds next to nothing to the hot loop. With the default mask of
//! `0x0FFF` the limit may be overshot by up to 4095 evaluations. Once the
//! limit is observed it stays latched until the next start.
//!
//! The start time is reset in `on_start`, so one wrapper can time several
//! runs independently.

use crate::search_space::SearchSpace;
use rankmap_model::index::NodeIndex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TimeLimitedSearchSpace<S> {
    inner: S,
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
    steps: u64,
    expired: bool,
}

impl<S> TimeLimitedSearchSpace<S>
where
    S: SearchSpace,
{
    /// Checks the clock every 4096 pairs.
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x0FFF;

    /// Wraps `inner` with a wall-clock limit of `time_limit`.
    #[inline]
    pub fn new(inner: S, time_limit: Duration) -> Self {
        Self::with_mask(inner, time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    /// Wraps `inner` with a custom clock check mask.
    /// Lower mask values check more often; higher values check less often.
    #[inline]
    pub fn with_mask(inner: S, time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            inner,
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
            steps: 0,
            expired: time_limit.is_zero(),
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Returns `true` once the limit has been observed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    #[inline]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> SearchSpace for TimeLimitedSearchSpace<S>
where
    S: SearchSpace,
{
    fn name(&self) -> &str {
        "TimeLimitedSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn on_start(&mut self) {
        self.start_time = Instant::now();
        self.steps = 0;
        self.expired = self.time_limit.is_zero();
        self.inner.on_start();
    }

    #[inline]
    fn done(&self) -> bool {
        self.expired || self.inner.done()
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            self.expired = true;
        }
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
    use crate::search_space::random::RandomSearchSpace;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_limit_is_done_immediately() {
        let inner = RandomSearchSpace::new(8, 100, ChaCha8Rng::seed_from_u64(42)).unwrap();
        let mut space = TimeLimitedSearchSpace::new(inner, Duration::ZERO);
        space.on_start();
        assert!(space.done());
    }

    #[test]
    fn test_expires_after_limit() {
        let inner = RandomSearchSpace::new(8, u64::MAX, ChaCha8Rng::seed_from_u64(42)).unwrap();
        let mut space = TimeLimitedSearchSpace::with_mask(inner, Duration::from_millis(5), 0);
        space.on_start();
        assert!(!space.done());
        std::thread::sleep(Duration::from_millis(10));
        space.next_pair();
        space.commit_status(false);
        assert!(space.done());
        assert!(space.is_expired());
    }

    #[test]
    fn test_generous_limit_defers_to_inner() {
        let inner = RandomSearchSpace::new(8, 3, ChaCha8Rng::seed_from_u64(42)).unwrap();
        let mut space = TimeLimitedSearchSpace::new(inner, Duration::from_secs(3600));
        space.on_start();
        let mut steps = 0;
        while !space.done() {
            space.next_pair();
            space.commit_status(false);
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(!space.is_expired());
    }
}
