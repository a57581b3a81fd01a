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

//! # Acceptance Criteria
//!
//! After the engine has evaluated a tentative swap it asks an
//! [`AcceptanceCriterion`] whether the candidate total replaces the current
//! one. The criterion sees only the two objective values; everything else
//! about the swap stays inside the engine.
//!
//! * [`greedy_descent::GreedyDescent`]: strict improvement, ties rejected.
//!   The default, and the only criterion under which the objective never
//!   increases.
//! * [`simulated_annealing::SimulatedAnnealing`]: Metropolis acceptance of
//!   worsening swaps under a pluggable cooling schedule.

pub mod greedy_descent;
pub mod simulated_annealing;

use rankmap_core::num::CostNumeric;

/// Decides whether a candidate objective replaces the current one.
pub trait AcceptanceCriterion<T>
where
    T: CostNumeric,
{
    /// Returns the name of the criterion.
    fn name(&self) -> &str;

    /// Called once by the engine before the first swap is evaluated.
    fn on_start(&mut self) {}

    /// Decides whether to move from `current` to `candidate`.
    fn should_accept(&mut self, current: T, candidate: T) -> bool;

    /// Called after an evaluated swap was kept.
    fn on_accept(&mut self) {}

    /// Called after an evaluated swap was rolled back.
    fn on_reject(&mut self) {}
}

impl<T, A> AcceptanceCriterion<T> for Box<A>
where
    T: CostNumeric,
    A: AcceptanceCriterion<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_start(&mut self) {
        (**self).on_start()
    }

    #[inline]
    fn should_accept(&mut self, current: T, candidate: T) -> bool {
        (**self).should_accept(current, candidate)
    }

    #[inline]
    fn on_accept(&mut self) {
        (**self).on_accept()
    }

    #[inline]
    fn on_reject(&mut self) {
        (**self).on_reject()
    }
}

impl<T> std::fmt::Debug for dyn AcceptanceCriterion<T> + '_
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AcceptanceCriterion {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn AcceptanceCriterion<T> + '_
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AcceptanceCriterion: {}", self.name())
    }
}
