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

//! # Search Spaces
//!
//! A search space decides which pairs of nodes the engine tries to swap and
//! when the search is over. The engine never terminates on its own; it asks
//! [`SearchSpace::done`] before every step, draws a pair with
//! [`SearchSpace::next_pair`] and reports the outcome with
//! [`SearchSpace::commit_status`]. Skipped pairs are reported as rejected.
//!
//! Concrete spaces:
//!
//! * [`exhaustive::ExhaustiveSearchSpace`]: every pair, lexicographic order.
//! * [`windowed::WindowedSearchSpace`]: pairs whose indices differ by at most
//!   a window.
//! * [`random::RandomSearchSpace`]: uniform random pairs.
//! * [`communication_graph::CommunicationGraphSearchSpace`]: pairs of nodes
//!   close in the communication graph, revisiting the surroundings of
//!   accepted swaps first.
//!
//! Wrappers [`budgeted::BudgetedSearchSpace`] and
//! [`time_limited::TimeLimitedSearchSpace`] bound any space by evaluations or
//! wall-clock time.

pub mod budgeted;
pub mod communication_graph;
pub mod exhaustive;
pub mod random;
pub mod time_limited;
pub mod windowed;

use rankmap_model::index::NodeIndex;

/// A stream of candidate swap pairs with accept/reject feedback.
///
/// Implementations must guarantee that `next_pair` returns two distinct nodes
/// `< num_nodes()`, and that the stream reaches `done()` in finitely many
/// steps when every swap after some point is rejected.
pub trait SearchSpace {
    /// Returns the name of the search space.
    fn name(&self) -> &str;

    /// Returns the number of nodes the pairs are drawn from.
    fn num_nodes(&self) -> usize;

    /// Called once by the engine before the first pair is drawn.
    fn on_start(&mut self) {}

    /// Returns `true` when no further pairs should be tried.
    fn done(&self) -> bool;

    /// Returns the next pair to evaluate. Never called after `done()`.
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex);

    /// Reports whether the last pair was swapped (`true`) or not.
    fn commit_status(&mut self, accepted: bool);
}

impl<S> SearchSpace for Box<S>
where
    S: SearchSpace + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline]
    fn on_start(&mut self) {
        (**self).on_start()
    }

    #[inline]
    fn done(&self) -> bool {
        (**self).done()
    }

    #[inline]
    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        (**self).next_pair()
    }

    #[inline]
    fn commit_status(&mut self, accepted: bool) {
        (**self).commit_status(accepted)
    }
}

impl std::fmt::Debug for dyn SearchSpace + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchSpace {{ name: {} }}", self.name())
    }
}

impl std::fmt::Display for dyn SearchSpace + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchSpace: {}", self.name())
    }
}
